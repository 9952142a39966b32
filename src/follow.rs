//! Target following: speed planning, yaw smoothing, and the per-tick move
//! request.
//!
//! Stage 3 and 4 of the tick. Displacement walks along the heading the
//! follower committed to last tick (the stored `target_yaw`), while the yaw
//! update re-aims at the current raw direction-to-target. Keeping those two
//! quantities distinct is what makes the follower lean into turns instead of
//! snapping.

use bevy::prelude::*;

use crate::backend::{AnimParam, AnimationSink, MotionBackend};
use crate::components::{FollowerConfig, FollowerState};
use crate::smoothing::{exp_approach, smooth_damp_angle};

/// Squared length below which a normalized direction is treated as zero and
/// the yaw update is skipped. Avoids yaw jitter on top of the target.
const DIRECTION_EPSILON_SQ: f32 = 0.01;

/// Target speed for the tick: sprint only strictly beyond the threshold.
#[inline]
pub(crate) fn select_target_speed(config: &FollowerConfig, distance: f32) -> f32 {
    if distance > config.sprint_distance_threshold {
        config.sprint_speed
    } else {
        config.move_speed
    }
}

/// Unit heading on the XZ plane for a yaw in degrees (Bevy -Z forward).
#[inline]
fn heading_from_yaw(yaw_degrees: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Stages 3+4: plan the follow motion and apply it through the motion
/// backend.
///
/// With no target position this is a complete no-op for the tick: no speed
/// change, no move request, no yaw write. That is the idle contract, not an
/// error.
pub fn follow_target<M: MotionBackend, A: AnimationSink>(
    config: &FollowerConfig,
    state: &mut FollowerState,
    motion: &mut M,
    target: Option<Vec3>,
    anim: &mut Option<&mut A>,
    dt: f32,
) {
    let Some(target_pos) = target else {
        return;
    };

    let position = motion.position();
    let mut to_target = target_pos - position;
    to_target.y = 0.0;
    let distance = to_target.length();

    let target_speed = select_target_speed(config, distance);

    // Dead-zone: inside follow_distance the follower decelerates to a stop
    // no matter what speed the distance gate picked.
    let should_move = distance > config.follow_distance;
    let desired = if should_move { target_speed } else { 0.0 };

    state.speed = exp_approach(state.speed, desired, config.speed_change_rate, dt);
    state.animation_blend =
        exp_approach(state.animation_blend, desired, config.speed_change_rate, dt);

    // One displacement request per tick: last tick's heading times the
    // smoothed speed, plus the vertical velocity from the integrator.
    let move_dir = heading_from_yaw(state.target_yaw);
    motion.request_move(
        move_dir * (state.speed * dt) + Vec3::new(0.0, state.vertical_velocity, 0.0) * dt,
    );

    // Re-aim at the current raw direction, then smooth the facing toward it.
    let aim_dir = to_target.normalize_or_zero();
    if aim_dir.length_squared() > DIRECTION_EPSILON_SQ {
        state.target_yaw = (-aim_dir.x).atan2(-aim_dir.z).to_degrees();
        let yaw = smooth_damp_angle(
            motion.yaw_degrees(),
            state.target_yaw,
            &mut state.rotation_velocity,
            config.rotation_smooth_time,
            dt,
        );
        motion.set_yaw(yaw);
    }

    if let Some(sink) = anim.as_deref_mut() {
        sink.set_float(AnimParam::Speed, state.animation_blend);
        sink.set_float(AnimParam::MotionSpeed, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::FollowerAnimState;
    use approx::assert_relative_eq;

    /// Motion backend that records requests without moving. Equivalent to a
    /// follower pushed against a wall, which keeps distances constant.
    struct PinnedMotion {
        position: Vec3,
        yaw: f32,
        last_move: Option<Vec3>,
        yaw_writes: usize,
    }

    impl PinnedMotion {
        fn at(position: Vec3) -> Self {
            Self {
                position,
                yaw: 0.0,
                last_move: None,
                yaw_writes: 0,
            }
        }
    }

    impl MotionBackend for PinnedMotion {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn yaw_degrees(&self) -> f32 {
            self.yaw
        }
        fn request_move(&mut self, displacement: Vec3) {
            self.last_move = Some(displacement);
        }
        fn set_yaw(&mut self, yaw_degrees: f32) {
            self.yaw = yaw_degrees;
            self.yaw_writes += 1;
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (FollowerConfig, FollowerState) {
        let config = FollowerConfig::default();
        let state = FollowerState::new(&config);
        (config, state)
    }

    #[test]
    fn sprint_threshold_is_strict() {
        let (config, _) = setup();
        assert_eq!(select_target_speed(&config, 10.0 + 1e-3), config.sprint_speed);
        // Equality keeps the base speed.
        assert_eq!(select_target_speed(&config, 10.0), config.move_speed);
        assert_eq!(select_target_speed(&config, 5.0), config.move_speed);
    }

    #[test]
    fn no_target_is_a_no_op() {
        let (config, mut state) = setup();
        state.speed = 3.0;
        let mut motion = PinnedMotion::at(Vec3::ZERO);
        let mut sink: Option<&mut FollowerAnimState> = None;

        follow_target(&config, &mut state, &mut motion, None, &mut sink, DT);

        assert_eq!(state.speed, 3.0);
        assert!(motion.last_move.is_none());
        assert_eq!(motion.yaw_writes, 0);
    }

    #[test]
    fn speed_converges_to_sprint_beyond_threshold() {
        let (config, mut state) = setup();
        let mut motion = PinnedMotion::at(Vec3::ZERO);
        let target = Some(Vec3::new(0.0, 0.0, -15.0));
        let mut sink: Option<&mut FollowerAnimState> = None;

        for _ in 0..300 {
            follow_target(&config, &mut state, &mut motion, target, &mut sink, DT);
        }

        assert_relative_eq!(state.speed, config.sprint_speed, epsilon = 1e-3);
        assert_relative_eq!(state.animation_blend, config.sprint_speed, epsilon = 1e-3);

        // Per-tick horizontal displacement approaches speed * dt.
        let last = motion.last_move.unwrap();
        let horizontal = Vec3::new(last.x, 0.0, last.z).length();
        assert_relative_eq!(horizontal, config.sprint_speed * DT, epsilon = 1e-4);
    }

    #[test]
    fn inside_dead_zone_speed_decays_monotonically() {
        let (config, mut state) = setup();
        state.speed = config.sprint_speed;
        let mut motion = PinnedMotion::at(Vec3::ZERO);
        // Distance 3.0 < follow_distance 4.0.
        let target = Some(Vec3::new(3.0, 0.0, 0.0));
        let mut sink: Option<&mut FollowerAnimState> = None;

        let mut previous = state.speed;
        for _ in 0..200 {
            follow_target(&config, &mut state, &mut motion, target, &mut sink, DT);
            assert!(state.speed <= previous);
            assert!(state.speed >= 0.0);
            previous = state.speed;
        }
        assert!(state.speed < 1e-3);
    }

    #[test]
    fn yaw_persists_when_on_top_of_target() {
        let (config, mut state) = setup();
        state.target_yaw = 42.0;
        let mut motion = PinnedMotion::at(Vec3::new(1.0, 5.0, 2.0));
        // Same horizontal position, different height: direction is zero.
        let target = Some(Vec3::new(1.0, 0.0, 2.0));
        let mut sink: Option<&mut FollowerAnimState> = None;

        follow_target(&config, &mut state, &mut motion, target, &mut sink, DT);

        assert_eq!(state.target_yaw, 42.0);
        assert_eq!(motion.yaw_writes, 0);
        // The move request still happens (vertical component only matters).
        assert!(motion.last_move.is_some());
    }

    #[test]
    fn displacement_uses_previous_tick_heading() {
        let (config, mut state) = setup();
        state.speed = 2.0;
        state.target_yaw = 0.0; // committed heading: -Z
        let mut motion = PinnedMotion::at(Vec3::ZERO);
        // Target off to +X; the yaw update re-aims but this tick's move
        // still walks the old heading.
        let target = Some(Vec3::new(20.0, 0.0, 0.0));
        let mut sink: Option<&mut FollowerAnimState> = None;

        follow_target(&config, &mut state, &mut motion, target, &mut sink, DT);

        let mv = motion.last_move.unwrap();
        assert!(mv.z < 0.0, "moved along the committed -Z heading");
        assert_relative_eq!(mv.x, 0.0, epsilon = 1e-6);
        // target_yaw now points at +X for next tick.
        assert_relative_eq!(state.target_yaw, -90.0, epsilon = 1e-3);
        assert_eq!(motion.yaw_writes, 1);
    }

    #[test]
    fn blend_is_pushed_to_animation_sink() {
        let (config, mut state) = setup();
        let mut motion = PinnedMotion::at(Vec3::ZERO);
        let target = Some(Vec3::new(0.0, 0.0, -15.0));
        let mut anim = FollowerAnimState::default();
        let mut sink = Some(&mut anim);

        follow_target(&config, &mut state, &mut motion, target, &mut sink, DT);

        assert_eq!(anim.speed, state.animation_blend);
        assert_eq!(anim.motion_speed, 1.0);
    }
}
