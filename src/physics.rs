//! Ground sensing and vertical motion integration.
//!
//! Two of the four per-tick stages: the sphere-overlap grounded check and the
//! gravity integrator with its fall-timeout latch. Both are purely numeric;
//! there are no failure paths.

use bevy::prelude::*;

use crate::backend::{AnimParam, AnimationSink, SpatialProbe};
use crate::components::{FollowerConfig, FollowerState};

/// Maximum magnitude `vertical_velocity` may reach under gravity, in m/s.
pub const TERMINAL_VELOCITY: f32 = 53.0;

/// Velocity a grounded follower is pinned at instead of zero. Keeps the body
/// pressed into the ground so next tick's probe still overlaps.
pub const GROUNDED_VELOCITY_FLOOR: f32 = -2.0;

/// World-space center of the ground probe sphere.
#[inline]
pub fn probe_center(position: Vec3, grounded_offset: f32) -> Vec3 {
    Vec3::new(position.x, position.y - grounded_offset, position.z)
}

/// Stage 1: overlap-test the probe sphere against ground geometry and record
/// the result. Forwards `Grounded` to the animation sink when one is present.
pub fn grounded_check<P: SpatialProbe, A: AnimationSink>(
    config: &FollowerConfig,
    state: &mut FollowerState,
    probe: &P,
    position: Vec3,
    anim: &mut Option<&mut A>,
) {
    let center = probe_center(position, config.grounded_offset);
    state.grounded = probe.overlap_sphere(center, config.grounded_radius, config.ground_layers);

    if let Some(sink) = anim.as_deref_mut() {
        sink.set_bool(AnimParam::Grounded, state.grounded);
    }
}

/// Stage 2: integrate vertical velocity under gravity.
///
/// Grounded ticks reset the fall timeout and pin a falling velocity at
/// [`GROUNDED_VELOCITY_FLOOR`]. Airborne ticks count the timeout down and
/// latch the free-fall signal once it expires; the latch only clears on the
/// next grounded tick. Integration is one semi-implicit Euler step, floored
/// at the terminal velocity so |v| stays bounded for any `dt`.
pub fn handle_gravity<A: AnimationSink>(
    config: &FollowerConfig,
    state: &mut FollowerState,
    anim: &mut Option<&mut A>,
    dt: f32,
) {
    if state.grounded {
        state.fall_timeout_remaining = config.fall_timeout;
        state.free_fall = false;

        if let Some(sink) = anim.as_deref_mut() {
            sink.set_bool(AnimParam::Jump, false);
            sink.set_bool(AnimParam::FreeFall, false);
        }
    } else {
        state.fall_timeout_remaining -= dt;
        if state.fall_timeout_remaining <= 0.0 {
            state.free_fall = true;
            if let Some(sink) = anim.as_deref_mut() {
                sink.set_bool(AnimParam::FreeFall, true);
            }
        }
    }

    if state.vertical_velocity < TERMINAL_VELOCITY {
        state.vertical_velocity =
            (state.vertical_velocity + config.gravity * dt).max(-TERMINAL_VELOCITY);
    }

    // Grounded ticks end pinned at the floor instead of accumulating fall
    // speed.
    if state.grounded && state.vertical_velocity < 0.0 {
        state.vertical_velocity = GROUNDED_VELOCITY_FLOOR;
    }
}
