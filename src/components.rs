//! ECS components carried by a follower entity.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Per-follower tuning, fixed after spawn.
///
/// Defaults match the hand-tuned humanoid rig values; change them together
/// or the walk/sprint blend tree will look off.
#[derive(Component, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FollowerConfig {
    /// Dead-zone radius: inside it the follower decelerates to a stop.
    pub follow_distance: f32,
    /// Beyond this distance the follower sprints instead of walking.
    pub sprint_distance_threshold: f32,
    /// Walking speed in m/s.
    pub move_speed: f32,
    /// Sprinting speed in m/s.
    pub sprint_speed: f32,
    /// Time constant for the critically-damped yaw smoothing, in seconds.
    pub rotation_smooth_time: f32,
    /// Exponential rate for speed/blend smoothing, in 1/s.
    pub speed_change_rate: f32,
    /// Gravity in m/s^2 (negative Y).
    pub gravity: f32,
    /// Airborne time before the free-fall animation signal latches, in seconds.
    pub fall_timeout: f32,
    /// Vertical offset of the ground probe sphere below the entity origin.
    /// Negative values probe slightly above the origin.
    pub grounded_offset: f32,
    /// Radius of the ground probe sphere.
    pub grounded_radius: f32,
    /// Collision-group bitmask of geometry that counts as ground.
    pub ground_layers: u32,
    /// Body-center offset in local space; footstep/landing audio plays here.
    pub body_center: Vec3,
    /// Linear volume for footstep and landing clips.
    pub footstep_volume: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            follow_distance: 4.0,
            sprint_distance_threshold: 10.0,
            move_speed: 2.0,
            sprint_speed: 5.335,
            rotation_smooth_time: 0.12,
            speed_change_rate: 10.0,
            gravity: -15.0,
            fall_timeout: 0.15,
            grounded_offset: -0.14,
            grounded_radius: 0.28,
            ground_layers: u32::MAX,
            body_center: Vec3::new(0.0, 0.9, 0.0),
            footstep_volume: 0.5,
        }
    }
}

// =============================================================================
// RUNTIME STATE
// =============================================================================

/// Mutable per-tick state of one follower. Owned exclusively by the tick
/// update; nothing else writes it.
#[derive(Component, Clone, Debug)]
pub struct FollowerState {
    /// Smoothed horizontal speed in m/s. Never negative.
    pub speed: f32,
    /// Smoothed animation blend value; tracks `speed` but is pushed to the
    /// animation sink instead of the motion backend.
    pub animation_blend: f32,
    /// Vertical velocity in m/s, clamped at the terminal magnitude.
    pub vertical_velocity: f32,
    /// Remaining airborne time before the free-fall signal latches.
    pub fall_timeout_remaining: f32,
    /// Latched free-fall signal; cleared only by re-grounding.
    pub free_fall: bool,
    /// Desired facing in degrees. Persists across ticks while the
    /// direction-to-target is near zero, which keeps yaw stable when the
    /// follower is standing on top of its target.
    pub target_yaw: f32,
    /// Ground probe result from this tick.
    pub grounded: bool,
    /// Internal state of the critically-damped yaw smoothing, in deg/s.
    pub rotation_velocity: f32,
}

impl FollowerState {
    pub fn new(config: &FollowerConfig) -> Self {
        Self {
            speed: 0.0,
            animation_blend: 0.0,
            vertical_velocity: 0.0,
            fall_timeout_remaining: config.fall_timeout,
            free_fall: false,
            target_yaw: 0.0,
            grounded: true,
            rotation_velocity: 0.0,
        }
    }
}

/// The entity this follower tracks. `None` (or a despawned entity) is a
/// valid idle condition: the follower stands still and keeps its facing.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FollowerTarget(pub Option<Entity>);

// =============================================================================
// ANIMATION PARAMETERS
// =============================================================================

/// Concrete animation sink: the five parameters the controller pushes each
/// tick, stored as plain fields for a downstream animation system to read.
#[derive(Component, Clone, Copy, Debug)]
pub struct FollowerAnimState {
    pub speed: f32,
    pub grounded: bool,
    pub jump: bool,
    pub free_fall: bool,
    pub motion_speed: f32,
}

impl Default for FollowerAnimState {
    fn default() -> Self {
        Self {
            speed: 0.0,
            grounded: true,
            jump: false,
            free_fall: false,
            motion_speed: 1.0,
        }
    }
}

// =============================================================================
// AUDIO CLIPS
// =============================================================================

/// Footstep/landing clips for one follower. An empty footstep list is fine;
/// the footstep event then plays nothing.
#[derive(Component, Clone, Debug, Default)]
pub struct FollowerAudioClips {
    pub footsteps: Vec<Handle<AudioSource>>,
    pub landing: Option<Handle<AudioSource>>,
}
