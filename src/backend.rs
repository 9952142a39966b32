//! Collaborator contracts between the controller core and the host engine.
//!
//! The tick update is written against these traits so the whole state machine
//! runs in unit tests with mock implementations. Production implementations
//! live in [`crate::plugin`] on top of rapier and `Transform`.

use bevy::prelude::*;

use crate::components::FollowerAnimState;

/// Animation parameters the controller drives. Fixed symbolic identifiers,
/// resolved once; the sink decides what each one maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimParam {
    Speed,
    Grounded,
    Jump,
    FreeFall,
    MotionSpeed,
}

/// Receives the per-tick animation signals. Implementations ignore
/// parameters they have no use for.
pub trait AnimationSink {
    fn set_float(&mut self, param: AnimParam, value: f32);
    fn set_bool(&mut self, param: AnimParam, value: bool);
}

impl AnimationSink for FollowerAnimState {
    fn set_float(&mut self, param: AnimParam, value: f32) {
        match param {
            AnimParam::Speed => self.speed = value,
            AnimParam::MotionSpeed => self.motion_speed = value,
            _ => {}
        }
    }

    fn set_bool(&mut self, param: AnimParam, value: bool) {
        match param {
            AnimParam::Grounded => self.grounded = value,
            AnimParam::Jump => self.jump = value,
            AnimParam::FreeFall => self.free_fall = value,
            _ => {}
        }
    }
}

/// Spatial overlap query against collidable world geometry.
///
/// `groups` is a collision-group bitmask; trigger volumes (sensors) never
/// count. An empty result is a valid "not grounded" answer.
pub trait SpatialProbe {
    fn overlap_sphere(&self, center: Vec3, radius: f32, groups: u32) -> bool;
}

/// The follower's pose, owned by the motion backend. The controller reads
/// position/yaw, submits at most one displacement request and one yaw write
/// per tick.
pub trait MotionBackend {
    fn position(&self) -> Vec3;
    fn yaw_degrees(&self) -> f32;
    /// Request a displacement for this tick. The backend applies it
    /// respecting existing collision geometry.
    fn request_move(&mut self, displacement: Vec3);
    fn set_yaw(&mut self, yaw_degrees: f32);
}
