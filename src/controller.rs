//! Per-tick orchestration of the four controller stages.

use bevy::prelude::*;

use crate::backend::{AnimationSink, MotionBackend, SpatialProbe};
use crate::components::{FollowerConfig, FollowerState};
use crate::follow::follow_target;
use crate::physics::{grounded_check, handle_gravity};

/// Advance one follower by one simulation tick.
///
/// Stages run in their fixed dependency order: ground probe, gravity
/// integration, follow planning + motion application. The animation sink is
/// optional; without one the signal pushes are simply skipped. All
/// collaborators are resolved by the caller up front; nothing is discovered
/// implicitly.
pub fn tick_follower<P, M, A>(
    config: &FollowerConfig,
    state: &mut FollowerState,
    probe: &P,
    motion: &mut M,
    target: Option<Vec3>,
    mut anim: Option<&mut A>,
    dt: f32,
) where
    P: SpatialProbe,
    M: MotionBackend,
    A: AnimationSink,
{
    let position = motion.position();
    grounded_check(config, state, probe, position, &mut anim);
    handle_gravity(config, state, &mut anim, dt);
    follow_target(config, state, motion, target, &mut anim, dt);
}
