//! Footstep and landing audio reactions.
//!
//! The animation system fires these as events at fixed points in a clip's
//! playback, carrying the clip's blend weight. Everything here is a pure
//! reaction: gate on weight, pick a clip, play it once. The random source is
//! injected so tests can seed it.

use bevy::prelude::*;
use rand::Rng;

/// Minimum blend weight for an animation event to produce audio. Events from
/// clips blended below half weight stay silent.
pub const ANIM_EVENT_WEIGHT_GATE: f32 = 0.5;

/// Footstep animation event for one follower.
#[derive(Message, Clone, Copy, Debug)]
pub struct FootstepEvent {
    pub follower: Entity,
    /// Blend weight of the clip that fired the event, in [0, 1].
    pub weight: f32,
}

/// Landing animation event for one follower.
#[derive(Message, Clone, Copy, Debug)]
pub struct LandingEvent {
    pub follower: Entity,
    pub weight: f32,
}

/// Pick which footstep clip to play, or `None` to stay silent.
///
/// Uniform over the configured clips; a sub-gate weight or an empty clip
/// list plays nothing.
pub fn footstep_clip_index<R: Rng>(weight: f32, clip_count: usize, rng: &mut R) -> Option<usize> {
    if weight <= ANIM_EVENT_WEIGHT_GATE || clip_count == 0 {
        return None;
    }
    Some(rng.gen_range(0..clip_count))
}

/// Whether a landing event at this weight produces audio.
pub fn landing_triggers(weight: f32) -> bool {
    weight > ANIM_EVENT_WEIGHT_GATE
}
