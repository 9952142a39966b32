//! Target-following character locomotion for Bevy.
//!
//! The core is a per-tick state update split into four stages that run in a
//! fixed dependency order: ground probe, vertical motion integration, follow
//! planning, and motion application. The stages are pure functions over
//! [`FollowerState`] plus a small set of collaborator traits, so the whole
//! controller is unit-testable without an engine. [`FollowerPlugin`] wires
//! the core into Bevy with rapier spatial queries, a kinematic character
//! controller, spatial audio, and debug gizmos.

pub mod audio;
pub mod backend;
pub mod components;
pub mod controller;
pub mod follow;
pub mod physics;
pub mod plugin;
pub mod smoothing;

pub use audio::{footstep_clip_index, landing_triggers, FootstepEvent, LandingEvent};
pub use backend::{AnimParam, AnimationSink, MotionBackend, SpatialProbe};
pub use components::{
    FollowerAnimState, FollowerAudioClips, FollowerConfig, FollowerState, FollowerTarget,
};
pub use controller::tick_follower;
pub use plugin::{FollowerDebugMode, FollowerPlugin, FootstepRng};
