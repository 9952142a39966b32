//! Bevy integration: production collaborator implementations and the systems
//! that drive followers every frame.

use bevy::audio::Volume;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{footstep_clip_index, landing_triggers, FootstepEvent, LandingEvent};
use crate::backend::{MotionBackend, SpatialProbe};
use crate::components::{
    FollowerAnimState, FollowerAudioClips, FollowerConfig, FollowerState, FollowerTarget,
};
use crate::controller::tick_follower;
use crate::physics::probe_center;

// =============================================================================
// COLLABORATOR IMPLEMENTATIONS
// =============================================================================

/// Ground probe over rapier's scene query pipeline. Sensors never count as
/// ground, matching the controller's trigger-ignoring contract.
struct RapierGroundProbe<'a, 'w> {
    context: &'a RapierContext<'w>,
}

impl SpatialProbe for RapierGroundProbe<'_, '_> {
    fn overlap_sphere(&self, center: Vec3, radius: f32, groups: u32) -> bool {
        let filter = QueryFilter::default()
            .exclude_sensors()
            .groups(CollisionGroups::new(
                Group::all(),
                Group::from_bits_truncate(groups),
            ));
        let mut hit = false;
        self.context.intersect_shape(
            center,
            Quat::IDENTITY,
            &bevy_rapier3d::parry::shape::Ball::new(radius),
            filter,
            |_| {
                hit = true;
                false
            },
        );
        hit
    }
}

/// Motion backend over `Transform` + rapier's kinematic character
/// controller. Setting `translation` is the one collision-respecting move
/// request the controller submits per tick.
struct CharacterMotion<'a> {
    transform: &'a mut Transform,
    controller: &'a mut KinematicCharacterController,
}

impl MotionBackend for CharacterMotion<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn yaw_degrees(&self) -> f32 {
        self.transform.rotation.to_euler(EulerRot::YXZ).0.to_degrees()
    }

    fn request_move(&mut self, displacement: Vec3) {
        self.controller.translation = Some(displacement);
    }

    fn set_yaw(&mut self, yaw_degrees: f32) {
        self.transform.rotation = Quat::from_rotation_y(yaw_degrees.to_radians());
    }
}

// =============================================================================
// RESOURCES
// =============================================================================

/// Toggle for the ground-probe gizmo overlay.
#[derive(Resource, Default)]
pub struct FollowerDebugMode(pub bool);

/// Random source for footstep clip selection. Reseed it for deterministic
/// playback in tests or replays.
#[derive(Resource)]
pub struct FootstepRng(pub StdRng);

impl Default for FootstepRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Marker for one-shot footstep audio entities.
#[derive(Component)]
pub struct FootstepSound;

/// Marker for one-shot landing audio entities.
#[derive(Component)]
pub struct LandingSound;

// =============================================================================
// SYSTEMS
// =============================================================================

/// Advance every follower by one tick.
pub fn tick_followers(
    time: Res<Time>,
    rapier_context: ReadRapierContext,
    target_transforms: Query<&GlobalTransform>,
    mut followers: Query<(
        &FollowerConfig,
        &FollowerTarget,
        &mut FollowerState,
        &mut Transform,
        &mut KinematicCharacterController,
        Option<&mut FollowerAnimState>,
    )>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let probe = RapierGroundProbe { context: &context };

    for (config, target, mut state, mut transform, mut controller, mut anim) in
        followers.iter_mut()
    {
        // A despawned or unset target resolves to "absent" and the follower
        // idles in place.
        let target_pos = target
            .0
            .and_then(|entity| target_transforms.get(entity).ok())
            .map(|gt| gt.translation());

        let mut motion = CharacterMotion {
            transform: &mut *transform,
            controller: &mut *controller,
        };
        tick_follower(
            config,
            &mut state,
            &probe,
            &mut motion,
            target_pos,
            anim.as_deref_mut(),
            dt,
        );
    }
}

/// World-space point audio plays from: the body center in local space.
fn audio_point(transform: &Transform, config: &FollowerConfig) -> Vec3 {
    transform.translation + transform.rotation * config.body_center
}

/// React to footstep animation events with a randomly picked clip.
pub fn play_footstep_sfx(
    mut commands: Commands,
    mut events: MessageReader<FootstepEvent>,
    mut rng: ResMut<FootstepRng>,
    followers: Query<(&FollowerConfig, &FollowerAudioClips, &Transform)>,
) {
    for event in events.read() {
        let Ok((config, clips, transform)) = followers.get(event.follower) else {
            continue;
        };
        let Some(index) = footstep_clip_index(event.weight, clips.footsteps.len(), &mut rng.0)
        else {
            continue;
        };

        trace!("Footstep clip {} for follower {:?}", index, event.follower);
        commands.spawn((
            FootstepSound,
            AudioPlayer::new(clips.footsteps[index].clone()),
            PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_volume(Volume::Linear(config.footstep_volume)),
            Transform::from_translation(audio_point(transform, config)),
        ));
    }
}

/// React to landing animation events with the configured landing clip.
pub fn play_landing_sfx(
    mut commands: Commands,
    mut events: MessageReader<LandingEvent>,
    followers: Query<(&FollowerConfig, &FollowerAudioClips, &Transform)>,
) {
    for event in events.read() {
        if !landing_triggers(event.weight) {
            continue;
        }
        let Ok((config, clips, transform)) = followers.get(event.follower) else {
            continue;
        };
        let Some(clip) = clips.landing.clone() else {
            continue;
        };

        trace!("Landing clip for follower {:?}", event.follower);
        commands.spawn((
            LandingSound,
            AudioPlayer::new(clip),
            PlaybackSettings::DESPAWN
                .with_spatial(true)
                .with_volume(Volume::Linear(config.footstep_volume)),
            Transform::from_translation(audio_point(transform, config)),
        ));
    }
}

/// Draw the ground probe sphere: green when grounded, red otherwise.
pub fn debug_draw_ground_probe(
    mut gizmos: Gizmos,
    debug_mode: Res<FollowerDebugMode>,
    followers: Query<(&FollowerConfig, &FollowerState, &Transform)>,
) {
    if !debug_mode.0 {
        return;
    }

    for (config, state, transform) in followers.iter() {
        let color = if state.grounded {
            Color::srgba(0.0, 1.0, 0.0, 0.35)
        } else {
            Color::srgba(1.0, 0.0, 0.0, 0.35)
        };
        gizmos.sphere(
            Isometry3d::from_translation(probe_center(
                transform.translation,
                config.grounded_offset,
            )),
            config.grounded_radius,
            color,
        );
    }
}

// =============================================================================
// PLUGIN
// =============================================================================

/// Registers the follower systems, audio event messages, and debug overlay.
///
/// Expects `RapierPhysicsPlugin` to be installed by the host app; each
/// follower entity carries [`FollowerConfig`], [`FollowerState`],
/// [`FollowerTarget`], a `Transform`, a rapier `KinematicCharacterController`
/// and collider, plus optional [`FollowerAnimState`] / [`FollowerAudioClips`].
pub struct FollowerPlugin;

impl Plugin for FollowerPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<FootstepEvent>();
        app.add_message::<LandingEvent>();
        app.init_resource::<FollowerDebugMode>();
        app.init_resource::<FootstepRng>();
        app.add_systems(
            Update,
            (
                tick_followers,
                play_footstep_sfx,
                play_landing_sfx,
                debug_draw_ground_probe,
            ),
        );
    }
}
