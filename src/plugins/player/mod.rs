//! Player ship plugin.
//!
//! Pipeline:
//! - Update: sample input + aim, write the PlayerInput resource
//! - Update: smooth-rotate toward the cursor, fire-rate-gated shot requests
//! - FixedUpdate: acceleration-based velocity model on the kinematic body
//!
//! Facing is deliberately decoupled from movement: rotation tracks the cursor
//! on the render step, velocity integrates on the physics step.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::camera::MainCamera;
use crate::plugins::health::{DeathPolicy, Health};
use crate::plugins::projectiles::components::BulletKind;
use crate::plugins::projectiles::messages::SpawnBulletRequest;

#[cfg(test)]
mod tests;

/// Distance from the ship's center to the barrel end, along facing.
const MUZZLE_OFFSET: f32 = 18.0;

/// Input below this magnitude (squared) counts as "no input".
const DEADZONE_SQ: f32 = 0.01;

#[derive(Component)]
pub struct Player;

/// Next-allowed-fire time in virtual seconds.
#[derive(Component, Debug, Default)]
pub struct FireControl {
    pub next_fire: f32,
}

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    /// Cursor position in world space, when a cursor and camera exist.
    pub aim: Option<Vec2>,
    pub fire_held: bool,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input)
        .add_systems(
            Update,
            (rotate_toward_aim, request_fire)
                .after(gather_input)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            apply_movement.run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Enemy, Layer::EnemyBullet],
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        Health::new(tunables.ship.max_health),
        DeathPolicy::DeactivateInPlace,
        FireControl::default(),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(26.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        RigidBody::Kinematic,
        Collider::circle(13.0),
        layers,
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    ));
}

/// Sample keyboard/mouse state. All params are optional so this system is a
/// no-op in headless apps without input or window plugins.
fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut input: ResMut<PlayerInput>,
) {
    if let Some(keys) = keys {
        let mut axis = Vec2::ZERO;
        if keys.pressed(KeyCode::KeyW) {
            axis.y += 1.0;
        }
        if keys.pressed(KeyCode::KeyS) {
            axis.y -= 1.0;
        }
        if keys.pressed(KeyCode::KeyA) {
            axis.x -= 1.0;
        }
        if keys.pressed(KeyCode::KeyD) {
            axis.x += 1.0;
        }
        input.move_axis = axis;
    }

    if let Some(buttons) = buttons {
        input.fire_held = buttons.pressed(MouseButton::Left);
    }

    input.aim = None;
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_tf)) = q_camera.single() else {
        return;
    };
    if let Ok(world_cursor) = camera.viewport_to_world_2d(camera_tf, cursor) {
        input.aim = Some(world_cursor);
    }
}

/// Acceleration-based movement on the fixed step.
pub fn apply_movement(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&mut LinearVelocity, &Health), With<Player>>,
) {
    let Ok((mut vel, health)) = q_player.single_mut() else {
        return;
    };
    if health.is_depleted() {
        return;
    }

    let ship = &tunables.ship;
    let dt = time.delta_secs();
    let mut v = vel.0;

    if input.move_axis.length_squared() > DEADZONE_SQ {
        v += input.move_axis.normalize() * ship.acceleration * dt;
    } else {
        // Bleed speed toward zero, preserving direction until it dies.
        let speed = (v.length() - ship.deceleration * dt).max(0.0);
        v = v.normalize_or_zero() * speed;
    }

    v = v.clamp_length_max(ship.max_speed);
    if v.length() < ship.stopping_threshold {
        v = Vec2::ZERO;
    }

    vel.0 = v;
}

/// Smoothly turn the ship toward the cursor, independent of movement.
pub fn rotate_toward_aim(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&mut Transform, &Health), With<Player>>,
) {
    let Some(aim) = input.aim else {
        return;
    };
    let Ok((mut tf, health)) = q_player.single_mut() else {
        return;
    };
    if health.is_depleted() {
        return;
    }

    let dir = aim - tf.translation.truncate();
    if dir.length_squared() < 0.01 {
        return;
    }

    let target = Quat::from_rotation_z(dir.y.atan2(dir.x) - std::f32::consts::FRAC_PI_2);
    let alpha = 1.0 - (-tunables.ship.rotation_responsiveness * time.delta_secs()).exp();
    tf.rotation = tf.rotation.slerp(target, alpha);
}

/// Producer: hold-to-fire with a fire-interval gate. Requests are served by
/// the round-robin pool, so a shot is never dropped for capacity.
pub fn request_fire(
    time: Res<Time>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut writer: MessageWriter<SpawnBulletRequest>,
    mut q_player: Query<(&Transform, &Health, &mut FireControl), With<Player>>,
) {
    if !input.fire_held {
        return;
    }
    if tunables.ship.fire_interval <= 0.0 {
        // Startup validation already warned; shooting stays disabled.
        return;
    }
    let Ok((tf, health, mut fire)) = q_player.single_mut() else {
        return;
    };
    if health.is_depleted() {
        return;
    }

    let now = time.elapsed_secs();
    if now < fire.next_fire {
        return;
    }
    fire.next_fire = now + tunables.ship.fire_interval;

    let facing = (tf.rotation * Vec3::Y).truncate().normalize_or_zero();
    if facing == Vec2::ZERO {
        return;
    }

    writer.write(SpawnBulletRequest {
        kind: BulletKind::Player,
        pos: tf.translation.truncate() + facing * MUZZLE_OFFSET,
        dir: facing,
        speed: tunables.ship.bullet_speed,
        damage: tunables.ship.bullet_damage,
        fired_by: None,
    });
}
