//! Enemy agents: pursuit, facing, and fire-rate-gated shooting.
//!
//! Agents are pool-owned: the wave spawner pre-spawns them dormant, deploys
//! them at spawn points, and recycles them after death. While a player
//! transform is resolvable, a deployed agent closes to `stop_distance`,
//! always rotates to face the player, and fires on a fixed cadence. Movement
//! and firing are not mutually exclusive.
//!
//! Agents never despawn themselves; death is handled by the health plugin
//! (`DeathPolicy::ReturnToPool`) and the spawner's recycle system.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy_firefly::prelude::Occluder2d;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::{EnemyTunables, Tunables};
use crate::plugins::health::{DeathPolicy, Health};
use crate::plugins::player::Player;
use crate::plugins::projectiles::components::BulletKind;
use crate::plugins::projectiles::messages::SpawnBulletRequest;


#[derive(Component)]
pub struct Enemy;

/// Pool-side activity gate. Dormant agents sit hidden in the pool; systems
/// only drive deployed ones.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyState {
    #[default]
    Dormant,
    Deployed,
}

/// Immutable combat configuration plus the fire-cadence cursor.
///
/// `next_fire` deliberately survives pool recycling: a reused agent whose
/// cadence is already due fires immediately on reactivation.
#[derive(Component, Debug, Clone)]
pub struct EnemyCombat {
    pub fire_interval: f32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub move_speed: f32,
    pub stop_distance: f32,
    pub muzzle_offset: f32,
    pub next_fire: f32,
}

impl EnemyCombat {
    pub fn from_tunables(t: &EnemyTunables) -> Self {
        Self {
            fire_interval: t.fire_interval,
            bullet_speed: t.bullet_speed,
            bullet_damage: t.bullet_damage,
            move_speed: t.move_speed,
            stop_distance: t.stop_distance,
            muzzle_offset: t.muzzle_offset,
            next_fire: 0.0,
        }
    }
}

pub fn plugin(app: &mut App) {
    // Shots leave along this step's facing, so firing runs after pursuit.
    app.add_systems(
        FixedUpdate,
        (pursue_player, fire_at_player)
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}

/// Collision intent for a deployed agent.
pub fn active_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Enemy,
        [
            Layer::World,
            Layer::Player,
            Layer::PlayerBullet,
            Layer::EnemyBullet,
        ],
    )
}

/// Everything a pooled agent needs, spawned dormant.
pub fn dormant_enemy_bundle(t: &Tunables, index: usize) -> impl Bundle {
    (
        Name::new(format!("Enemy{index}(Pooled)")),
        Enemy,
        EnemyState::Dormant,
        EnemyCombat::from_tunables(&t.enemy),
        Health::new(t.enemy.max_health),
        DeathPolicy::ReturnToPool,
        Sprite {
            color: Color::srgb(0.9, 0.25, 0.25),
            custom_size: Some(Vec2::splat(32.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        Visibility::Hidden,
        RigidBody::Kinematic,
        Collider::circle(16.0),
        CollisionLayers::new(Layer::Enemy, LayerMask::NONE),
        LinearVelocity(Vec2::ZERO),
        Occluder2d::circle(16.0),
    )
}

/// Per-life reset performed by the spawner before redeploying a pooled agent.
/// The fire cadence cursor intentionally stays as-is.
pub fn reset_for_reuse(health: &mut Health, vel: &mut LinearVelocity) {
    health.reset();
    vel.0 = Vec2::ZERO;
}

/// Facing convention: sprites point along local +Y, so the angle to the
/// target is offset by -90 degrees.
#[inline]
pub fn face_rotation(dir: Vec2) -> Quat {
    Quat::from_rotation_z(dir.y.atan2(dir.x) - std::f32::consts::FRAC_PI_2)
}

/// Close to `stop_distance` and always face the player.
///
/// A depleted player is no longer a resolvable target; agents idle in place.
pub fn pursue_player(
    time: Res<Time<Fixed>>,
    q_player: Query<(&Transform, &Health), (With<Player>, Without<Enemy>)>,
    mut q: Query<(&EnemyState, &EnemyCombat, &mut Transform), With<Enemy>>,
) {
    let Ok((player_tf, player_health)) = q_player.single() else {
        return;
    };
    if player_health.is_depleted() {
        return;
    }
    let target = player_tf.translation.truncate();
    let dt = time.delta_secs();

    for (state, combat, mut tf) in &mut q {
        if *state != EnemyState::Deployed {
            continue;
        }

        let pos = tf.translation.truncate();
        let to_target = target - pos;
        let distance = to_target.length();
        if distance < 1e-4 {
            continue;
        }
        let dir = to_target / distance;

        if distance > combat.stop_distance {
            let step = dir * combat.move_speed * dt;
            tf.translation.x += step.x;
            tf.translation.y += step.y;
        }

        // Facing updates regardless of distance.
        tf.rotation = face_rotation(dir);
    }
}

/// Fixed-cadence fire gate.
///
/// After each shot the cursor advances by `fire_interval` from its previous
/// value, then is clamped up to `now`: a long pause yields at most one
/// immediate catch-up shot instead of a burst.
pub fn fire_at_player(
    time: Res<Time<Fixed>>,
    mut writer: MessageWriter<SpawnBulletRequest>,
    q_player: Query<&Health, (With<Player>, Without<Enemy>)>,
    mut q: Query<(Entity, &EnemyState, &mut EnemyCombat, &Transform), With<Enemy>>,
) {
    let Ok(player_health) = q_player.single() else {
        return;
    };
    if player_health.is_depleted() {
        return;
    }
    let now = time.elapsed_secs();

    for (e, state, mut combat, tf) in &mut q {
        if *state != EnemyState::Deployed {
            continue;
        }
        if combat.fire_interval <= 0.0 {
            // Startup validation already warned; shooting stays disabled.
            continue;
        }
        if now < combat.next_fire {
            continue;
        }

        let facing = (tf.rotation * Vec3::Y).truncate().normalize_or_zero();
        if facing == Vec2::ZERO {
            continue;
        }

        writer.write(SpawnBulletRequest {
            kind: BulletKind::Enemy,
            pos: tf.translation.truncate() + facing * combat.muzzle_offset,
            dir: facing,
            speed: combat.bullet_speed,
            damage: combat.bullet_damage,
            fired_by: Some(e),
        });

        combat.next_fire += combat.fire_interval;
        if combat.next_fire < now {
            combat.next_fire = now;
        }
    }
}
