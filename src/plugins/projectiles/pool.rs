//! Bullet pool construction and collision-layer policy.
//!
//! Both pools are pre-spawned once at startup and never grow. Inactive
//! bullets keep their physics components but get empty collision filters, so
//! they collide with nothing and generate no events, with no structural toggles,
//! no archetype moves.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::pool::{EntityPool, RoundRobinPool};
use crate::common::tunables::Tunables;

use super::components::{Bullet, BulletKind, BulletState, Lifetime, PooledBullet};

/// Owner of both bullet pools.
///
/// Player bullets use a round-robin slot array: a shot always succeeds, a
/// slot still active when its turn comes around is forcibly reused. Enemy
/// bullets use the FIFO pool: exhaustion drops the shot.
#[derive(Resource, Debug)]
pub struct BulletPools {
    pub player: RoundRobinPool,
    pub enemy: EntityPool,
}

pub fn active_layers(kind: BulletKind) -> CollisionLayers {
    match kind {
        // Player bullets never interact with the player at all.
        BulletKind::Player => {
            CollisionLayers::new(Layer::PlayerBullet, [Layer::World, Layer::Enemy])
        }
        // Enemy bullets can hit other enemies; the firer is excluded in the
        // collision resolve, not here.
        BulletKind::Enemy => CollisionLayers::new(
            Layer::EnemyBullet,
            [Layer::World, Layer::Player, Layer::Enemy],
        ),
    }
}

/// "Disabled" without structural changes: empty filters collide with nothing.
pub fn inactive_layers(kind: BulletKind) -> CollisionLayers {
    let membership = match kind {
        BulletKind::Player => Layer::PlayerBullet,
        BulletKind::Enemy => Layer::EnemyBullet,
    };
    CollisionLayers::new(membership, LayerMask::NONE)
}

fn spawn_pooled_bullet(commands: &mut Commands, kind: BulletKind, lifetime: f32) -> Entity {
    let color = match kind {
        BulletKind::Player => Color::srgb(1.0, 0.85, 0.3),
        BulletKind::Enemy => Color::srgb(1.0, 0.35, 0.25),
    };

    commands
        .spawn((
            Name::new(match kind {
                BulletKind::Player => "PlayerBullet(Pooled)",
                BulletKind::Enemy => "EnemyBullet(Pooled)",
            }),
            PooledBullet,
            kind,
            BulletState::Inactive,
            Bullet {
                damage: 0,
                fired_by: None,
            },
            Lifetime::new(lifetime),
            Sprite {
                color,
                custom_size: Some(Vec2::splat(8.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 2.0),
            Visibility::Hidden,
            RigidBody::Kinematic,
            Collider::circle(4.0),
            inactive_layers(kind),
            LinearVelocity(Vec2::ZERO),
            // Always present; inactive bullets never collide anyway.
            CollisionEventsEnabled,
        ))
        .id()
}

/// Pre-spawn both pools (all bullets inactive).
pub fn init_bullet_pools(mut commands: Commands, tunables: Res<Tunables>) {
    let lifetime = tunables.bullet_lifetime;

    let slots = (0..tunables.player_bullet_slots)
        .map(|_| spawn_pooled_bullet(&mut commands, BulletKind::Player, lifetime))
        .collect();

    let mut enemy = EntityPool::new(tunables.enemy_bullet_capacity);
    for _ in 0..tunables.enemy_bullet_capacity {
        enemy.release(spawn_pooled_bullet(&mut commands, BulletKind::Enemy, lifetime));
    }

    commands.insert_resource(BulletPools {
        player: RoundRobinPool::new(slots),
        enemy,
    });
}
