//! Collision resolve: bullet hits -> damage -> pending return.
//!
//! A bullet applies damage at most once per activation: the first resolved
//! hit flips `Active -> PendingReturn` immediately, and later events for the
//! same bullet in the same step fail the `Active` check. A per-step dedupe
//! set also collapses duplicate events for the same bullet collider; it is
//! only charged when a hit resolves, so pass-through contacts (the firer, or
//! an entity with no health) never spend the bullet's hit.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::plugins::health::Health;

use super::components::{Bullet, BulletState, PooledBullet};

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget {
            collider: ev.collider1,
            body: ev.body1,
        },
        CollisionTarget {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

pub fn process_bullet_collisions(
    mut started: MessageReader<CollisionStart>,
    // Fast "is this a pooled bullet?" check
    q_is_bullet: Query<(), With<PooledBullet>>,
    mut q_bullets: Query<(&Bullet, &mut BulletState), With<PooledBullet>>,
    q_layers: Query<&CollisionLayers>,
    mut q_health: Query<&mut Health>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        // Exactly one bullet side; bullet-vs-bullet pairs are ignored.
        let b1 = q_is_bullet.contains(t1.collider);
        let b2 = q_is_bullet.contains(t2.collider);
        if !(b1 ^ b2) {
            continue;
        }
        let (bullet_side, other_side) = if b1 { (t1, t2) } else { (t2, t1) };

        let Ok((bullet, mut state)) = q_bullets.get_mut(bullet_side.collider) else {
            continue;
        };
        if *state != BulletState::Active {
            continue;
        }

        let other = other_side.gameplay_owner();

        // Own firer: pass through. Layers already exclude the player from
        // player bullets; this covers the firing enemy for enemy bullets.
        if bullet.fired_by == Some(other) {
            continue;
        }

        let Ok(other_layers) = q_layers.get(other_side.collider) else {
            continue;
        };

        // Walls absorb the bullet without dealing damage.
        if is_in_layer(other_layers, Layer::World) {
            seen.insert(bullet_side.collider);
            *state = BulletState::PendingReturn;
            continue;
        }

        // Damageable target: apply damage, then retire the bullet. Anything
        // without Health lets the bullet fly on without spending its hit.
        if let Ok(mut health) = q_health.get_mut(other) {
            if !seen.insert(bullet_side.collider) {
                continue;
            }
            health.take_damage(bullet.damage);
            *state = BulletState::PendingReturn;
        }
    }
}
