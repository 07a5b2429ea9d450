//! Return commit: recycle bullets back into their pool.
//!
//! Single owner of the Inactive invariants:
//! - hidden
//! - velocity zero
//! - lifetime timer reset
//! - empty collision filters
//!
//! Enemy-kind bullets re-enter the FIFO free list; player-kind slots live in
//! the round-robin array permanently and are never enqueued.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{BulletKind, BulletState, Lifetime, PooledBullet};
use super::pool::{inactive_layers, BulletPools};

pub fn return_to_pool_commit(
    mut pools: ResMut<BulletPools>,
    mut q: Query<
        (
            Entity,
            &BulletKind,
            &mut BulletState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
            &mut Lifetime,
        ),
        With<PooledBullet>,
    >,
) {
    for (e, kind, mut state, mut vis, mut vel, mut layers, mut lifetime) in &mut q {
        if *state != BulletState::PendingReturn {
            continue;
        }

        *state = BulletState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_layers(*kind);
        lifetime.reset();

        if *kind == BulletKind::Enemy {
            pools.enemy.release(e);
        }
    }
}
