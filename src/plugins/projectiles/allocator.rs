//! Spawn consumer: activate bullets from the pools.
//!
//! Fail-fast invariant: a pool only ever contains valid pooled bullet
//! entities, so a handle it yields must match the bullet query. A violation
//! is a bug and crashes loudly; the only tolerated miss is capacity.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{Bullet, BulletKind, BulletState, Lifetime, PooledBullet};
use super::messages::SpawnBulletRequest;
use super::pool::{active_layers, BulletPools};

pub fn allocate_bullets_from_pool(
    mut pools: ResMut<BulletPools>,
    mut reader: MessageReader<SpawnBulletRequest>,
    mut q: Query<
        (
            &mut BulletState,
            &mut Bullet,
            &mut Lifetime,
            &mut Transform,
            &mut LinearVelocity,
            &mut Visibility,
            &mut CollisionLayers,
        ),
        With<PooledBullet>,
    >,
) {
    for req in reader.read() {
        let slot = match req.kind {
            // Round-robin always yields; a still-active slot is reclaimed.
            BulletKind::Player => pools.player.next(),
            BulletKind::Enemy => pools.enemy.acquire(),
        };

        let Some(e) = slot else {
            // Capacity decision, not a correctness failure.
            warn!("{:?} bullet pool exhausted, dropping spawn request", req.kind);
            continue;
        };

        let (mut state, mut bullet, mut lifetime, mut tf, mut vel, mut vis, mut layers) = q
            .get_mut(e)
            .expect("bullet pool contained an entity missing pooled bullet components");

        *state = BulletState::Active;
        bullet.reset_for_fire(req.damage, req.fired_by);
        lifetime.reset();
        tf.translation = req.pos.extend(2.0);
        tf.rotation = Quat::from_rotation_z(req.dir.y.atan2(req.dir.x) - std::f32::consts::FRAC_PI_2);
        vel.0 = req.dir * req.speed;
        *vis = Visibility::Visible;
        *layers = active_layers(req.kind);
    }
}
