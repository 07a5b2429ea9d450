//! Time-bounded deactivation, checked once per fixed step.

use bevy::prelude::*;

use super::components::{BulletState, Lifetime, PooledBullet};

/// Retire active bullets whose elapsed time has reached their lifetime.
/// The boundary is inclusive: `elapsed >= lifetime` retires.
pub fn tick_bullet_lifetimes(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut Lifetime, &mut BulletState), With<PooledBullet>>,
) {
    for (mut lifetime, mut state) in &mut q {
        if *state != BulletState::Active {
            continue;
        }
        lifetime.tick(time.delta());
        if lifetime.is_finished() {
            *state = BulletState::PendingReturn;
        }
    }
}
