use bevy::prelude::*;

/// Marker: entity belongs to a bullet pool and is never despawned at runtime.
#[derive(Component)]
pub struct PooledBullet;

/// Which pool a bullet belongs to. Fixed at pool construction.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletKind {
    Player,
    Enemy,
}

/// Projectile lifecycle state machine.
///
/// `Active -> PendingReturn` happens in exactly one place per cause (lifetime
/// tick or collision resolve); the commit system is the only writer of the
/// `PendingReturn -> Inactive` transition and of the inactive invariants.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

/// Per-activation bullet data.
///
/// `fired_by` suppresses self-hits against the specific firer. Player bullets
/// already exclude the player via collision filters; enemy bullets may hit
/// other enemies, just not the one that fired them.
#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub damage: i32,
    pub fired_by: Option<Entity>,
}

impl Bullet {
    #[inline]
    pub fn reset_for_fire(&mut self, damage: i32, fired_by: Option<Entity>) {
        self.damage = damage;
        self.fired_by = fired_by;
    }
}

/// Maximum active time; the bullet retires when the timer finishes.
#[derive(Component, Deref, DerefMut)]
pub struct Lifetime(pub Timer);

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }
}
