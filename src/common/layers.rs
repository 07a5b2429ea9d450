//! Collision layers.
//!
//! Pooled inactive entities stay in their membership layer but get empty
//! filters, so they collide with nothing without structural changes.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
}
