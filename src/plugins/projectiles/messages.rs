//! Buffered spawn requests.
//!
//! Producers (player shooting, enemy agents) never touch the pools; they only
//! enqueue intent. The allocator is the single consumer and the single pool
//! writer, which keeps the non-atomic dequeue-then-configure sequence in one
//! place.

use bevy::prelude::*;

use super::components::BulletKind;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnBulletRequest {
    pub kind: BulletKind,
    /// Fire point in world space.
    pub pos: Vec2,
    /// Normalized facing of the firer.
    pub dir: Vec2,
    pub speed: f32,
    pub damage: i32,
    /// The firing entity, for self-hit suppression.
    pub fired_by: Option<Entity>,
}
