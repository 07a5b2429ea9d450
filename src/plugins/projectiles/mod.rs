//! Projectiles plugin: message-based producer -> consumer spawning over
//! fixed-capacity pools.
//!
//! # Data flow
//! ```text
//! Update (variable dt)
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Producers: player fire gate (Update), enemy agents (fixed)   │
//! │   - write: SpawnBulletRequest                                │
//! │                                                              │
//! │ Consumer: allocate_bullets_from_pool                         │
//! │   - player kind: round-robin slot (always succeeds)          │
//! │   - enemy kind:  FIFO acquire (empty pool drops the request) │
//! │   - activates: state, damage, firer, transform, velocity,    │
//! │     visibility, collision layers, lifetime timer             │
//! └──────────────────────────────────────────────────────────────┘
//! FixedUpdate
//! ┌──────────────────────────────────────────────────────────────┐
//! │ tick_bullet_lifetimes: elapsed >= lifetime -> PendingReturn  │
//! └──────────────────────────────────────────────────────────────┘
//! FixedPostUpdate
//! ┌──────────────────────────────────────────────────────────────┐
//! │ process_bullet_collisions: damage once -> PendingReturn      │
//! │ return_to_pool_commit: Inactive invariants + FIFO re-enqueue │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers never borrow `BulletPools`; they enqueue intent and the
//! allocator is the single writer. Pool exhaustion and missing singletons are
//! the only tolerated misses; everything else is an invariant violation.

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod lifetime;
pub mod messages;
pub mod pool;


use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;

pub struct ProjectilesPlugin;

/// Maintain spawn request message buffers.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnBulletRequest>>) {
    msgs.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, pool::init_bullet_pools);

        app.init_resource::<Messages<messages::SpawnBulletRequest>>();
        app.add_systems(PostUpdate, update_spawn_messages);

        // Producers run earlier in the frame (player in Update, enemies in
        // the fixed loop); the allocator drains whatever they queued.
        app.add_systems(
            Update,
            allocator::allocate_bullets_from_pool
                .after(crate::plugins::player::request_fire)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedUpdate,
            lifetime::tick_bullet_lifetimes.run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedPostUpdate,
            (
                collision::process_bullet_collisions.after(CollisionEventSystems),
                commit::return_to_pool_commit.after(collision::process_bullet_collisions),
            )
                .run_if(in_state(GameState::InGame)),
        );
    }
}
