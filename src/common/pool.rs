//! Fixed-capacity entity pools.
//!
//! Pools hand out pre-spawned `Entity` handles; they never spawn or despawn
//! anything themselves. Acquiring only dequeues a handle; the caller is
//! expected to position and activate it in the same frame, and to restore the
//! inactive invariants (hidden, zero velocity, empty collision filters)
//! before releasing it back.

use std::collections::VecDeque;

use bevy::prelude::*;

/// FIFO free list over pre-spawned entities.
///
/// FIFO matters: the handle that has been inactive longest is reused first,
/// which maximizes the time between a bullet going dark and its visual reuse.
#[derive(Debug)]
pub struct EntityPool {
    free: VecDeque<Entity>,
    capacity: usize,
}

impl EntityPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Dequeue the longest-inactive handle, or `None` when the pool is dry.
    /// Never blocks, never grows.
    pub fn acquire(&mut self) -> Option<Entity> {
        self.free.pop_front()
    }

    /// Enqueue a handle for reuse. The caller has already deactivated it.
    pub fn release(&mut self, entity: Entity) {
        debug_assert!(
            self.free.len() < self.capacity,
            "released more entities than the pool was created with"
        );
        debug_assert!(
            !self.free.contains(&entity),
            "entity released twice without an acquire in between"
        );
        self.free.push_back(entity);
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Fixed slot array advanced round-robin.
///
/// `next()` always succeeds: if the slot coming back around is still active
/// it is forcibly reused. Capacity is tuned to exceed the number of
/// concurrently live bullets, so the forced reuse is a visual pop at worst.
#[derive(Debug)]
pub struct RoundRobinPool {
    slots: Vec<Entity>,
    cursor: usize,
}

impl RoundRobinPool {
    pub fn new(slots: Vec<Entity>) -> Self {
        Self { slots, cursor: 0 }
    }

    pub fn next(&mut self) -> Option<Entity> {
        let e = self.slots.get(self.cursor).copied()?;
        self.cursor = (self.cursor + 1) % self.slots.len();
        Some(e)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
