//! Health plugin: hit points, damage intake, and death handling.
//!
//! `Health` is gameplay truth; notifications are an explicit message queue
//! (`HealthChanged`, `Died`) rather than callbacks wired into the component.
//! Rules:
//! - combat systems (elsewhere) mutate `Health` values,
//! - `publish_health_changes` mirrors every change into `HealthChanged`,
//! - `apply_death_policies` latches the lethal transition exactly once,
//!   writes `Died`, and applies the entity's configured `DeathPolicy`.
//!
//! Death is policy, not a hard rule: pool-owned entities get marked
//! `PendingPoolReturn` for their owner to recycle; everything else goes
//! inactive in place and waits for external reactivation.

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;


/// Per-entity hit-point tracker.
///
/// `current` stays in `[0, max]`. The death latch guarantees the `Died`
/// notification fires once per active lifetime; `reset` re-arms it.
#[derive(Component, Debug, Clone)]
pub struct Health {
    current: i32,
    max: i32,
    death_latched: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            death_latched: false,
        }
    }

    /// Clamp-subtract `amount`. Non-positive amounts are ignored.
    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            debug!("ignoring non-positive damage amount {amount}");
            return;
        }
        self.current = (self.current - amount).max(0);
    }

    /// Clamp-add `amount`. Non-positive amounts are ignored.
    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 {
            debug!("ignoring non-positive heal amount {amount}");
            return;
        }
        self.current = (self.current + amount).min(self.max);
    }

    /// Restore to full and re-arm the death latch. Required before a pooled
    /// entity is reused so it does not resume at zero health.
    pub fn reset(&mut self) {
        self.current = self.max;
        self.death_latched = false;
    }

    /// Latch the lethal transition. Returns `true` exactly once per lifetime,
    /// when `current` has reached zero and the latch was still armed.
    pub fn latch_death(&mut self) -> bool {
        if self.current == 0 && !self.death_latched {
            self.death_latched = true;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// `current / max`, for the presentation layer.
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }
}

/// What happens when health reaches zero. Configuration, set at construction.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathPolicy {
    /// Hand the entity back to its owning pool; despawned if no pool claims it.
    ReturnToPool,
    /// Go inactive in place and await external reactivation.
    DeactivateInPlace,
}

/// Marker: a pool-owned entity awaiting recycling by its owner.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingPoolReturn;

#[derive(Message, Clone, Copy, Debug)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: i32,
    pub max: i32,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct Died {
    pub entity: Entity,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Messages<HealthChanged>>();
    app.init_resource::<Messages<Died>>();
    app.add_systems(PostUpdate, update_health_messages);

    app.add_systems(
        FixedPostUpdate,
        (publish_health_changes, apply_death_policies)
            .chain()
            .after(crate::plugins::projectiles::collision::process_bullet_collisions)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Maintain notification message buffers (double-buffered; `update()` advances).
fn update_health_messages(
    mut changed: ResMut<Messages<HealthChanged>>,
    mut died: ResMut<Messages<Died>>,
) {
    changed.update();
    died.update();
}

/// Mirror every `Health` mutation into the notification queue.
///
/// Insertion counts as a change, so listeners also see the initial value.
pub fn publish_health_changes(
    mut writer: MessageWriter<HealthChanged>,
    q: Query<(Entity, &Health), Changed<Health>>,
) {
    for (entity, health) in &q {
        writer.write(HealthChanged {
            entity,
            current: health.current(),
            max: health.max(),
        });
    }
}

/// Latch lethal transitions, notify, and apply each entity's death policy.
pub fn apply_death_policies(
    mut commands: Commands,
    mut died: MessageWriter<Died>,
    mut q: Query<(Entity, &mut Health, &DeathPolicy), Changed<Health>>,
    mut q_deactivate: Query<(&mut Visibility, &mut CollisionLayers, &mut LinearVelocity)>,
) {
    for (entity, mut health, policy) in &mut q {
        // The latch is bookkeeping, not a health change. Probing it through
        // `DerefMut` would re-flag the component every step and make
        // `publish_health_changes` echo stale values forever.
        if !health.bypass_change_detection().latch_death() {
            continue;
        }

        info!("{entity} died");
        died.write(Died { entity });

        match policy {
            DeathPolicy::ReturnToPool => {
                commands.entity(entity).insert(PendingPoolReturn);
            }
            DeathPolicy::DeactivateInPlace => {
                if let Ok((mut vis, mut layers, mut vel)) = q_deactivate.get_mut(entity) {
                    *vis = Visibility::Hidden;
                    layers.filters = LayerMask::NONE;
                    vel.0 = Vec2::ZERO;
                }
            }
        }
    }
}
