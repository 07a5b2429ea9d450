//! Wave spawner: time-driven enemy population over a fixed pool.
//!
//! Spawning is an explicit two-phase timer state machine advanced by the
//! fixed step:
//!
//! ```text
//! Spawning ──(enemies_per_wave slots emitted)──> Intermission
//!    ^                                               │
//!    └────────────(time_between_waves)───────────────┘
//! ```
//!
//! A spawn slot whose acquire fails is skipped and logged; the slot's delay
//! still elapses, so the wave reaches intermission on schedule either way.
//! The cycle never terminates on its own; dropping the resource stops it.
//!
//! `return_to_pool` is unconditional with respect to wave state: a wave-3
//! enemy dying during wave-5 spawning still returns cleanly.

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::pool::EntityPool;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{
    self, active_enemy_layers, dormant_enemy_bundle, Enemy, EnemyState,
};
use crate::plugins::health::{Health, PendingPoolReturn};

#[cfg(test)]
mod tests;

#[derive(Debug)]
pub enum WavePhase {
    Spawning { emitted: u32, next_spawn_in: Timer },
    Intermission { timer: Timer },
}

#[derive(Resource, Debug)]
pub struct WaveSpawner {
    pool: EntityPool,
    wave: u32,
    phase: WavePhase,
    rng: ChaCha8Rng,
}

impl WaveSpawner {
    /// Starts in wave 1's spawning phase with the first slot due immediately.
    pub fn new(pool: EntityPool, seed: u64) -> Self {
        info!("wave 1 starting");
        Self {
            pool,
            wave: 1,
            phase: WavePhase::Spawning {
                emitted: 0,
                next_spawn_in: Timer::from_seconds(0.0, TimerMode::Once),
            },
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn phase(&self) -> &WavePhase {
        &self.phase
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Hand a recycled agent handle back, regardless of the current phase.
    pub fn release(&mut self, entity: Entity) {
        self.pool.release(entity);
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, init_wave_spawner);
    app.add_systems(
        FixedUpdate,
        advance_waves.run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        FixedPostUpdate,
        recycle_dead_enemies
            .after(crate::plugins::health::apply_death_policies)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Pre-spawn the dormant agent pool and install the spawner.
///
/// Missing spawn points is a configuration error: logged once, and wave
/// spawning stays disabled rather than failing later per spawn.
pub fn init_wave_spawner(mut commands: Commands, tunables: Res<Tunables>) {
    if tunables.waves.spawn_points.is_empty() {
        warn!("no spawn points configured, wave spawning disabled");
        return;
    }

    let mut pool = EntityPool::new(tunables.enemy_pool_capacity);
    for i in 0..tunables.enemy_pool_capacity {
        pool.release(commands.spawn(dormant_enemy_bundle(&tunables, i)).id());
    }

    commands.insert_resource(WaveSpawner::new(pool, tunables.waves.rng_seed));
}

/// Advance the wave state machine by one fixed step.
pub fn advance_waves(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    spawner: Option<ResMut<WaveSpawner>>,
    mut q: Query<
        (
            &mut EnemyState,
            &mut Health,
            &mut Transform,
            &mut Visibility,
            &mut CollisionLayers,
            &mut LinearVelocity,
        ),
        With<Enemy>,
    >,
) {
    let Some(mut spawner) = spawner else {
        return;
    };
    let WaveSpawner {
        pool,
        wave,
        phase,
        rng,
    } = &mut *spawner;

    match phase {
        WavePhase::Spawning {
            emitted,
            next_spawn_in,
        } => {
            next_spawn_in.tick(time.delta());
            if !next_spawn_in.is_finished() {
                return;
            }

            // The slot is consumed whether or not the acquire succeeds.
            *emitted += 1;
            match pool.acquire() {
                None => warn!("enemy pool empty, skipping spawn slot in wave {wave}"),
                Some(e) => {
                    let (mut state, mut health, mut tf, mut vis, mut layers, mut vel) = q
                        .get_mut(e)
                        .expect("enemy pool contained an entity missing agent components");

                    let points = &tunables.waves.spawn_points;
                    let point = points[rng.gen_range(0..points.len())];

                    enemies::reset_for_reuse(&mut health, &mut vel);
                    *state = EnemyState::Deployed;
                    tf.translation = point.extend(1.0);
                    *vis = Visibility::Visible;
                    *layers = active_enemy_layers();

                    info!("spawned enemy at {point} for wave {wave}");
                }
            }

            if *emitted >= tunables.waves.enemies_per_wave {
                info!("wave {wave} complete, waiting for the next wave");
                *phase = WavePhase::Intermission {
                    timer: Timer::from_seconds(
                        tunables.waves.time_between_waves,
                        TimerMode::Once,
                    ),
                };
            } else {
                *next_spawn_in =
                    Timer::from_seconds(tunables.waves.spawn_delay, TimerMode::Once);
            }
        }
        WavePhase::Intermission { timer } => {
            timer.tick(time.delta());
            if timer.is_finished() {
                *wave += 1;
                info!("wave {wave} starting");
                *phase = WavePhase::Spawning {
                    emitted: 0,
                    next_spawn_in: Timer::from_seconds(0.0, TimerMode::Once),
                };
            }
        }
    }
}

/// Recycle agents the health plugin marked for pool return.
///
/// With no spawner registered the agent is permanently discarded instead.
pub fn recycle_dead_enemies(
    mut commands: Commands,
    mut spawner: Option<ResMut<WaveSpawner>>,
    mut q: Query<
        (
            Entity,
            &mut EnemyState,
            &mut Visibility,
            &mut CollisionLayers,
            &mut LinearVelocity,
        ),
        (With<Enemy>, With<PendingPoolReturn>),
    >,
) {
    for (e, mut state, mut vis, mut layers, mut vel) in &mut q {
        commands.entity(e).remove::<PendingPoolReturn>();

        match spawner.as_mut() {
            Some(spawner) => {
                *state = EnemyState::Dormant;
                *vis = Visibility::Hidden;
                layers.filters = LayerMask::NONE;
                vel.0 = Vec2::ZERO;
                spawner.release(e);
            }
            None => {
                commands.entity(e).despawn();
            }
        }
    }
}
