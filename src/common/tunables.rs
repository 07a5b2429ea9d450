//! Tunable gameplay constants.
//!
//! Everything numeric the simulation consumes lives here so tests can insert
//! their own values instead of patching constants.

use bevy::prelude::*;

/// Player ship movement model.
#[derive(Debug, Clone)]
pub struct ShipTunables {
    pub acceleration: f32,
    pub max_speed: f32,
    pub deceleration: f32,
    /// Speeds below this snap to zero instead of creeping forever.
    pub stopping_threshold: f32,
    pub rotation_responsiveness: f32,
    pub fire_interval: f32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub max_health: i32,
}

/// Per-enemy combat configuration.
#[derive(Debug, Clone)]
pub struct EnemyTunables {
    pub fire_interval: f32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub move_speed: f32,
    pub stop_distance: f32,
    pub max_health: i32,
    /// Distance from the enemy's center to its fire point, along facing.
    pub muzzle_offset: f32,
}

/// Wave scheduling configuration.
#[derive(Debug, Clone)]
pub struct WaveTunables {
    pub enemies_per_wave: u32,
    pub spawn_delay: f32,
    pub time_between_waves: f32,
    pub spawn_points: Vec<Vec2>,
    pub rng_seed: u64,
}

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub ship: ShipTunables,
    pub enemy: EnemyTunables,
    pub bullet_lifetime: f32,
    pub player_bullet_slots: usize,
    pub enemy_bullet_capacity: usize,
    pub enemy_pool_capacity: usize,
    pub waves: WaveTunables,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            ship: ShipTunables {
                acceleration: 900.0,
                max_speed: 420.0,
                deceleration: 500.0,
                stopping_threshold: 4.0,
                rotation_responsiveness: 10.0,
                fire_interval: 0.2,
                bullet_speed: 900.0,
                bullet_damage: 10,
                max_health: 100,
            },
            enemy: EnemyTunables {
                fire_interval: 1.0,
                bullet_speed: 450.0,
                bullet_damage: 10,
                move_speed: 120.0,
                stop_distance: 300.0,
                max_health: 50,
                muzzle_offset: 20.0,
            },
            bullet_lifetime: 5.0,
            player_bullet_slots: 20,
            enemy_bullet_capacity: 64,
            enemy_pool_capacity: 8,
            waves: WaveTunables {
                enemies_per_wave: 5,
                spawn_delay: 0.5,
                time_between_waves: 10.0,
                spawn_points: vec![
                    Vec2::new(-700.0, 420.0),
                    Vec2::new(700.0, 420.0),
                    Vec2::new(-700.0, -420.0),
                    Vec2::new(700.0, -420.0),
                ],
                rng_seed: 0x5eed,
            },
        }
    }
}
