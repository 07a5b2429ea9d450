//! Core plugin: shared resources, global settings, and config validation.

use bevy::prelude::*;

use crate::common::tunables::Tunables;


pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
    app.add_systems(Startup, validate_tunables);
}

/// Configuration errors are detected once at startup and degrade the affected
/// feature instead of halting the simulation.
fn validate_tunables(tunables: Res<Tunables>) {
    if tunables.ship.fire_interval <= 0.0 {
        warn!("ship fire interval is non-positive, player shooting disabled");
    }
    if tunables.enemy.fire_interval <= 0.0 {
        warn!("enemy fire interval is non-positive, enemy shooting disabled");
    }
    if tunables.bullet_lifetime <= 0.0 {
        warn!("bullet lifetime is non-positive, bullets will retire immediately");
    }
    if tunables.waves.spawn_points.is_empty() {
        warn!("no spawn points configured, wave spawning disabled");
    }
}
