//! Lighting plugin (Firefly) (render-only).
//!
//! The ship carries a point light that tracks its position and dims with its
//! remaining health. Reads simulation state, never writes it.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::health::Health;
use crate::plugins::player::Player;

const FULL_RADIUS: f32 = 520.0;
/// Floor so a dying ship stays faintly visible instead of going dark.
const MIN_RADIUS: f32 = 120.0;

#[derive(Component)]
pub struct ShipLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, track_ship.run_if(in_state(GameState::InGame)));
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("ShipLight"),
        ShipLight,
        PointLight2d {
            color: Color::srgb(0.75, 0.88, 1.0),
            radius: FULL_RADIUS,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn track_ship(
    q_player: Query<(&Transform, &Health), (With<Player>, Without<ShipLight>)>,
    mut q_light: Query<(&mut Transform, &mut PointLight2d), (With<ShipLight>, Without<Player>)>,
) {
    let Ok((tf_player, health)) = q_player.single() else {
        return;
    };
    let Ok((mut tf_light, mut light)) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
    light.radius = MIN_RADIUS + (FULL_RADIUS - MIN_RADIUS) * health.fraction();
}
