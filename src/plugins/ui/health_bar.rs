//! Player health bar (render-only).
//!
//! Presentation derived from facts: reads `Health::fraction()` each frame,
//! never writes simulation state. The bar is camera-anchored by repositioning
//! it against the camera transform, the same trick the screen-space overlay
//! would use.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::camera::MainCamera;
use crate::plugins::health::Health;
use crate::plugins::player::Player;

const BAR_SIZE: Vec2 = Vec2::new(200.0, 20.0);
/// Offset from the camera center to the bar's left edge.
const BAR_OFFSET: Vec2 = Vec2::new(-620.0, 330.0);

const FULL_COLOR: Vec3 = Vec3::new(0.2, 0.85, 0.3);
const LOW_COLOR: Vec3 = Vec3::new(0.9, 0.15, 0.15);

#[derive(Component)]
struct HealthBarBackground;

#[derive(Component)]
struct HealthBarFill;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_bar)
        .add_systems(
            PostUpdate,
            update_bar
                .after(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_bar(mut commands: Commands) {
    commands.spawn((
        Name::new("HealthBarBackground"),
        HealthBarBackground,
        Sprite {
            color: Color::BLACK,
            custom_size: Some(BAR_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 900.0),
        DespawnOnExit(GameState::InGame),
    ));
    commands.spawn((
        Name::new("HealthBarFill"),
        HealthBarFill,
        Sprite {
            color: Color::srgb(FULL_COLOR.x, FULL_COLOR.y, FULL_COLOR.z),
            custom_size: Some(BAR_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 901.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn update_bar(
    q_player: Query<&Health, With<Player>>,
    q_cam: Query<&Transform, (With<MainCamera>, Without<HealthBarBackground>, Without<HealthBarFill>)>,
    mut q_back: Query<
        &mut Transform,
        (With<HealthBarBackground>, Without<HealthBarFill>, Without<MainCamera>),
    >,
    mut q_fill: Query<
        (&mut Transform, &mut Sprite),
        (With<HealthBarFill>, Without<HealthBarBackground>, Without<MainCamera>),
    >,
) {
    let Ok(health) = q_player.single() else {
        return;
    };
    let Ok(cam_tf) = q_cam.single() else {
        return;
    };
    let Ok(mut back_tf) = q_back.single_mut() else {
        return;
    };
    let Ok((mut fill_tf, mut fill_sprite)) = q_fill.single_mut() else {
        return;
    };

    let fraction = health.fraction();
    let anchor = cam_tf.translation.truncate() + BAR_OFFSET;

    back_tf.translation.x = anchor.x + BAR_SIZE.x * 0.5;
    back_tf.translation.y = anchor.y;

    // Fill shrinks from the right: keep the left edge anchored.
    let width = BAR_SIZE.x * fraction;
    fill_tf.translation.x = anchor.x + width * 0.5;
    fill_tf.translation.y = anchor.y;
    fill_sprite.custom_size = Some(Vec2::new(width.max(0.0), BAR_SIZE.y));

    let c = LOW_COLOR.lerp(FULL_COLOR, fraction);
    fill_sprite.color = Color::srgb(c.x, c.y, c.z);
}
