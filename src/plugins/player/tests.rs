use std::time::Duration;

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{fixed_time_with_delta, run_system_once};
use crate::common::tunables::Tunables;
use crate::plugins::health::Health;
use crate::plugins::projectiles::messages::SpawnBulletRequest;

use super::*;

fn ship_world(input: PlayerInput) -> (World, Entity) {
    let mut world = World::new();
    let mut tunables = Tunables::default();
    tunables.ship.acceleration = 100.0;
    tunables.ship.max_speed = 50.0;
    tunables.ship.deceleration = 40.0;
    tunables.ship.stopping_threshold = 5.0;
    tunables.ship.fire_interval = 0.2;
    world.insert_resource(tunables);
    world.insert_resource(input);
    world.insert_resource(fixed_time_with_delta(0.1));
    world.init_resource::<Messages<SpawnBulletRequest>>();

    let e = world
        .spawn((
            Player,
            Health::new(100),
            FireControl::default(),
            Transform::IDENTITY,
            LinearVelocity::ZERO,
        ))
        .id();
    (world, e)
}

fn time_at(elapsed: f32) -> Time {
    let mut t = Time::default();
    t.advance_by(Duration::from_secs_f32(elapsed));
    t
}

fn velocity(world: &mut World, e: Entity) -> Vec2 {
    world.get::<LinearVelocity>(e).unwrap().0
}

#[test]
fn accelerates_along_normalized_input() {
    let (mut world, e) = ship_world(PlayerInput {
        move_axis: Vec2::new(3.0, 0.0),
        ..default()
    });

    run_system_once(&mut world, apply_movement);

    // acceleration 100 * dt 0.1, input normalized.
    assert_eq!(velocity(&mut world, e), Vec2::new(10.0, 0.0));
}

#[test]
fn clamps_speed_to_max() {
    let (mut world, e) = ship_world(PlayerInput {
        move_axis: Vec2::X,
        ..default()
    });
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::new(49.0, 0.0);

    run_system_once(&mut world, apply_movement);

    let v = velocity(&mut world, e);
    assert!((v - Vec2::new(50.0, 0.0)).length() < 1e-3, "clamped to {v}");
}

#[test]
fn decelerates_without_input_preserving_direction() {
    let (mut world, e) = ship_world(PlayerInput::default());
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::new(0.0, 30.0);

    run_system_once(&mut world, apply_movement);

    // deceleration 40 * dt 0.1 off the magnitude.
    assert_eq!(velocity(&mut world, e), Vec2::new(0.0, 26.0));
}

#[test]
fn snaps_to_zero_below_stopping_threshold() {
    let (mut world, e) = ship_world(PlayerInput::default());
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::new(8.0, 0.0);

    run_system_once(&mut world, apply_movement);
    // 8 - 4 = 4, below threshold 5: snap.
    assert_eq!(velocity(&mut world, e), Vec2::ZERO);
}

#[test]
fn depleted_ship_ignores_input() {
    let (mut world, e) = ship_world(PlayerInput {
        move_axis: Vec2::X,
        ..default()
    });
    world.get_mut::<Health>(e).unwrap().take_damage(100);

    run_system_once(&mut world, apply_movement);
    assert_eq!(velocity(&mut world, e), Vec2::ZERO);
}

#[test]
fn fire_gate_enforces_interval() {
    let (mut world, _e) = ship_world(PlayerInput {
        fire_held: true,
        ..default()
    });
    world.insert_resource(time_at(1.0));

    run_system_once(&mut world, request_fire);
    run_system_once(&mut world, request_fire);

    // Same instant: the second attempt is gated.
    let reqs: Vec<_> = world
        .resource_mut::<Messages<SpawnBulletRequest>>()
        .drain()
        .collect();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].kind, crate::plugins::projectiles::components::BulletKind::Player);

    // After the interval the gate opens again.
    world.insert_resource(time_at(1.25));
    run_system_once(&mut world, request_fire);
    let reqs: Vec<_> = world
        .resource_mut::<Messages<SpawnBulletRequest>>()
        .drain()
        .collect();
    assert_eq!(reqs.len(), 1);
}

#[test]
fn released_trigger_fires_nothing() {
    let (mut world, _e) = ship_world(PlayerInput::default());
    world.insert_resource(time_at(1.0));

    run_system_once(&mut world, request_fire);

    assert!(world
        .resource_mut::<Messages<SpawnBulletRequest>>()
        .drain()
        .next()
        .is_none());
}

#[test]
fn shots_leave_the_muzzle_along_facing() {
    let (mut world, e) = ship_world(PlayerInput {
        fire_held: true,
        ..default()
    });
    world.insert_resource(time_at(1.0));
    world.get_mut::<Transform>(e).unwrap().rotation =
        Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2);

    run_system_once(&mut world, request_fire);

    let reqs: Vec<_> = world
        .resource_mut::<Messages<SpawnBulletRequest>>()
        .drain()
        .collect();
    assert_eq!(reqs.len(), 1);
    // Rotated -90 degrees: local +Y points along +X.
    assert!((reqs[0].dir - Vec2::X).length() < 1e-4);
    assert!((reqs[0].pos - Vec2::new(MUZZLE_OFFSET, 0.0)).length() < 1e-3);
}

#[test]
fn rotation_tracks_aim() {
    let (mut world, e) = ship_world(PlayerInput {
        aim: Some(Vec2::new(100.0, 0.0)),
        ..default()
    });
    let mut tunables = world.resource::<Tunables>().clone();
    tunables.ship.rotation_responsiveness = 1000.0;
    world.insert_resource(tunables);
    world.insert_resource(time_at(0.5));

    run_system_once(&mut world, rotate_toward_aim);

    // Effectively instant at very high responsiveness.
    let facing = (world.get::<Transform>(e).unwrap().rotation * Vec3::Y).truncate();
    assert!((facing - Vec2::X).length() < 1e-3);
}
