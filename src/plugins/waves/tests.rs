use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::test_utils::{fixed_time_with_delta, run_system_once};
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{Enemy, EnemyState};
use crate::plugins::health::{Health, PendingPoolReturn};

use super::*;

fn wave_tunables(pool_capacity: usize, enemies_per_wave: u32) -> Tunables {
    let mut t = Tunables::default();
    t.enemy_pool_capacity = pool_capacity;
    t.waves.enemies_per_wave = enemies_per_wave;
    t.waves.spawn_delay = 0.5;
    t.waves.time_between_waves = 10.0;
    t.waves.spawn_points = vec![Vec2::new(-100.0, 0.0), Vec2::new(100.0, 0.0)];
    t
}

fn wave_world(tunables: Tunables) -> World {
    let mut world = World::new();
    world.insert_resource(tunables);
    world.insert_resource(fixed_time_with_delta(0.5));
    run_system_once(&mut world, init_wave_spawner);
    world
}

fn deployed_count(world: &mut World) -> usize {
    let mut q = world.query::<&EnemyState>();
    q.iter(world)
        .filter(|s| **s == EnemyState::Deployed)
        .count()
}

#[test]
fn init_prespawns_dormant_pool() {
    let mut world = wave_world(wave_tunables(4, 5));

    let spawner = world.resource::<WaveSpawner>();
    assert_eq!(spawner.wave(), 1);
    assert_eq!(spawner.pool_len(), 4);

    let mut q = world.query_filtered::<(&EnemyState, &Visibility), With<Enemy>>();
    let mut count = 0;
    for (state, vis) in q.iter(&world) {
        count += 1;
        assert_eq!(*state, EnemyState::Dormant);
        assert_eq!(*vis, Visibility::Hidden);
    }
    assert_eq!(count, 4);
}

#[test]
fn missing_spawn_points_disable_the_spawner() {
    let mut t = wave_tunables(4, 5);
    t.waves.spawn_points.clear();
    let mut world = wave_world(t);

    assert!(world.get_resource::<WaveSpawner>().is_none());
    let mut q = world.query::<&Enemy>();
    assert_eq!(q.iter(&world).count(), 0);
}

#[test]
fn spawns_one_slot_per_elapsed_delay() {
    let mut world = wave_world(wave_tunables(4, 3));

    // First slot is due immediately.
    run_system_once(&mut world, advance_waves);
    assert_eq!(deployed_count(&mut world), 1);

    run_system_once(&mut world, advance_waves);
    run_system_once(&mut world, advance_waves);
    assert_eq!(deployed_count(&mut world), 3);
    assert_eq!(world.resource::<WaveSpawner>().pool_len(), 1);

    let spawner = world.resource::<WaveSpawner>();
    assert!(matches!(spawner.phase(), WavePhase::Intermission { .. }));
}

#[test]
fn deployed_agents_are_placed_at_a_configured_spawn_point() {
    let t = wave_tunables(2, 1);
    let points = t.waves.spawn_points.clone();
    let mut world = wave_world(t);

    run_system_once(&mut world, advance_waves);

    let mut q =
        world.query_filtered::<(&EnemyState, &Transform, &CollisionLayers), With<Enemy>>();
    let deployed: Vec<_> = q
        .iter(&world)
        .filter(|(s, _, _)| **s == EnemyState::Deployed)
        .collect();
    assert_eq!(deployed.len(), 1);

    let (_, tf, layers) = deployed[0];
    assert!(points.contains(&tf.translation.truncate()));
    assert_ne!(layers.filters, LayerMask::NONE);
}

#[test]
fn empty_pool_skips_slots_but_keeps_the_schedule() {
    // enemiesPerWave=5 against capacity 3: three spawns, two skipped slots,
    // and the wave still reaches intermission on schedule.
    let mut world = wave_world(wave_tunables(3, 5));

    for _ in 0..5 {
        run_system_once(&mut world, advance_waves);
    }

    assert_eq!(deployed_count(&mut world), 3);
    let spawner = world.resource::<WaveSpawner>();
    assert_eq!(spawner.pool_len(), 0);
    assert_eq!(spawner.wave(), 1);
    assert!(matches!(spawner.phase(), WavePhase::Intermission { .. }));
}

#[test]
fn intermission_elapses_into_the_next_wave() {
    let mut world = wave_world(wave_tunables(4, 1));

    run_system_once(&mut world, advance_waves);
    assert!(matches!(
        world.resource::<WaveSpawner>().phase(),
        WavePhase::Intermission { .. }
    ));

    world.insert_resource(fixed_time_with_delta(10.0));
    run_system_once(&mut world, advance_waves);

    let spawner = world.resource::<WaveSpawner>();
    assert_eq!(spawner.wave(), 2);
    assert!(matches!(spawner.phase(), WavePhase::Spawning { .. }));

    // Wave 2's first slot is due immediately again.
    run_system_once(&mut world, advance_waves);
    assert_eq!(deployed_count(&mut world), 2);
}

#[test]
fn recycling_is_unconditional_with_respect_to_wave_state() {
    let mut world = wave_world(wave_tunables(2, 2));

    run_system_once(&mut world, advance_waves);
    run_system_once(&mut world, advance_waves);
    assert_eq!(world.resource::<WaveSpawner>().pool_len(), 0);

    // Kill one deployed agent mid-intermission and mark it for return.
    let victim = {
        let mut q = world.query_filtered::<Entity, With<Enemy>>();
        q.iter(&world).next().unwrap()
    };
    world.get_mut::<Health>(victim).unwrap().take_damage(999);
    world.entity_mut(victim).insert(PendingPoolReturn);

    run_system_once(&mut world, recycle_dead_enemies);

    assert_eq!(*world.get::<EnemyState>(victim).unwrap(), EnemyState::Dormant);
    assert_eq!(*world.get::<Visibility>(victim).unwrap(), Visibility::Hidden);
    assert_eq!(
        world.get::<CollisionLayers>(victim).unwrap().filters,
        LayerMask::NONE
    );
    assert!(world.get::<PendingPoolReturn>(victim).is_none());
    assert_eq!(world.resource::<WaveSpawner>().pool_len(), 1);

    // The recycled handle is reusable by a later wave.
    world.insert_resource(fixed_time_with_delta(10.0));
    run_system_once(&mut world, advance_waves); // intermission -> wave 2
    run_system_once(&mut world, advance_waves); // first slot of wave 2
    assert_eq!(*world.get::<EnemyState>(victim).unwrap(), EnemyState::Deployed);
}

#[test]
fn without_a_spawner_dead_agents_are_discarded() {
    let mut world = wave_world(wave_tunables(1, 1));
    run_system_once(&mut world, advance_waves);

    let victim = {
        let mut q = world.query_filtered::<Entity, With<Enemy>>();
        q.iter(&world).next().unwrap()
    };
    world.entity_mut(victim).insert(PendingPoolReturn);
    world.remove_resource::<WaveSpawner>();

    run_system_once(&mut world, recycle_dead_enemies);

    assert!(world.get_entity(victim).is_err());
}
