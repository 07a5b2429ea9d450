//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `nova_arena::game::configure_headless` to install gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Core ECS + states, plus AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    // Deterministic clock: every `app.update()` advances time by a fixed step
    // instead of whatever wall time the test runner happens to take.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        100,
    )));

    nova_arena::game::configure_headless(&mut app);

    // `App::update()` never runs deferred plugin setup; physics diagnostics
    // are only inserted in `Plugin::finish`.
    app.finish();
    app.cleanup();
    app
}
