//! # Bevy Hello Physics
//!
//! Hello-world rigid body scenes for Bevy 0.18, stepped by avian3d.
//!
//! ## Features
//! - Procedural client API in the classic simulator style ([`client::PhysicsClient`])
//! - Sphere, box, cylinder and plane shapes with separate collision and visual shapes
//! - Ground plane loaded from a bundled URDF file
//! - GUI (windowed) and DIRECT (headless) connections
//! - 240 Hz fixed stepping paced against real time
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy_hello_physics::prelude::*;
//!
//! fn main() {
//!     connect(ConnectionMode::Gui, HelloWorld::Primitives).run();
//! }
//! ```

pub mod client;
pub mod components;
pub mod error;
pub mod resources;
pub mod scenes;
pub mod systems;
pub mod types;
pub mod urdf;

pub mod prelude {
    pub use crate::client::*;
    pub use crate::components::*;
    pub use crate::error::*;
    pub use crate::resources::*;
    pub use crate::scenes::HelloWorld;
    pub use crate::types::*;
    pub use crate::urdf::{bundled_data_path, AssetSearchPaths, SearchPath};
    pub use crate::{connect, connect_with, HelloPhysicsPlugin};
}

use avian3d::prelude::{Gravity, PhysicsPlugins};
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use std::time::Duration;

use resources::{ConnectionStatus, DebugCamera, ShapeRegistry, SimulationClock, SimulationConfig};
use scenes::HelloWorld;
use types::ConnectionMode;
use urdf::AssetSearchPaths;

/// Session plugin: resources, step counting, connection tracking and the
/// scene's startup sequence.
///
/// Does not add the physics engine itself; [`connect`] does. Tests add
/// `PhysicsPlugins` themselves or leave it out to inspect the scene wiring.
///
/// # Systems
/// - `advance_clock`, `stop_at_step_limit` - `FixedLast`, once per physics step
/// - `handle_disconnect` - `Last`, flips the connection status on exit
/// - `spawn_viewer`, `apply_debug_camera` - GUI only
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use avian3d::prelude::PhysicsPlugins;
/// use bevy_hello_physics::prelude::*;
///
/// App::new()
///     .add_plugins((DefaultPlugins, PhysicsPlugins::default()))
///     .add_plugins(HelloPhysicsPlugin::new(ConnectionMode::Gui).with_scene(HelloWorld::Sphere))
///     .run();
/// ```
#[derive(Clone, Debug, Default)]
pub struct HelloPhysicsPlugin {
    pub mode: ConnectionMode,
    /// Startup sequence, `None` to build the world from your own systems
    pub scene: Option<HelloWorld>,
    pub config: SimulationConfig,
}

impl HelloPhysicsPlugin {
    pub fn new(mode: ConnectionMode) -> Self {
        Self {
            mode,
            ..default()
        }
    }

    /// Builder pattern: run one of the hello-world sequences at startup
    pub fn with_scene(mut self, scene: HelloWorld) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Builder pattern: initial simulation configuration
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }
}

impl Plugin for HelloPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::SimBody>()
            .register_type::<components::UrdfBody>()
            .register_type::<SimulationConfig>()
            .register_type::<DebugCamera>()
            .insert_resource(self.config.clone())
            .insert_resource(Gravity(self.config.engine_gravity()))
            .insert_resource(Time::<Fixed>::from_seconds(self.config.time_step))
            .insert_resource(ConnectionStatus::new(self.mode))
            .init_resource::<ShapeRegistry>()
            .init_resource::<AssetSearchPaths>()
            .init_resource::<SimulationClock>()
            .init_resource::<DebugCamera>()
            .add_systems(
                FixedLast,
                (
                    systems::stepping::advance_clock,
                    systems::stepping::stop_at_step_limit,
                )
                    .chain(),
            )
            .add_systems(Last, systems::connection::handle_disconnect);

        match self.scene {
            Some(HelloWorld::Sphere) => {
                app.add_systems(Startup, scenes::sphere_scene);
            }
            Some(HelloWorld::Primitives) => {
                app.add_systems(Startup, scenes::primitives_scene);
            }
            None => {}
        }

        if self.mode.renders() {
            // Camera spawns after the scene so a camera reset is already applied.
            app.add_systems(PostStartup, systems::viewer::spawn_viewer)
                .add_systems(
                    Update,
                    systems::viewer::apply_debug_camera
                        .run_if(resource_changed::<DebugCamera>),
                );
        }

        info!(
            "connected ({:?}), stepping every {:.5} s",
            self.mode, self.config.time_step
        );
    }
}

/// Build a ready-to-run app for a hello-world scene.
///
/// * `Gui` - `DefaultPlugins`; runs until the window is closed
/// * `Direct` - headless, one update every time step; runs forever unless the
///   configuration sets `max_steps` (see [`connect_with`])
pub fn connect(mode: ConnectionMode, scene: HelloWorld) -> App {
    connect_with(HelloPhysicsPlugin::new(mode).with_scene(scene))
}

/// [`connect`] with a fully configured plugin.
pub fn connect_with(plugin: HelloPhysicsPlugin) -> App {
    let mut app = App::new();
    match plugin.mode {
        ConnectionMode::Gui => {
            app.add_plugins(DefaultPlugins);
        }
        ConnectionMode::Direct => {
            let tick = Duration::from_secs_f64(plugin.config.time_step);
            app.add_plugins((
                MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)),
                LogPlugin::default(),
                TransformPlugin,
                AssetPlugin::default(),
                ScenePlugin,
            ))
            .init_asset::<Mesh>();
        }
    }
    app.add_plugins(PhysicsPlugins::default()).add_plugins(plugin);
    app
}
