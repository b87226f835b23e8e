//! Headless (DIRECT) run of the primitives scene.
//!
//! Drops an extra sphere from 3 m, steps 5 simulated seconds at 240 Hz and
//! checks that every body ends up resting on the ground.

use bevy::prelude::*;
use bevy_hello_physics::prelude::*;

const STEPS: u64 = 5 * 240;

fn main() {
    let plugin = HelloPhysicsPlugin::new(ConnectionMode::Direct)
        .with_scene(HelloWorld::Primitives)
        .with_config(SimulationConfig::default().with_max_steps(STEPS));

    let mut app = connect_with(plugin);
    app.add_systems(Startup, drop_sphere)
        .add_systems(Update, print_progress)
        .add_systems(Last, check_resting.after(bevy_hello_physics::systems::connection::handle_disconnect));
    app.run();
}

#[derive(Component)]
struct Dropped;

fn drop_sphere(mut commands: Commands, mut client: PhysicsClient) -> Result {
    let radius = 0.25;
    let shape = client.create_collision_shape(Geometry::sphere(radius))?;
    let body = client.create_multi_body(
        &MultiBody::new(0.5)
            .with_collision(shape)
            .at(Vec3::new(0.0, 2.0, 3.0))
            .named("dropped"),
    )?;
    commands.entity(body.entity()).insert(Dropped);
    Ok(())
}

fn print_progress(clock: Res<SimulationClock>, mut last: Local<u64>) {
    if clock.steps >= *last + 240 {
        *last = clock.steps;
        info!("simulated {:.1} s ({} steps)", clock.steps as f64 / 240.0, clock.steps);
    }
}

fn check_resting(
    status: Res<ConnectionStatus>,
    bodies: Query<(&Name, &Transform, &SimBody, Has<Dropped>)>,
    mut reported: Local<bool>,
) {
    if status.connected || *reported {
        return;
    }
    *reported = true;

    for (name, transform, body, dropped) in &bodies {
        if body.is_static() {
            continue;
        }
        let (position, _) = base_pose(transform);
        let expected = if dropped { 0.25 } else { 0.5 };
        if (position.z - expected).abs() < 0.05 {
            info!("[PASS] {name} rests at z = {:.3} m", position.z);
        } else {
            warn!("[FAIL] {name} at z = {:.3} m, expected {expected:.3} m", position.z);
        }
    }
}
