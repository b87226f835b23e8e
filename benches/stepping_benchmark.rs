//! Benchmark for headless stepping performance.

use avian3d::prelude::PhysicsPlugins;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_hello_physics::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

/// Ground plane plus a grid of `count` spheres resting on it.
fn sphere_grid(count: usize) -> impl FnMut(PhysicsClient) -> Result {
    move |mut client: PhysicsClient| {
        client.set_gravity(Vec3::new(0.0, 0.0, -10.0));
        client.set_additional_search_path(bundled_data_path());
        client.load_urdf("plane.urdf", UrdfOptions::default())?;

        let shape = client.create_collision_shape(Geometry::sphere(0.5))?;
        let side = (count as f32).sqrt().ceil() as usize;
        for i in 0..count {
            let (row, col) = (i / side, i % side);
            client.create_multi_body(
                &MultiBody::new(1.0)
                    .with_collision(shape)
                    .at(Vec3::new(row as f32 * 1.5, col as f32 * 1.5, 0.5)),
            )?;
        }
        Ok(())
    }
}

fn headless_app(count: usize) -> App {
    let plugin = HelloPhysicsPlugin::new(ConnectionMode::Direct);
    let tick = Duration::from_secs_f64(plugin.config.time_step);
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, AssetPlugin::default(), ScenePlugin))
        .init_asset::<Mesh>()
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(plugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick))
        .add_systems(Startup, sphere_grid(count));
    // Startup plus the first step.
    app.update();
    app
}

fn benchmark_resting_bodies(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resting Bodies");

    for body_count in [1, 3, 100, 1000].iter() {
        let mut app = headless_app(*body_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(body_count),
            body_count,
            |b, &_count| {
                b.iter(|| app.update());
            },
        );
    }

    group.finish();
}

fn benchmark_hello_world_scenes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hello World Scenes");

    for scene in [HelloWorld::Sphere, HelloWorld::Primitives] {
        let plugin = HelloPhysicsPlugin::new(ConnectionMode::Direct).with_scene(scene);
        let tick = Duration::from_secs_f64(plugin.config.time_step);
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin, AssetPlugin::default(), ScenePlugin))
            .init_asset::<Mesh>()
            .add_plugins(PhysicsPlugins::default())
            .add_plugins(plugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(tick));
        app.update();

        group.bench_function(scene.name(), |b| {
            b.iter(|| app.update());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_resting_bodies, benchmark_hello_world_scenes);
criterion_main!(benches);
