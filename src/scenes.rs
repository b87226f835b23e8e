//! The two hello-world sequences.
//!
//! Each is a startup system that drives the world through [`PhysicsClient`]
//! exactly like a tutorial script would: gravity, search path, ground plane,
//! then bodies placed so they rest on the plane (origin height equals the
//! shape's radius or vertical half extent).

use bevy::prelude::*;

use crate::client::{MultiBody, PhysicsClient, UrdfOptions};
use crate::types::{quaternion_from_euler, Geometry};
use crate::urdf::bundled_data_path;

pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Gravity used by both scenes (Z-up, m/s²).
pub const SCENE_GRAVITY: Vec3 = Vec3::new(0.0, 0.0, -10.0);

/// Steps the sphere scene runs before reporting itself settled.
pub const SPHERE_WARMUP_STEPS: u64 = 1000;

/// Which hello-world sequence to run.
///
/// # Variants
/// * `Sphere` - One red ball on the ground plane
/// * `Primitives` - A blue box, a red sphere and a green cylinder in a row
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub enum HelloWorld {
    #[default]
    Sphere,
    Primitives,
}

impl HelloWorld {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Primitives => "primitives",
        }
    }
}

/// Gravity, bundled data path and the ground plane.
fn setup_world(client: &mut PhysicsClient) -> Result {
    client.set_gravity(SCENE_GRAVITY);
    client.set_additional_search_path(bundled_data_path());
    client.load_urdf("plane.urdf", UrdfOptions::default())?;
    Ok(())
}

/// Create one body whose collision and visual shapes share a geometry,
/// resting on the ground at `(x, y)`.
fn spawn_resting(
    client: &mut PhysicsClient,
    name: &str,
    geometry: Geometry,
    rgba: [f32; 4],
    mass: f32,
    xy: Vec2,
) -> Result {
    let collision = client.create_collision_shape(geometry)?;
    let visual = client.create_visual_shape(geometry, rgba)?;
    client.create_multi_body(
        &MultiBody::new(mass)
            .with_collision(collision)
            .with_visual(visual)
            .at(xy.extend(geometry.resting_height()))
            .oriented(quaternion_from_euler(Vec3::ZERO))
            .named(name),
    )?;
    Ok(())
}

/// A red sphere (radius 0.5, mass 1) at the origin, settled for 1000 steps.
pub fn sphere_scene(mut client: PhysicsClient) -> Result {
    setup_world(&mut client)?;

    let radius = 0.5;
    spawn_resting(&mut client, "sphere", Geometry::sphere(radius), RED, 1.0, Vec2::ZERO)?;

    client.set_warmup_steps(SPHERE_WARMUP_STEPS);
    Ok(())
}

/// Box, sphere and cylinder side by side, 2 m apart, with the camera pulled in.
pub fn primitives_scene(mut client: PhysicsClient) -> Result {
    setup_world(&mut client)?;

    spawn_resting(
        &mut client,
        "box",
        Geometry::cuboid(Vec3::splat(0.5)),
        BLUE,
        1.0,
        Vec2::new(-2.0, 0.0),
    )?;
    spawn_resting(&mut client, "sphere", Geometry::sphere(0.5), RED, 1.0, Vec2::ZERO)?;
    // Cylinder axis is vertical; `height` is the full height.
    spawn_resting(
        &mut client,
        "cylinder",
        Geometry::cylinder(0.5, 1.0),
        GREEN,
        1.0,
        Vec2::new(2.0, 0.0),
    )?;

    client.reset_debug_visualizer_camera(5.0, 45.0, -30.0, Vec3::ZERO);
    Ok(())
}
