//! Procedural client API.
//!
//! [`PhysicsClient`] is a system parameter offering the classic simulator
//! call surface (set gravity, load a URDF, create shapes and multi-bodies,
//! reset the debug camera, query and drop the connection). Scene setup is
//! written as an ordinary startup system taking a `PhysicsClient`.
//!
//! Positions, orientations and gravity are given in the Z-up frame.

use avian3d::prelude::{Collider, Gravity, Mass, RigidBody};
use bevy::ecs::message::MessageWriter;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::{BodyId, SimBody, UrdfBody};
use crate::error::{SimError, SimResult, UrdfError};
use crate::resources::{
    CollisionShapeId, ConnectionStatus, DebugCamera, ShapeRegistry, SimulationConfig,
    VisualShape, VisualShapeId,
};
use crate::types::{
    color_from_rgba, orientation_to_y_up, transform_from_z_up, z_up_to_y_up, ConnectionMode,
    Geometry,
};
use crate::urdf::{AssetSearchPaths, SearchPath};

/// Colour for URDF visuals that carry no material.
const DEFAULT_VISUAL_RGBA: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Parameters of `create_multi_body`.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_hello_physics::client::MultiBody;
/// use bevy_hello_physics::resources::CollisionShapeId;
///
/// let body = MultiBody::new(1.0)
///     .with_collision(CollisionShapeId(0))
///     .at(Vec3::new(0.0, 0.0, 0.5))
///     .named("ball");
/// assert_eq!(body.base_position.z, 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MultiBody {
    /// Base mass (kg), 0 for a static body
    pub base_mass: f32,
    pub collision_shape: Option<CollisionShapeId>,
    pub visual_shape: Option<VisualShapeId>,
    /// Base position (Z-up)
    pub base_position: Vec3,
    /// Base orientation (Z-up)
    pub base_orientation: Quat,
    /// Entity name shown in logs and inspectors
    pub name: String,
}

impl MultiBody {
    pub fn new(base_mass: f32) -> Self {
        Self {
            base_mass,
            collision_shape: None,
            visual_shape: None,
            base_position: Vec3::ZERO,
            base_orientation: Quat::IDENTITY,
            name: "body".to_string(),
        }
    }

    /// Builder pattern: set the collision shape
    pub fn with_collision(mut self, shape: CollisionShapeId) -> Self {
        self.collision_shape = Some(shape);
        self
    }

    /// Builder pattern: set the visual shape
    pub fn with_visual(mut self, shape: VisualShapeId) -> Self {
        self.visual_shape = Some(shape);
        self
    }

    /// Builder pattern: set the base position
    pub fn at(mut self, position: Vec3) -> Self {
        self.base_position = position;
        self
    }

    /// Builder pattern: set the base orientation
    pub fn oriented(mut self, orientation: Quat) -> Self {
        self.base_orientation = orientation;
        self
    }

    /// Builder pattern: set the name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Parameters of `load_urdf`.
#[derive(Clone, Debug, PartialEq)]
pub struct UrdfOptions {
    /// Base position (Z-up)
    pub base_position: Vec3,
    /// Base orientation (Z-up)
    pub base_orientation: Quat,
    /// Make the body static regardless of its mass
    pub use_fixed_base: bool,
}

impl Default for UrdfOptions {
    fn default() -> Self {
        Self {
            base_position: Vec3::ZERO,
            base_orientation: Quat::IDENTITY,
            use_fixed_base: false,
        }
    }
}

fn check_mass(mass: f32) -> SimResult<()> {
    if mass.is_finite() && mass >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidMass(mass))
    }
}

fn rigid_body_for(mass: f32) -> RigidBody {
    if mass == 0.0 {
        RigidBody::Static
    } else {
        RigidBody::Dynamic
    }
}

/// Handle to the simulation used by scene setup systems.
#[derive(SystemParam)]
pub struct PhysicsClient<'w, 's> {
    commands: Commands<'w, 's>,
    config: ResMut<'w, SimulationConfig>,
    fixed_time: ResMut<'w, Time<Fixed>>,
    shapes: ResMut<'w, ShapeRegistry>,
    search_paths: ResMut<'w, AssetSearchPaths>,
    camera: ResMut<'w, DebugCamera>,
    status: Res<'w, ConnectionStatus>,
    meshes: Option<ResMut<'w, Assets<Mesh>>>,
    materials: Option<ResMut<'w, Assets<StandardMaterial>>>,
    exit: MessageWriter<'w, AppExit>,
}

impl PhysicsClient<'_, '_> {
    pub fn mode(&self) -> ConnectionMode {
        self.status.mode
    }

    pub fn is_connected(&self) -> bool {
        self.status.connected
    }

    /// Ask the app to shut down; `is_connected` turns false once it does.
    pub fn disconnect(&mut self) {
        info!("disconnect requested");
        self.exit.write(AppExit::Success);
    }

    /// Set world gravity (Z-up, m/s²).
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
        self.commands
            .insert_resource(Gravity(self.config.engine_gravity()));
    }

    /// Set the length of one physics step in seconds.
    ///
    /// Only the fixed clock changes. A DIRECT connection keeps waking at the
    /// interval it was connected with; the fixed clock runs as many steps per
    /// wake-up as real time requires, so simulated time still tracks real time.
    pub fn set_time_step(&mut self, seconds: f64) -> SimResult<()> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(SimError::InvalidTimeStep(seconds));
        }
        self.config.time_step = seconds;
        self.fixed_time.set_timestep_seconds(seconds);
        Ok(())
    }

    /// Report the scene as settled after this many steps.
    pub fn set_warmup_steps(&mut self, steps: u64) {
        self.config.warmup_steps = steps;
    }

    pub fn set_additional_search_path(&mut self, path: SearchPath) {
        info!("adding search path {path}");
        self.search_paths.add(path);
    }

    pub fn create_collision_shape(&mut self, geometry: Geometry) -> SimResult<CollisionShapeId> {
        self.shapes.add_collision(geometry)
    }

    /// Register a visual shape. It only turns into a mesh when the connection renders.
    pub fn create_visual_shape(
        &mut self,
        geometry: Geometry,
        rgba: [f32; 4],
    ) -> SimResult<VisualShapeId> {
        self.shapes.add_visual(geometry, rgba)
    }

    /// Orbit the viewer camera around `target` (Z-up). Angles in degrees.
    pub fn reset_debug_visualizer_camera(&mut self, distance: f32, yaw: f32, pitch: f32, target: Vec3) {
        *self.camera = DebugCamera::new(distance, yaw, pitch, target);
    }

    /// Create a single rigid body from registered shapes.
    ///
    /// Mass 0 creates a static body; anything else a dynamic body with that
    /// mass.
    pub fn create_multi_body(&mut self, body: &MultiBody) -> SimResult<BodyId> {
        check_mass(body.base_mass)?;
        let collision = body
            .collision_shape
            .map(|id| self.shapes.collision(id).copied())
            .transpose()?;
        let visual = body
            .visual_shape
            .map(|id| self.shapes.visual(id).copied())
            .transpose()?;

        if body.base_mass > 0.0 && matches!(collision, Some(Geometry::Plane { .. })) {
            return Err(SimError::DynamicPlane);
        }

        let handles = visual.and_then(|shape| self.visual_handles(&shape));

        let mut entity = self.commands.spawn((
            Name::new(body.name.clone()),
            SimBody {
                mass: body.base_mass,
                collision_shape: body.collision_shape,
                visual_shape: body.visual_shape,
            },
            transform_from_z_up(body.base_position, body.base_orientation),
            rigid_body_for(body.base_mass),
        ));
        if let Some(geometry) = collision {
            entity.insert(geometry.collider());
        }
        if body.base_mass > 0.0 {
            entity.insert(Mass(body.base_mass));
        }
        if let Some((mesh, material)) = handles {
            entity.insert((Mesh3d(mesh), MeshMaterial3d(material)));
        }

        let id = entity.id();
        info!(
            "created body {} ({}) with mass {} at {}",
            body.name,
            collision.map_or("no collision", |g| g.kind()),
            body.base_mass,
            body.base_position
        );
        Ok(BodyId(id))
    }

    /// Load the base link of a URDF file found on the search paths.
    pub fn load_urdf(&mut self, name: &str, options: UrdfOptions) -> SimResult<BodyId> {
        let robot = self.search_paths.load(name)?;
        let Some(link) = robot.base_link() else {
            return Err(SimError::Urdf {
                name: name.to_string(),
                source: UrdfError::NoLinks(robot.name.clone()),
            });
        };
        check_mass(link.mass)?;
        if !robot.joints.is_empty() {
            warn!(
                "{name}: ignoring {} joint(s); only base link {} is loaded",
                robot.joints.len(),
                link.name
            );
        }

        let mass = if options.use_fixed_base { 0.0 } else { link.mass };

        let mut parts = Vec::with_capacity(link.collisions.len());
        for collision in &link.collisions {
            collision.geometry.validate()?;
            parts.push((
                z_up_to_y_up(collision.origin.xyz),
                orientation_to_y_up(collision.origin.rotation()),
                collision.geometry.collider(),
            ));
        }

        let mut visuals = Vec::new();
        for visual in &link.visuals {
            visual.geometry.validate()?;
            let shape = VisualShape {
                geometry: visual.geometry,
                rgba: visual.rgba.unwrap_or(DEFAULT_VISUAL_RGBA),
            };
            if let Some(handles) = self.visual_handles(&shape) {
                visuals.push((handles, transform_from_z_up(visual.origin.xyz, visual.origin.rotation())));
            }
        }

        let mut entity = self.commands.spawn((
            Name::new(robot.name.clone()),
            UrdfBody {
                robot: robot.name.clone(),
                link: link.name.clone(),
            },
            SimBody {
                mass,
                ..default()
            },
            transform_from_z_up(options.base_position, options.base_orientation),
            rigid_body_for(mass),
        ));
        if !parts.is_empty() {
            entity.insert(Collider::compound(parts));
        }
        if mass > 0.0 {
            entity.insert(Mass(mass));
        }
        if !visuals.is_empty() {
            entity.with_children(|parent| {
                for ((mesh, material), transform) in visuals {
                    parent.spawn((Mesh3d(mesh), MeshMaterial3d(material), transform));
                }
            });
        }

        let id = entity.id();
        info!(
            "loaded {name}: link {} with {} collision shape(s), mass {mass}",
            link.name,
            link.collisions.len()
        );
        Ok(BodyId(id))
    }

    /// Mesh and material for a visual shape, when the connection renders.
    fn visual_handles(
        &mut self,
        shape: &VisualShape,
    ) -> Option<(Handle<Mesh>, Handle<StandardMaterial>)> {
        if !self.status.mode.renders() {
            return None;
        }
        let meshes = self.meshes.as_mut()?;
        let materials = self.materials.as_mut()?;
        let mesh = meshes.add(shape.geometry.mesh());
        let material = materials.add(StandardMaterial {
            base_color: color_from_rgba(shape.rgba),
            ..default()
        });
        Some((mesh, material))
    }
}
