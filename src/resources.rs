//! Global resources for the hello-world simulation.

use bevy::prelude::*;

use crate::error::{SimError, SimResult};
use crate::types::{z_up_to_y_up, ConnectionMode, Geometry};

/// World settings applied when the session connects.
///
/// All vectors are in the Z-up frame.
///
/// # Fields
/// * `gravity` - Gravity vector in meters per second squared
/// * `time_step` - Duration of one physics step in seconds
/// * `warmup_steps` - Steps after which the scene is reported as settled
/// * `max_steps` - Disconnect after this many steps (headless runs)
///
/// # Example
/// ```
/// use bevy_hello_physics::resources::SimulationConfig;
///
/// let config = SimulationConfig::default().with_max_steps(2400);
/// assert_eq!(config.max_steps, Some(2400));
/// ```
#[derive(Resource, Reflect, Clone, Debug)]
#[reflect(Resource)]
pub struct SimulationConfig {
    /// Gravity vector (m/s²)
    pub gravity: Vec3,
    /// Fixed step length (seconds)
    pub time_step: f64,
    /// Warm-up step count, 0 to disable the report
    pub warmup_steps: u64,
    /// Optional step limit
    pub max_steps: Option<u64>,
}

/// Default stepping rate of the engine (Hz).
pub const DEFAULT_STEP_HZ: f64 = 240.0;

impl Default for SimulationConfig {
    /// No gravity, 240 Hz stepping, no warm-up report, no step limit.
    fn default() -> Self {
        Self {
            gravity: Vec3::ZERO,
            time_step: 1.0 / DEFAULT_STEP_HZ,
            warmup_steps: 0,
            max_steps: None,
        }
    }
}

impl SimulationConfig {
    /// Builder pattern: set gravity (Z-up)
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder pattern: set the step limit
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Builder pattern: set the warm-up step count
    pub fn with_warmup_steps(mut self, warmup_steps: u64) -> Self {
        self.warmup_steps = warmup_steps;
        self
    }

    /// Gravity as the engine sees it (Y-up).
    pub fn engine_gravity(&self) -> Vec3 {
        z_up_to_y_up(self.gravity)
    }
}

/// Handle to a collision shape created through the client.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Reflect)]
pub struct CollisionShapeId(pub usize);

/// Handle to a visual shape created through the client.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Reflect)]
pub struct VisualShapeId(pub usize);

/// A geometry with a display colour.
#[derive(Clone, Copy, PartialEq, Debug, Reflect)]
pub struct VisualShape {
    pub geometry: Geometry,
    /// RGBA, each channel in `[0, 1]`
    pub rgba: [f32; 4],
}

/// Per-session table of created shapes.
///
/// Ids are indices into append-only tables, so they stay valid for the whole
/// session.
#[derive(Resource, Default, Debug)]
pub struct ShapeRegistry {
    collision: Vec<Geometry>,
    visual: Vec<VisualShape>,
}

impl ShapeRegistry {
    /// Validate and store a collision shape.
    pub fn add_collision(&mut self, geometry: Geometry) -> SimResult<CollisionShapeId> {
        geometry.validate()?;
        self.collision.push(geometry);
        Ok(CollisionShapeId(self.collision.len() - 1))
    }

    /// Validate and store a visual shape.
    pub fn add_visual(&mut self, geometry: Geometry, rgba: [f32; 4]) -> SimResult<VisualShapeId> {
        geometry.validate()?;
        self.visual.push(VisualShape { geometry, rgba });
        Ok(VisualShapeId(self.visual.len() - 1))
    }

    pub fn collision(&self, id: CollisionShapeId) -> SimResult<&Geometry> {
        self.collision
            .get(id.0)
            .ok_or(SimError::UnknownCollisionShape(id.0))
    }

    pub fn visual(&self, id: VisualShapeId) -> SimResult<&VisualShape> {
        self.visual.get(id.0).ok_or(SimError::UnknownVisualShape(id.0))
    }

    pub fn collision_count(&self) -> usize {
        self.collision.len()
    }

    pub fn visual_count(&self) -> usize {
        self.visual.len()
    }
}

/// Number of physics steps taken since connecting.
#[derive(Resource, Default, Debug)]
pub struct SimulationClock {
    pub steps: u64,
    /// Set once the warm-up report has been logged
    pub warmed_up: bool,
}

/// Connection state, queried by `is_connected`.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ConnectionStatus {
    pub mode: ConnectionMode,
    pub connected: bool,
}

impl ConnectionStatus {
    pub fn new(mode: ConnectionMode) -> Self {
        Self {
            mode,
            connected: true,
        }
    }
}

/// Debug viewer camera, orbiting a target point.
///
/// Angles are in degrees and follow the viewer convention: yaw turns around
/// the vertical axis (0 looks along `+Y`), negative pitch looks down.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_hello_physics::resources::DebugCamera;
///
/// let camera = DebugCamera::new(5.0, 45.0, -30.0, Vec3::ZERO);
/// assert!(camera.eye().z > 0.0);
/// ```
#[derive(Resource, Reflect, Clone, Debug, PartialEq)]
#[reflect(Resource)]
pub struct DebugCamera {
    /// Distance from eye to target (meters)
    pub distance: f32,
    /// Yaw (degrees)
    pub yaw: f32,
    /// Pitch (degrees)
    pub pitch: f32,
    /// Look-at target (Z-up)
    pub target: Vec3,
}

impl Default for DebugCamera {
    fn default() -> Self {
        Self {
            distance: 10.0,
            yaw: 50.0,
            pitch: -35.0,
            target: Vec3::ZERO,
        }
    }
}

impl DebugCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32, target: Vec3) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target,
        }
    }

    /// Unit view direction (eye towards target) in the Z-up frame.
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            yaw.sin() * pitch.cos(),
            yaw.cos() * pitch.cos(),
            pitch.sin(),
        )
    }

    /// Eye position in the Z-up frame.
    pub fn eye(&self) -> Vec3 {
        self.target - self.forward() * self.distance
    }

    /// Engine transform of the camera looking at the target.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(z_up_to_y_up(self.eye()))
            .looking_at(z_up_to_y_up(self.target), Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_registry_hands_out_sequential_ids() {
        let mut registry = ShapeRegistry::default();
        let sphere = registry.add_collision(Geometry::sphere(0.5)).unwrap();
        let cube = registry.add_collision(Geometry::cuboid(Vec3::splat(0.5))).unwrap();

        assert_eq!(sphere, CollisionShapeId(0));
        assert_eq!(cube, CollisionShapeId(1));
        assert_eq!(*registry.collision(cube).unwrap(), Geometry::cuboid(Vec3::splat(0.5)));
        assert_eq!(registry.collision_count(), 2);
        assert_eq!(registry.visual_count(), 0);
    }

    #[test]
    fn test_registry_rejects_unknown_and_invalid() {
        let mut registry = ShapeRegistry::default();
        assert!(matches!(
            registry.collision(CollisionShapeId(3)),
            Err(SimError::UnknownCollisionShape(3))
        ));
        assert!(matches!(
            registry.visual(VisualShapeId(0)),
            Err(SimError::UnknownVisualShape(0))
        ));

        assert!(registry.add_visual(Geometry::sphere(-0.5), [1.0, 0.0, 0.0, 1.0]).is_err());
        assert_eq!(registry.visual_count(), 0);
    }

    #[test]
    fn test_visual_keeps_colour() {
        let mut registry = ShapeRegistry::default();
        let id = registry
            .add_visual(Geometry::cylinder(0.5, 1.0), [0.0, 1.0, 0.0, 1.0])
            .unwrap();
        assert_eq!(registry.visual(id).unwrap().rgba, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.gravity, Vec3::ZERO);
        assert_relative_eq!(config.time_step, 1.0 / 240.0);
        assert_eq!(config.max_steps, None);

        let config = SimulationConfig {
            gravity: Vec3::new(0.0, 0.0, -10.0),
            ..default()
        };
        assert_eq!(config.engine_gravity(), Vec3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn test_camera_eye_distance_and_height() {
        let camera = DebugCamera::new(5.0, 45.0, -30.0, Vec3::ZERO);
        let eye = camera.eye();

        assert_relative_eq!(eye.length(), 5.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, 2.5, epsilon = 1e-5);
        // Yaw 45 puts the eye on the diagonal behind the target.
        assert_relative_eq!(eye.x, eye.y, epsilon = 1e-5);
        assert!(eye.x < 0.0);
    }

    #[test]
    fn test_camera_transform_looks_at_target() {
        let camera = DebugCamera::new(5.0, 45.0, -30.0, Vec3::new(1.0, 2.0, 0.0));
        let transform = camera.transform();

        let to_target = (z_up_to_y_up(camera.target) - transform.translation).normalize();
        assert!(transform.forward().as_vec3().abs_diff_eq(to_target, 1e-5));
    }
}
