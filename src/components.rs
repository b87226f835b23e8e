//! Components attached to bodies created through the client.

use bevy::prelude::*;

use crate::resources::{CollisionShapeId, VisualShapeId};

/// A body created with `create_multi_body` or `load_urdf`.
///
/// The engine owns the dynamic state (`Transform`, velocities); this component
/// records what the body was created from.
///
/// # Fields
/// * `mass` - Base mass in kilograms, 0 for static bodies
/// * `collision_shape` - Registry id of the collision shape, if any
/// * `visual_shape` - Registry id of the visual shape, if any
#[derive(Component, Reflect, Default, Clone, Debug, PartialEq)]
#[reflect(Component)]
pub struct SimBody {
    /// Base mass (kg)
    pub mass: f32,
    pub collision_shape: Option<CollisionShapeId>,
    pub visual_shape: Option<VisualShapeId>,
}

impl SimBody {
    /// Mass 0 marks a body the engine never moves.
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}

/// Marks a body instantiated from a URDF link.
#[derive(Component, Reflect, Default, Clone, Debug)]
#[reflect(Component)]
pub struct UrdfBody {
    pub robot: String,
    pub link: String,
}

/// The camera driven by [`DebugCamera`](crate::resources::DebugCamera).
#[derive(Component, Default)]
pub struct DebugCameraView;

/// Unique id of a body, as returned by the client.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BodyId(pub Entity);

impl BodyId {
    pub fn entity(&self) -> Entity {
        self.0
    }
}
