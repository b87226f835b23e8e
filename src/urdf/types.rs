//! Intermediate representation of the URDF subset we read.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::types::{quaternion_from_euler, Geometry};

/// Pose of a visual or collision element relative to its link (Z-up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UrdfOrigin {
    pub xyz: Vec3,
    /// Roll, pitch, yaw (radians)
    pub rpy: Vec3,
}

impl UrdfOrigin {
    pub fn rotation(&self) -> Quat {
        quaternion_from_euler(self.rpy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrdfVisual {
    pub origin: UrdfOrigin,
    pub geometry: Geometry,
    pub rgba: Option<[f32; 4]>,
    /// Name of the material, resolved against the robot's materials when
    /// no inline colour is given
    pub material: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrdfCollision {
    pub origin: UrdfOrigin,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UrdfLink {
    pub name: String,
    /// Mass in kg, 0 when the link has no inertial element
    pub mass: f32,
    pub visuals: Vec<UrdfVisual>,
    pub collisions: Vec<UrdfCollision>,
}

impl UrdfLink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrdfRobot {
    pub name: String,
    pub links: Vec<UrdfLink>,
    /// Names of joints; their links are not instantiated
    pub joints: Vec<String>,
    /// Colours of top-level `<material>` elements by name
    pub materials: HashMap<String, [f32; 4]>,
}

impl UrdfRobot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
            joints: Vec::new(),
            materials: HashMap::new(),
        }
    }

    /// Give visuals that only name a material the colour defined for it.
    pub fn resolve_materials(&mut self) {
        for visual in self.links.iter_mut().flat_map(|link| link.visuals.iter_mut()) {
            if visual.rgba.is_none() {
                visual.rgba = visual
                    .material
                    .as_ref()
                    .and_then(|name| self.materials.get(name))
                    .copied();
            }
        }
    }

    /// First declared link, used as the body's base.
    pub fn base_link(&self) -> Option<&UrdfLink> {
        self.links.first()
    }
}
