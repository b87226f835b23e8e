//! Common types for the hello-world scenes: connection mode, geometry
//! descriptors and the Z-up/Y-up frame conversion.
//!
//! The client API speaks the classic robotics convention (Z up, gravity along
//! `-Z`). Bevy and avian are Y up, so every position and orientation crosses
//! [`z_up_to_y_up`] / [`orientation_to_y_up`] exactly once on its way into the
//! engine.

use avian3d::prelude::Collider;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::error::{SimError, SimResult};

/// How the simulation is attached to the outside world.
///
/// # Variants
/// * `Gui` - Windowed viewer, rendering enabled, stepping paced by the frame loop
/// * `Direct` - Headless, no renderer, stepping paced by the schedule runner
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub enum ConnectionMode {
    /// Windowed viewer
    #[default]
    Gui,
    /// Headless
    Direct,
}

impl ConnectionMode {
    /// Whether visual shapes are turned into meshes in this mode.
    pub fn renders(&self) -> bool {
        matches!(self, Self::Gui)
    }
}

/// Shape descriptor shared by collision and visual shapes.
///
/// Dimensions are in meters and expressed in the Z-up frame: a box's
/// `half_extents.z` and a cylinder's `height` run along the vertical axis.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_hello_physics::types::Geometry;
///
/// let cube = Geometry::cuboid(Vec3::splat(0.5));
/// assert_eq!(cube.resting_height(), 0.5);
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Reflect)]
pub enum Geometry {
    /// Sphere centered on the body origin
    Sphere { radius: f32 },
    /// Axis-aligned box
    Box { half_extents: Vec3 },
    /// Cylinder aligned with the vertical axis
    Cylinder { radius: f32, height: f32 },
    /// Infinite plane through the body origin (static bodies only)
    Plane { normal: Vec3 },
}

/// Half size of the rendered quad standing in for an infinite plane.
pub const PLANE_VISUAL_HALF_SIZE: f32 = 15.0;

impl Geometry {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::Cylinder { radius, height }
    }

    pub fn plane(normal: Vec3) -> Self {
        Self::Plane { normal }
    }

    /// Short lowercase name used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Box { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Plane { .. } => "plane",
        }
    }

    /// Check that every dimension is finite and strictly positive.
    pub fn validate(&self) -> SimResult<()> {
        let shape = self.kind();
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidGeometry {
                    shape,
                    reason: format!("{name} must be finite and > 0, got {value}"),
                })
            }
        };

        match *self {
            Self::Sphere { radius } => positive("radius", radius),
            Self::Box { half_extents } => {
                positive("half_extents.x", half_extents.x)?;
                positive("half_extents.y", half_extents.y)?;
                positive("half_extents.z", half_extents.z)
            }
            Self::Cylinder { radius, height } => {
                positive("radius", radius)?;
                positive("height", height)
            }
            Self::Plane { normal } => {
                if normal.is_finite() && normal.length_squared() > 0.0 {
                    Ok(())
                } else {
                    Err(SimError::InvalidGeometry {
                        shape,
                        reason: format!("normal must be finite and non-zero, got {normal}"),
                    })
                }
            }
        }
    }

    /// Height of the body origin above the ground when the shape rests on it
    /// upright: the radius, the vertical half extent or half the height.
    pub fn resting_height(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Box { half_extents } => half_extents.z,
            Self::Cylinder { height, .. } => height / 2.0,
            Self::Plane { .. } => 0.0,
        }
    }

    /// Build the avian collider in the engine (Y-up) frame.
    pub fn collider(&self) -> Collider {
        match *self {
            Self::Sphere { radius } => Collider::sphere(radius),
            Self::Box { half_extents } => {
                let size = z_up_extents_to_y_up(half_extents) * 2.0;
                Collider::cuboid(size.x, size.y, size.z)
            }
            // Both frames put the cylinder axis on their own up axis.
            Self::Cylinder { radius, height } => Collider::cylinder(radius, height),
            Self::Plane { normal } => Collider::half_space(z_up_to_y_up(normal.normalize())),
        }
    }

    /// Build the render mesh in the engine (Y-up) frame.
    pub fn mesh(&self) -> Mesh {
        match *self {
            Self::Sphere { radius } => Sphere::new(radius).into(),
            Self::Box { half_extents } => {
                let size = z_up_extents_to_y_up(half_extents) * 2.0;
                Cuboid::new(size.x, size.y, size.z).into()
            }
            Self::Cylinder { radius, height } => Cylinder::new(radius, height).into(),
            Self::Plane { normal } => Plane3d::new(
                z_up_to_y_up(normal.normalize()),
                Vec2::splat(PLANE_VISUAL_HALF_SIZE),
            )
            .into(),
        }
    }
}

/// Convert a Z-up vector into bevy's Y-up frame.
#[inline]
pub fn z_up_to_y_up(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// Convert a Y-up vector back into the Z-up frame.
#[inline]
pub fn y_up_to_z_up(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

/// Extents are unsigned, so only the axes swap.
#[inline]
fn z_up_extents_to_y_up(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Rotation taking Z-up coordinates to Y-up coordinates.
#[inline]
fn frame_rotation() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2)
}

/// Express a Z-up orientation in the Y-up frame.
pub fn orientation_to_y_up(q: Quat) -> Quat {
    let c = frame_rotation();
    (c * q * c.inverse()).normalize()
}

/// Express a Y-up orientation in the Z-up frame.
pub fn orientation_to_z_up(q: Quat) -> Quat {
    let c = frame_rotation();
    (c.inverse() * q * c).normalize()
}

/// Quaternion from `[roll, pitch, yaw]` in radians (Z-up frame).
///
/// Rotations are applied about the fixed X, then Y, then Z axes, i.e.
/// `Rz(yaw) * Ry(pitch) * Rx(roll)`.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_hello_physics::types::quaternion_from_euler;
///
/// assert_eq!(quaternion_from_euler(Vec3::ZERO), Quat::IDENTITY);
/// ```
pub fn quaternion_from_euler(rpy: Vec3) -> Quat {
    Quat::from_euler(EulerRot::ZYX, rpy.z, rpy.y, rpy.x)
}

/// Inverse of [`quaternion_from_euler`]: `[roll, pitch, yaw]` in radians.
pub fn euler_from_quaternion(q: Quat) -> Vec3 {
    let (yaw, pitch, roll) = q.to_euler(EulerRot::ZYX);
    Vec3::new(roll, pitch, yaw)
}

/// Base position and orientation of a body in the Z-up frame.
pub fn base_pose(transform: &Transform) -> (Vec3, Quat) {
    (
        y_up_to_z_up(transform.translation),
        orientation_to_z_up(transform.rotation),
    )
}

/// Engine transform for a Z-up pose.
pub fn transform_from_z_up(position: Vec3, orientation: Quat) -> Transform {
    Transform::from_translation(z_up_to_y_up(position))
        .with_rotation(orientation_to_y_up(orientation))
}

/// RGBA in `[0, 1]` to an sRGB bevy colour.
pub fn color_from_rgba(rgba: [f32; 4]) -> Color {
    Color::srgba(rgba[0], rgba[1], rgba[2], rgba[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
    }

    #[test]
    fn test_resting_height_matches_shape() {
        assert_eq!(Geometry::sphere(0.5).resting_height(), 0.5);
        assert_eq!(
            Geometry::cuboid(Vec3::new(0.2, 0.3, 0.4)).resting_height(),
            0.4
        );
        assert_eq!(Geometry::cylinder(0.5, 1.0).resting_height(), 0.5);
        assert_eq!(Geometry::plane(Vec3::Z).resting_height(), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        assert!(Geometry::sphere(0.5).validate().is_ok());
        assert!(Geometry::sphere(0.0).validate().is_err());
        assert!(Geometry::sphere(f32::NAN).validate().is_err());
        assert!(Geometry::cuboid(Vec3::new(0.5, -0.5, 0.5)).validate().is_err());
        assert!(Geometry::cylinder(0.5, 0.0).validate().is_err());
        assert!(Geometry::plane(Vec3::ZERO).validate().is_err());

        let err = Geometry::cylinder(-1.0, 1.0).validate().unwrap_err();
        assert!(err.to_string().contains("cylinder"));
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn test_frame_conversion() {
        assert_vec_eq(z_up_to_y_up(Vec3::Z), Vec3::Y);
        assert_vec_eq(z_up_to_y_up(Vec3::new(0.0, 0.0, -10.0)), Vec3::new(0.0, -10.0, 0.0));
        assert_vec_eq(z_up_to_y_up(Vec3::new(-2.0, 0.0, 0.5)), Vec3::new(-2.0, 0.5, 0.0));

        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_eq(y_up_to_z_up(z_up_to_y_up(v)), v);
    }

    #[test]
    fn test_orientation_conversion_agrees_with_vectors() {
        // Yaw about Z-up must become a rotation about Y-up.
        let q = quaternion_from_euler(Vec3::new(0.0, 0.0, FRAC_PI_4));
        let v = Vec3::new(1.0, 0.0, 0.0);

        let rotated_then_converted = z_up_to_y_up(q * v);
        let converted_then_rotated = orientation_to_y_up(q) * z_up_to_y_up(v);
        assert_vec_eq(rotated_then_converted, converted_then_rotated);

        let back = orientation_to_z_up(orientation_to_y_up(q));
        assert!(back.abs_diff_eq(q, 1e-5) || back.abs_diff_eq(-q, 1e-5));
    }

    #[test]
    fn test_euler_roundtrip_order() {
        let rpy = Vec3::new(0.1, -0.2, 0.3);
        let q = quaternion_from_euler(rpy);

        // Extrinsic X-Y-Z equals Rz * Ry * Rx.
        let expected = Quat::from_rotation_z(0.3) * Quat::from_rotation_y(-0.2) * Quat::from_rotation_x(0.1);
        assert!(q.abs_diff_eq(expected, 1e-5));

        let back = euler_from_quaternion(q);
        assert_relative_eq!(back.x, rpy.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, rpy.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, rpy.z, epsilon = 1e-5);
    }

    #[test]
    fn test_base_pose_inverts_transform_from_z_up() {
        let position = Vec3::new(2.0, 1.0, 0.5);
        let orientation = quaternion_from_euler(Vec3::new(0.0, 0.0, 1.0));

        let transform = transform_from_z_up(position, orientation);
        assert_relative_eq!(transform.translation.y, 0.5, epsilon = 1e-6);

        let (p, q) = base_pose(&transform);
        assert_vec_eq(p, position);
        assert!(q.abs_diff_eq(orientation, 1e-5) || q.abs_diff_eq(-orientation, 1e-5));
    }

    #[test]
    fn test_only_gui_renders() {
        assert!(ConnectionMode::Gui.renders());
        assert!(!ConnectionMode::Direct.renders());
    }
}
