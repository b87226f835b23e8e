//! Viewer camera and lighting (GUI connections only).

use bevy::prelude::*;

use crate::components::DebugCameraView;
use crate::resources::DebugCamera;

/// Spawn the viewer camera and a sun light.
pub fn spawn_viewer(mut commands: Commands, camera: Res<DebugCamera>) {
    commands.spawn((Camera3d::default(), camera.transform(), DebugCameraView));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.5, 0.0)),
    ));
}

/// Move the viewer camera whenever [`DebugCamera`] changes.
pub fn apply_debug_camera(
    camera: Res<DebugCamera>,
    mut views: Query<&mut Transform, With<DebugCameraView>>,
) {
    for mut transform in &mut views {
        *transform = camera.transform();
    }
}
