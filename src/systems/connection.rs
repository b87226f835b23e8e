//! Connection tracking.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::components::SimBody;
use crate::resources::{ConnectionStatus, SimulationClock};
use crate::types::base_pose;

/// Mark the session disconnected when the app is told to exit.
///
/// In GUI mode this is the viewer window closing; in DIRECT mode the step
/// limit or an explicit `disconnect`. Logs the final pose of every body.
pub fn handle_disconnect(
    mut exits: MessageReader<AppExit>,
    mut status: ResMut<ConnectionStatus>,
    clock: Res<SimulationClock>,
    bodies: Query<(&Name, &Transform), With<SimBody>>,
) {
    if exits.read().count() == 0 || !status.connected {
        return;
    }

    status.connected = false;
    info!("disconnected after {} steps", clock.steps);
    for (name, transform) in &bodies {
        let (position, orientation) = base_pose(transform);
        info!("  {name}: position {position}, orientation {orientation}");
    }
}
