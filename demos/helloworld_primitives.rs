//! A box, a sphere and a cylinder lined up on the ground plane.

use bevy_hello_physics::prelude::*;

fn main() {
    connect(ConnectionMode::Gui, HelloWorld::Primitives).run();
}
