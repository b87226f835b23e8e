//! A single red ball resting on the ground plane.
//!
//! Steps for 1000 warm-up steps, then keeps stepping until the window is closed.

use bevy_hello_physics::prelude::*;

fn main() {
    connect(ConnectionMode::Gui, HelloWorld::Sphere).run();
}
