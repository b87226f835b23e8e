//! Systems module - all ECS systems for the hello-world simulation.

pub mod connection;
pub mod stepping;
pub mod viewer;
