//! Collaborator traits
//!
//! These traits define the interface between the bridge logic and the
//! board's drivers and wireless stack.

pub mod display;
pub mod pins;
pub mod sensors;
pub mod transport;

pub use display::Display;
pub use pins::PinDriver;
pub use sensors::Sensors;
pub use transport::Transport;
