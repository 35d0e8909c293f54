//! Sensor sampling and interrupt latches

pub mod latch;
pub mod rotation;
pub mod snapshot;

pub use latch::{EventLatches, Latch};
pub use rotation::{atan2_mrad, normalize_heading, rotation_from_acceleration};
pub use snapshot::SensorSnapshot;
