//! Labelled message passing between the board and the controller

pub mod registry;

pub use registry::{MessageId, MessageRegistry, RegistryError, DEFAULT_REGISTRY_CAPACITY};
