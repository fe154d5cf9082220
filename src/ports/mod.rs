//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and
//! everything around it: the simulation, the drivers being compared, the
//! observers collecting data and the storage for trained agents.

pub mod driver;
pub mod environment;
pub mod observer;
pub mod repository;

pub use driver::{Driver, Sensation};
pub use environment::Environment;
pub use observer::{ExportSnapshot, Observer, StepEvent};
pub use repository::AgentRepository;
