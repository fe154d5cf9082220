//! Reference grid-world traffic simulation
//!
//! A small wrap-around grid of signalised intersections with a handful of
//! rule-abiding dummy cars. It implements the [`Environment`] port so the
//! learning core can be trained and compared end to end; nothing in the core
//! depends on it.
//!
//! [`Environment`]: crate::ports::Environment

pub mod geometry;
pub mod planner;
pub mod world;

pub use geometry::{Heading, Location};
pub use planner::RoutePlanner;
pub use world::{GridWorld, WorldConfig};
