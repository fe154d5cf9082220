//! Application layer with dependency injection container.
//!
//! The container decides which repository stores trained agents and which
//! seed new drivers start from; everything else receives those through it.
//!
//! # Layers
//!
//! ```text
//! app        App, AppBuilder, AgentConfig, RunConfig
//!  | owns
//! adapters   MsgPackRepository, InMemoryRepository
//!  | implement
//! ports      AgentRepository, Driver, Environment, Observer
//!  | used by
//! domain     QLearningAgent, ValueStore, ExperimentPipeline, GridWorld
//! ```
//!
//! # Usage
//!
//! ```
//! use smartcab::app::{App, AgentConfig};
//!
//! let app = App::new();
//! let agent = app.create_agent(AgentConfig::new().with_seed(42))?;
//! # Ok::<(), smartcab::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, RunConfig};
pub use container::{App, AppBuilder, DriverKind};
