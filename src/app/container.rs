//! Dependency injection container for the smartcab application.
//!
//! This module provides centralized dependency management following hexagonal
//! architecture principles. The container owns infrastructure dependencies and
//! provides factory methods for creating drivers.

use std::{fmt, path::Path, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use super::config::AgentConfig;
use crate::{
    Error, Result,
    adapters::MsgPackRepository,
    pipeline::{InformedDriver, NaiveDriver, RandomDriver},
    ports::{AgentRepository, Driver},
    q_learning::{QLearningAgent, SavedQAgent, TrainingMetadata},
};

/// The drivers the container can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriverKind {
    QLearning,
    Random,
    Naive,
    Informed,
}

impl DriverKind {
    pub const ALL: [DriverKind; 4] = [
        DriverKind::Random,
        DriverKind::Naive,
        DriverKind::Informed,
        DriverKind::QLearning,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            DriverKind::QLearning => "q-learning",
            DriverKind::Random => "random",
            DriverKind::Naive => "naive",
            DriverKind::Informed => "informed",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        DriverKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| Error::InvalidConfiguration {
                message: format!(
                    "unknown driver '{s}'. Expected one of: random, naive, informed, q-learning"
                ),
            })
    }
}

/// Application with dependency injection.
///
/// Centralizes creation and wiring of dependencies following hexagonal
/// architecture. All infrastructure dependencies are owned by the app and
/// injected into drivers and use cases.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use smartcab::app::{App, AgentConfig};
///
/// let app = App::new();
/// let agent = app.create_agent(AgentConfig::new().with_seed(42))?;
/// # Ok::<(), smartcab::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use smartcab::app::App;
/// use smartcab::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for agent persistence
    agent_repository: Arc<dyn AgentRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for agent persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            agent_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Create a new Q-learning agent with the given configuration.
    ///
    /// The configuration's seed wins over the container default.
    pub fn create_agent(&self, config: AgentConfig) -> Result<QLearningAgent> {
        config.validate()?;
        let mut config = config;
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        QLearningAgent::from_config(&config)
    }

    /// Create any driver by kind.
    ///
    /// `config` is only used for [`DriverKind::QLearning`] and the random
    /// baseline's seed.
    pub fn create_driver(&self, kind: DriverKind, config: &AgentConfig) -> Result<Box<dyn Driver>> {
        let seed = config.seed.or(self.default_seed);
        let driver: Box<dyn Driver> = match kind {
            DriverKind::QLearning => Box::new(self.create_agent(config.clone())?),
            DriverKind::Random => match seed {
                Some(seed) => Box::new(RandomDriver::with_seed(seed)),
                None => Box::new(RandomDriver::new()),
            },
            DriverKind::Naive => Box::new(NaiveDriver::new()),
            DriverKind::Informed => Box::new(InformedDriver::new()),
        };
        Ok(driver)
    }

    /// Load a saved agent with its training metadata.
    ///
    /// The loaded agent is reseeded with the container default when one is
    /// configured.
    pub fn load_agent(&self, path: &Path) -> Result<(QLearningAgent, TrainingMetadata)> {
        let saved = self.agent_repository.load(path)?;
        let mut agent = saved.to_agent()?;
        if let Some(seed) = self.default_seed {
            agent = agent.with_seed(seed);
        }
        Ok((agent, saved.metadata))
    }

    /// Save an agent to persistent storage.
    pub fn save_agent(
        &self,
        agent: &QLearningAgent,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let saved = SavedQAgent::from_agent(agent, metadata);
        self.agent_repository.save(&saved, path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    agent_repository: Option<Arc<dyn AgentRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            agent_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom agent repository.
    pub fn with_repository<R: AgentRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.agent_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all drivers created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            agent_repository: self
                .agent_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, q_learning::TieBreak};

    #[test]
    fn test_app_creates_agent() {
        let app = App::new();
        let agent = app
            .create_agent(AgentConfig::new().with_tie_break(TieBreak::First))
            .unwrap();
        assert_eq!(agent.tie_break(), TieBreak::First);
        assert!(agent.is_learning());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let app = App::new();
        assert!(app.create_agent(AgentConfig::new().with_alpha(2.0)).is_err());
    }

    #[test]
    fn test_save_and_load_through_repository() {
        let repo = InMemoryRepository::new();
        let app = App::for_testing()
            .with_repository(repo.clone())
            .with_default_seed(42)
            .build();

        let agent = app.create_agent(AgentConfig::new().with_gamma(0.9)).unwrap();
        let metadata = TrainingMetadata {
            trials_trained: Some(10),
            ..TrainingMetadata::default()
        };
        app.save_agent(&agent, metadata.clone(), Path::new("agent"))
            .unwrap();
        assert_eq!(repo.count(), 1);

        let (loaded, loaded_metadata) = app.load_agent(Path::new("agent")).unwrap();
        assert_eq!(loaded.gamma(), 0.9);
        assert_eq!(loaded_metadata, metadata);
    }

    #[test]
    fn test_driver_factory_names() {
        let app = App::for_testing().with_default_seed(1).build();
        let config = AgentConfig::new();
        let names: Vec<String> = DriverKind::ALL
            .into_iter()
            .map(|kind| app.create_driver(kind, &config).unwrap().name().to_string())
            .collect();
        assert_eq!(names, ["Random", "Naive", "Informed", "Q-Learning"]);
    }

    #[test]
    fn test_driver_kind_parsing() {
        assert_eq!("q_learning".parse::<DriverKind>().unwrap(), DriverKind::QLearning);
        assert_eq!("Informed".parse::<DriverKind>().unwrap(), DriverKind::Informed);
        assert!("bus".parse::<DriverKind>().is_err());
    }
}
