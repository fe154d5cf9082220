//! Repository port for trained agent persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedQAgent};

/// Port for persisting and loading trained Q-learning agents.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use smartcab::{ports::AgentRepository, q_learning::SavedQAgent};
///
/// fn save_agent<R: AgentRepository>(
///     repo: &R,
///     saved: &SavedQAgent,
///     path: &Path,
/// ) -> smartcab::Result<()> {
///     repo.save(saved, path)
/// }
/// ```
pub trait AgentRepository {
    /// Save an agent to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization fails.
    fn save(&self, agent: &SavedQAgent, path: &Path) -> Result<()>;

    /// Load an agent from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is missing or the data is corrupted.
    fn load(&self, path: &Path) -> Result<SavedQAgent>;
}
