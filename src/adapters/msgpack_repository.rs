//! MessagePack implementation of the agent repository.
//!
//! This adapter implements the AgentRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedQAgent};

/// MessagePack-based agent repository.
///
/// Stores the Q and N tables with the hyper-parameters in the MessagePack
/// binary format via rmp_serde. Struct fields are written by name so saved
/// files survive field reordering.
///
/// # Examples
///
/// ```no_run
/// use smartcab::adapters::MsgPackRepository;
/// use smartcab::ports::AgentRepository;
/// use smartcab::q_learning::{QLearningAgent, SavedQAgent, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let agent = QLearningAgent::new(0.5, 0.5, 0.5)?;
/// let saved = SavedQAgent::from_agent(&agent, TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("trained.msgpack"))?;
/// let loaded = repo.load(Path::new("trained.msgpack"))?;
/// # Ok::<(), smartcab::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl AgentRepository for MsgPackRepository {
    fn save(&self, agent: &SavedQAgent, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, agent).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize agent to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush()?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQAgent> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let agent = rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize agent from MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(agent)
    }
}
