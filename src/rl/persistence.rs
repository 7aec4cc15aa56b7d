//! Model persistence for saving and loading trained agents
//!
//! The network weights go through Burn's recorder; a JSON sidecar carries the
//! agent configuration and training progress so a run can be resumed.

use super::{Agent, AgentConfig, LinearQNet, LinearQNetConfig};
use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::{AutodiffBackend, Backend},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata saved with the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Agent configuration used during training
    pub agent_config: AgentConfig,

    /// Games finished when the snapshot was taken
    pub games_played: u32,

    /// Best score reached so far
    pub best_score: u32,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    pub fn new(agent_config: AgentConfig, games_played: u32, best_score: u32) -> Self {
        Self {
            agent_config,
            games_played,
            best_score,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Path of the metadata sidecar for a model file
pub fn metadata_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

/// Save the agent's network and training metadata
///
/// Creates parent directories if they don't exist and overwrites any previous
/// snapshot. Two files are written:
/// - `<path>` - network weights (Burn named MessagePack record)
/// - `<path stem>.meta.json` - metadata as JSON
pub fn save_model<B: AutodiffBackend>(
    agent: &Agent<B>,
    best_score: u32,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let record = agent.model().clone().into_record();

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    let metadata = ModelMetadata::new(agent.config().clone(), agent.games_played(), best_score);

    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a saved network and its metadata
///
/// Works for any backend: load into the training backend to resume, or into the
/// inference backend to only query Q-values.
pub fn load_model<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(LinearQNet<B>, ModelMetadata)> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    let network = LinearQNetConfig::new(metadata.agent_config.hidden_size).init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    Ok((network.load_record(record), metadata))
}

/// Rebuild an agent from a checkpoint, restoring weights and the game counter
pub fn resume_agent<B: AutodiffBackend>(
    path: &Path,
    device: B::Device,
) -> Result<(Agent<B>, ModelMetadata)> {
    let (model, metadata) = load_model::<B>(path, &device)?;
    let agent = Agent::from_model(
        model,
        metadata.agent_config.clone(),
        metadata.games_played,
        device,
    )?;
    Ok((agent, metadata))
}
