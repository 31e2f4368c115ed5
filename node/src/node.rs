//! The governance node: owns an engine and its persistence.

use std::fs;
use std::io::Write;
use std::path::Path;

use lss_governance::{Collaborators, EngineSnapshot, GovernanceEngine};
use tracing::{debug, info};

use crate::config::NodeConfig;
use crate::error::NodeError;

pub struct GovernanceNode {
    config: NodeConfig,
    engine: GovernanceEngine,
}

impl GovernanceNode {
    /// Build a node from its configuration. When a snapshot exists at the configured path
    /// the engine is restored from it, otherwise it starts empty.
    pub fn new(config: NodeConfig, collaborators: Collaborators) -> Result<Self, NodeError> {
        let settings = config.settings()?;
        let engine = match config.snapshot_path.as_deref().filter(|p| p.exists()) {
            Some(path) => {
                let snapshot = EngineSnapshot::from_bytes(&fs::read(path)?)?;
                info!(
                    path = %path.display(),
                    reports = snapshot.registry.len(),
                    records = snapshot.audit.len(),
                    "engine restored from snapshot"
                );
                GovernanceEngine::from_snapshot(settings, collaborators, snapshot)?
            }
            None => {
                info!("starting with an empty engine");
                GovernanceEngine::new(settings, collaborators)?
            }
        };
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn engine(&self) -> &GovernanceEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GovernanceEngine {
        &mut self.engine
    }

    /// Persist the engine to the configured snapshot path. No-op when none is configured.
    pub fn save_snapshot(&self) -> Result<(), NodeError> {
        match &self.config.snapshot_path {
            Some(path) => self.save_snapshot_to(path),
            None => {
                debug!("no snapshot path configured; skipping save");
                Ok(())
            }
        }
    }

    /// Write the snapshot next to `path` and rename it into place, so a crash mid-write
    /// never leaves a truncated snapshot behind.
    pub fn save_snapshot_to(&self, path: &Path) -> Result<(), NodeError> {
        let bytes = self.engine.snapshot().to_bytes()?;
        let staging = path.with_extension("tmp");
        fs::write(&staging, &bytes)?;
        fs::rename(&staging, path)?;
        info!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
        Ok(())
    }

    /// Write every audit record as one JSON object per line. Returns the record count.
    pub fn export_audit_log<W: Write>(&self, mut writer: W) -> Result<usize, NodeError> {
        let records = self.engine.audit_log().records();
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(records.len())
    }

    pub fn export_audit_log_to(&self, path: &Path) -> Result<usize, NodeError> {
        let file = fs::File::create(path)?;
        self.export_audit_log(std::io::BufWriter::new(file))
    }
}
