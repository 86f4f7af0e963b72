use std::path::Path;
use thiserror::Error;
use crate::models::Snapshot;

/// Errors that can occur while loading a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a partner/lead snapshot from a JSON file
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let snapshot = Snapshot::from_json(&raw)?;

    tracing::info!(
        path = %path.display(),
        partners = snapshot.partners.len(),
        leads = snapshot.leads.len(),
        "Snapshot loaded"
    );

    Ok(snapshot)
}
