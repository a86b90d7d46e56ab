//! # Snapshot Persistence
//!
//! The snapshot is the authoritative round-trip form of a [`Case`]. It is a
//! bincode file carrying a self-describing value tree, so snapshots written
//! by older releases can be reshaped before they meet the current types:
//!
//! 1. Persisted class references are resolved through the rename table
//! 2. Field migrations rename and backfill fields of the resolved entities
//! 3. The migrated tree is deserialized into the current model
//!
//! Loading never touches the caller's case: the result is a fresh [`Case`]
//! or an error.

pub mod migration;
pub mod snapshot;

use std::path::Path;

use tracing::info;

use crate::case::Case;
use crate::fs::CaseFilesystem;
use crate::Result;

pub use migration::{resolve_class, ClassRename, FieldChange, FieldMigration, MigrationTarget};
pub use snapshot::{decode_snapshot, encode_snapshot, ClassRef, Node, SnapshotFile, PROTOCOL_VERSION};

/// Write a case snapshot to `path`.
///
/// # Errors
///
/// Returns an error if the case cannot be encoded or the file cannot be written.
pub fn save_snapshot(case: &Case, path: &Path, fs: &dyn CaseFilesystem) -> Result<()> {
    let bytes = encode_snapshot(case)?;
    fs.write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "Saved case snapshot");
    Ok(())
}

/// Read and migrate a case snapshot from `path`.
///
/// # Errors
///
/// - `Error::FileNotFound` if the snapshot does not exist
/// - `Error::UnsupportedProtocol` if a newer release wrote it
/// - `Error::SnapshotCorrupt` if it cannot be reconstructed
pub fn load_snapshot(path: &Path, fs: &dyn CaseFilesystem) -> Result<Case> {
    let bytes = fs.read(path)?;
    let case = decode_snapshot(&bytes)?;
    info!(path = %path.display(), case = %case.name, "Loaded case snapshot");
    Ok(case)
}
