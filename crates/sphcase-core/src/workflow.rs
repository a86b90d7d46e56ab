//! Save and load orchestration.
//!
//! A save writes, in order: the case and output directories, best-effort
//! copies of auxiliary data files, the snapshot, and the structured export.
//! Only the auxiliary copies may fail without aborting the save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::case::Case;
use crate::config::Config;
use crate::export::{write_export, ExportReport};
use crate::fs::CaseFilesystem;
use crate::geometry::GeometryHost;
use crate::persistence::{load_snapshot, save_snapshot};
use crate::{Error, Result};

/// A failed auxiliary copy. The model keeps the original path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFailure {
    pub source: String,
    pub message: String,
}

/// What a save produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub snapshot_path: PathBuf,
    pub export_path: PathBuf,
    pub export: ExportReport,
    /// Base names of the auxiliary files copied into the output directory
    pub copied: Vec<String>,
    pub copy_failures: Vec<CopyFailure>,
}

/// Save a case to `case.path`.
///
/// Auxiliary files are copied into the output directory and their in-model
/// references rewritten to base names before the snapshot is written, so the
/// snapshot and the export reference the copies.
///
/// # Errors
///
/// - `Error::InvalidInput` if the case has no name or no directory
/// - `Error::IoError` if a directory, the snapshot or the export cannot be written
/// - `Error::MissingMkProperties` if an object's MK has no property record
pub fn save_case(
    case: &mut Case,
    host: &dyn GeometryHost,
    fs: &dyn CaseFilesystem,
    config: &Config,
) -> Result<SaveReport> {
    if case.name.trim().is_empty() {
        return Err(Error::InvalidInput("case has no name".to_string()));
    }
    if case.path.as_os_str().is_empty() {
        return Err(Error::InvalidInput(format!(
            "case '{}' has no directory",
            case.name
        )));
    }

    let case_dir = case.path.clone();
    let out_dir = config.out_dir(&case_dir, &case.name);
    fs.create_dir_all(&case_dir)?;
    fs.create_dir_all(&out_dir)?;

    let (copied, copy_failures) = copy_auxiliary_files(case, fs, &out_dir);

    let snapshot_path = config.snapshot_path(&case_dir);
    save_snapshot(case, &snapshot_path, fs)?;

    let (export_path, export) = write_export(case, host, fs, config)?;
    case.info.last_export_complete = Some(export.is_complete());
    case.info.needs_to_run_gencase = true;

    info!(
        case = %case.name,
        snapshot = %snapshot_path.display(),
        export = %export_path.display(),
        copied = copied.len(),
        copy_failures = copy_failures.len(),
        complete = export.is_complete(),
        "Saved case"
    );

    Ok(SaveReport {
        snapshot_path,
        export_path,
        export,
        copied,
        copy_failures,
    })
}

/// Copy every referenced auxiliary file into `out_dir`, rewriting each
/// successfully copied reference to its base name.
fn copy_auxiliary_files(
    case: &mut Case,
    fs: &dyn CaseFilesystem,
    out_dir: &Path,
) -> (Vec<String>, Vec<CopyFailure>) {
    let case_dir = case.path.clone();
    let mut copied = Vec::new();
    let mut failures = Vec::new();
    // Base name -> source already placed under it during this save.
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();

    for reference in case.auxiliary_files_mut() {
        let source = PathBuf::from(reference.as_str());
        let Some(base_name) = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
        else {
            failures.push(CopyFailure {
                source: reference.clone(),
                message: "path has no file name".to_string(),
            });
            continue;
        };
        let destination = out_dir.join(&base_name);

        // A bare name that already sits in the output directory came from
        // an earlier save.
        if source.parent().map_or(true, |p| p.as_os_str().is_empty()) && fs.exists(&destination)
        {
            debug!(file = %base_name, "Auxiliary file already in output directory");
            claimed.entry(base_name).or_insert(destination);
            continue;
        }

        let source = if source.is_relative() {
            case_dir.join(&source)
        } else {
            source
        };

        match claimed.get(&base_name) {
            Some(owner) if *owner == source => {
                reference.clone_from(&base_name);
                continue;
            }
            Some(owner) => {
                warn!(
                    source = %source.display(),
                    owner = %owner.display(),
                    file = %base_name,
                    "Auxiliary file name already taken, keeping original reference"
                );
                failures.push(CopyFailure {
                    source: reference.clone(),
                    message: format!(
                        "{base_name} is already taken by {} in the output directory",
                        owner.display()
                    ),
                });
                continue;
            }
            None => {}
        }

        match fs.copy(&source, &destination) {
            Ok(bytes) => {
                debug!(
                    source = %source.display(),
                    destination = %destination.display(),
                    bytes,
                    "Copied auxiliary file"
                );
                reference.clone_from(&base_name);
                claimed.insert(base_name.clone(), source);
                copied.push(base_name);
            }
            Err(e) => {
                warn!(
                    source = %source.display(),
                    error = %e,
                    "Auxiliary file copy failed, keeping original reference"
                );
                failures.push(CopyFailure {
                    source: reference.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    (copied, failures)
}

/// Load the case saved in `dir`.
///
/// The loaded case's directory is set to `dir`, so a moved case directory
/// keeps working.
///
/// # Errors
///
/// - `Error::FileNotFound` if `dir` holds no snapshot
/// - `Error::SnapshotCorrupt` / `Error::UnsupportedProtocol` from decoding
pub fn load_case(dir: &Path, fs: &dyn CaseFilesystem, config: &Config) -> Result<Case> {
    let snapshot_path = config.snapshot_path(dir);
    if !fs.exists(&snapshot_path) {
        return Err(Error::FileNotFound(snapshot_path));
    }

    let mut case = load_snapshot(&snapshot_path, fs)?;
    case.path = dir.to_path_buf();
    info!(
        case = %case.name,
        objects = case.number_of_objects_in_simulation(),
        "Loaded case"
    );
    Ok(case)
}
