//! # sphcase-core
//!
//! Case model, snapshot persistence and structured export for SPH
//! simulation cases.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Layout
//!
//! - [`model`]: entity types with engine defaults
//! - [`case`]: the [`Case`] aggregate and its invariants
//! - [`persistence`]: versioned snapshots with rename/field migrations
//! - [`export`]: deterministic case definition document for the pre-processor
//! - [`workflow`]: save/load orchestration over the collaborator seams
//!   ([`geometry::GeometryHost`], [`fs::CaseFilesystem`])

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod case;
pub mod config;
mod error;
pub mod export;
pub mod fs;
pub mod geometry;
pub mod model;
pub mod persistence;
pub mod values;
pub mod workflow;

pub use case::{Case, CaseSession};
pub use config::Config;
pub use error::{Error, ErrorCategory, Result};
pub use export::{export_case, write_export, ExportDiagnostic, ExportOutcome, ExportReport};
pub use fs::{CaseFilesystem, LocalFilesystem};
pub use geometry::{GeometryHost, HostObject, HostShape, InMemoryGeometry};
pub use persistence::{load_snapshot, save_snapshot, PROTOCOL_VERSION};
pub use values::{AutoValue, ObjectType, Placement, Rotation, Vec3};
pub use workflow::{load_case, save_case, CopyFailure, SaveReport};
