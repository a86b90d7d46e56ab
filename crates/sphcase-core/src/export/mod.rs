//! # Structured Export
//!
//! Transforms a [`Case`] into the engine's case definition document. Section
//! order, element names and conditional presence follow the engine grammar:
//!
//! ```text
//! case
//! ├── casedef
//! │   ├── constantsdef
//! │   ├── mkconfig
//! │   ├── geometry      (objects in user-defined order)
//! │   ├── initials
//! │   ├── floatings
//! │   └── motion
//! └── execution
//!     ├── special       (accinputs, damping, chrono, inout, wavepaddles,
//!     │                  mlayerpistons, relaxationzones, moorings)
//!     └── parameters
//! ```
//!
//! Missing host geometry and incomplete fill-boxes do not abort the export:
//! the element is skipped, a diagnostic is logged and recorded in the
//! [`ExportReport`], and the rest of the document is still produced.

mod casedef;
mod motion;
mod parameters;
mod special;
pub mod xml;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::case::Case;
use crate::config::Config;
use crate::fs::CaseFilesystem;
use crate::geometry::GeometryHost;
use crate::model::{FLUID_LIMIT, FLUID_OFFSET};
use crate::Result;

pub use xml::XmlElement;

/// One skipped or degraded element of an export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportDiagnostic {
    #[error("object '{0}' has no host geometry, skipped")]
    MissingGeometry(String),

    #[error("fill-box '{object}' is missing its {missing} sub-object, skipped")]
    IncompleteFillBox { object: String, missing: String },

    #[error("object '{object}' could not be exported as a mesh: {message}")]
    MeshExport { object: String, message: String },

    #[error("case limits object '{0}' is missing, domain definition left at the origin")]
    MissingCaseLimits(String),

    #[error("mk {0} is a fluid group and cannot carry {1}, skipped")]
    BoundFeatureOnFluid(u32, &'static str),
}

/// Outcome of an export pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub diagnostics: Vec<ExportDiagnostic>,
    /// Relative paths of triangulated fallbacks written during the pass
    pub meshes: Vec<String>,
}

impl ExportReport {
    /// Whether every element of the case made it into the document.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// One line per diagnostic, for display after the pass.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_complete() {
            return "export complete".to_string();
        }
        let lines: Vec<String> = self
            .diagnostics
            .iter()
            .map(|d| format!("  - {d}"))
            .collect();
        format!(
            "export incomplete ({} issues):\n{}",
            self.diagnostics.len(),
            lines.join("\n")
        )
    }

    fn record(&mut self, diagnostic: ExportDiagnostic) {
        warn!(diagnostic = %diagnostic, "Export diagnostic");
        self.diagnostics.push(diagnostic);
    }
}

/// Rendered document plus the report of the pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub document: String,
    pub report: ExportReport,
}

/// Shared state of one export pass.
pub(crate) struct ExportContext<'a> {
    pub case: &'a Case,
    pub host: &'a dyn GeometryHost,
    pub config: &'a Config,
    pub report: ExportReport,
}

impl ExportContext<'_> {
    /// Boundary tag of a real MK, `None` for fluid MKs.
    pub const fn mkbound(real_mk: u32) -> Option<u32> {
        real_mk.checked_sub(FLUID_LIMIT)
    }

    /// Fluid tag of a real MK, `None` for boundary MKs.
    pub const fn mkfluid(real_mk: u32) -> Option<u32> {
        if real_mk < FLUID_LIMIT {
            real_mk.checked_sub(FLUID_OFFSET)
        } else {
            None
        }
    }

    /// Element with an optional human-readable `comment` attribute.
    pub fn commented(&self, element: XmlElement, comment: &str) -> XmlElement {
        if self.config.export.write_comments.as_bool() {
            element.attr("comment", comment)
        } else {
            element
        }
    }

    pub fn record(&mut self, diagnostic: ExportDiagnostic) {
        self.report.record(diagnostic);
    }
}

/// Build the case definition document.
///
/// # Errors
///
/// Returns `Error::MissingMkProperties` if an object's MK has no property
/// record. Missing geometry is reported in the outcome instead.
pub fn export_case(
    case: &Case,
    host: &dyn GeometryHost,
    config: &Config,
) -> Result<ExportOutcome> {
    let mut ctx = ExportContext {
        case,
        host,
        config,
        report: ExportReport::default(),
    };

    let casedef = casedef::casedef(&mut ctx)?;
    let execution = XmlElement::new("execution")
        .child(special::special(&mut ctx))
        .child(parameters::parameters(&ctx));

    let root = XmlElement::new("case")
        .attr("app", &config.export.app_name)
        .child(casedef)
        .child(execution);

    Ok(ExportOutcome {
        document: root.to_document(),
        report: ctx.report,
    })
}

/// Export a case and write the document next to its snapshot.
///
/// # Errors
///
/// Returns an error if the export fails or the document cannot be written.
pub fn write_export(
    case: &Case,
    host: &dyn GeometryHost,
    fs: &dyn CaseFilesystem,
    config: &Config,
) -> Result<(PathBuf, ExportReport)> {
    let outcome = export_case(case, host, config)?;
    let path = config.export_path(&case.path, &case.name);
    fs.write(&path, outcome.document.as_bytes())?;
    info!(
        path = %path.display(),
        complete = outcome.report.is_complete(),
        diagnostics = outcome.report.diagnostics.len(),
        "Wrote case definition"
    );
    Ok((path, outcome.report))
}
