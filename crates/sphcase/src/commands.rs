//! Command handlers.
//!
//! Each handler returns the process exit code on success; errors propagate to
//! `main`, which maps core errors to their own exit codes.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sphcase_core::geometry::GEOMETRY_DOCUMENT;
use sphcase_core::model::{Dimension, SimulationObject};
use sphcase_core::{
    load_case, save_case, write_export, Case, CaseFilesystem, Config, Error, InMemoryGeometry,
    LocalFilesystem, ObjectType, SaveReport,
};
use tracing::debug;

use crate::cli::{Commands, Kind};

/// Exit code of an export that skipped part of the case.
pub const EXIT_EXPORT_INCOMPLETE: i32 = 5;

pub fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Init {
            dir,
            name,
            two_d,
            dp,
        } => init(&dir, name, two_d, dp),
        Commands::Add {
            dir,
            object,
            kind,
            mk,
        } => add(&dir, object, kind, mk),
        Commands::Inspect { dir, json } => inspect(&dir, json),
        Commands::Export { dir, geometry } => export(&dir, geometry.as_deref()),
        Commands::Save { dir, geometry } => save(&dir, geometry.as_deref()),
    }
}

fn load_config(dir: &Path) -> Result<Config> {
    Config::load(Some(dir)).context("Failed to load configuration")
}

/// Geometry document of a case. The default document is optional; an
/// explicitly requested one must exist.
fn load_geometry(dir: &Path, explicit: Option<&Path>) -> Result<InMemoryGeometry> {
    let path = explicit.map_or_else(|| dir.join(GEOMETRY_DOCUMENT), Path::to_path_buf);
    match LocalFilesystem.read(&path) {
        Ok(bytes) => Ok(InMemoryGeometry::from_json(&bytes)?),
        Err(Error::FileNotFound(_)) if explicit.is_none() => {
            debug!(path = %path.display(), "No geometry document, exporting without host geometry");
            Ok(InMemoryGeometry::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_save_report(report: &SaveReport) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "snapshot: {}", report.snapshot_path.display())?;
    writeln!(out, "export:   {}", report.export_path.display())?;
    for file in &report.copied {
        writeln!(out, "copied:   {file}")?;
    }
    for failure in &report.copy_failures {
        writeln!(out, "not copied: {} ({})", failure.source, failure.message)?;
    }
    writeln!(out, "{}", report.export.summary())?;
    Ok(())
}

fn exit_code_for(complete: bool) -> i32 {
    if complete {
        0
    } else {
        EXIT_EXPORT_INCOMPLETE
    }
}

fn init(dir: &Path, name: Option<String>, two_d: Option<f64>, dp: Option<f64>) -> Result<i32> {
    let config = load_config(dir)?;
    let name = match name {
        Some(name) => name,
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("Cannot derive a case name from the directory; pass --name")?,
    };

    if LocalFilesystem.exists(&config.snapshot_path(dir)) {
        return Err(Error::InvalidInput(format!(
            "{} already holds a case",
            dir.display()
        ))
        .into());
    }

    let mut case = Case::new(name);
    case.path = dir.to_path_buf();
    if let Some(y) = two_d {
        case.dimension = Dimension::TwoD { y };
    }
    if let Some(dp) = dp {
        if !(dp.is_finite() && dp > 0.0) {
            return Err(Error::InvalidInput(format!("dp must be positive, got {dp}")).into());
        }
        case.dp = dp;
    }
    case.executable_paths.gencase.clone_from(&config.executables.gencase);
    case.executable_paths
        .dualsphysics
        .clone_from(&config.executables.dualsphysics);

    let geometry = load_geometry(dir, None)?;
    let report = save_case(&mut case, &geometry, &LocalFilesystem, &config)?;
    print_save_report(&report)?;
    Ok(0)
}

fn add(dir: &Path, object: String, kind: Kind, mk: Option<u32>) -> Result<i32> {
    let config = load_config(dir)?;
    let mut case = load_case(dir, &LocalFilesystem, &config)?;

    let object_type = ObjectType::from(kind);
    let mk = mk.unwrap_or_else(|| case.get_first_mk_not_used(object_type));
    case.add_object(SimulationObject::new(object.clone(), mk, object_type))?;

    let geometry = load_geometry(dir, None)?;
    let report = save_case(&mut case, &geometry, &LocalFilesystem, &config)?;
    writeln!(
        std::io::stdout().lock(),
        "added {object} as {object_type} mk {mk}"
    )?;
    print_save_report(&report)?;
    Ok(exit_code_for(report.export.is_complete()))
}

fn inspect(dir: &Path, json: bool) -> Result<i32> {
    let config = load_config(dir)?;
    let case = load_case(dir, &LocalFilesystem, &config)?;
    let mut out = std::io::stdout().lock();

    if json {
        let rendered =
            serde_json::to_string_pretty(&case).context("Failed to render case as JSON")?;
        writeln!(out, "{rendered}")?;
        return Ok(0);
    }

    let dimension = match case.dimension {
        Dimension::ThreeD => "3D".to_string(),
        Dimension::TwoD { y } => format!("2D (y = {y})"),
    };
    writeln!(out, "case:      {}", case.name)?;
    writeln!(out, "directory: {}", case.path.display())?;
    writeln!(out, "dimension: {dimension}")?;
    writeln!(out, "dp:        {}", case.dp)?;
    writeln!(out, "objects:   {}", case.number_of_objects_in_simulation())?;
    for object in case.objects() {
        writeln!(
            out,
            "  {:<24} {:<8} mk {:>3} (real {})",
            object.name,
            object.object_type,
            object.obj_mk,
            object.real_mk()
        )?;
    }
    for props in case.mk_properties_sorted() {
        let mut features = Vec::new();
        if props.float_property.is_some() {
            features.push("floating");
        }
        if props.initials.is_some() {
            features.push("initials");
        }
        if props.bound_normals.is_some() {
            features.push("normals");
        }
        if props.has_movements() {
            features.push("movements");
        }
        if props.mlayerpiston.is_some() {
            features.push("mlpiston");
        }
        if !features.is_empty() {
            writeln!(out, "  mk {:>3}: {}", props.mk, features.join(", "))?;
        }
    }
    if let Some(zone) = case.relaxation_zone() {
        writeln!(out, "relaxation zone: {}", zone.kind())?;
    }
    Ok(0)
}

fn export(dir: &Path, geometry: Option<&Path>) -> Result<i32> {
    let config = load_config(dir)?;
    let case = load_case(dir, &LocalFilesystem, &config)?;
    let geometry = load_geometry(dir, geometry)?;

    let (path, report) = write_export(&case, &geometry, &LocalFilesystem, &config)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "export: {}", path.display())?;
    writeln!(out, "{}", report.summary())?;
    Ok(exit_code_for(report.is_complete()))
}

fn save(dir: &Path, geometry: Option<&Path>) -> Result<i32> {
    let config = load_config(dir)?;
    let mut case = load_case(dir, &LocalFilesystem, &config)?;
    let geometry = load_geometry(dir, geometry)?;

    let report = save_case(&mut case, &geometry, &LocalFilesystem, &config)?;
    print_save_report(&report)?;
    Ok(exit_code_for(report.export.is_complete()))
}

/// Case directory argument resolved against the working directory.
pub fn absolute(dir: PathBuf) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir);
    }
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    Ok(cwd.join(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_optional() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let geometry = load_geometry(dir.path(), None)?;
        assert!(geometry.objects.is_empty());
        Ok(())
    }

    #[test]
    fn test_explicit_geometry_must_exist() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("elsewhere.json");
        let result = load_geometry(dir.path(), Some(&missing));
        let code = result
            .err()
            .and_then(|e| e.downcast_ref::<Error>().map(Error::exit_code));
        assert_eq!(code, Some(3));
        Ok(())
    }

    #[test]
    fn test_init_add_inspect() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let case_dir = dir.path().join("dam");
        assert_eq!(init(&case_dir, None, None, None)?, 0);
        assert!(init(&case_dir, None, None, None).is_err());

        add(&case_dir, "Water".to_string(), Kind::Fluid, None)?;
        add(&case_dir, "Tank".to_string(), Kind::Bound, None)?;

        let case = load_case(&case_dir, &LocalFilesystem, &Config::default())?;
        assert_eq!(case.name, "dam");
        assert_eq!(case.number_of_objects_in_simulation(), 2);
        assert_eq!(inspect(&case_dir, false)?, 0);
        Ok(())
    }

    #[test]
    fn test_export_without_geometry_is_incomplete() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let case_dir = dir.path().join("tank");
        init(&case_dir, None, None, None)?;
        add(&case_dir, "Water".to_string(), Kind::Fluid, Some(0))?;
        assert_eq!(export(&case_dir, None)?, EXIT_EXPORT_INCOMPLETE);
        Ok(())
    }
}
