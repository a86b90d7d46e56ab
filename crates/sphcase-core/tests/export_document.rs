//! End-to-end tests of the case definition document.
//!
//! Cases are built through the public API, exported against an in-memory
//! host geometry, and checked on the rendered document and the report.

#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sphcase_core::geometry::{FILL_LIMIT_LABEL, FILL_POINT_LABEL};
use sphcase_core::model::wavegen::RegularPistonWaveGen;
use sphcase_core::model::{
    BaseMotion, Movement, MovementEntry, RegularRelaxationZone, RelaxationZone, SimulationObject,
    SpecialMovement, UniformRelaxationZone, WaveGen,
};
use sphcase_core::{
    export_case, load_case, save_case, write_export, AutoValue, Case, CaseFilesystem, Config,
    Error, ExportDiagnostic, HostObject, HostShape, InMemoryGeometry, ObjectType, Placement,
    Result, Vec3,
};

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

/// Filesystem that keeps every file in memory.
#[derive(Default)]
struct MemoryFs {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryFs {
    fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path).cloned())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl CaseFilesystem for MemoryFs {
    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| Error::Host(e.to_string()))?;
        let bytes = files
            .get(from)
            .cloned()
            .ok_or_else(|| Error::FileNotFound(from.to_path_buf()))?;
        let len = bytes.len() as u64;
        files.insert(to.to_path_buf(), bytes);
        Ok(len)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .lock()
            .map_err(|e| Error::Host(e.to_string()))?
            .get(path)
            .cloned()
            .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.files
            .lock()
            .map_err(|e| Error::Host(e.to_string()))?
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

fn unit_box(name: &str, base: Vec3) -> HostObject {
    HostObject::new(
        name,
        HostShape::Box {
            length: 1.0,
            width: 1.0,
            height: 1.0,
        },
        Placement::at(base),
    )
}

fn tank_geometry() -> InMemoryGeometry {
    let mut host = InMemoryGeometry::new();
    host.insert(HostObject::new(
        "case_limits",
        HostShape::Box {
            length: 4.0,
            width: 2.0,
            height: 3.0,
        },
        Placement::at(Vec3::new(-1.0, -1.0, 0.0)),
    ));
    host.insert(unit_box("Water", Vec3::ZERO));
    host.insert(unit_box("Tank", Vec3::new(0.0, 0.0, -0.1)));
    host.insert(unit_box("Paddle", Vec3::new(2.0, 0.0, 0.0)));
    host
}

fn tank_case() -> Result<Case> {
    let mut case = Case::new("tank");
    case.path = PathBuf::from("/cases/tank");
    case.add_object(SimulationObject::new("Water", 0, ObjectType::Fluid))?;
    case.add_object(SimulationObject::new("Tank", 0, ObjectType::Bound))?;
    case.add_object(SimulationObject::new("Paddle", 1, ObjectType::Bound))?;
    Ok(case)
}

/// Movement of a rectilinear, a wait and a second rectilinear motion.
fn three_step_movement(looping: bool) -> Result<Movement> {
    let mut movement = Movement::new("ABC");
    movement.add_motion(BaseMotion::rect(1.0, Vec3::new(1.0, 0.0, 0.0)))?;
    movement.add_motion(BaseMotion::wait(0.5))?;
    movement.add_motion(BaseMotion::rect(2.0, Vec3::new(-1.0, 0.0, 0.0)))?;
    movement.set_loop(looping);
    Ok(movement)
}

fn document(case: &Case) -> Result<String> {
    Ok(export_case(case, &tank_geometry(), &Config::default())?.document)
}

fn uncommented_document(case: &Case) -> Result<String> {
    let mut config = Config::default();
    config.export.write_comments = false.into();
    Ok(export_case(case, &tank_geometry(), &config)?.document)
}

/// Byte offset of the first occurrence of `needle`.
fn offset(doc: &str, needle: &str) -> usize {
    doc.find(needle).unwrap_or(usize::MAX)
}

// ═══════════════════════════════════════════════════════════════════════════
// DOCUMENT SHAPE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_is_deterministic() -> Result<()> {
    let mut case = tank_case()?;
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Movement(three_step_movement(true)?));

    let first = document(&case)?;
    let second = document(&case.clone())?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_complete_case_has_no_diagnostics() -> Result<()> {
    let outcome = export_case(&tank_case()?, &tank_geometry(), &Config::default())?;
    assert!(outcome.report.is_complete(), "{}", outcome.report.summary());
    assert!(outcome.document.starts_with("<?xml"));
    assert!(outcome.document.contains("<setmkfluid mk=\"0\""));
    assert!(outcome.document.contains("<setmkbound mk=\"1\""));
    assert!(outcome.document.contains("<mkconfig boundcount=\"240\" fluidcount=\"10\""));
    Ok(())
}

#[test]
fn test_sections_follow_fixed_order() -> Result<()> {
    let mut case = tank_case()?;
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Movement(three_step_movement(true)?));

    let doc = document(&case)?;
    let order = [
        "<constantsdef",
        "<mkconfig",
        "<geometry",
        "<initials",
        "<floatings",
        "<motion",
        "<special",
        "<parameters",
    ];
    let offsets: Vec<usize> = order.iter().map(|tag| offset(&doc, tag)).collect();
    assert!(offsets.iter().all(|&o| o != usize::MAX), "{offsets:?}");
    assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{offsets:?}");
    Ok(())
}

#[test]
fn test_geometry_follows_user_order() -> Result<()> {
    let mut case = tank_case()?;
    let before = document(&case)?;
    assert!(offset(&before, "<setmkfluid mk=\"0\"") < offset(&before, "<setmkbound mk=\"1\""));

    case.move_object("Paddle", 0)?;
    let doc = document(&case)?;
    let paddle = offset(&doc, "<setmkbound mk=\"1\"");
    let water = offset(&doc, "<setmkfluid mk=\"0\"");
    let tank = offset(&doc, "<setmkbound mk=\"0\"");
    assert!(paddle < water && water < tank, "{paddle} {water} {tank}");
    Ok(())
}

#[test]
fn test_auto_constants_are_marked_and_explicit_ones_are_not() -> Result<()> {
    let mut case = tank_case()?;
    case.constants.hswl = AutoValue::auto(0.0);
    case.constants.speedsystem = AutoValue::explicit(12.5);

    let doc = uncommented_document(&case)?;
    assert!(doc.contains("<hswl value=\"0\" auto=\"true\" />"));
    assert!(doc.contains("<speedsystem value=\"12.5\" />"));
    Ok(())
}

#[test]
fn test_auto_timesteps_are_commented_out() -> Result<()> {
    let mut case = tank_case()?;
    case.execution_parameters.dt_ini = AutoValue::explicit(0.0002);
    case.execution_parameters.dt_min = AutoValue::auto(0.000_01);

    let doc = uncommented_document(&case)?;
    assert!(doc.contains("<parameter key=\"DtIni\" value=\"0.0002\" />"));
    assert!(doc.contains("<parameter key=\"#DtMin\" value=\"0.00001\" />"));
    assert!(!doc.contains("key=\"#DtIni\""));
    assert!(!doc.contains("key=\"DtMin\""));
    Ok(())
}

#[test]
fn test_empty_movement_emits_no_objreal() -> Result<()> {
    let mut case = tank_case()?;
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Movement(Movement::new("Empty")));

    let doc = document(&case)?;
    assert!(!doc.contains("<objreal"));
    assert!(!doc.contains("<begin"));
    Ok(())
}

#[test]
fn test_mesh_fallback_stays_inside_mesh_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut host = tank_geometry();
    host.insert(HostObject::new(
        "../Hull",
        HostShape::Mesh { facets: Vec::new() },
        Placement::default(),
    ));

    let mut case = tank_case()?;
    case.path = dir.path().join("case");
    case.add_object(SimulationObject::new("../Hull", 2, ObjectType::Bound))?;

    let outcome = export_case(&case, &host, &Config::default())?;
    assert!(outcome.report.is_complete(), "{}", outcome.report.summary());
    assert_eq!(outcome.report.meshes, vec!["meshes/.._Hull.stl".to_string()]);
    assert!(case.path.join("meshes").join(".._Hull.stl").exists());
    assert!(!case.path.join("Hull.stl").exists());
    Ok(())
}

#[test]
fn test_looping_movement_closes_the_cycle() -> Result<()> {
    let mut case = tank_case()?;
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Movement(three_step_movement(true)?));

    let doc = document(&case)?;
    assert!(doc.contains("<objreal ref=\"1\">"));
    assert!(doc.contains("id=\"1\" duration=\"1\" next=\"2\""));
    assert!(doc.contains("id=\"2\" duration=\"0.5\" next=\"3\""));
    assert!(doc.contains("id=\"3\" duration=\"2\" next=\"1\""));
    Ok(())
}

#[test]
fn test_non_looping_movement_ends_without_next() -> Result<()> {
    let mut case = tank_case()?;
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Movement(three_step_movement(false)?));

    let doc = document(&case)?;
    assert!(doc.contains("id=\"3\" duration=\"2\">"));
    assert!(!doc.contains("next=\"1\""));
    Ok(())
}

#[test]
fn test_single_looping_motion_points_to_itself() -> Result<()> {
    let mut case = tank_case()?;
    let mut movement = Movement::new("Hold");
    movement.add_motion(BaseMotion::wait(3.0))?;
    movement.set_loop(true);
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Movement(movement));

    let doc = document(&case)?;
    assert!(doc.contains("<wait id=\"1\" duration=\"3\" next=\"1\" />"));
    Ok(())
}

#[test]
fn test_movement_on_fluid_mk_is_reported() -> Result<()> {
    let mut case = tank_case()?;
    case.get_mk_base_properties_mut(0)?
        .add_movement(MovementEntry::Movement(three_step_movement(true)?));

    let outcome = export_case(&case, &tank_geometry(), &Config::default())?;
    assert!(outcome
        .report
        .diagnostics
        .contains(&ExportDiagnostic::BoundFeatureOnFluid(0, "movements")));
    assert!(!outcome.document.contains("<objreal"));
    Ok(())
}

#[test]
fn test_relaxation_zone_is_exclusive() -> Result<()> {
    let mut case = tank_case()?;
    case.set_relaxation_zone(RelaxationZone::Regular(RegularRelaxationZone::default()));
    let replaced =
        case.set_relaxation_zone(RelaxationZone::Uniform(UniformRelaxationZone::default()));
    assert!(matches!(replaced, Some(RelaxationZone::Regular(_))));

    let doc = document(&case)?;
    assert_eq!(doc.matches("<relaxationzones>").count(), 1);
    assert!(doc.contains("<rzwaves_uniform"));
    assert!(!doc.contains("<rzwaves_regular"));
    Ok(())
}

#[test]
fn test_awas_correction_disabled_is_underscored() -> Result<()> {
    let mut case = tank_case()?;
    let mut generator = RegularPistonWaveGen::default();
    generator.awas.enabled = true;
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Special(SpecialMovement::new(
            "Piston",
            WaveGen::RegularPiston(generator),
        )));

    let doc = document(&case)?;
    assert!(doc.contains("<piston>"));
    assert!(doc.contains("<awas_zsurf>"));
    assert!(doc.contains("<_correction coefstroke=\"1.8\""));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// PARTIAL FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_geometry_keeps_rest_of_document() -> Result<()> {
    let mut case = tank_case()?;
    case.add_object(SimulationObject::new("Ghost", 2, ObjectType::Bound))?;

    let outcome = export_case(&case, &tank_geometry(), &Config::default())?;
    assert_eq!(
        outcome.report.diagnostics,
        vec![ExportDiagnostic::MissingGeometry("Ghost".to_string())]
    );
    assert!(!outcome.document.contains("<setmkbound mk=\"2\""));
    assert!(outcome.document.contains("<setmkbound mk=\"1\""));
    assert!(outcome.document.contains("<parameters>"));
    Ok(())
}

#[test]
fn test_fill_box_without_point_is_reported() -> Result<()> {
    let mut case = tank_case()?;
    case.add_object(SimulationObject::new("Filler", 1, ObjectType::Fluid))?;

    let mut host = tank_geometry();
    let mut group = HostObject::new("Filler", HostShape::Group, Placement::default());
    let mut limit = unit_box("FillerLimit", Vec3::ZERO);
    limit.label = format!("{FILL_LIMIT_LABEL}001");
    group.children.push(limit);
    host.insert(group);

    let outcome = export_case(&case, &host, &Config::default())?;
    assert_eq!(
        outcome.report.diagnostics,
        vec![ExportDiagnostic::IncompleteFillBox {
            object: "Filler".to_string(),
            missing: FILL_POINT_LABEL.to_string(),
        }]
    );
    assert!(!outcome.document.contains("<fillbox"));
    Ok(())
}

#[test]
fn test_fill_box_with_limit_and_point() -> Result<()> {
    let mut case = tank_case()?;
    case.add_object(SimulationObject::new("Filler", 1, ObjectType::Fluid))?;

    let mut host = tank_geometry();
    let mut group = HostObject::new("Filler", HostShape::Group, Placement::default());
    let mut limit = unit_box("FillerLimit", Vec3::ZERO);
    limit.label = FILL_LIMIT_LABEL.to_string();
    let mut point = HostObject::new(
        "FillerPoint",
        HostShape::Sphere { radius: 0.1 },
        Placement::at(Vec3::new(0.5, 0.5, 0.5)),
    );
    point.label = FILL_POINT_LABEL.to_string();
    group.children.extend([limit, point]);
    host.insert(group);

    let outcome = export_case(&case, &host, &Config::default())?;
    assert!(outcome.report.is_complete(), "{}", outcome.report.summary());
    assert!(outcome.document.contains("<fillbox"));
    Ok(())
}

#[test]
fn test_missing_case_limits_is_reported() -> Result<()> {
    let mut host = InMemoryGeometry::new();
    host.insert(unit_box("Water", Vec3::ZERO));

    let mut case = Case::new("bare");
    case.add_object(SimulationObject::new("Water", 0, ObjectType::Fluid))?;

    let outcome = export_case(&case, &host, &Config::default())?;
    assert_eq!(
        outcome.report.diagnostics,
        vec![ExportDiagnostic::MissingCaseLimits("case_limits".to_string())]
    );
    assert!(outcome.document.contains("<pointmin x=\"0\" y=\"0\" z=\"0\""));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKFLOW OVER AN IN-MEMORY FILESYSTEM
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_write_export_stores_document_at_export_path() -> Result<()> {
    let fs = MemoryFs::default();
    let config = Config::default();
    let case = tank_case()?;

    let (path, report) = write_export(&case, &tank_geometry(), &fs, &config)?;

    assert_eq!(path, config.export_path(&case.path, &case.name));
    assert!(report.is_complete());
    assert_eq!(fs.contents(&path), Some(document(&case)?));
    Ok(())
}

#[test]
fn test_save_then_load_through_memory_fs() -> Result<()> {
    let fs = MemoryFs::default();
    let config = Config::default();
    let mut case = tank_case()?;
    case.get_mk_base_properties_mut(11)?
        .add_movement(MovementEntry::Movement(three_step_movement(true)?));

    let report = save_case(&mut case, &tank_geometry(), &fs, &config)?;
    assert!(report.export.is_complete());
    assert!(fs.exists(&report.snapshot_path));
    assert!(fs.exists(&report.export_path));

    let loaded = load_case(&case.path, &fs, &config)?;
    assert_eq!(loaded.objects(), case.objects());
    assert_eq!(loaded.mk_properties(), case.mk_properties());
    Ok(())
}
