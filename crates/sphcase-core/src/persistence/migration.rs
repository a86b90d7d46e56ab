//! Rename table and field migrations for older snapshots.
//!
//! Both tables are append-only. Every historical rename of a persisted type
//! or field must be recorded here; nothing is inferred.

use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{
    AccelerationInput, AwasConfig, ChronoConfiguration, InletOutletConfiguration,
    MoorDynPlusConfiguration,
};
use crate::persistence::snapshot::ClassRef;

/// Key carrying the persisted class reference of a tagged entity
pub const CLASS_KEY: &str = "class";

/// Redirect of one persisted `(module, type)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRename {
    pub from: (&'static str, &'static str),
    pub to: (&'static str, &'static str),
}

const fn rename(
    from: (&'static str, &'static str),
    to: (&'static str, &'static str),
) -> ClassRename {
    ClassRename { from, to }
}

/// Historical type renames, oldest first.
pub const CLASS_RENAMES: &[ClassRename] = &[
    // protocol 1: the case root
    rename(("case", "CaseData"), ("case", "Case")),
    // protocol 2: motions moved out of the properties module
    rename(("properties::motion", "Movement"), ("motion", "Movement")),
    rename(("properties::motion", "SpecialMovement"), ("motion", "SpecialMovement")),
    rename(("properties::motion", "RectMotion"), ("motion", "RectMotion")),
    rename(("properties::motion", "AccRectMotion"), ("motion", "AccRectMotion")),
    rename(("properties::motion", "RotMotion"), ("motion", "RotMotion")),
    rename(("properties::motion", "AccRotMotion"), ("motion", "AccRotMotion")),
    rename(("properties::motion", "AccCirMotion"), ("motion", "AccCirMotion")),
    rename(("properties::motion", "WaitMotion"), ("motion", "WaitMotion")),
    rename(("properties::motion", "RotSinuMotion"), ("motion", "RotSinuMotion")),
    rename(("properties::motion", "CirSinuMotion"), ("motion", "CirSinuMotion")),
    rename(("properties::motion", "RectSinuMotion"), ("motion", "RectSinuMotion")),
    rename(("properties::wavegen", "WaveGen"), ("wavegen", "WaveGen")),
    rename(("properties::wavegen", "IrregularWaveGen"), ("wavegen", "IrregularWaveGen")),
    rename(("properties::wavegen", "FileGen"), ("wavegen", "FileWaveGen")),
    // protocol 2: flap generators split the piston names
    rename(("wavegen", "WaveGen"), ("wavegen", "RegularPistonWaveGen")),
    rename(("wavegen", "IrregularWaveGen"), ("wavegen", "IrregularPistonWaveGen")),
    rename(("wavegen", "FlapWaveGen"), ("wavegen", "RegularFlapWaveGen")),
    // protocol 3: relaxation zones got their own module
    rename(
        ("relaxation", "RelaxationZoneRegular"),
        ("relaxation_zone", "RegularRelaxationZone"),
    ),
    rename(
        ("relaxation", "RelaxationZoneIrregular"),
        ("relaxation_zone", "IrregularRelaxationZone"),
    ),
    rename(
        ("relaxation", "RelaxationZoneFile"),
        ("relaxation_zone", "FileRelaxationZone"),
    ),
    rename(
        ("relaxation", "RelaxationZoneUniform"),
        ("relaxation_zone", "UniformRelaxationZone"),
    ),
    // protocol 3: mooring connections lost the engine prefix
    rename(("mooring", "MoorDynVessel"), ("mooring", "VesselConnection")),
    rename(("mooring", "MoorDynFix"), ("mooring", "FixConnection")),
    rename(("mooring", "MoorDynConnect"), ("mooring", "ConnectConnection")),
];

/// Resolve a persisted class reference to its current name.
///
/// Lookup is exact on `(module, type)`. Chained renames are followed, at most
/// once per table entry; unmapped references are returned unchanged.
#[must_use]
pub fn resolve_class(class: &ClassRef) -> ClassRef {
    let mut current = class.clone();
    for _ in 0..CLASS_RENAMES.len() {
        let next = CLASS_RENAMES.iter().find(|entry| {
            entry.from.0 == current.module.as_str() && entry.from.1 == current.name.as_str()
        });
        match next {
            Some(entry) => current = ClassRef::new(entry.to.0, entry.to.1),
            None => break,
        }
    }
    current
}

/// Entities a field migration applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationTarget {
    /// Every map tagged with this (current) class
    Class(&'static str),
    /// The map at a JSON pointer inside the case body; `""` is the case itself
    Path(&'static str),
}

/// One field-level change.
#[derive(Debug, Clone, Copy)]
pub enum FieldChange {
    /// Copy `from` to `to` when `to` is absent, then drop `from`
    Rename {
        from: &'static str,
        to: &'static str,
    },
    /// Insert the default when the field is absent
    Default {
        field: &'static str,
        value: fn() -> Value,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMigration {
    pub target: MigrationTarget,
    pub changes: &'static [FieldChange],
}

fn default_awas() -> Value {
    serde_json::to_value(AwasConfig::default()).unwrap_or(Value::Null)
}

fn default_acceleration_input() -> Value {
    serde_json::to_value(AccelerationInput::default()).unwrap_or(Value::Null)
}

fn default_chrono() -> Value {
    serde_json::to_value(ChronoConfiguration::default()).unwrap_or(Value::Null)
}

fn default_inlet_outlet() -> Value {
    serde_json::to_value(InletOutletConfiguration::default()).unwrap_or(Value::Null)
}

fn default_moorings() -> Value {
    serde_json::to_value(MoorDynPlusConfiguration::default()).unwrap_or(Value::Null)
}

const fn default_false() -> Value {
    Value::Bool(false)
}

/// Historical field changes, oldest first.
pub const FIELD_MIGRATIONS: &[FieldMigration] = &[
    FieldMigration {
        target: MigrationTarget::Path(""),
        changes: &[
            FieldChange::Default {
                field: "acceleration_input",
                value: default_acceleration_input,
            },
            FieldChange::Default {
                field: "chrono",
                value: default_chrono,
            },
            FieldChange::Default {
                field: "inlet_outlet",
                value: default_inlet_outlet,
            },
            FieldChange::Default {
                field: "moorings",
                value: default_moorings,
            },
        ],
    },
    FieldMigration {
        target: MigrationTarget::Path("/execution_parameters"),
        changes: &[
            FieldChange::Rename {
                from: "rhopoutmin",
                to: "density_out_min",
            },
            FieldChange::Rename {
                from: "rhopoutmax",
                to: "density_out_max",
            },
            FieldChange::Default {
                field: "dt_all_particles",
                value: default_false,
            },
        ],
    },
    FieldMigration {
        target: MigrationTarget::Class("motion::Movement"),
        changes: &[FieldChange::Rename {
            from: "loop",
            to: "looping",
        }],
    },
    FieldMigration {
        target: MigrationTarget::Class("wavegen::RegularPistonWaveGen"),
        changes: &[FieldChange::Default {
            field: "awas",
            value: default_awas,
        }],
    },
    FieldMigration {
        target: MigrationTarget::Class("wavegen::IrregularPistonWaveGen"),
        changes: &[FieldChange::Default {
            field: "awas",
            value: default_awas,
        }],
    },
];

/// Resolve class renames and apply every field migration to a case body.
pub fn migrate(body: &mut Value) {
    rename_classes(body);
    for migration in FIELD_MIGRATIONS {
        match migration.target {
            MigrationTarget::Path(pointer) => {
                if let Some(Value::Object(map)) = body.pointer_mut(pointer) {
                    apply_changes(map, migration.changes, pointer);
                }
            }
            MigrationTarget::Class(tag) => apply_to_class(body, tag, migration.changes),
        }
    }
}

/// Rewrite every class tag in the tree through the rename table.
fn rename_classes(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(tag)) = map.get_mut(CLASS_KEY) {
                if let Some(class) = ClassRef::parse(tag) {
                    let resolved = resolve_class(&class);
                    if resolved != class {
                        debug!(from = %tag, to = %resolved.tag(), "Resolved renamed class");
                        *tag = resolved.tag();
                    }
                }
            }
            map.values_mut().for_each(rename_classes);
        }
        Value::Array(items) => items.iter_mut().for_each(rename_classes),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn apply_to_class(value: &mut Value, tag: &str, changes: &[FieldChange]) {
    match value {
        Value::Object(map) => {
            if map.get(CLASS_KEY).and_then(Value::as_str) == Some(tag) {
                apply_changes(map, changes, tag);
            }
            map.values_mut()
                .for_each(|child| apply_to_class(child, tag, changes));
        }
        Value::Array(items) => items
            .iter_mut()
            .for_each(|child| apply_to_class(child, tag, changes)),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn apply_changes(map: &mut Map<String, Value>, changes: &[FieldChange], entity: &str) {
    for change in changes {
        match *change {
            FieldChange::Rename { from, to } => {
                if let Some(old) = map.remove(from) {
                    if map.contains_key(to) {
                        debug!(entity, from, to, "Dropped old field, new name present");
                    } else {
                        debug!(entity, from, to, "Renamed field");
                        map.insert(to.to_string(), old);
                    }
                }
            }
            FieldChange::Default { field, value } => {
                if !map.contains_key(field) {
                    debug!(entity, field, "Backfilled field");
                    map.insert(field.to_string(), value());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(module: &str, name: &str) -> ClassRef {
        resolve_class(&ClassRef::new(module, name))
    }

    #[test]
    fn test_every_rename_resolves_to_a_current_class() {
        let current = [
            "case::Case",
            "motion::Movement",
            "motion::SpecialMovement",
            "motion::RectMotion",
            "motion::AccRectMotion",
            "motion::RotMotion",
            "motion::AccRotMotion",
            "motion::AccCirMotion",
            "motion::WaitMotion",
            "motion::RotSinuMotion",
            "motion::CirSinuMotion",
            "motion::RectSinuMotion",
            "wavegen::RegularPistonWaveGen",
            "wavegen::IrregularPistonWaveGen",
            "wavegen::RegularFlapWaveGen",
            "wavegen::FileWaveGen",
            "relaxation_zone::RegularRelaxationZone",
            "relaxation_zone::IrregularRelaxationZone",
            "relaxation_zone::FileRelaxationZone",
            "relaxation_zone::UniformRelaxationZone",
            "mooring::VesselConnection",
            "mooring::FixConnection",
            "mooring::ConnectConnection",
        ];
        for entry in CLASS_RENAMES {
            let resolved = resolve(entry.from.0, entry.from.1).tag();
            assert!(
                current.contains(&resolved.as_str()),
                "{}::{} resolved to unknown class {resolved}",
                entry.from.0,
                entry.from.1
            );
        }
    }

    #[test]
    fn test_case_root_rename() {
        assert_eq!(resolve("case", "CaseData"), ClassRef::case_root());
    }

    #[test]
    fn test_motion_module_rename() {
        assert_eq!(
            resolve("properties::motion", "RotSinuMotion"),
            ClassRef::new("motion", "RotSinuMotion")
        );
    }

    #[test]
    fn test_piston_renames() {
        assert_eq!(
            resolve("wavegen", "WaveGen"),
            ClassRef::new("wavegen", "RegularPistonWaveGen")
        );
        assert_eq!(
            resolve("wavegen", "IrregularWaveGen"),
            ClassRef::new("wavegen", "IrregularPistonWaveGen")
        );
        assert_eq!(
            resolve("wavegen", "FlapWaveGen"),
            ClassRef::new("wavegen", "RegularFlapWaveGen")
        );
    }

    #[test]
    fn test_chained_rename_is_followed() {
        assert_eq!(
            resolve("properties::wavegen", "WaveGen"),
            ClassRef::new("wavegen", "RegularPistonWaveGen")
        );
    }

    #[test]
    fn test_relaxation_renames() {
        assert_eq!(
            resolve("relaxation", "RelaxationZoneUniform"),
            ClassRef::new("relaxation_zone", "UniformRelaxationZone")
        );
        assert_eq!(
            resolve("relaxation", "RelaxationZoneFile"),
            ClassRef::new("relaxation_zone", "FileRelaxationZone")
        );
    }

    #[test]
    fn test_mooring_renames() {
        assert_eq!(
            resolve("mooring", "MoorDynFix"),
            ClassRef::new("mooring", "FixConnection")
        );
        assert_eq!(
            resolve("mooring", "MoorDynConnect"),
            ClassRef::new("mooring", "ConnectConnection")
        );
    }

    #[test]
    fn test_lookup_is_exact_match() {
        assert_eq!(
            resolve("properties", "RectMotion"),
            ClassRef::new("properties", "RectMotion")
        );
        assert_eq!(resolve("wavegen", "wavegen"), ClassRef::new("wavegen", "wavegen"));
    }

    #[test]
    fn test_rename_field_new_name_wins() {
        let mut body = json!({
            "execution_parameters": {"rhopoutmin": 650.0, "density_out_min": 720.0, "rhopoutmax": 1400.0}
        });
        migrate(&mut body);
        let params = &body["execution_parameters"];
        assert_eq!(params["density_out_min"], json!(720.0));
        assert_eq!(params["density_out_max"], json!(1400.0));
        assert!(params.get("rhopoutmin").is_none());
        assert_eq!(params["dt_all_particles"], json!(false));
    }

    #[test]
    fn test_class_targeted_migrations_reach_nested_entities() {
        let mut body = json!({
            "mk_properties": [{
                "movements": [
                    {"class": "properties::motion::Movement", "name": "m", "loop": true, "motion_list": []},
                    {"class": "properties::motion::SpecialMovement", "name": "p",
                     "generator": {"class": "wavegen::WaveGen", "duration": 1.0}}
                ]
            }]
        });
        migrate(&mut body);
        let movements = &body["mk_properties"][0]["movements"];
        assert_eq!(movements[0]["class"], json!("motion::Movement"));
        assert_eq!(movements[0]["looping"], json!(true));
        assert_eq!(
            movements[1]["generator"]["class"],
            json!("wavegen::RegularPistonWaveGen")
        );
        assert_eq!(movements[1]["generator"]["awas"]["enabled"], json!(false));
    }

    #[test]
    fn test_root_backfills_late_features() {
        let mut body = json!({"name": "old"});
        migrate(&mut body);
        assert_eq!(body["acceleration_input"]["enabled"], json!(false));
        assert_eq!(body["moorings"]["enabled"], json!(false));
        assert!(body.get("chrono").is_some());
        assert!(body.get("inlet_outlet").is_some());
    }

    #[test]
    fn test_existing_values_are_not_overwritten() {
        let mut body = json!({"acceleration_input": {"enabled": true, "acclist": []}});
        migrate(&mut body);
        assert_eq!(body["acceleration_input"]["enabled"], json!(true));
    }
}
