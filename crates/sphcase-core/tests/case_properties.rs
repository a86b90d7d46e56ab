//! Property-based tests for Case aggregate invariants.
//!
//! Invariants tested:
//! - Every object's real MK has exactly one property record
//! - Fluid and boundary tags never share a real MK
//! - The first unused tag is the smallest gap in the used set
//! - Failed operations leave the case unchanged

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::collections::HashSet;

use proptest::prelude::*;
use sphcase_core::model::{SimulationObject, BOUND_LIMIT, FLUID_LIMIT};
use sphcase_core::{Case, Error, ObjectType};

fn case_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 256,
        ..ProptestConfig::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STRATEGIES
// ═══════════════════════════════════════════════════════════════════════════

fn object_type_strategy() -> impl Strategy<Value = ObjectType> {
    prop_oneof![
        Just(ObjectType::Fluid),
        Just(ObjectType::Bound),
        Just(ObjectType::Special),
    ]
}

/// Objects with unique names and in-range tags.
fn objects_strategy() -> impl Strategy<Value = Vec<SimulationObject>> {
    proptest::collection::vec((object_type_strategy(), 0..FLUID_LIMIT), 0..24).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (object_type, mk))| {
                    SimulationObject::new(format!("Object{i:03}"), mk, object_type)
                })
                .collect()
        },
    )
}

fn build_case(objects: &[SimulationObject]) -> Result<Case, Error> {
    let mut case = Case::new("prop");
    for object in objects {
        case.add_object(object.clone())?;
    }
    Ok(case)
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(case_config())]

    #[test]
    fn prop_every_object_has_one_mk_record(objects in objects_strategy()) {
        let case = build_case(&objects)?;
        for object in case.objects() {
            let count = case
                .mk_properties()
                .iter()
                .filter(|p| p.mk == object.real_mk())
                .count();
            prop_assert_eq!(count, 1);
        }
    }

    #[test]
    fn prop_fluid_and_bound_real_mks_never_collide(
        fluid_mk in 0..FLUID_LIMIT,
        bound_mk in 0..BOUND_LIMIT,
    ) {
        let fluid = SimulationObject::new("Water", fluid_mk, ObjectType::Fluid);
        let bound = SimulationObject::new("Wall", bound_mk, ObjectType::Bound);
        prop_assert_ne!(fluid.real_mk(), bound.real_mk());
    }

    #[test]
    fn prop_first_unused_is_smallest_gap(used in proptest::collection::hash_set(0..20_u32, 0..15)) {
        let mut case = Case::new("gaps");
        for mk in &used {
            case.add_object(SimulationObject::new(format!("Wall{mk}"), *mk, ObjectType::Bound))?;
        }
        let expected = (0..BOUND_LIMIT).find(|mk| !used.contains(mk)).unwrap_or(0);
        prop_assert_eq!(case.get_first_mk_not_used(ObjectType::Bound), expected);
    }

    #[test]
    fn prop_added_object_is_returned_unchanged(
        object_type in object_type_strategy(),
        mk in 0..FLUID_LIMIT,
        name in "[A-Za-z][A-Za-z0-9_]{0,16}",
    ) {
        let mut case = Case::new("lookup");
        let object = SimulationObject::new(name.clone(), mk, object_type);
        case.add_object(object.clone())?;
        prop_assert_eq!(case.get_simulation_object(&name)?, &object);
    }

    #[test]
    fn prop_failed_add_leaves_case_unchanged(objects in objects_strategy()) {
        prop_assume!(!objects.is_empty());
        let mut case = build_case(&objects)?;
        let before = case.clone();

        let duplicate = objects[0].clone();
        let result = case.add_object(duplicate);
        prop_assert!(matches!(result, Err(Error::NameConflict(_))));
        prop_assert_eq!(&case, &before);

        let out_of_range = SimulationObject::new("Overflow", FLUID_LIMIT, ObjectType::Fluid);
        prop_assert!(matches!(case.add_object(out_of_range), Err(Error::MkOutOfRange { .. })), "expected MkOutOfRange error");
        prop_assert_eq!(&case, &before);
    }

    #[test]
    fn prop_remove_keeps_records_for_shared_mks(objects in objects_strategy()) {
        prop_assume!(!objects.is_empty());
        let mut case = build_case(&objects)?;
        let records_before: HashSet<u32> = case.mk_properties().iter().map(|p| p.mk).collect();

        case.remove_object(&objects[0].name)?;

        let records_after: HashSet<u32> = case.mk_properties().iter().map(|p| p.mk).collect();
        prop_assert_eq!(records_before, records_after);
        prop_assert!(!case.is_object_in_simulation(&objects[0].name));
    }
}

#[test]
fn test_first_unused_fills_gap() -> Result<(), Error> {
    let mut case = Case::new("gap");
    for (name, mk) in [("A", 0), ("B", 1), ("C", 3)] {
        case.add_object(SimulationObject::new(name, mk, ObjectType::Bound))?;
    }
    assert_eq!(case.get_first_mk_not_used(ObjectType::Bound), 2);
    assert_eq!(case.get_first_mk_not_used(ObjectType::Fluid), 0);
    Ok(())
}
