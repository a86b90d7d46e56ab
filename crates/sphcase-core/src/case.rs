//! Case aggregate root.
//!
//! A [`Case`] owns the ordered list of simulation objects, one
//! [`MkBasedProperties`] record per referenced real MK and every case-wide
//! configuration entity.
//!
//! # Invariants
//!
//! 1. Object names are unique within a case
//! 2. Every object's real MK has a property record (created lazily, never removed)
//! 3. Object tags stay inside the engine's mk ranges
//! 4. At most one relaxation zone is active
//!
//! The single current case of an interactive session is held by a
//! [`CaseSession`], passed explicitly to whatever needs it.

use std::path::PathBuf;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    AccelerationInput, CaseInformation, ChronoConfiguration, Constants, Dimension,
    ExecutablePaths, ExecutionParameters, InletOutletConfiguration, MkBasedProperties, MlPiston,
    MoorDynPlusConfiguration, Periodicity, RelaxationZone, SimulationDomain, SimulationObject,
};
use crate::model::mk_properties::MlPiston2D;
use crate::model::wavegen::WaveGen;
use crate::model::MovementEntry;
use crate::values::ObjectType;

/// Root of the case object graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    /// Directory holding the snapshot and the structured export
    pub path: PathBuf,
    /// Particle sampling distance
    pub dp: f64,
    pub dimension: Dimension,
    pub constants: Constants,
    pub execution_parameters: ExecutionParameters,
    objects: Vec<SimulationObject>,
    mk_properties: Vec<MkBasedProperties>,
    pub periodicity: Periodicity,
    pub domain: SimulationDomain,
    pub executable_paths: ExecutablePaths,
    #[serde(skip)]
    pub info: CaseInformation,
    pub acceleration_input: AccelerationInput,
    relaxation_zone: Option<RelaxationZone>,
    pub chrono: ChronoConfiguration,
    pub inlet_outlet: InletOutletConfiguration,
    pub moorings: MoorDynPlusConfiguration,
}

impl Default for Case {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: PathBuf::new(),
            dp: 0.01,
            dimension: Dimension::ThreeD,
            constants: Constants::default(),
            execution_parameters: ExecutionParameters::default(),
            objects: Vec::new(),
            mk_properties: Vec::new(),
            periodicity: Periodicity::default(),
            domain: SimulationDomain::default(),
            executable_paths: ExecutablePaths::default(),
            info: CaseInformation::default(),
            acceleration_input: AccelerationInput::default(),
            relaxation_zone: None,
            chrono: ChronoConfiguration::default(),
            inlet_outlet: InletOutletConfiguration::default(),
            moorings: MoorDynPlusConfiguration::default(),
        }
    }
}

impl Case {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    // ========================================================================
    // OBJECTS
    // ========================================================================

    /// Add an object to the case, creating its MK property record if absent.
    ///
    /// # Errors
    ///
    /// - `Error::NameConflict` if an object with the same name exists
    /// - `Error::MkOutOfRange` if the tag is outside its mk range
    pub fn add_object(&mut self, object: SimulationObject) -> Result<()> {
        if self.is_object_in_simulation(&object.name) {
            return Err(Error::NameConflict(object.name));
        }
        object.validate_mk()?;

        let mk = object.real_mk();
        if !self.has_mk_properties(mk) {
            debug!(mk, object = %object.name, "Creating MK property record");
            self.mk_properties.push(MkBasedProperties::new(mk));
        }
        self.objects.push(object);
        Ok(())
    }

    /// Remove an object. Its MK property record is kept, other objects may
    /// share the MK.
    ///
    /// # Errors
    ///
    /// Returns `Error::ObjectNotFound` if no object has that name.
    pub fn remove_object(&mut self, name: &str) -> Result<SimulationObject> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .map(|index| self.objects.remove(index))
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns `Error::ObjectNotFound` if no object has that name.
    pub fn get_simulation_object(&self, name: &str) -> Result<&SimulationObject> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    /// Mutable access to an object. Changing the tag or type through this
    /// reference must be followed by [`Case::ensure_mk_properties`].
    ///
    /// # Errors
    ///
    /// Returns `Error::ObjectNotFound` if no object has that name.
    pub fn get_simulation_object_mut(&mut self, name: &str) -> Result<&mut SimulationObject> {
        self.objects
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    /// Change the tag of an object, keeping the MK invariant.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if no object has that name
    /// - `Error::MkOutOfRange` if the new tag is outside its mk range
    pub fn set_object_mk(&mut self, name: &str, obj_mk: u32) -> Result<()> {
        let object = self.get_simulation_object_mut(name)?;
        let mut updated = object.clone();
        updated.obj_mk = obj_mk;
        updated.validate_mk()?;
        *object = updated;
        self.ensure_mk_properties();
        Ok(())
    }

    /// Create missing MK property records for every object.
    pub fn ensure_mk_properties(&mut self) {
        let missing: Vec<u32> = self
            .objects
            .iter()
            .map(SimulationObject::real_mk)
            .filter(|mk| !self.has_mk_properties(*mk))
            .collect();
        for mk in missing {
            if !self.has_mk_properties(mk) {
                self.mk_properties.push(MkBasedProperties::new(mk));
            }
        }
    }

    #[must_use]
    pub fn is_object_in_simulation(&self, name: &str) -> bool {
        self.objects.iter().any(|o| o.name == name)
    }

    /// Number of objects, excluding special ones.
    #[must_use]
    pub fn number_of_objects_in_simulation(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| o.object_type != ObjectType::Special)
            .count()
    }

    /// Objects in user-defined export order.
    #[must_use]
    pub fn objects(&self) -> &[SimulationObject] {
        &self.objects
    }

    /// Move an object to a new position of the export order.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if no object has that name
    /// - `Error::InvalidInput` if the position is out of bounds
    pub fn move_object(&mut self, name: &str, position: usize) -> Result<()> {
        if position >= self.objects.len() {
            return Err(Error::InvalidInput(format!(
                "position {position} is outside the object list ({} objects)",
                self.objects.len()
            )));
        }
        let object = self.remove_object(name)?;
        self.objects.insert(position, object);
        Ok(())
    }

    /// First tag not used by objects of that type, scanning upwards from 0.
    /// Returns 0 when every tag is taken.
    ///
    /// Bound and special objects map onto the same real MK range, so a bound
    /// object and a special object with the same tag share one property
    /// record. The scan only looks at objects of `object_type`; pick the tag
    /// explicitly to keep a special object off a boundary group.
    #[must_use]
    pub fn get_first_mk_not_used(&self, object_type: ObjectType) -> u32 {
        let limit = SimulationObject::mk_limit(object_type);
        (0..limit)
            .find(|mk| {
                !self
                    .objects
                    .iter()
                    .any(|o| o.object_type == object_type && o.obj_mk == *mk)
            })
            .unwrap_or(0)
    }

    #[must_use]
    pub fn get_all_objects_with_damping(&self) -> Vec<&SimulationObject> {
        self.objects.iter().filter(|o| o.damping.is_some()).collect()
    }

    // ========================================================================
    // MK PROPERTIES
    // ========================================================================

    #[must_use]
    pub fn has_mk_properties(&self, mk: u32) -> bool {
        self.mk_properties.iter().any(|p| p.mk == mk)
    }

    /// Property record of a real MK.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingMkProperties` if the record does not exist, which
    /// means an earlier invariant violation.
    pub fn get_mk_base_properties(&self, mk: u32) -> Result<&MkBasedProperties> {
        self.mk_properties
            .iter()
            .find(|p| p.mk == mk)
            .ok_or(Error::MissingMkProperties(mk))
    }

    /// # Errors
    ///
    /// Returns `Error::MissingMkProperties` if the record does not exist.
    pub fn get_mk_base_properties_mut(&mut self, mk: u32) -> Result<&mut MkBasedProperties> {
        self.mk_properties
            .iter_mut()
            .find(|p| p.mk == mk)
            .ok_or(Error::MissingMkProperties(mk))
    }

    /// Property records in creation order.
    #[must_use]
    pub fn mk_properties(&self) -> &[MkBasedProperties] {
        &self.mk_properties
    }

    /// Property records sorted by real MK.
    #[must_use]
    pub fn mk_properties_sorted(&self) -> Vec<&MkBasedProperties> {
        self.mk_properties.iter().sorted_by_key(|p| p.mk).collect()
    }

    /// # Errors
    ///
    /// Returns `Error::MissingMkProperties` if the record does not exist.
    pub fn remove_all_movements(&mut self, mk: u32) -> Result<()> {
        self.get_mk_base_properties_mut(mk)
            .map(MkBasedProperties::remove_all_movements)
    }

    // ========================================================================
    // RELAXATION ZONE
    // ========================================================================

    /// Replace the active relaxation zone, returning the previous one.
    pub fn set_relaxation_zone(&mut self, zone: RelaxationZone) -> Option<RelaxationZone> {
        self.relaxation_zone.replace(zone)
    }

    pub fn clear_relaxation_zone(&mut self) -> Option<RelaxationZone> {
        self.relaxation_zone.take()
    }

    #[must_use]
    pub const fn relaxation_zone(&self) -> Option<&RelaxationZone> {
        self.relaxation_zone.as_ref()
    }

    pub fn relaxation_zone_mut(&mut self) -> Option<&mut RelaxationZone> {
        self.relaxation_zone.as_mut()
    }

    // ========================================================================
    // AUXILIARY FILES
    // ========================================================================

    /// Every in-model reference to an auxiliary data file, in a stable order.
    pub fn auxiliary_files_mut(&mut self) -> Vec<&mut String> {
        let mut files: Vec<&mut String> = Vec::new();

        for entry in &mut self.acceleration_input.acclist {
            files.push(&mut entry.datafile);
        }

        for props in &mut self.mk_properties {
            for movement in &mut props.movements {
                if let MovementEntry::Special(special) = movement {
                    match &mut special.generator {
                        WaveGen::File(generator) => files.push(&mut generator.filename),
                        WaveGen::RotationFile(generator) => files.push(&mut generator.filename),
                        WaveGen::RegularPiston(_)
                        | WaveGen::IrregularPiston(_)
                        | WaveGen::RegularFlap(_)
                        | WaveGen::IrregularFlap(_) => {}
                    }
                }
            }
            match &mut props.mlayerpiston {
                Some(MlPiston::OneDimensional(piston)) => files.push(&mut piston.filevelx),
                Some(MlPiston::TwoDimensional(MlPiston2D { veldata, .. })) => {
                    for layer in veldata {
                        files.push(&mut layer.filevelx);
                    }
                }
                None => {}
            }
        }

        if let Some(RelaxationZone::File(zone)) = &mut self.relaxation_zone {
            files.push(&mut zone.filesvel);
        }

        files.retain(|path| !path.is_empty());
        files
    }
}

// ============================================================================
// CASE SESSION
// ============================================================================

/// Holder of the single current case of an interactive session.
///
/// Re-creating the case is an explicit [`CaseSession::reset`] or
/// [`CaseSession::replace`]; the session itself lives for the whole program.
#[derive(Debug, Default)]
pub struct CaseSession {
    case: Case,
}

impl CaseSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_case(case: Case) -> Self {
        Self { case }
    }

    #[must_use]
    pub const fn case(&self) -> &Case {
        &self.case
    }

    pub fn case_mut(&mut self) -> &mut Case {
        &mut self.case
    }

    /// Reinitialize the current case to defaults.
    pub fn reset(&mut self) {
        debug!(previous = %self.case.name, "Resetting case");
        self.case = Case::default();
    }

    /// Install a loaded case, returning the previous one.
    pub fn replace(&mut self, case: Case) -> Case {
        std::mem::replace(&mut self.case, case)
    }
}
