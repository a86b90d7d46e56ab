//! Simulation objects: case records for host geometry objects.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::values::{FacesConfiguration, FillMode, ObjectType, Vec3};

/// Offset applied to fluid tags to obtain the real MK.
pub const FLUID_OFFSET: u32 = 0;

/// Number of fluid tags (`fluidcount` of the engine's mkconfig); also the
/// offset applied to non-fluid tags.
pub const FLUID_LIMIT: u32 = 10;

/// Number of boundary tags (`boundcount` of the engine's mkconfig).
pub const BOUND_LIMIT: u32 = 240;

/// Damping zone settings carried by special objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Damping {
    pub enabled: bool,
    pub limitmin: Vec3,
    pub limitmax: Vec3,
    /// Distance after `limitmax` where the maximum reduction applies
    pub overlimit: f64,
    /// Maximum reduction in velocity
    pub redumax: f64,
    pub factorxyz: Vec3,
}

impl Default for Damping {
    fn default() -> Self {
        Self {
            enabled: true,
            limitmin: Vec3::ZERO,
            limitmax: Vec3::ZERO,
            overlimit: 1.0,
            redumax: 10.0,
            factorxyz: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Settings only meaningful for objects loaded from a mesh file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Path of the mesh file, a base name once copied next to the case
    pub file_path: String,
    pub scale: Vec3,
    pub autofill: bool,
    /// Compute mDBC normals from the mesh
    pub use_mdbc_normals: bool,
    pub invert_normals: bool,
}

impl ImportSettings {
    #[must_use]
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            autofill: false,
            use_mdbc_normals: false,
            invert_normals: false,
        }
    }
}

/// A host geometry object taking part in the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationObject {
    /// Name of the host geometry object
    pub name: String,
    pub obj_mk: u32,
    pub object_type: ObjectType,
    pub fillmode: FillMode,
    pub faces_configuration: Option<FacesConfiguration>,
    pub damping: Option<Damping>,
    pub import: Option<ImportSettings>,
}

impl SimulationObject {
    #[must_use]
    pub fn new(name: impl Into<String>, obj_mk: u32, object_type: ObjectType) -> Self {
        Self {
            name: name.into(),
            obj_mk,
            object_type,
            fillmode: FillMode::Full,
            faces_configuration: None,
            damping: None,
            import: None,
        }
    }

    /// Tag limit for an object type.
    #[must_use]
    pub const fn mk_limit(object_type: ObjectType) -> u32 {
        match object_type {
            ObjectType::Fluid => FLUID_LIMIT,
            ObjectType::Bound | ObjectType::Special => BOUND_LIMIT,
        }
    }

    /// Real MK used to key property records and disambiguate fluid tags
    /// from boundary tags.
    #[must_use]
    pub const fn real_mk(&self) -> u32 {
        Self::real_mk_for(self.object_type, self.obj_mk)
    }

    #[must_use]
    pub const fn real_mk_for(object_type: ObjectType, obj_mk: u32) -> u32 {
        match object_type {
            ObjectType::Fluid => obj_mk + FLUID_OFFSET,
            ObjectType::Bound | ObjectType::Special => obj_mk + FLUID_LIMIT,
        }
    }

    /// Check the tag against the engine's mk range for the object type.
    ///
    /// # Errors
    ///
    /// Returns `Error::MkOutOfRange` when the tag is outside the range.
    pub fn validate_mk(&self) -> Result<()> {
        let limit = Self::mk_limit(self.object_type);
        if self.obj_mk >= limit {
            return Err(Error::MkOutOfRange {
                object_type: self.object_type,
                mk: self.obj_mk,
                limit,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_fluid(&self) -> bool {
        self.object_type == ObjectType::Fluid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_mk_offsets() {
        let fluid = SimulationObject::new("Water", 3, ObjectType::Fluid);
        let bound = SimulationObject::new("Tank", 3, ObjectType::Bound);
        assert_eq!(fluid.real_mk(), 3 + FLUID_OFFSET);
        assert_eq!(bound.real_mk(), 3 + FLUID_LIMIT);
        assert_ne!(fluid.real_mk(), bound.real_mk());
    }

    #[test]
    fn test_validate_mk_rejects_out_of_range_fluid() {
        let fluid = SimulationObject::new("Water", FLUID_LIMIT, ObjectType::Fluid);
        assert!(matches!(
            fluid.validate_mk(),
            Err(Error::MkOutOfRange { limit: FLUID_LIMIT, .. })
        ));
    }

    #[test]
    fn test_validate_mk_accepts_last_bound_tag() {
        let bound = SimulationObject::new("Wall", BOUND_LIMIT - 1, ObjectType::Bound);
        assert!(bound.validate_mk().is_ok());
    }
}
