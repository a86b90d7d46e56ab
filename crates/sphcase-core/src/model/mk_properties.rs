//! Properties attached to a real MK.
//!
//! One record exists per real MK referenced by any simulation object. It holds
//! at most one of each property kind plus the ordered movement list.

use serde::{Deserialize, Serialize};

use crate::model::motion::MovementEntry;
use crate::values::Vec3;

/// Mass of a floating body, given directly or through its density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MassDensity {
    Mass(f64),
    Density(f64),
}

/// Per-axis degree-of-freedom switch; `true` means free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dof {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Dof {
    pub const FREE: Self = Self {
        x: true,
        y: true,
        z: true,
    };

    #[must_use]
    pub const fn is_free(self) -> bool {
        self.x && self.y && self.z
    }
}

impl Default for Dof {
    fn default() -> Self {
        Self::FREE
    }
}

/// Floating body settings. `None` values are computed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatProperty {
    pub mass_density: MassDensity,
    pub gravity_center: Option<Vec3>,
    pub inertia: Option<Vec3>,
    pub initial_linvel: Option<Vec3>,
    pub initial_angvel: Option<Vec3>,
    pub translation_dof: Dof,
    pub rotation_dof: Dof,
}

impl Default for FloatProperty {
    fn default() -> Self {
        Self {
            mass_density: MassDensity::Density(1000.0),
            gravity_center: None,
            inertia: None,
            initial_linvel: None,
            initial_angvel: None,
            translation_dof: Dof::FREE,
            rotation_dof: Dof::FREE,
        }
    }
}

/// Initial condition overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialsProperty {
    pub velocity: Vec3,
}

/// Boundary normal configuration for mDBC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum BoundNormals {
    #[serde(rename = "normals::SetNormals")]
    Set { normal: Vec3 },
    #[serde(rename = "normals::PlaneNormals")]
    Plane {
        /// `None` lets the engine place the plane
        point: Option<Vec3>,
        normal: Vec3,
        maxdisplace: f64,
    },
    #[serde(rename = "normals::SphereNormals")]
    Sphere {
        center: Vec3,
        radius: f64,
        inside: bool,
    },
    #[serde(rename = "normals::CylinderNormals")]
    Cylinder {
        center1: Vec3,
        center2: Vec3,
        radius: f64,
        inside: bool,
    },
}

/// Velocity data of one layer of a 2D multi-layer piston.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlPistonVelData {
    pub filevelx: String,
    pub posy: f64,
    pub timedataini: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlPiston1D {
    pub filevelx: String,
    pub incz: f64,
    pub timedataini: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlPiston2D {
    pub incz: f64,
    pub smoothz: u32,
    pub smoothy: u32,
    pub veldata: Vec<MlPistonVelData>,
}

/// Multi-layer piston driven by external velocity series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum MlPiston {
    #[serde(rename = "mlpiston::MlPiston1D")]
    OneDimensional(MlPiston1D),
    #[serde(rename = "mlpiston::MlPiston2D")]
    TwoDimensional(MlPiston2D),
}

/// Properties keyed by a real MK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MkBasedProperties {
    pub mk: u32,
    pub float_property: Option<FloatProperty>,
    pub initials: Option<InitialsProperty>,
    pub bound_normals: Option<BoundNormals>,
    pub movements: Vec<MovementEntry>,
    pub mlayerpiston: Option<MlPiston>,
}

impl MkBasedProperties {
    #[must_use]
    pub const fn new(mk: u32) -> Self {
        Self {
            mk,
            float_property: None,
            initials: None,
            bound_normals: None,
            movements: Vec::new(),
            mlayerpiston: None,
        }
    }

    #[must_use]
    pub fn has_movements(&self) -> bool {
        !self.movements.is_empty()
    }

    pub fn add_movement(&mut self, movement: MovementEntry) {
        self.movements.push(movement);
    }

    pub fn remove_all_movements(&mut self) {
        self.movements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::motion::{BaseMotion, Movement};

    #[test]
    fn test_fresh_records_do_not_share_movement_lists() -> crate::Result<()> {
        let mut first = MkBasedProperties::new(10);
        let second = MkBasedProperties::new(11);
        let mut movement = Movement::new("Lift");
        movement.add_motion(BaseMotion::wait(1.0))?;
        first.add_movement(MovementEntry::Movement(movement));
        assert!(first.has_movements());
        assert!(!second.has_movements());
        Ok(())
    }

    #[test]
    fn test_remove_all_movements_keeps_record() {
        let mut props = MkBasedProperties::new(12);
        props.initials = Some(InitialsProperty {
            velocity: Vec3::new(1.0, 0.0, 0.0),
        });
        props.remove_all_movements();
        assert_eq!(props.mk, 12);
        assert!(props.initials.is_some());
    }
}
