//! Small value types shared by the whole case model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Three-component vector used for points, sizes, directions and velocities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// A numeric value paired with an "auto-compute" flag.
///
/// When `auto` is set the stored value is a placeholder and the engine
/// computes the real one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoValue {
    pub value: f64,
    pub auto: bool,
}

impl AutoValue {
    #[must_use]
    pub const fn auto(placeholder: f64) -> Self {
        Self {
            value: placeholder,
            auto: true,
        }
    }

    #[must_use]
    pub const fn explicit(value: f64) -> Self {
        Self { value, auto: false }
    }

    /// The value when explicitly set, `None` when the engine computes it.
    #[must_use]
    pub const fn resolved(self) -> Option<f64> {
        if self.auto {
            None
        } else {
            Some(self.value)
        }
    }
}

/// Rotation of `angle` degrees around `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub angle: f64,
    pub axis: Vec3,
}

impl Rotation {
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.angle == 0.0 || self.axis.is_zero()
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            angle: 0.0,
            axis: Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Position and orientation of a host geometry object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub base: Vec3,
    pub rotation: Rotation,
}

impl Placement {
    #[must_use]
    pub fn at(base: Vec3) -> Self {
        Self {
            base,
            rotation: Rotation::default(),
        }
    }
}

/// Kind of simulation object, deciding which mk range its tag lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ObjectType {
    Fluid,
    Bound,
    Special,
}

/// How a geometry is filled with particles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FillMode {
    #[default]
    Full,
    Solid,
    Face,
    Wire,
}

/// Which faces of a cuboid receive particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacesConfiguration {
    pub all: bool,
    pub front: bool,
    pub back: bool,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for FacesConfiguration {
    fn default() -> Self {
        Self {
            all: true,
            front: false,
            back: false,
            top: false,
            bottom: false,
            left: false,
            right: false,
        }
    }
}

impl FacesConfiguration {
    /// Render as the engine's `boxfill` face list, e.g. `bottom | left | right`.
    #[must_use]
    pub fn face_list(&self) -> String {
        if self.all {
            return "all".to_string();
        }
        let faces = [
            (self.front, "front"),
            (self.back, "back"),
            (self.top, "top"),
            (self.bottom, "bottom"),
            (self.left, "left"),
            (self.right, "right"),
        ];
        let selected: Vec<&str> = faces
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();
        if selected.is_empty() {
            "all".to_string()
        } else {
            selected.join(" | ")
        }
    }
}

const SPECTRUM_NAMES: [&str; 2] = ["jonswap", "pierson-moskowitz"];

/// Wave spectrum used by irregular generators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectrumType {
    #[default]
    Jonswap = 0,
    PiersonMoskowitz = 1,
}

impl SpectrumType {
    /// Canonical engine name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        SPECTRUM_NAMES[self as usize]
    }
}

const DISCRETIZATION_NAMES: [&str; 4] = ["regular", "random", "stretched", "cosstretched"];

/// Frequency discretization used by irregular generators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscretizationType {
    Regular = 0,
    Random = 1,
    #[default]
    Stretched = 2,
    Cosstretched = 3,
}

impl DiscretizationType {
    /// Canonical engine name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        DISCRETIZATION_NAMES[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_value_resolution() {
        assert_eq!(AutoValue::auto(0.0).resolved(), None);
        assert_eq!(AutoValue::explicit(2.5).resolved(), Some(2.5));
    }

    #[test]
    fn test_face_list_all() {
        assert_eq!(FacesConfiguration::default().face_list(), "all");
    }

    #[test]
    fn test_face_list_selection() {
        let faces = FacesConfiguration {
            all: false,
            bottom: true,
            left: true,
            right: true,
            ..FacesConfiguration::default()
        };
        assert_eq!(faces.face_list(), "bottom | left | right");
    }

    #[test]
    fn test_enum_names_use_lookup_tables() {
        assert_eq!(SpectrumType::PiersonMoskowitz.name(), "pierson-moskowitz");
        assert_eq!(DiscretizationType::Cosstretched.name(), "cosstretched");
        assert_eq!(DiscretizationType::default().name(), "stretched");
    }

    #[test]
    fn test_object_type_parse_and_display() {
        assert_eq!("Fluid".parse::<ObjectType>().ok(), Some(ObjectType::Fluid));
        assert_eq!(ObjectType::Bound.to_string(), "bound");
    }
}
