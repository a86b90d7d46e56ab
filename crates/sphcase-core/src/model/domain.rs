//! Simulation domain bounds and periodic boundary settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One bound of the simulation domain along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum DomainPosition {
    /// Use the engine's computed bound
    #[default]
    Default,
    /// Absolute coordinate
    Value(f64),
    /// Computed bound shifted by a distance (negative shifts down)
    DefaultOffset(f64),
    /// Computed bound shifted by a percentage of the domain size
    DefaultPercent(f64),
}

impl fmt::Display for DomainPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Default => write!(f, "default"),
            Self::Value(v) => write!(f, "{v}"),
            Self::DefaultOffset(v) if v < 0.0 => write!(f, "default - {}", -v),
            Self::DefaultOffset(v) => write!(f, "default + {v}"),
            Self::DefaultPercent(p) if p < 0.0 => write!(f, "default - {}%", -p),
            Self::DefaultPercent(p) => write!(f, "default + {p}%"),
        }
    }
}

/// Six bounded positions delimiting where particles are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationDomain {
    pub enabled: bool,
    pub posmin_x: DomainPosition,
    pub posmin_y: DomainPosition,
    pub posmin_z: DomainPosition,
    pub posmax_x: DomainPosition,
    pub posmax_y: DomainPosition,
    pub posmax_z: DomainPosition,
}

/// Periodicity along a single axis with the increments of the two other axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicityAxis {
    pub enabled: bool,
    pub first_increment: f64,
    pub second_increment: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Periodicity {
    pub x: PeriodicityAxis,
    pub y: PeriodicityAxis,
    pub z: PeriodicityAxis,
}

impl Periodicity {
    /// Engine parameter keys for each enabled axis, in x, y, z order.
    #[must_use]
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        let axes = [
            (self.x, ["XPeriodicIncY", "XPeriodicIncZ"]),
            (self.y, ["YPeriodicIncX", "YPeriodicIncZ"]),
            (self.z, ["ZPeriodicIncX", "ZPeriodicIncY"]),
        ];
        axes.iter()
            .filter(|(axis, _)| axis.enabled)
            .flat_map(|(axis, [first, second])| {
                [(*first, axis.first_increment), (*second, axis.second_increment)]
            })
            .collect()
    }
}
