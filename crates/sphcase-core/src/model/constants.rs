//! Physical constants of a case.

use serde::{Deserialize, Serialize};

use crate::values::{AutoValue, Vec3};

/// Physical constants, each either explicit or left for the engine to compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    pub lattice_bound: u32,
    pub lattice_fluid: u32,
    pub gravity: Vec3,
    /// Reference density of the fluid (kg/m^3)
    pub rhop0: f64,
    /// Initial density gradient (1:rhop0, 2:water column, 3:max. water height)
    pub rhopgradient: u32,
    /// Maximum still water level used for the speed of sound
    pub hswl: AutoValue,
    /// Polytropic constant of the equation of state
    pub gamma: f64,
    pub speedsystem: AutoValue,
    pub coefsound: f64,
    pub speedsound: AutoValue,
    pub coefh: f64,
    pub cflnumber: f64,
    pub h: AutoValue,
    pub b: AutoValue,
    pub massbound: AutoValue,
    pub massfluid: AutoValue,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            lattice_bound: 1,
            lattice_fluid: 1,
            gravity: Vec3::new(0.0, 0.0, -9.81),
            rhop0: 1000.0,
            rhopgradient: 2,
            hswl: AutoValue::auto(0.0),
            gamma: 7.0,
            speedsystem: AutoValue::auto(0.0),
            coefsound: 20.0,
            speedsound: AutoValue::auto(0.0),
            coefh: 1.0,
            cflnumber: 0.2,
            h: AutoValue::auto(0.0),
            b: AutoValue::auto(0.0),
            massbound: AutoValue::auto(0.0),
            massfluid: AutoValue::auto(0.0),
        }
    }
}
