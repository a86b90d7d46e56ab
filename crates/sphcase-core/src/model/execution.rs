//! Numerical scheme configuration for a run.
//!
//! Each enumerated option maps to the integer code the engine expects in
//! its `<parameter>` list.

use serde::{Deserialize, Serialize};

use crate::values::AutoValue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMethod {
    #[default]
    Dbc,
    Mdbc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAlgorithm {
    Verlet,
    #[default]
    Symplectic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelType {
    Cubic,
    #[default]
    Wendland,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViscoTreatment {
    #[default]
    Artificial,
    LaminarSps,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DensityDiffusion {
    None,
    #[default]
    Molteni,
    Fourtakas,
    FourtakasFull,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftingMode {
    #[default]
    None,
    NoBound,
    NoFixed,
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigidAlgorithm {
    #[default]
    Sph,
    Dem,
    Chrono,
}

impl BoundaryMethod {
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Dbc => 1,
            Self::Mdbc => 2,
        }
    }
}

impl StepAlgorithm {
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Verlet => 1,
            Self::Symplectic => 2,
        }
    }
}

impl KernelType {
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Cubic => 1,
            Self::Wendland => 2,
        }
    }
}

impl ViscoTreatment {
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Artificial => 1,
            Self::LaminarSps => 2,
        }
    }
}

impl DensityDiffusion {
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Molteni => 1,
            Self::Fourtakas => 2,
            Self::FourtakasFull => 3,
        }
    }
}

impl ShiftingMode {
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::None => 0,
            Self::NoBound => 1,
            Self::NoFixed => 2,
            Self::Full => 3,
        }
    }
}

impl RigidAlgorithm {
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Sph => 1,
            Self::Dem => 2,
            Self::Chrono => 3,
        }
    }
}

/// Execution parameters of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParameters {
    pub save_posdouble: bool,
    pub boundary: BoundaryMethod,
    pub step_algorithm: StepAlgorithm,
    pub verlet_steps: u32,
    pub kernel: KernelType,
    pub visco_treatment: ViscoTreatment,
    pub visco: f64,
    pub visco_bound_factor: f64,
    pub density_dt: DensityDiffusion,
    pub density_dt_value: f64,
    pub shifting: ShiftingMode,
    pub shifting_coef: f64,
    pub shifting_tfs: f64,
    pub rigid_algorithm: RigidAlgorithm,
    /// Time to freeze floating bodies at simulation start
    pub ft_pause: f64,
    pub coef_dt_min: f64,
    pub dt_ini: AutoValue,
    pub dt_min: AutoValue,
    pub dt_all_particles: bool,
    pub time_max: f64,
    pub time_out: f64,
    pub density_out_min: f64,
    pub density_out_max: f64,
    pub parts_out_max: f64,
}

impl Default for ExecutionParameters {
    fn default() -> Self {
        Self {
            save_posdouble: false,
            boundary: BoundaryMethod::Dbc,
            step_algorithm: StepAlgorithm::Symplectic,
            verlet_steps: 40,
            kernel: KernelType::Wendland,
            visco_treatment: ViscoTreatment::Artificial,
            visco: 0.01,
            visco_bound_factor: 1.0,
            density_dt: DensityDiffusion::Molteni,
            density_dt_value: 0.1,
            shifting: ShiftingMode::None,
            shifting_coef: -2.0,
            shifting_tfs: 0.0,
            rigid_algorithm: RigidAlgorithm::Sph,
            ft_pause: 0.0,
            coef_dt_min: 0.05,
            dt_ini: AutoValue::auto(0.0001),
            dt_min: AutoValue::auto(0.000_01),
            dt_all_particles: false,
            time_max: 1.5,
            time_out: 0.01,
            density_out_min: 700.0,
            density_out_max: 1300.0,
            parts_out_max: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_documentation() {
        let params = ExecutionParameters::default();
        assert_eq!(params.kernel.code(), 2);
        assert!((params.visco - 0.01).abs() < f64::EPSILON);
        assert_eq!(params.verlet_steps, 40);
        assert!(params.dt_ini.auto);
    }
}
