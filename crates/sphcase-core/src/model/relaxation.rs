//! Relaxation zones: regions where generated wave kinematics are imposed.
//!
//! A case holds at most one zone; the variant decides which block the
//! exporter writes.

use serde::{Deserialize, Serialize};

use crate::model::wavegen::{SpectrumOutput, SpectrumSettings};
use crate::values::Vec3;

/// Blending function coefficients shared by all zone kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxationBlend {
    pub coefdir: Vec3,
    pub coefdt: f64,
    pub function_psi: f64,
    pub function_beta: f64,
    pub driftcorrection: f64,
    pub driftinlet: bool,
}

impl Default for RelaxationBlend {
    fn default() -> Self {
        Self {
            coefdir: Vec3::new(1.0, 0.0, 0.0),
            coefdt: 1000.0,
            function_psi: 0.9,
            function_beta: 1.0,
            driftcorrection: 0.0,
            driftinlet: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularRelaxationZone {
    pub start: f64,
    pub duration: f64,
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub depth: f64,
    pub swl: f64,
    pub center: Vec3,
    pub width: f64,
    pub phase: f64,
    pub ramp: f64,
    pub savemotion_periods: u32,
    pub savemotion_periodsteps: u32,
    pub savemotion_xpos: f64,
    pub savemotion_zpos: f64,
    pub blend: RelaxationBlend,
}

impl Default for RegularRelaxationZone {
    fn default() -> Self {
        Self {
            start: 0.0,
            duration: 0.0,
            wave_order: 2,
            wave_height: 0.5,
            wave_period: 1.0,
            depth: 1.0,
            swl: 1.0,
            center: Vec3::ZERO,
            width: 0.5,
            phase: 0.0,
            ramp: 0.0,
            savemotion_periods: 24,
            savemotion_periodsteps: 20,
            savemotion_xpos: 0.0,
            savemotion_zpos: 0.0,
            blend: RelaxationBlend::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularRelaxationZone {
    pub start: f64,
    pub duration: f64,
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub depth: f64,
    pub swl: f64,
    pub center: Vec3,
    pub width: f64,
    pub spectrum: SpectrumSettings,
    pub output: SpectrumOutput,
    pub blend: RelaxationBlend,
}

impl Default for IrregularRelaxationZone {
    fn default() -> Self {
        Self {
            start: 0.0,
            duration: 0.0,
            wave_order: 2,
            wave_height: 0.5,
            wave_period: 1.0,
            depth: 1.0,
            swl: 1.0,
            center: Vec3::ZERO,
            width: 0.5,
            spectrum: SpectrumSettings::default(),
            output: SpectrumOutput::default(),
            blend: RelaxationBlend::default(),
        }
    }
}

/// Zone driven by an external velocity series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRelaxationZone {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub swl: f64,
    /// Base path of the velocity files, a base name once copied next to the case
    pub filesvel: String,
    pub filesvelx_initial: u32,
    pub filesvelx_count: u32,
    pub usevelz: bool,
    pub movedata: Vec3,
    pub dpz: f64,
    pub smooth: u32,
    pub center: Vec3,
    pub width: f64,
    pub blend: RelaxationBlend,
}

impl Default for FileRelaxationZone {
    fn default() -> Self {
        Self {
            start: 0.0,
            duration: 0.0,
            depth: 1.0,
            swl: 1.0,
            filesvel: String::new(),
            filesvelx_initial: 0,
            filesvelx_count: 5,
            usevelz: false,
            movedata: Vec3::ZERO,
            dpz: 2.0,
            smooth: 0,
            center: Vec3::ZERO,
            width: 0.5,
            blend: RelaxationBlend::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    pub time: f64,
    pub value: f64,
}

/// Zone imposing a uniform velocity inside a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformRelaxationZone {
    pub start: f64,
    pub duration: f64,
    pub domainbox_point: Vec3,
    pub domainbox_size: Vec3,
    pub domainbox_direction: Vec3,
    pub domainbox_rotateaxis_angle: f64,
    pub domainbox_rotateaxis_point1: Vec3,
    pub domainbox_rotateaxis_point2: Vec3,
    /// Constant velocity, used when `velocity_times` is empty
    pub velocity: f64,
    pub velocity_times: Vec<TimeValue>,
    pub coefdt: f64,
    pub function_psi: f64,
    pub function_beta: f64,
}

impl Default for UniformRelaxationZone {
    fn default() -> Self {
        Self {
            start: 0.0,
            duration: 0.0,
            domainbox_point: Vec3::ZERO,
            domainbox_size: Vec3::ZERO,
            domainbox_direction: Vec3::new(1.0, 0.0, 0.0),
            domainbox_rotateaxis_angle: 0.0,
            domainbox_rotateaxis_point1: Vec3::ZERO,
            domainbox_rotateaxis_point2: Vec3::new(0.0, 0.0, 1.0),
            velocity: 0.0,
            velocity_times: Vec::new(),
            coefdt: 1000.0,
            function_psi: 0.9,
            function_beta: 1.0,
        }
    }
}

/// Exactly one active relaxation zone kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum RelaxationZone {
    #[serde(rename = "relaxation_zone::RegularRelaxationZone")]
    Regular(RegularRelaxationZone),
    #[serde(rename = "relaxation_zone::IrregularRelaxationZone")]
    Irregular(IrregularRelaxationZone),
    #[serde(rename = "relaxation_zone::FileRelaxationZone")]
    File(FileRelaxationZone),
    #[serde(rename = "relaxation_zone::UniformRelaxationZone")]
    Uniform(UniformRelaxationZone),
}

impl RelaxationZone {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Regular(_) => "regular",
            Self::Irregular(_) => "irregular",
            Self::File(_) => "file",
            Self::Uniform(_) => "uniform",
        }
    }
}
