//! Wave generators driving special movements.
//!
//! Piston and flap paddles come in regular and irregular (spectrum) flavours.
//! Piston generators carry an AWAS sub-configuration. File-driven generators
//! replay an external motion series.

use serde::{Deserialize, Serialize};

use crate::values::{DiscretizationType, SpectrumType, Vec3};

/// Drift correction applied by AWAS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AwasCorrection {
    pub enabled: bool,
    pub coefstroke: f64,
    pub coefperiod: f64,
    pub powerfunc: f64,
}

impl Default for AwasCorrection {
    fn default() -> Self {
        Self {
            enabled: false,
            coefstroke: 1.8,
            coefperiod: 1.0,
            powerfunc: 3.0,
        }
    }
}

/// Active wave absorption for piston generators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AwasConfig {
    pub enabled: bool,
    pub startawas: f64,
    pub swl: f64,
    /// Wave order used to compute the elevation (1 or 2)
    pub elevation: u32,
    pub gaugex: f64,
    pub gaugey: f64,
    pub gaugezmin: f64,
    pub gaugezmax: f64,
    pub gaugedp: f64,
    pub coefmasslimit: f64,
    /// CSV output level (0:none, 1:by part, 2:more info, 3:by step)
    pub savedata: u32,
    pub limitace: f64,
    pub correction: AwasCorrection,
}

impl Default for AwasConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            startawas: 0.0,
            swl: 0.0,
            elevation: 2,
            gaugex: 0.0,
            gaugey: 0.0,
            gaugezmin: 0.0,
            gaugezmax: 0.0,
            gaugedp: 0.1,
            coefmasslimit: 0.1,
            savedata: 1,
            limitace: 2.0,
            correction: AwasCorrection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularPistonWaveGen {
    pub wave_order: u32,
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub piston_dir: Vec3,
    pub wave_height: f64,
    pub wave_period: f64,
    pub phase: f64,
    pub ramp: f64,
    pub disksave_periods: u32,
    pub disksave_periodsteps: u32,
    pub disksave_xpos: f64,
    pub disksave_zpos: f64,
    pub awas: AwasConfig,
}

impl Default for RegularPistonWaveGen {
    fn default() -> Self {
        Self {
            wave_order: 2,
            start: 0.0,
            duration: 0.0,
            depth: 0.0,
            piston_dir: Vec3::new(1.0, 0.0, 0.0),
            wave_height: 0.5,
            wave_period: 1.0,
            phase: 0.0,
            ramp: 0.0,
            disksave_periods: 24,
            disksave_periodsteps: 20,
            disksave_xpos: 0.0,
            disksave_zpos: 0.0,
            awas: AwasConfig::default(),
        }
    }
}

/// Output settings shared by spectrum generators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumOutput {
    pub savemotion_time: f64,
    pub savemotion_timedt: f64,
    pub savemotion_xpos: f64,
    pub savemotion_zpos: f64,
    pub saveserie_timemin: f64,
    pub saveserie_timemax: f64,
    pub saveserie_timedt: f64,
    pub saveserie_xpos: f64,
    pub saveseriewaves_timemin: f64,
    pub saveseriewaves_timemax: f64,
    pub saveseriewaves_xpos: f64,
}

impl Default for SpectrumOutput {
    fn default() -> Self {
        Self {
            savemotion_time: 30.0,
            savemotion_timedt: 0.05,
            savemotion_xpos: 2.0,
            savemotion_zpos: -0.15,
            saveserie_timemin: 0.0,
            saveserie_timemax: 100.0,
            saveserie_timedt: 0.1,
            saveserie_xpos: 0.0,
            saveseriewaves_timemin: 0.0,
            saveseriewaves_timemax: 1000.0,
            saveseriewaves_xpos: 2.0,
        }
    }
}

/// Spectrum parameters shared by irregular generators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSettings {
    pub spectrum: SpectrumType,
    pub discretization: DiscretizationType,
    pub peak_coef: f64,
    pub waves: u32,
    pub randomseed: u32,
    pub serieini: f64,
    pub serieini_autofit: bool,
    pub ramptime: f64,
}

impl Default for SpectrumSettings {
    fn default() -> Self {
        Self {
            spectrum: SpectrumType::Jonswap,
            discretization: DiscretizationType::Stretched,
            peak_coef: 3.3,
            waves: 50,
            randomseed: 2,
            serieini: 0.0,
            serieini_autofit: true,
            ramptime: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularPistonWaveGen {
    pub wave_order: u32,
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub piston_dir: Vec3,
    pub wave_height: f64,
    pub wave_period: f64,
    pub spectrum: SpectrumSettings,
    pub output: SpectrumOutput,
    pub awas: AwasConfig,
}

impl Default for IrregularPistonWaveGen {
    fn default() -> Self {
        Self {
            wave_order: 2,
            start: 0.0,
            duration: 0.0,
            depth: 0.0,
            piston_dir: Vec3::new(1.0, 0.0, 0.0),
            wave_height: 0.5,
            wave_period: 1.0,
            spectrum: SpectrumSettings::default(),
            output: SpectrumOutput::default(),
            awas: AwasConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularFlapWaveGen {
    pub wave_order: u32,
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub variable_draft: f64,
    pub flapaxis0: Vec3,
    pub flapaxis1: Vec3,
    pub wave_height: f64,
    pub wave_period: f64,
    pub phase: f64,
    pub ramp: f64,
    pub disksave_periods: u32,
    pub disksave_periodsteps: u32,
    pub disksave_xpos: f64,
    pub disksave_zpos: f64,
}

impl Default for RegularFlapWaveGen {
    fn default() -> Self {
        Self {
            wave_order: 2,
            start: 0.0,
            duration: 0.0,
            depth: 0.0,
            variable_draft: 0.0,
            flapaxis0: Vec3::new(0.0, -1.0, 0.0),
            flapaxis1: Vec3::new(0.0, 1.0, 0.0),
            wave_height: 0.5,
            wave_period: 1.0,
            phase: 0.0,
            ramp: 0.0,
            disksave_periods: 24,
            disksave_periodsteps: 20,
            disksave_xpos: 0.0,
            disksave_zpos: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularFlapWaveGen {
    pub wave_order: u32,
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub variable_draft: f64,
    pub flapaxis0: Vec3,
    pub flapaxis1: Vec3,
    pub wave_height: f64,
    pub wave_period: f64,
    pub spectrum: SpectrumSettings,
    pub output: SpectrumOutput,
}

impl Default for IrregularFlapWaveGen {
    fn default() -> Self {
        Self {
            wave_order: 2,
            start: 0.0,
            duration: 0.0,
            depth: 0.0,
            variable_draft: 0.0,
            flapaxis0: Vec3::new(0.0, -1.0, 0.0),
            flapaxis1: Vec3::new(0.0, 1.0, 0.0),
            wave_height: 0.5,
            wave_period: 1.0,
            spectrum: SpectrumSettings::default(),
            output: SpectrumOutput::default(),
        }
    }
}

/// Rectilinear motion replayed from a data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileWaveGen {
    pub duration: f64,
    pub filename: String,
    pub fields: u32,
    pub fieldtime: u32,
    pub fieldx: u32,
    pub fieldy: u32,
    pub fieldz: u32,
}

impl FileWaveGen {
    #[must_use]
    pub fn new(filename: impl Into<String>, duration: f64) -> Self {
        Self {
            duration,
            filename: filename.into(),
            fields: 4,
            fieldtime: 0,
            fieldx: 1,
            fieldy: 2,
            fieldz: 3,
        }
    }
}

/// Rotation replayed from a data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationFileWaveGen {
    pub duration: f64,
    pub filename: String,
    pub angles_in_degrees: bool,
    pub axis1: Vec3,
    pub axis2: Vec3,
}

/// Closed set of wave generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum WaveGen {
    #[serde(rename = "wavegen::RegularPistonWaveGen")]
    RegularPiston(RegularPistonWaveGen),
    #[serde(rename = "wavegen::IrregularPistonWaveGen")]
    IrregularPiston(IrregularPistonWaveGen),
    #[serde(rename = "wavegen::RegularFlapWaveGen")]
    RegularFlap(RegularFlapWaveGen),
    #[serde(rename = "wavegen::IrregularFlapWaveGen")]
    IrregularFlap(IrregularFlapWaveGen),
    #[serde(rename = "wavegen::FileWaveGen")]
    File(FileWaveGen),
    #[serde(rename = "wavegen::RotationFileWaveGen")]
    RotationFile(RotationFileWaveGen),
}

impl WaveGen {
    /// Duration the generator occupies in the motion timeline.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        match self {
            Self::RegularPiston(g) => g.duration,
            Self::IrregularPiston(g) => g.duration,
            Self::RegularFlap(g) => g.duration,
            Self::IrregularFlap(g) => g.duration,
            Self::File(g) => g.duration,
            Self::RotationFile(g) => g.duration,
        }
    }

    /// Whether the generator is a paddle configured in the special section.
    #[must_use]
    pub const fn is_paddle(&self) -> bool {
        !matches!(self, Self::File(_) | Self::RotationFile(_))
    }
}
