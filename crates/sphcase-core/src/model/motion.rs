//! Motion primitives and the movements that sequence them.
//!
//! A [`Movement`] is an ordered list of [`BaseMotion`]s that may loop back
//! to its first motion. A [`SpecialMovement`] wraps exactly one
//! [`WaveGen`]. Both live in an MK's movement list as a [`MovementEntry`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::wavegen::WaveGen;
use crate::values::Vec3;

/// Uniform rectilinear motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectMotion {
    pub duration: f64,
    pub velocity: Vec3,
}

/// Rectilinear motion with constant acceleration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccRectMotion {
    pub duration: f64,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

/// Uniform rotation around the axis through `axis1` and `axis2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotMotion {
    pub duration: f64,
    pub ang_vel: f64,
    pub axis1: Vec3,
    pub axis2: Vec3,
}

/// Rotation with constant angular acceleration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccRotMotion {
    pub duration: f64,
    pub ang_vel_ini: f64,
    pub ang_acc: f64,
    pub axis1: Vec3,
    pub axis2: Vec3,
}

/// Circular motion with constant angular acceleration around a reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccCirMotion {
    pub duration: f64,
    pub ang_vel_ini: f64,
    pub ang_acc: f64,
    pub reference: Vec3,
    pub axis1: Vec3,
    pub axis2: Vec3,
}

/// Pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitMotion {
    pub duration: f64,
}

/// Sinusoidal rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotSinuMotion {
    pub duration: f64,
    pub axis1: Vec3,
    pub axis2: Vec3,
    pub freq: f64,
    pub ampl: f64,
    pub phase: f64,
}

/// Sinusoidal circular motion around a reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirSinuMotion {
    pub duration: f64,
    pub reference: Vec3,
    pub axis1: Vec3,
    pub axis2: Vec3,
    pub freq: f64,
    pub ampl: f64,
    pub phase: f64,
}

/// Sinusoidal rectilinear motion, per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectSinuMotion {
    pub duration: f64,
    pub freq: Vec3,
    pub ampl: Vec3,
    pub phase: Vec3,
}

/// Closed set of motion primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum BaseMotion {
    #[serde(rename = "motion::RectMotion")]
    Rect(RectMotion),
    #[serde(rename = "motion::AccRectMotion")]
    AccRect(AccRectMotion),
    #[serde(rename = "motion::RotMotion")]
    Rot(RotMotion),
    #[serde(rename = "motion::AccRotMotion")]
    AccRot(AccRotMotion),
    #[serde(rename = "motion::AccCirMotion")]
    AccCir(AccCirMotion),
    #[serde(rename = "motion::WaitMotion")]
    Wait(WaitMotion),
    #[serde(rename = "motion::RotSinuMotion")]
    RotSinu(RotSinuMotion),
    #[serde(rename = "motion::CirSinuMotion")]
    CirSinu(CirSinuMotion),
    #[serde(rename = "motion::RectSinuMotion")]
    RectSinu(RectSinuMotion),
}

impl BaseMotion {
    #[must_use]
    pub const fn duration(&self) -> f64 {
        match self {
            Self::Rect(m) => m.duration,
            Self::AccRect(m) => m.duration,
            Self::Rot(m) => m.duration,
            Self::AccRot(m) => m.duration,
            Self::AccCir(m) => m.duration,
            Self::Wait(m) => m.duration,
            Self::RotSinu(m) => m.duration,
            Self::CirSinu(m) => m.duration,
            Self::RectSinu(m) => m.duration,
        }
    }

    /// Short human-readable kind used in diagnostics and listings.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rect(_) => "rectilinear",
            Self::AccRect(_) => "accelerated rectilinear",
            Self::Rot(_) => "rotational",
            Self::AccRot(_) => "accelerated rotational",
            Self::AccCir(_) => "accelerated circular",
            Self::Wait(_) => "wait",
            Self::RotSinu(_) => "sinusoidal rotational",
            Self::CirSinu(_) => "sinusoidal circular",
            Self::RectSinu(_) => "sinusoidal rectilinear",
        }
    }

    #[must_use]
    pub fn wait(duration: f64) -> Self {
        Self::Wait(WaitMotion { duration })
    }

    #[must_use]
    pub fn rect(duration: f64, velocity: Vec3) -> Self {
        Self::Rect(RectMotion { duration, velocity })
    }
}

/// Ordered sequence of motions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub name: String,
    motion_list: Vec<BaseMotion>,
    looping: bool,
}

impl Movement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            motion_list: Vec::new(),
            looping: false,
        }
    }

    /// Append a motion.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the duration is negative or not finite.
    pub fn add_motion(&mut self, motion: BaseMotion) -> Result<()> {
        let duration = motion.duration();
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} motion in movement '{}' has invalid duration {duration}",
                motion.kind(),
                self.name
            )));
        }
        self.motion_list.push(motion);
        Ok(())
    }

    /// Remove and return the motion at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the index is out of bounds.
    pub fn remove_motion(&mut self, index: usize) -> Result<BaseMotion> {
        if index >= self.motion_list.len() {
            return Err(Error::InvalidInput(format!(
                "movement '{}' has no motion at position {index}",
                self.name
            )));
        }
        Ok(self.motion_list.remove(index))
    }

    #[must_use]
    pub fn motions(&self) -> &[BaseMotion] {
        &self.motion_list
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.looping
    }

    /// Sum of all motion durations.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.motion_list.iter().map(BaseMotion::duration).sum()
    }
}

/// Movement driven by a wave generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialMovement {
    pub name: String,
    pub generator: WaveGen,
}

impl SpecialMovement {
    #[must_use]
    pub fn new(name: impl Into<String>, generator: WaveGen) -> Self {
        Self {
            name: name.into(),
            generator,
        }
    }
}

/// Item of an MK's movement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum MovementEntry {
    #[serde(rename = "motion::Movement")]
    Movement(Movement),
    #[serde(rename = "motion::SpecialMovement")]
    Special(SpecialMovement),
}

impl MovementEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Movement(m) => &m.name,
            Self::Special(m) => &m.name,
        }
    }
}
