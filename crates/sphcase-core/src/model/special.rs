//! Special features and case-wide settings: acceleration inputs, rigid-body
//! coupling, inlet/outlet zones, executable paths, run status.

use serde::{Deserialize, Serialize};

use crate::values::Vec3;

/// Case dimensionality. 2D cases live on the plane `y = const`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    ThreeD,
    TwoD { y: f64 },
}

/// Acceleration override for one fluid MK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationInputData {
    pub label: String,
    pub mkfluid: u32,
    pub acccentre: Vec3,
    pub globalgravity: bool,
    /// Acceleration series file, a base name once copied next to the case
    pub datafile: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelerationInput {
    pub enabled: bool,
    pub acclist: Vec<AccelerationInputData>,
}

/// Normal orientation of a coupled body's model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelNormal {
    #[default]
    Original,
    Invert,
    TwoFace,
}

impl ModelNormal {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Invert => "invert",
            Self::TwoFace => "twoface",
        }
    }
}

/// A body handed to the rigid-body coupling library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronoBody {
    pub id: String,
    /// Boundary group tag (not the real MK)
    pub mkbound: u32,
    pub modelnormal: ModelNormal,
    pub floating: bool,
}

/// Closed set of rigid-body links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum ChronoLink {
    #[serde(rename = "chrono::LinkHinge")]
    Hinge {
        idbody1: String,
        idbody2: String,
        rotpoint: Vec3,
        rotvector: Vec3,
        stiffness: f64,
        damping: f64,
    },
    #[serde(rename = "chrono::LinkSpheric")]
    Spheric {
        idbody1: String,
        idbody2: Option<String>,
        rotpoint: Vec3,
        stiffness: f64,
        damping: f64,
    },
    #[serde(rename = "chrono::LinkLinearSpring")]
    LinearSpring {
        idbody1: String,
        idbody2: String,
        point_fb1: Vec3,
        point_fb2: Vec3,
        stiffness: f64,
        damping: f64,
        rest_length: f64,
    },
    #[serde(rename = "chrono::LinkPointLine")]
    PointLine {
        idbody1: String,
        slidingvector: Vec3,
        rotpoint: Vec3,
        rotvector: Vec3,
        rotvector2: Vec3,
        stiffness: f64,
        damping: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronoConfiguration {
    pub enabled: bool,
    /// Interval for the coupling CSV output; `None` disables it
    pub savedata: Option<f64>,
    pub schemescale: f64,
    pub collisiondp: Option<f64>,
    pub bodies: Vec<ChronoBody>,
    pub links: Vec<ChronoLink>,
}

impl Default for ChronoConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            savedata: Some(0.01),
            schemescale: 1.0,
            collisiondp: None,
            bodies: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// Velocity imposed on inflow particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImposeVelocity {
    Fixed(f64),
    Variable(Vec<crate::model::relaxation::TimeValue>),
    Extrapolated,
}

impl ImposeVelocity {
    #[must_use]
    pub const fn mode(&self) -> u32 {
        match self {
            Self::Fixed(_) => 0,
            Self::Variable(_) => 1,
            Self::Extrapolated => 2,
        }
    }
}

/// Density imposed on inflow particles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImposeDensity {
    #[default]
    Fixed,
    Hydrostatic,
    Extrapolated,
}

impl ImposeDensity {
    #[must_use]
    pub const fn mode(self) -> u32 {
        match self {
            Self::Fixed => 0,
            Self::Hydrostatic => 1,
            Self::Extrapolated => 2,
        }
    }
}

/// Free-surface elevation handling of an inflow zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ImposeZsurf {
    #[default]
    Undefined,
    Fixed(f64),
    Calculated,
}

/// One inlet/outlet zone built from the particles of a fluid MK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InletOutletZone {
    pub mkfluid: u32,
    pub direction: Vec3,
    pub layers: u32,
    pub refilling: u32,
    pub input_treatment: u32,
    pub velocity: ImposeVelocity,
    pub density: ImposeDensity,
    pub zsurf: ImposeZsurf,
}

impl InletOutletZone {
    #[must_use]
    pub fn new(mkfluid: u32, direction: Vec3) -> Self {
        Self {
            mkfluid,
            direction,
            layers: 4,
            refilling: 0,
            input_treatment: 0,
            velocity: ImposeVelocity::Fixed(0.0),
            density: ImposeDensity::Fixed,
            zsurf: ImposeZsurf::Undefined,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InletOutletConfiguration {
    pub enabled: bool,
    pub memoryresize_size0: u32,
    pub memoryresize_size: u32,
    pub determlimit: f64,
    pub extrapolatemode: u32,
    pub zones: Vec<InletOutletZone>,
}

impl Default for InletOutletConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            memoryresize_size0: 2,
            memoryresize_size: 4,
            determlimit: 1.0e3,
            extrapolatemode: 1,
            zones: Vec::new(),
        }
    }
}

/// Paths of the external solver binaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutablePaths {
    pub gencase: String,
    pub dualsphysics: String,
    pub partvtk: String,
    pub floatinginfo: String,
    pub computeforces: String,
    pub measuretool: String,
    pub isosurface: String,
    pub boundaryvtk: String,
    pub flowtool: String,
}

/// Transient run and export status. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInformation {
    pub needs_to_run_gencase: bool,
    pub is_gencase_done: bool,
    pub particle_count: Option<u64>,
    pub last_export_complete: Option<bool>,
}
