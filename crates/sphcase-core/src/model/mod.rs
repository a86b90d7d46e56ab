//! # Entity Model
//!
//! Typed representations of every case concept. Constructors produce the
//! engine's documented defaults; the closed variant sets (motions, wave
//! generators, relaxation zones, mooring connections, chrono links, boundary
//! normals, multi-layer pistons) are sum types tagged with a persisted
//! `class` name of the form `<module>::<Type>`.
//!
//! Nothing in here knows about files or the exchange format. The exporter
//! matches exhaustively on the variant types, so a new variant is a compile
//! error in every emission routine until it is handled.

pub mod constants;
pub mod domain;
pub mod execution;
pub mod mk_properties;
pub mod mooring;
pub mod motion;
pub mod object;
pub mod relaxation;
pub mod special;
pub mod wavegen;

pub use constants::Constants;
pub use domain::{DomainPosition, Periodicity, PeriodicityAxis, SimulationDomain};
pub use execution::{
    BoundaryMethod, DensityDiffusion, ExecutionParameters, KernelType, RigidAlgorithm,
    ShiftingMode, StepAlgorithm, ViscoTreatment,
};
pub use mk_properties::{
    BoundNormals, Dof, FloatProperty, InitialsProperty, MassDensity, MkBasedProperties, MlPiston,
    MlPiston1D, MlPiston2D, MlPistonVelData,
};
pub use mooring::{
    LineConnection, LineDefaultConfiguration, MoorDynPlusConfiguration, MooringBody, MooringLine,
    MooringSaveData, SolverOptions,
};
pub use motion::{BaseMotion, Movement, MovementEntry, SpecialMovement};
pub use object::{
    Damping, ImportSettings, SimulationObject, BOUND_LIMIT, FLUID_LIMIT, FLUID_OFFSET,
};
pub use relaxation::{
    FileRelaxationZone, IrregularRelaxationZone, RegularRelaxationZone, RelaxationZone,
    TimeValue, UniformRelaxationZone,
};
pub use special::{
    AccelerationInput, AccelerationInputData, CaseInformation, ChronoBody, ChronoConfiguration,
    ChronoLink, Dimension, ExecutablePaths, ImposeDensity, ImposeVelocity, ImposeZsurf,
    InletOutletConfiguration, InletOutletZone, ModelNormal,
};
pub use wavegen::{AwasConfig, AwasCorrection, WaveGen};
