//! `parameters` section: the engine's flat key/value run settings.

use std::fmt::Display;

use crate::export::xml::XmlElement;
use crate::export::ExportContext;
use crate::model::SimulationDomain;
use crate::values::AutoValue;

pub(super) fn parameters(ctx: &ExportContext<'_>) -> XmlElement {
    let e = &ctx.case.execution_parameters;
    let param = |key: &str, value: &dyn Display, comment: &str| {
        ctx.commented(
            XmlElement::new("parameter")
                .attr("key", key)
                .attr("value", value),
            comment,
        )
    };

    let mut parameters = XmlElement::new("parameters").children([
        param(
            "SavePosDouble",
            &u8::from(e.save_posdouble),
            "Saves particle position using double precision (default=0)",
        ),
        param(
            "Boundary",
            &e.boundary.code(),
            "Boundary method 1:DBC, 2:mDBC (default=1)",
        ),
        param(
            "StepAlgorithm",
            &e.step_algorithm.code(),
            "Step Algorithm 1:Verlet, 2:Symplectic (default=1)",
        ),
        param(
            "VerletSteps",
            &e.verlet_steps,
            "Verlet only: Number of steps to apply Euler timestepping (default=40)",
        ),
        param(
            "Kernel",
            &e.kernel.code(),
            "Interaction Kernel 1:Cubic Spline, 2:Wendland (default=2)",
        ),
        param(
            "ViscoTreatment",
            &e.visco_treatment.code(),
            "Viscosity formulation 1:Artificial, 2:Laminar+SPS (default=1)",
        ),
        param("Visco", &e.visco, "Viscosity value"),
        param(
            "ViscoBoundFactor",
            &e.visco_bound_factor,
            "Multiply viscosity value with boundary (default=1)",
        ),
        param(
            "DensityDT",
            &e.density_dt.code(),
            "Density Diffusion Term 0:None, 1:Molteni, 2:Fourtakas, 3:Fourtakas(full) (default=0)",
        ),
        param(
            "DensityDTvalue",
            &e.density_dt_value,
            "DDT value (default=0.1)",
        ),
        param(
            "Shifting",
            &e.shifting.code(),
            "Shifting mode 0:None, 1:Ignore bound, 2:Ignore fixed, 3:Full (default=0)",
        ),
        param(
            "ShiftCoef",
            &e.shifting_coef,
            "Coefficient for shifting computation (default=-2)",
        ),
        param(
            "ShiftTFS",
            &e.shifting_tfs,
            "Threshold to detect free surface. Typically 1.5 for 2D and 2.75 for 3D (default=0)",
        ),
        param(
            "RigidAlgorithm",
            &e.rigid_algorithm.code(),
            "Rigid Algorithm 1:SPH, 2:DEM, 3:Chrono (default=1)",
        ),
        param(
            "FtPause",
            &e.ft_pause,
            "Time to freeze the floatings at simulation start (warmup) (default=0)",
        ),
        param(
            "CoefDtMin",
            &e.coef_dt_min,
            "Coefficient to calculate minimum time step dtmin=coefdtmin*h/speedsound (default=0.05)",
        ),
        timestep(ctx, "DtIni", e.dt_ini, "Initial time step"),
        timestep(ctx, "DtMin", e.dt_min, "Minimum time step"),
        param(
            "DtAllParticles",
            &u8::from(e.dt_all_particles),
            "Velocity of particles used to calculate DT. 1:All, 0:Only fluid/floating (default=0)",
        ),
        param("TimeMax", &e.time_max, "Time of simulation"),
        param("TimeOut", &e.time_out, "Time out data"),
        param(
            "RhopOutMin",
            &e.density_out_min,
            "Minimum rhop valid (default=700)",
        ),
        param(
            "RhopOutMax",
            &e.density_out_max,
            "Maximum rhop valid (default=1300)",
        ),
        param(
            "PartsOutMax",
            &e.parts_out_max,
            "%/100 of fluid particles allowed to be excluded from domain (default=1)",
        ),
    ]);

    if let Some(domain) = simulation_domain(&ctx.case.domain) {
        parameters.push(domain);
    }

    for (key, value) in ctx.case.periodicity.parameters() {
        parameters.push(param(key, &value, "Increment for periodic condition"));
    }
    parameters
}

/// Timestep parameter; an engine-computed value is written under a `#` key
/// so the engine ignores it.
fn timestep(ctx: &ExportContext<'_>, key: &str, value: AutoValue, comment: &str) -> XmlElement {
    let key = if value.auto {
        format!("#{key}")
    } else {
        key.to_string()
    };
    ctx.commented(
        XmlElement::new("parameter")
            .attr("key", key)
            .attr("value", value.value),
        comment,
    )
}

fn simulation_domain(domain: &SimulationDomain) -> Option<XmlElement> {
    if !domain.enabled {
        return None;
    }
    Some(
        XmlElement::new("simulationdomain")
            .child(
                XmlElement::new("posmin")
                    .attr("x", domain.posmin_x)
                    .attr("y", domain.posmin_y)
                    .attr("z", domain.posmin_z),
            )
            .child(
                XmlElement::new("posmax")
                    .attr("x", domain.posmax_x)
                    .attr("y", domain.posmax_y)
                    .attr("z", domain.posmax_z),
            ),
    )
}
