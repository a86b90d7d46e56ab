//! `special` section of the execution block.
//!
//! Every sub-block is written only when its feature is configured, in the
//! order the engine reads them.

use crate::export::xml::XmlElement;
use crate::export::{ExportContext, ExportDiagnostic};
use crate::model::relaxation::RelaxationBlend;
use crate::model::wavegen::{
    AwasConfig, IrregularFlapWaveGen, IrregularPistonWaveGen, RegularFlapWaveGen,
    RegularPistonWaveGen, SpectrumOutput, SpectrumSettings,
};
use crate::model::{
    ChronoLink, FileRelaxationZone, ImposeVelocity, ImposeZsurf, IrregularRelaxationZone,
    LineConnection, MlPiston, MooringLine, MovementEntry, RegularRelaxationZone, RelaxationZone,
    UniformRelaxationZone, WaveGen,
};
use crate::values::Vec3;

pub(super) fn special(ctx: &mut ExportContext<'_>) -> XmlElement {
    let mut special = XmlElement::new("special");

    let sections = [
        accinputs(ctx),
        damping(ctx),
        chrono(ctx),
        inout(ctx),
        wavepaddles(ctx),
        mlayerpistons(ctx),
        relaxationzones(ctx),
        moorings(ctx),
    ];
    for section in sections.into_iter().flatten() {
        special.push(section);
    }
    special
}

fn v(name: &str, value: impl std::fmt::Display) -> XmlElement {
    XmlElement::value(name, value)
}

fn p(name: &str, value: Vec3) -> XmlElement {
    XmlElement::point(name, value)
}

/// Non-empty element, `None` otherwise.
fn non_empty(element: XmlElement) -> Option<XmlElement> {
    element.has_children().then_some(element)
}

// ============================================================================
// ACCELERATION INPUTS / DAMPING
// ============================================================================

fn accinputs(ctx: &ExportContext<'_>) -> Option<XmlElement> {
    let input = &ctx.case.acceleration_input;
    if !input.enabled {
        return None;
    }
    non_empty(XmlElement::new("accinputs").children(input.acclist.iter().map(|acc| {
        ctx.commented(XmlElement::new("accinput"), &acc.label)
            .child(v("mkfluid", acc.mkfluid))
            .child(p("acccentre", acc.acccentre))
            .child(v("globalgravity", acc.globalgravity))
            .child(v("datafile", &acc.datafile))
    })))
}

fn damping(ctx: &ExportContext<'_>) -> Option<XmlElement> {
    let zones = ctx
        .case
        .get_all_objects_with_damping()
        .into_iter()
        .filter_map(|object| object.damping.map(|d| (object, d)))
        .filter(|(_, d)| d.enabled)
        .map(|(object, d)| {
            ctx.commented(XmlElement::new("dampingzone"), &object.name)
                .child(p("limitmin", d.limitmin))
                .child(p("limitmax", d.limitmax))
                .child(v("overlimit", d.overlimit))
                .child(v("redumax", d.redumax))
                .child(p("factorxyz", d.factorxyz))
        });
    non_empty(XmlElement::new("damping").children(zones))
}

// ============================================================================
// CHRONO
// ============================================================================

fn chrono(ctx: &ExportContext<'_>) -> Option<XmlElement> {
    let chrono = &ctx.case.chrono;
    if !chrono.enabled {
        return None;
    }

    let mut element = XmlElement::new("chrono");
    if let Some(savedata) = chrono.savedata {
        element.push(v("savedata", savedata));
    }
    element.push(v("schemescale", chrono.schemescale));
    if let Some(collisiondp) = chrono.collisiondp {
        element.push(v("collisiondp", collisiondp));
    }

    for body in &chrono.bodies {
        let name = if body.floating {
            "bodyfloating"
        } else {
            "bodyfixed"
        };
        element.push(
            XmlElement::new(name)
                .attr("id", &body.id)
                .attr("mkbound", body.mkbound)
                .attr("modelnormal", body.modelnormal.name()),
        );
    }

    for link in &chrono.links {
        element.push(chrono_link(link));
    }
    Some(element)
}

fn chrono_link(link: &ChronoLink) -> XmlElement {
    match link {
        ChronoLink::Hinge {
            idbody1,
            idbody2,
            rotpoint,
            rotvector,
            stiffness,
            damping,
        } => XmlElement::new("link_hinge")
            .attr("idbody1", idbody1)
            .attr("idbody2", idbody2)
            .child(p("rotpoint", *rotpoint))
            .child(p("rotvector", *rotvector))
            .child(v("stiffness", stiffness))
            .child(v("damping", damping)),
        ChronoLink::Spheric {
            idbody1,
            idbody2,
            rotpoint,
            stiffness,
            damping,
        } => XmlElement::new("link_spheric")
            .attr("idbody1", idbody1)
            .attr_opt("idbody2", idbody2.as_ref())
            .child(p("rotpoint", *rotpoint))
            .child(v("stiffness", stiffness))
            .child(v("damping", damping)),
        ChronoLink::LinearSpring {
            idbody1,
            idbody2,
            point_fb1,
            point_fb2,
            stiffness,
            damping,
            rest_length,
        } => XmlElement::new("link_linearspring")
            .attr("idbody1", idbody1)
            .attr("idbody2", idbody2)
            .child(p("point_fb1", *point_fb1))
            .child(p("point_fb2", *point_fb2))
            .child(v("stiffness", stiffness))
            .child(v("damping", damping))
            .child(v("rest_length", rest_length)),
        ChronoLink::PointLine {
            idbody1,
            slidingvector,
            rotpoint,
            rotvector,
            rotvector2,
            stiffness,
            damping,
        } => XmlElement::new("link_pointline")
            .attr("idbody1", idbody1)
            .child(p("slidingvector", *slidingvector))
            .child(p("rotpoint", *rotpoint))
            .child(p("rotvector", *rotvector))
            .child(p("rotvector2", *rotvector2))
            .child(v("stiffness", stiffness))
            .child(v("damping", damping)),
    }
}

// ============================================================================
// INLET / OUTLET
// ============================================================================

fn inout(ctx: &ExportContext<'_>) -> Option<XmlElement> {
    let config = &ctx.case.inlet_outlet;
    if !config.enabled || config.zones.is_empty() {
        return None;
    }

    let zone_kind = match ctx.case.dimension {
        crate::model::Dimension::ThreeD => "zone3d",
        crate::model::Dimension::TwoD { .. } => "zone2d",
    };

    let mut element = XmlElement::new("inout")
        .child(
            XmlElement::new("memoryresize")
                .attr("size0", config.memoryresize_size0)
                .attr("size", config.memoryresize_size),
        )
        .child(v("determlimit", config.determlimit))
        .child(v("extrapolatemode", config.extrapolatemode));

    for zone in &config.zones {
        let velocity = XmlElement::new("imposevelocity").attr("mode", zone.velocity.mode());
        let velocity = match &zone.velocity {
            ImposeVelocity::Fixed(speed) => velocity.child(v("velocity", speed)),
            ImposeVelocity::Variable(times) => velocity.child(
                XmlElement::new("velocitytimes").children(
                    times
                        .iter()
                        .map(|t| {
                            XmlElement::new("timevalue")
                                .attr("time", t.time)
                                .attr("v", t.value)
                        }),
                ),
            ),
            ImposeVelocity::Extrapolated => velocity,
        };

        let zsurf = match zone.zsurf {
            ImposeZsurf::Undefined => XmlElement::new("imposezsurf").attr("mode", 0),
            ImposeZsurf::Fixed(z) => XmlElement::new("imposezsurf")
                .attr("mode", 1)
                .child(v("zsurf", z)),
            ImposeZsurf::Calculated => XmlElement::new("imposezsurf").attr("mode", 2),
        };

        element.push(
            XmlElement::new("inoutzone")
                .child(v("refilling", zone.refilling))
                .child(v("inputtreatment", zone.input_treatment))
                .child(v("layers", zone.layers))
                .child(
                    XmlElement::new(zone_kind).child(
                        XmlElement::new("particles")
                            .attr("mkfluid", zone.mkfluid)
                            .child(p("direction", zone.direction)),
                    ),
                )
                .child(velocity)
                .child(XmlElement::new("imposerhop").attr("mode", zone.density.mode()))
                .child(zsurf),
        );
    }
    Some(element)
}

// ============================================================================
// WAVE PADDLES / MULTI-LAYER PISTONS
// ============================================================================

fn wavepaddles(ctx: &ExportContext<'_>) -> Option<XmlElement> {
    let mut element = XmlElement::new("wavepaddles");
    for props in ctx.case.mk_properties_sorted() {
        let Some(mkbound) = ExportContext::mkbound(props.mk) else {
            continue;
        };
        for entry in &props.movements {
            let MovementEntry::Special(special) = entry else {
                continue;
            };
            let paddle = match &special.generator {
                WaveGen::RegularPiston(g) => regular_piston(mkbound, g),
                WaveGen::IrregularPiston(g) => irregular_piston(mkbound, g),
                WaveGen::RegularFlap(g) => regular_flap(mkbound, g),
                WaveGen::IrregularFlap(g) => irregular_flap(mkbound, g),
                WaveGen::File(_) | WaveGen::RotationFile(_) => continue,
            };
            element.push(paddle);
        }
    }
    non_empty(element)
}

fn savemotion_periodic(periods: u32, periodsteps: u32, xpos: f64, zpos: f64) -> XmlElement {
    XmlElement::new("savemotion")
        .attr("periods", periods)
        .attr("periodsteps", periodsteps)
        .attr("xpos", xpos)
        .attr("zpos", zpos)
}

fn spectrum_elements(spectrum: &SpectrumSettings, output: &SpectrumOutput) -> Vec<XmlElement> {
    vec![
        v("spectrum", spectrum.spectrum.name()),
        v("discretization", spectrum.discretization.name()),
        v("peakcoef", spectrum.peak_coef),
        v("waves", spectrum.waves),
        v("randomseed", spectrum.randomseed),
        v("serieini", spectrum.serieini).attr("autofit", spectrum.serieini_autofit),
        v("ramptime", spectrum.ramptime),
        XmlElement::new("savemotion")
            .attr("time", output.savemotion_time)
            .attr("timedt", output.savemotion_timedt)
            .attr("xpos", output.savemotion_xpos)
            .attr("zpos", output.savemotion_zpos),
        XmlElement::new("saveserie")
            .attr("timemin", output.saveserie_timemin)
            .attr("timemax", output.saveserie_timemax)
            .attr("timedt", output.saveserie_timedt)
            .attr("xpos", output.saveserie_xpos),
        XmlElement::new("saveseriewaves")
            .attr("timemin", output.saveseriewaves_timemin)
            .attr("timemax", output.saveseriewaves_timemax)
            .attr("xpos", output.saveseriewaves_xpos),
    ]
}

/// AWAS block; a disabled drift correction is kept as `_correction`.
fn awas_zsurf(awas: &AwasConfig) -> Option<XmlElement> {
    if !awas.enabled {
        return None;
    }
    let correction = &awas.correction;
    let correction_name = if correction.enabled {
        "correction"
    } else {
        "_correction"
    };
    Some(
        XmlElement::new("awas_zsurf")
            .child(v("startawas", awas.startawas))
            .child(v("swl", awas.swl))
            .child(v("elevation", awas.elevation))
            .child(v("gaugex", awas.gaugex))
            .child(v("gaugey", awas.gaugey))
            .child(v("gaugezmin", awas.gaugezmin))
            .child(v("gaugezmax", awas.gaugezmax))
            .child(v("gaugedp", awas.gaugedp))
            .child(v("coefmasslimit", awas.coefmasslimit))
            .child(v("savedata", awas.savedata))
            .child(v("limitace", awas.limitace))
            .child(
                XmlElement::new(correction_name)
                    .attr("coefstroke", correction.coefstroke)
                    .attr("coefperiod", correction.coefperiod)
                    .attr("powerfunc", correction.powerfunc),
            ),
    )
}

fn paddle_head(
    name: &str,
    mkbound: u32,
    wave_order: u32,
    start: f64,
    duration: f64,
    depth: f64,
) -> XmlElement {
    XmlElement::new(name)
        .child(v("mkbound", mkbound))
        .child(v("waveorder", wave_order))
        .child(v("start", start))
        .child(v("duration", duration))
        .child(v("depth", depth))
}

fn regular_piston(mkbound: u32, g: &RegularPistonWaveGen) -> XmlElement {
    let element = paddle_head("piston", mkbound, g.wave_order, g.start, g.duration, g.depth)
        .child(p("pistondir", g.piston_dir))
        .child(v("waveheight", g.wave_height))
        .child(v("waveperiod", g.wave_period))
        .child(v("phase", g.phase))
        .child(v("ramp", g.ramp))
        .child(savemotion_periodic(
            g.disksave_periods,
            g.disksave_periodsteps,
            g.disksave_xpos,
            g.disksave_zpos,
        ));
    match awas_zsurf(&g.awas) {
        Some(awas) => element.child(awas),
        None => element,
    }
}

fn irregular_piston(mkbound: u32, g: &IrregularPistonWaveGen) -> XmlElement {
    let element = paddle_head(
        "piston_spectrum",
        mkbound,
        g.wave_order,
        g.start,
        g.duration,
        g.depth,
    )
    .child(p("pistondir", g.piston_dir))
    .child(v("waveheight", g.wave_height))
    .child(v("waveperiod", g.wave_period))
    .children(spectrum_elements(&g.spectrum, &g.output));
    match awas_zsurf(&g.awas) {
        Some(awas) => element.child(awas),
        None => element,
    }
}

fn regular_flap(mkbound: u32, g: &RegularFlapWaveGen) -> XmlElement {
    paddle_head("flap", mkbound, g.wave_order, g.start, g.duration, g.depth)
        .child(v("variabledraft", g.variable_draft))
        .child(p("flapaxis0", g.flapaxis0))
        .child(p("flapaxis1", g.flapaxis1))
        .child(v("waveheight", g.wave_height))
        .child(v("waveperiod", g.wave_period))
        .child(v("phase", g.phase))
        .child(v("ramp", g.ramp))
        .child(savemotion_periodic(
            g.disksave_periods,
            g.disksave_periodsteps,
            g.disksave_xpos,
            g.disksave_zpos,
        ))
}

fn irregular_flap(mkbound: u32, g: &IrregularFlapWaveGen) -> XmlElement {
    paddle_head("flap_spectrum", mkbound, g.wave_order, g.start, g.duration, g.depth)
        .child(v("variabledraft", g.variable_draft))
        .child(p("flapaxis0", g.flapaxis0))
        .child(p("flapaxis1", g.flapaxis1))
        .child(v("waveheight", g.wave_height))
        .child(v("waveperiod", g.wave_period))
        .children(spectrum_elements(&g.spectrum, &g.output))
}

fn mlayerpistons(ctx: &mut ExportContext<'_>) -> Option<XmlElement> {
    let case = ctx.case;
    let mut element = XmlElement::new("mlayerpistons");
    for props in case.mk_properties_sorted() {
        let Some(piston) = &props.mlayerpiston else {
            continue;
        };
        let Some(mkbound) = ExportContext::mkbound(props.mk) else {
            ctx.record(ExportDiagnostic::BoundFeatureOnFluid(
                props.mk,
                "a multi-layer piston",
            ));
            continue;
        };
        element.push(match piston {
            MlPiston::OneDimensional(piston) => XmlElement::new("piston1d")
                .child(v("mkbound", mkbound))
                .child(v("filevelx", &piston.filevelx))
                .child(v("incz", piston.incz))
                .child(v("timedataini", piston.timedataini)),
            MlPiston::TwoDimensional(piston) => XmlElement::new("piston2d")
                .child(v("mkbound", mkbound))
                .child(v("incz", piston.incz))
                .child(v("smoothz", piston.smoothz))
                .child(v("smoothy", piston.smoothy))
                .children(piston.veldata.iter().map(|data| {
                    XmlElement::new("veldata")
                        .child(v("filevelx", &data.filevelx))
                        .child(v("posy", data.posy))
                        .child(v("timedataini", data.timedataini))
                })),
        });
    }
    non_empty(element)
}

// ============================================================================
// RELAXATION ZONES
// ============================================================================

fn relaxationzones(ctx: &ExportContext<'_>) -> Option<XmlElement> {
    let zone = ctx.case.relaxation_zone()?;
    let element = match zone {
        RelaxationZone::Regular(zone) => rz_regular(zone),
        RelaxationZone::Irregular(zone) => rz_spectrum(zone),
        RelaxationZone::File(zone) => rz_external(zone),
        RelaxationZone::Uniform(zone) => rz_uniform(zone),
    };
    Some(XmlElement::new("relaxationzones").child(element))
}

fn blend_elements(blend: &RelaxationBlend) -> Vec<XmlElement> {
    vec![
        p("coefdir", blend.coefdir),
        v("coefdt", blend.coefdt),
        XmlElement::new("function")
            .attr("psi", blend.function_psi)
            .attr("beta", blend.function_beta),
        v("driftcorrection", blend.driftcorrection),
        v("driftinlet", blend.driftinlet),
    ]
}

fn rz_regular(zone: &RegularRelaxationZone) -> XmlElement {
    XmlElement::new("rzwaves_regular")
        .child(v("start", zone.start))
        .child(v("duration", zone.duration))
        .child(v("waveorder", zone.wave_order))
        .child(v("waveheight", zone.wave_height))
        .child(v("waveperiod", zone.wave_period))
        .child(v("depth", zone.depth))
        .child(v("swl", zone.swl))
        .child(p("center", zone.center))
        .child(v("width", zone.width))
        .child(v("phase", zone.phase))
        .child(v("ramp", zone.ramp))
        .child(savemotion_periodic(
            zone.savemotion_periods,
            zone.savemotion_periodsteps,
            zone.savemotion_xpos,
            zone.savemotion_zpos,
        ))
        .children(blend_elements(&zone.blend))
}

fn rz_spectrum(zone: &IrregularRelaxationZone) -> XmlElement {
    XmlElement::new("rzwaves_spectrum")
        .child(v("start", zone.start))
        .child(v("duration", zone.duration))
        .child(v("waveorder", zone.wave_order))
        .child(v("waveheight", zone.wave_height))
        .child(v("waveperiod", zone.wave_period))
        .child(v("depth", zone.depth))
        .child(v("swl", zone.swl))
        .child(p("center", zone.center))
        .child(v("width", zone.width))
        .children(spectrum_elements(&zone.spectrum, &zone.output))
        .children(blend_elements(&zone.blend))
}

fn rz_external(zone: &FileRelaxationZone) -> XmlElement {
    XmlElement::new("rzwaves_external_1d")
        .child(v("start", zone.start))
        .child(v("duration", zone.duration))
        .child(v("depth", zone.depth))
        .child(v("swl", zone.swl))
        .child(v("filesvel", &zone.filesvel))
        .child(
            XmlElement::new("filesvelx")
                .attr("initial", zone.filesvelx_initial)
                .attr("count", zone.filesvelx_count),
        )
        .child(v("usevelz", zone.usevelz))
        .child(p("movedata", zone.movedata))
        .child(v("dpz", zone.dpz))
        .child(v("smooth", zone.smooth))
        .child(p("center", zone.center))
        .child(v("width", zone.width))
        .children(blend_elements(&zone.blend))
}

fn rz_uniform(zone: &UniformRelaxationZone) -> XmlElement {
    let velocity = if zone.velocity_times.is_empty() {
        v("velocity", zone.velocity)
    } else {
        XmlElement::new("velocitytimes").children(
            zone.velocity_times
                .iter()
                .map(|t| XmlElement::new("timevalue").attr("time", t.time).attr("v", t.value)),
        )
    };

    XmlElement::new("rzwaves_uniform")
        .child(v("start", zone.start))
        .child(v("duration", zone.duration))
        .child(
            XmlElement::new("domainbox")
                .child(p("point", zone.domainbox_point))
                .child(p("size", zone.domainbox_size))
                .child(p("direction", zone.domainbox_direction))
                .child(
                    XmlElement::new("rotateaxis")
                        .attr("angle", zone.domainbox_rotateaxis_angle)
                        .child(p("point1", zone.domainbox_rotateaxis_point1))
                        .child(p("point2", zone.domainbox_rotateaxis_point2)),
                ),
        )
        .child(velocity)
        .child(v("coefdt", zone.coefdt))
        .child(
            XmlElement::new("function")
                .attr("psi", zone.function_psi)
                .attr("beta", zone.function_beta),
        )
}

// ============================================================================
// MOORINGS
// ============================================================================

fn moorings(ctx: &mut ExportContext<'_>) -> Option<XmlElement> {
    let case = ctx.case;
    let moorings = &case.moorings;
    if !moorings.enabled {
        return None;
    }

    let mut moored = XmlElement::new("mooredfloatings");
    let mut bodies = XmlElement::new("bodies");
    for body in &moorings.bodies {
        let Some(mkbound) = ExportContext::mkbound(body.ref_mk) else {
            ctx.record(ExportDiagnostic::BoundFeatureOnFluid(body.ref_mk, "a mooring"));
            continue;
        };
        moored.push(XmlElement::new("floating").attr("mkbound", mkbound));
        bodies.push(
            XmlElement::new("body")
                .attr("ref", mkbound)
                .attr_opt("depth", body.depth),
        );
    }

    let options = &moorings.solver_options;
    let mut solver = XmlElement::new("solverOptions");
    if let Some(depth) = options.water_depth {
        solver.push(v("waterDepth", depth));
    }
    solver.push(v("freesurface", options.free_surface));
    solver.push(v("kBot", options.kbot));
    solver.push(v("cBot", options.cbot));
    if let Some(dtm) = options.dtm {
        solver.push(v("dtM", dtm));
    }
    for element in [
        v("waveKin", options.wave_kin),
        v("writeUnits", options.write_units),
        v("frictionCoefficient", options.friction_coefficient),
        v("fricDamp", options.fric_damp),
        v("statDynFricScale", options.stat_dyn_fric_scale),
        v("dtIC", options.dt_ic),
        v("cdScaleIC", options.cd_scale_ic),
        v("threshIC", options.thresh_ic),
        v("tmaxIC", options.tmax_ic),
    ] {
        solver.push(element);
    }

    let defaults = &moorings.line_default;
    let linedefault = XmlElement::new("linedefault")
        .child(v("ea", defaults.ea))
        .child(v("diameter", defaults.diameter))
        .child(v("massDenInAir", defaults.mass_den_in_air))
        .child(v("ba", defaults.ba))
        .child(v("can", defaults.can))
        .child(v("cat", defaults.cat))
        .child(v("cdn", defaults.cdn))
        .child(v("cdt", defaults.cdt))
        .child(v("breaklinetension", defaults.breaktension))
        .child(v("outputFlags", &defaults.outputflags));

    let mut lines = XmlElement::new("lines").child(linedefault);
    for line in &moorings.lines {
        if let Some(element) = mooring_line(ctx, line) {
            lines.push(element);
        }
    }

    let save = &moorings.savedata;
    let savedata = XmlElement::new("savedata")
        .child(
            XmlElement::new("time")
                .attr("startTime", save.start_time)
                .attr("endTime", save.end_time)
                .attr("dtOut", save.dt_out),
        )
        .child(v("tension", save.tension))
        .child(v("force", save.force))
        .child(v("velocity", save.velocity))
        .child(v("position", save.position));

    Some(
        XmlElement::new("moorings")
            .child(v("savevtk_moorings", moorings.savevtk_moorings))
            .child(v("savecsv_points", moorings.savecsv_points))
            .child(v("savevtk_points", moorings.savevtk_points))
            .child(moored)
            .child(
                XmlElement::new("moordynplus")
                    .child(solver)
                    .child(bodies)
                    .child(lines)
                    .child(savedata),
            ),
    )
}

fn mooring_line(ctx: &mut ExportContext<'_>, line: &MooringLine) -> Option<XmlElement> {
    let mut element = XmlElement::new("line").attr("id", line.line_id);
    for connection in line.connections() {
        element.push(match *connection {
            LineConnection::Vessel { bodyref, point } => {
                let Some(mkbound) = ExportContext::mkbound(bodyref) else {
                    ctx.record(ExportDiagnostic::BoundFeatureOnFluid(bodyref, "a mooring line"));
                    return None;
                };
                XmlElement::new("vessel").attr("bodyref", mkbound).xyz(point)
            }
            LineConnection::Fix { point } => XmlElement::point("fix", point),
            LineConnection::Connect { conref, point } => {
                XmlElement::new("connect").attr("conref", conref).xyz(point)
            }
        });
    }
    element.push(v("length", line.length));
    element.push(v("segments", line.segments));
    for (name, value) in line.overrides() {
        element.push(v(name, value));
    }
    if let Some(flags) = &line.outputflags {
        element.push(v("outputFlags", flags));
    }
    Some(element)
}
