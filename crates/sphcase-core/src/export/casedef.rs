//! `casedef` section: constants, mk ranges, geometry, initial conditions and
//! floating bodies.

use crate::export::motion;
use crate::export::xml::XmlElement;
use crate::export::{ExportContext, ExportDiagnostic};
use crate::geometry::{HostObject, HostShape, FILL_LIMIT_LABEL, FILL_POINT_LABEL};
use crate::model::{
    BoundNormals, Dimension, FloatProperty, MassDensity, MkBasedProperties, SimulationObject,
    BOUND_LIMIT, FLUID_LIMIT,
};
use crate::values::{AutoValue, FillMode, ObjectType, Placement, Vec3};
use crate::Result;

pub(super) fn casedef(ctx: &mut ExportContext<'_>) -> Result<XmlElement> {
    let case = ctx.case;
    let geometry = geometry(ctx)?;
    let records = case.mk_properties_sorted();

    Ok(XmlElement::new("casedef")
        .child(constants(ctx))
        .child(
            XmlElement::new("mkconfig")
                .attr("boundcount", BOUND_LIMIT)
                .attr("fluidcount", FLUID_LIMIT),
        )
        .child(geometry)
        .child(initials(&records))
        .child(floatings(ctx, &records))
        .child(motion::motion(ctx, &records)))
}

// ============================================================================
// CONSTANTS
// ============================================================================

/// `value` plus `auto="true"` when the engine computes the constant.
fn auto_constant(ctx: &ExportContext<'_>, name: &str, value: AutoValue, comment: &str) -> XmlElement {
    let element = XmlElement::value(name, value.value);
    let element = if value.auto {
        element.attr("auto", true)
    } else {
        element
    };
    ctx.commented(element, comment)
}

fn constants(ctx: &ExportContext<'_>) -> XmlElement {
    let c = &ctx.case.constants;
    XmlElement::new("constantsdef")
        .child(
            XmlElement::new("lattice")
                .attr("bound", c.lattice_bound)
                .attr("fluid", c.lattice_fluid),
        )
        .child(ctx.commented(
            XmlElement::point("gravity", c.gravity),
            "Gravitational acceleration",
        ))
        .child(ctx.commented(
            XmlElement::value("rhop0", c.rhop0),
            "Reference density of the fluid",
        ))
        .child(ctx.commented(
            XmlElement::value("rhopgradient", c.rhopgradient),
            "Initial density gradient",
        ))
        .child(auto_constant(
            ctx,
            "hswl",
            c.hswl,
            "Maximum still water level to calculate speedofsound using coefsound",
        ))
        .child(ctx.commented(
            XmlElement::value("gamma", c.gamma),
            "Polytropic constant for water used in the state equation",
        ))
        .child(auto_constant(
            ctx,
            "speedsystem",
            c.speedsystem,
            "Maximum system speed (by default the dam-break propagation is used)",
        ))
        .child(ctx.commented(
            XmlElement::value("coefsound", c.coefsound),
            "Coefficient to multiply speedsystem",
        ))
        .child(auto_constant(
            ctx,
            "speedsound",
            c.speedsound,
            "Speed of sound to use in the simulation",
        ))
        .child(ctx.commented(
            XmlElement::value("coefh", c.coefh),
            "Coefficient to calculate the smoothing length",
        ))
        .child(ctx.commented(
            XmlElement::value("cflnumber", c.cflnumber),
            "Coefficient to multiply dt",
        ))
        .child(auto_constant(ctx, "h", c.h, "Smoothing length"))
        .child(auto_constant(ctx, "b", c.b, "Polytropic constant B"))
        .child(auto_constant(ctx, "massbound", c.massbound, "Boundary particle mass"))
        .child(auto_constant(ctx, "massfluid", c.massfluid, "Fluid particle mass"))
}

// ============================================================================
// GEOMETRY
// ============================================================================

fn geometry(ctx: &mut ExportContext<'_>) -> Result<XmlElement> {
    let (pointmin, pointmax) = domain_limits(ctx);

    let definition = XmlElement::new("definition")
        .attr("dp", ctx.case.dp)
        .child(XmlElement::point("pointmin", pointmin))
        .child(XmlElement::point("pointmax", pointmax));

    let mut mainlist =
        XmlElement::new("mainlist").child(XmlElement::new("setshapemode").text("actual | dp | bound"));

    let case = ctx.case;
    let config = ctx.config;
    for object in case.objects() {
        if object.name == config.export.case_limits_object || object.object_type == ObjectType::Special {
            continue;
        }
        case.get_mk_base_properties(object.real_mk())?;

        let Some(host_object) = ctx.host.get_object(&object.name) else {
            ctx.record(ExportDiagnostic::MissingGeometry(object.name.clone()));
            continue;
        };
        if let Some(commands) = object_commands(ctx, object, &host_object) {
            for command in commands {
                mainlist.push(command);
            }
        }
    }

    Ok(XmlElement::new("geometry")
        .child(definition)
        .child(XmlElement::new("commands").child(mainlist)))
}

/// Box of the host's case limits object, collapsed onto the plane in 2D.
fn domain_limits(ctx: &mut ExportContext<'_>) -> (Vec3, Vec3) {
    let config = ctx.config;
    let name = &config.export.case_limits_object;
    let limits = ctx.host.get_object(name).and_then(|o| match o.shape {
        HostShape::Box {
            length,
            width,
            height,
        } => Some((
            o.placement.base,
            o.placement.base.add(Vec3::new(length, width, height)),
        )),
        HostShape::Sphere { .. }
        | HostShape::Cylinder { .. }
        | HostShape::Group
        | HostShape::Mesh { .. }
        | HostShape::Other { .. } => None,
    });

    let (mut min, mut max) = limits.unwrap_or_else(|| {
        ctx.record(ExportDiagnostic::MissingCaseLimits(name.clone()));
        (Vec3::ZERO, Vec3::ZERO)
    });

    if let Dimension::TwoD { y } = ctx.case.dimension {
        min.y = y;
        max.y = y;
    }
    (min, max)
}

fn mk_command(object: &SimulationObject) -> XmlElement {
    match object.object_type {
        ObjectType::Fluid => XmlElement::new("setmkfluid").attr("mk", object.obj_mk),
        ObjectType::Bound | ObjectType::Special => {
            XmlElement::new("setmkbound").attr("mk", object.obj_mk)
        }
    }
}

/// Drawing commands of one object, `None` when the object had to be skipped.
fn object_commands(
    ctx: &mut ExportContext<'_>,
    object: &SimulationObject,
    host_object: &HostObject,
) -> Option<Vec<XmlElement>> {
    let mut commands = vec![
        mk_command(object),
        XmlElement::new("setdrawmode").attr("mode", object.fillmode),
    ];

    match &host_object.shape {
        HostShape::Box {
            length,
            width,
            height,
        } => {
            let boxfill = match (object.fillmode, object.faces_configuration) {
                (FillMode::Face, Some(faces)) => faces.face_list(),
                _ => "solid".to_string(),
            };
            let size = Vec3::new(*length, *width, *height);
            commands.extend(placed(host_object.placement, |point| {
                XmlElement::new("drawbox")
                    .child(XmlElement::new("boxfill").text(boxfill))
                    .child(XmlElement::point("point", point))
                    .child(XmlElement::point("size", size))
            }));
        }
        HostShape::Sphere { radius } => {
            commands.push(
                XmlElement::new("drawsphere")
                    .attr("radius", radius)
                    .child(XmlElement::point("point", host_object.placement.base)),
            );
        }
        HostShape::Cylinder { radius, height } => {
            let height = *height;
            commands.extend(placed(host_object.placement, |point| {
                XmlElement::new("drawcylinder")
                    .attr("radius", radius)
                    .child(XmlElement::point("point", point))
                    .child(XmlElement::point(
                        "point",
                        point.add(Vec3::new(0.0, 0.0, height)),
                    ))
            }));
        }
        HostShape::Group => {
            commands.push(fillbox(ctx, object, host_object)?);
        }
        HostShape::Mesh { .. } | HostShape::Other { .. } => {
            commands.push(mesh_command(ctx, object)?);
        }
    }

    Some(commands)
}

/// Wrap a shape declared at `point` in a move/rotate prologue and reset
/// epilogue when the placement carries a rotation.
fn placed(placement: Placement, shape: impl FnOnce(Vec3) -> XmlElement) -> Vec<XmlElement> {
    if placement.rotation.is_identity() {
        return vec![shape(placement.base)];
    }
    vec![
        XmlElement::point("move", placement.base),
        XmlElement::new("rotate")
            .attr("ang", placement.rotation.angle)
            .xyz(placement.rotation.axis),
        shape(Vec3::ZERO),
        XmlElement::new("matrixreset"),
    ]
}

fn fillbox(
    ctx: &mut ExportContext<'_>,
    object: &SimulationObject,
    group: &HostObject,
) -> Option<XmlElement> {
    let limit = group.child_labelled(FILL_LIMIT_LABEL);
    let point = group.child_labelled(FILL_POINT_LABEL);

    let (limit, point) = match (limit, point) {
        (Some(limit), Some(point)) => (limit, point),
        (None, _) => {
            ctx.record(ExportDiagnostic::IncompleteFillBox {
                object: object.name.clone(),
                missing: FILL_LIMIT_LABEL.to_string(),
            });
            return None;
        }
        (Some(_), None) => {
            ctx.record(ExportDiagnostic::IncompleteFillBox {
                object: object.name.clone(),
                missing: FILL_POINT_LABEL.to_string(),
            });
            return None;
        }
    };

    let HostShape::Box {
        length,
        width,
        height,
    } = limit.shape
    else {
        ctx.record(ExportDiagnostic::IncompleteFillBox {
            object: object.name.clone(),
            missing: format!("{FILL_LIMIT_LABEL} box"),
        });
        return None;
    };

    Some(
        XmlElement::new("fillbox")
            .xyz(point.placement.base)
            .child(XmlElement::new("modefill").text("void"))
            .child(XmlElement::point("point", limit.placement.base))
            .child(XmlElement::point("size", Vec3::new(length, width, height))),
    )
}

/// Imported meshes reference their source file; anything else is exported
/// as a triangulated fallback under the mesh directory.
fn mesh_command(ctx: &mut ExportContext<'_>, object: &SimulationObject) -> Option<XmlElement> {
    if let Some(import) = &object.import {
        return Some(
            XmlElement::new("drawfilestl")
                .attr("file", &import.file_path)
                .attr("autofill", import.autofill)
                .child(XmlElement::point("drawscale", import.scale)),
        );
    }

    let relative = format!(
        "{}/{}.stl",
        ctx.config.output.mesh_dir,
        mesh_file_stem(&object.name)
    );
    let destination = ctx.case.path.join(&relative);
    if let Err(e) = ctx.host.export_mesh(&object.name, &destination) {
        ctx.record(ExportDiagnostic::MeshExport {
            object: object.name.clone(),
            message: e.to_string(),
        });
        return None;
    }
    ctx.report.meshes.push(relative.clone());

    Some(
        XmlElement::new("drawfilestl")
            .attr("file", relative)
            .attr("autofill", false)
            .child(XmlElement::point("drawscale", Vec3::new(1.0, 1.0, 1.0))),
    )
}

/// Object name made safe as a single file name inside the mesh directory.
fn mesh_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if stem.trim_matches('.').is_empty() {
        "mesh".to_string()
    } else {
        stem
    }
}

// ============================================================================
// INITIALS / FLOATINGS
// ============================================================================

fn initials(records: &[&MkBasedProperties]) -> XmlElement {
    let mut initials = XmlElement::new("initials");

    for props in records {
        if let (Some(mkfluid), Some(init)) = (ExportContext::mkfluid(props.mk), props.initials) {
            initials.push(
                XmlElement::new("velocity")
                    .attr("mkfluid", mkfluid)
                    .xyz(init.velocity),
            );
        }
    }

    for props in records {
        let (Some(mkbound), Some(normals)) = (ExportContext::mkbound(props.mk), props.bound_normals)
        else {
            continue;
        };
        initials.push(bound_normals(mkbound, normals));
    }

    initials
}

fn bound_normals(mkbound: u32, normals: BoundNormals) -> XmlElement {
    match normals {
        BoundNormals::Set { normal } => XmlElement::new("boundnormal_set")
            .attr("mkbound", mkbound)
            .child(XmlElement::point("normal", normal)),
        BoundNormals::Plane {
            point,
            normal,
            maxdisplace,
        } => XmlElement::new("boundnormal_plane")
            .attr("mkbound", mkbound)
            .child(match point {
                Some(p) => XmlElement::point("point", p),
                None => XmlElement::new("point").attr("auto", true),
            })
            .child(XmlElement::point("normal", normal))
            .child(XmlElement::value("maxdisplace", maxdisplace)),
        BoundNormals::Sphere {
            center,
            radius,
            inside,
        } => XmlElement::new("boundnormal_sphere")
            .attr("mkbound", mkbound)
            .child(XmlElement::point("center", center))
            .child(XmlElement::value("radius", radius))
            .child(XmlElement::value("inside", inside)),
        BoundNormals::Cylinder {
            center1,
            center2,
            radius,
            inside,
        } => XmlElement::new("boundnormal_cylinder")
            .attr("mkbound", mkbound)
            .child(XmlElement::point("center1", center1))
            .child(XmlElement::point("center2", center2))
            .child(XmlElement::value("radius", radius))
            .child(XmlElement::value("inside", inside)),
    }
}

fn floatings(ctx: &mut ExportContext<'_>, records: &[&MkBasedProperties]) -> XmlElement {
    let mut floatings = XmlElement::new("floatings");
    for props in records {
        let Some(float) = &props.float_property else {
            continue;
        };
        match ExportContext::mkbound(props.mk) {
            Some(mkbound) => floatings.push(floating(mkbound, float)),
            None => ctx.record(ExportDiagnostic::BoundFeatureOnFluid(props.mk, "a floating body")),
        }
    }
    floatings
}

fn dof(name: &str, dof: crate::model::Dof) -> XmlElement {
    XmlElement::new(name)
        .attr("x", u8::from(dof.x))
        .attr("y", u8::from(dof.y))
        .attr("z", u8::from(dof.z))
}

fn floating(mkbound: u32, float: &FloatProperty) -> XmlElement {
    let mut element = XmlElement::new("floating").attr("mkbound", mkbound);
    element.push(match float.mass_density {
        MassDensity::Mass(mass) => XmlElement::value("massbody", mass),
        MassDensity::Density(density) => XmlElement::value("rhopbody", density),
    });

    let optional = [
        ("center", float.gravity_center),
        ("inertia", float.inertia),
        ("velini", float.initial_linvel),
        ("omegaini", float.initial_angvel),
    ];
    for (name, value) in optional {
        if let Some(v) = value {
            element.push(XmlElement::point(name, v));
        }
    }

    if !float.translation_dof.is_free() {
        element.push(dof("translationDOF", float.translation_dof));
    }
    if !float.rotation_dof.is_free() {
        element.push(dof("rotationDOF", float.rotation_dof));
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dof;

    #[test]
    fn test_rotated_shape_gets_prologue_and_reset() {
        let mut placement = Placement::at(Vec3::new(1.0, 2.0, 3.0));
        placement.rotation.angle = 30.0;
        let commands = placed(placement, |p| XmlElement::point("point", p));
        let names: Vec<&str> = commands.iter().map(XmlElement::name).collect();
        assert_eq!(names, vec!["move", "rotate", "point", "matrixreset"]);
        assert_eq!(commands[2].get_attr("x"), Some("0"));
    }

    #[test]
    fn test_mesh_file_stem_stays_inside_mesh_dir() {
        assert_eq!(mesh_file_stem("Hull"), "Hull");
        assert_eq!(mesh_file_stem("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(mesh_file_stem("parts\\keel"), "parts_keel");
        assert_eq!(mesh_file_stem(".."), "mesh");
        assert_eq!(mesh_file_stem(""), "mesh");
    }

    #[test]
    fn test_unrotated_shape_uses_base() {
        let commands = placed(Placement::at(Vec3::new(1.0, 0.0, 0.0)), |p| {
            XmlElement::point("point", p)
        });
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].get_attr("x"), Some("1"));
    }

    #[test]
    fn test_floating_omits_engine_computed_values() {
        let float = FloatProperty::default();
        let element = floating(3, &float);
        assert_eq!(element.find_all("rhopbody").count(), 1);
        assert_eq!(element.find_all("center").count(), 0);
        assert_eq!(element.find_all("inertia").count(), 0);
        assert_eq!(element.find_all("translationDOF").count(), 0);
    }

    #[test]
    fn test_floating_restricted_dof() {
        let float = FloatProperty {
            mass_density: MassDensity::Mass(12.5),
            gravity_center: Some(Vec3::new(0.5, 0.0, 0.2)),
            rotation_dof: Dof {
                x: false,
                y: true,
                z: false,
            },
            ..FloatProperty::default()
        };
        let element = floating(4, &float);
        assert_eq!(
            element.find_all("massbody").next().and_then(|e| e.get_attr("value")),
            Some("12.5")
        );
        let rotation = element.find_all("rotationDOF").next();
        assert_eq!(rotation.and_then(|e| e.get_attr("y")), Some("1"));
        assert_eq!(rotation.and_then(|e| e.get_attr("x")), Some("0"));
    }
}
