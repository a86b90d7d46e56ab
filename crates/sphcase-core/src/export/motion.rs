//! `motion` section.
//!
//! Each boundary MK with movements gets one `objreal`. Motion ids count up
//! from 1 inside an `objreal`; every motion points at the next one through
//! `next`, and the last motion of a looping movement points back at the first
//! motion of that movement.

use crate::export::xml::XmlElement;
use crate::export::{ExportContext, ExportDiagnostic};
use crate::model::motion::{
    AccCirMotion, AccRectMotion, AccRotMotion, CirSinuMotion, RectMotion, RectSinuMotion,
    RotMotion, RotSinuMotion,
};
use crate::model::wavegen::{FileWaveGen, RotationFileWaveGen};
use crate::model::{BaseMotion, MkBasedProperties, Movement, MovementEntry, SpecialMovement};

pub(super) fn motion(ctx: &mut ExportContext<'_>, records: &[&MkBasedProperties]) -> XmlElement {
    let mut motion = XmlElement::new("motion");
    for props in records.iter().filter(|p| p.has_movements()) {
        match ExportContext::mkbound(props.mk) {
            Some(mkbound) => {
                if let Some(element) = objreal(mkbound, props) {
                    motion.push(element);
                }
            }
            None => ctx.record(ExportDiagnostic::BoundFeatureOnFluid(props.mk, "movements")),
        }
    }
    motion
}

/// `objreal` of one MK, `None` when its movements hold no motion at all.
fn objreal(mkbound: u32, props: &MkBasedProperties) -> Option<XmlElement> {
    let mut objreal = XmlElement::new("objreal")
        .attr("ref", mkbound)
        .child(XmlElement::new("begin").attr("mov", 1).attr("start", 0));

    let mut next_id = 1_u32;
    for entry in &props.movements {
        let elements = match entry {
            MovementEntry::Movement(movement) => movement_elements(movement, next_id),
            MovementEntry::Special(special) => vec![special_element(special, next_id)],
        };
        next_id = next_id.saturating_add(u32::try_from(elements.len()).unwrap_or(u32::MAX));
        for element in elements {
            objreal.push(element);
        }
    }
    (next_id > 1).then_some(objreal)
}

/// Elements of one movement, ids starting at `first_id`.
fn movement_elements(movement: &Movement, first_id: u32) -> Vec<XmlElement> {
    let motions = movement.motions();
    let mut elements = Vec::with_capacity(motions.len());
    let mut id = first_id;

    for (index, motion) in motions.iter().enumerate() {
        let is_last = index + 1 == motions.len();
        let next = match (is_last, movement.is_looping()) {
            (false, _) => Some(id + 1),
            (true, true) => Some(first_id),
            (true, false) => None,
        };
        elements.push(motion_element(motion, id, next));
        id += 1;
    }
    elements
}

fn header(name: &str, id: u32, duration: f64, next: Option<u32>) -> XmlElement {
    XmlElement::new(name)
        .attr("id", id)
        .attr("duration", duration)
        .attr_opt("next", next)
}

fn motion_element(motion: &BaseMotion, id: u32, next: Option<u32>) -> XmlElement {
    let head = |name: &str| header(name, id, motion.duration(), next);
    match motion {
        BaseMotion::Rect(RectMotion { velocity, .. }) => {
            head("mvrect").child(XmlElement::point("vel", *velocity))
        }
        BaseMotion::AccRect(AccRectMotion {
            velocity,
            acceleration,
            ..
        }) => head("mvrectace")
            .child(XmlElement::point("velini", *velocity))
            .child(XmlElement::point("ace", *acceleration)),
        BaseMotion::Rot(RotMotion {
            ang_vel,
            axis1,
            axis2,
            ..
        }) => head("mvrot")
            .attr("anglesunits", "degrees")
            .child(XmlElement::new("vel").attr("ang", ang_vel))
            .child(XmlElement::point("axisp1", *axis1))
            .child(XmlElement::point("axisp2", *axis2)),
        BaseMotion::AccRot(AccRotMotion {
            ang_vel_ini,
            ang_acc,
            axis1,
            axis2,
            ..
        }) => head("mvrotace")
            .attr("anglesunits", "degrees")
            .child(XmlElement::new("ace").attr("ang", ang_acc))
            .child(XmlElement::new("velini").attr("ang", ang_vel_ini))
            .child(XmlElement::point("axisp1", *axis1))
            .child(XmlElement::point("axisp2", *axis2)),
        BaseMotion::AccCir(AccCirMotion {
            ang_vel_ini,
            ang_acc,
            reference,
            axis1,
            axis2,
            ..
        }) => head("mvcirace")
            .attr("anglesunits", "degrees")
            .child(XmlElement::new("ace").attr("ang", ang_acc))
            .child(XmlElement::new("velini").attr("ang", ang_vel_ini))
            .child(XmlElement::point("ref", *reference))
            .child(XmlElement::point("axisp1", *axis1))
            .child(XmlElement::point("axisp2", *axis2)),
        BaseMotion::Wait(_) => head("wait"),
        BaseMotion::RotSinu(RotSinuMotion {
            axis1,
            axis2,
            freq,
            ampl,
            phase,
            ..
        }) => head("mvrotsinu")
            .attr("anglesunits", "degrees")
            .child(XmlElement::point("axisp1", *axis1))
            .child(XmlElement::point("axisp2", *axis2))
            .child(XmlElement::new("freq").attr("v", freq))
            .child(XmlElement::new("ampl").attr("v", ampl))
            .child(XmlElement::new("phase").attr("v", phase)),
        BaseMotion::CirSinu(CirSinuMotion {
            reference,
            axis1,
            axis2,
            freq,
            ampl,
            phase,
            ..
        }) => head("mvcirsinu")
            .attr("anglesunits", "degrees")
            .child(XmlElement::point("ref", *reference))
            .child(XmlElement::point("axisp1", *axis1))
            .child(XmlElement::point("axisp2", *axis2))
            .child(XmlElement::new("freq").attr("v", freq))
            .child(XmlElement::new("ampl").attr("v", ampl))
            .child(XmlElement::new("phase").attr("v", phase)),
        BaseMotion::RectSinu(RectSinuMotion {
            freq, ampl, phase, ..
        }) => head("mvrectsinu")
            .child(XmlElement::point("freq", *freq))
            .child(XmlElement::point("ampl", *ampl))
            .child(XmlElement::point("phase", *phase)),
    }
}

/// Paddles are configured in the special section and only reserve a null
/// motion here; file generators replay their series.
fn special_element(special: &SpecialMovement, id: u32) -> XmlElement {
    use crate::model::WaveGen;

    match &special.generator {
        WaveGen::File(FileWaveGen {
            duration,
            filename,
            fields,
            fieldtime,
            fieldx,
            fieldy,
            fieldz,
        }) => header("mvfile", id, *duration, None).child(
            XmlElement::new("file")
                .attr("name", filename)
                .attr("fields", fields)
                .attr("fieldtime", fieldtime)
                .attr("fieldx", fieldx)
                .attr("fieldy", fieldy)
                .attr("fieldz", fieldz),
        ),
        WaveGen::RotationFile(RotationFileWaveGen {
            duration,
            filename,
            angles_in_degrees,
            axis1,
            axis2,
        }) => header("mvrotfile", id, *duration, None)
            .attr(
                "anglesunits",
                if *angles_in_degrees {
                    "degrees"
                } else {
                    "radians"
                },
            )
            .child(XmlElement::new("file").attr("name", filename))
            .child(XmlElement::point("axisp1", *axis1))
            .child(XmlElement::point("axisp2", *axis2)),
        WaveGen::RegularPiston(_)
        | WaveGen::IrregularPiston(_)
        | WaveGen::RegularFlap(_)
        | WaveGen::IrregularFlap(_) => XmlElement::new("mvnull").attr("id", id),
    }
}
