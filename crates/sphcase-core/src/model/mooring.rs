//! MoorDynPlus mooring configuration: bodies, lines and their connections.

use serde::{Deserialize, Serialize};

use crate::values::Vec3;

/// Solver options of the mooring module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Water depth; `None` lets the engine derive it from the case
    pub water_depth: Option<f64>,
    pub free_surface: f64,
    pub kbot: f64,
    pub cbot: f64,
    /// Mooring time step; `None` lets the engine pick it
    pub dtm: Option<f64>,
    pub wave_kin: bool,
    pub write_units: bool,
    pub friction_coefficient: f64,
    pub fric_damp: f64,
    pub stat_dyn_fric_scale: f64,
    pub dt_ic: f64,
    pub cd_scale_ic: f64,
    pub thresh_ic: f64,
    pub tmax_ic: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            water_depth: None,
            free_surface: 0.0,
            kbot: 3.0e6,
            cbot: 3.0e5,
            dtm: None,
            wave_kin: false,
            write_units: true,
            friction_coefficient: 0.0,
            fric_damp: 200.0,
            stat_dyn_fric_scale: 1.0,
            dt_ic: 1.0,
            cd_scale_ic: 5.0,
            thresh_ic: 0.001,
            tmax_ic: 0.0,
        }
    }
}

/// Floating body attached to mooring lines, identified by its real MK.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MooringBody {
    pub ref_mk: u32,
    pub depth: Option<f64>,
}

/// Line properties used when a line does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDefaultConfiguration {
    pub ea: f64,
    pub diameter: f64,
    pub mass_den_in_air: f64,
    pub ba: f64,
    pub can: f64,
    pub cat: f64,
    pub cdn: f64,
    pub cdt: f64,
    pub breaktension: f64,
    pub outputflags: String,
}

impl Default for LineDefaultConfiguration {
    fn default() -> Self {
        Self {
            ea: 2.9e3,
            diameter: 3.656e-3,
            mass_den_in_air: 0.0607,
            ba: -0.8,
            can: 1.0,
            cat: 0.0,
            cdn: 1.6,
            cdt: 0.05,
            breaktension: 0.0,
            outputflags: "p".to_string(),
        }
    }
}

/// End point of a mooring line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum LineConnection {
    /// Attached to a moored body (real MK)
    #[serde(rename = "mooring::VesselConnection")]
    Vessel { bodyref: u32, point: Vec3 },
    /// Anchored at a fixed point
    #[serde(rename = "mooring::FixConnection")]
    Fix { point: Vec3 },
    /// Joined to other lines at a connection node
    #[serde(rename = "mooring::ConnectConnection")]
    Connect { conref: u32, point: Vec3 },
}

/// A mooring line with optional overrides of the default line configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MooringLine {
    pub line_id: u32,
    pub start: LineConnection,
    pub end: Option<LineConnection>,
    pub length: f64,
    pub segments: u32,
    pub ea: Option<f64>,
    pub diameter: Option<f64>,
    pub mass_den_in_air: Option<f64>,
    pub ba: Option<f64>,
    pub can: Option<f64>,
    pub cat: Option<f64>,
    pub cdn: Option<f64>,
    pub cdt: Option<f64>,
    pub breaktension: Option<f64>,
    pub outputflags: Option<String>,
}

impl MooringLine {
    #[must_use]
    pub const fn new(line_id: u32, start: LineConnection, end: Option<LineConnection>) -> Self {
        Self {
            line_id,
            start,
            end,
            length: 1.0,
            segments: 20,
            ea: None,
            diameter: None,
            mass_den_in_air: None,
            ba: None,
            can: None,
            cat: None,
            cdn: None,
            cdt: None,
            breaktension: None,
            outputflags: None,
        }
    }

    /// Connections present on this line, in start/end order.
    pub fn connections(&self) -> impl Iterator<Item = &LineConnection> {
        std::iter::once(&self.start).chain(self.end.as_ref())
    }

    /// Overridden properties as `(element, value)` pairs in engine order.
    #[must_use]
    pub fn overrides(&self) -> Vec<(&'static str, f64)> {
        [
            ("ea", self.ea),
            ("diameter", self.diameter),
            ("massDenInAir", self.mass_den_in_air),
            ("ba", self.ba),
            ("can", self.can),
            ("cat", self.cat),
            ("cdn", self.cdn),
            ("cdt", self.cdt),
            ("breaklinetension", self.breaktension),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// Which mooring quantities are written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MooringSaveData {
    pub start_time: f64,
    pub end_time: f64,
    pub dt_out: f64,
    pub tension: bool,
    pub force: bool,
    pub velocity: bool,
    pub position: bool,
}

impl Default for MooringSaveData {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: 1000.0,
            dt_out: 0.01,
            tension: true,
            force: true,
            velocity: false,
            position: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoorDynPlusConfiguration {
    pub enabled: bool,
    pub solver_options: SolverOptions,
    pub bodies: Vec<MooringBody>,
    pub line_default: LineDefaultConfiguration,
    pub lines: Vec<MooringLine>,
    pub savedata: MooringSaveData,
    pub savevtk_moorings: bool,
    pub savecsv_points: bool,
    pub savevtk_points: bool,
}

impl Default for MoorDynPlusConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            solver_options: SolverOptions::default(),
            bodies: Vec::new(),
            line_default: LineDefaultConfiguration::default(),
            lines: Vec::new(),
            savedata: MooringSaveData::default(),
            savevtk_moorings: true,
            savecsv_points: true,
            savevtk_points: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_connections_skip_missing_end() {
        let line = MooringLine::new(
            0,
            LineConnection::Fix {
                point: Vec3::new(0.0, 0.0, -1.0),
            },
            None,
        );
        assert_eq!(line.connections().count(), 1);
    }

    #[test]
    fn test_line_overrides_in_engine_order() {
        let mut line = MooringLine::new(
            1,
            LineConnection::Vessel {
                bodyref: 50,
                point: Vec3::ZERO,
            },
            Some(LineConnection::Fix { point: Vec3::ZERO }),
        );
        line.cdt = Some(0.1);
        line.ea = Some(1000.0);
        assert_eq!(line.overrides(), vec![("ea", 1000.0), ("cdt", 0.1)]);
    }
}
