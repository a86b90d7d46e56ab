//! Host geometry seam.
//!
//! The case model only stores object names; shapes, placements and meshes
//! belong to the host CAD application. The exporter queries the host through
//! [`GeometryHost`]. [`InMemoryGeometry`] is a self-contained host that reads
//! its objects from a JSON companion document next to the case.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::values::{Placement, Vec3};
use crate::{Error, Result};

/// Companion document file name used by the command-line host
pub const GEOMETRY_DOCUMENT: &str = "geometry.json";

/// Label prefix of the limit box inside a fill-box group
pub const FILL_LIMIT_LABEL: &str = "FillLimit";

/// Label prefix of the seed point inside a fill-box group
pub const FILL_POINT_LABEL: &str = "FillPoint";

/// One triangle of a surface mesh.
pub type Facet = [Vec3; 3];

/// Closed set of host geometry kinds the exporter distinguishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostShape {
    Box {
        length: f64,
        width: f64,
        height: f64,
    },
    Sphere {
        radius: f64,
    },
    /// Cylinder along the local z axis, base at the placement
    Cylinder {
        radius: f64,
        height: f64,
    },
    /// Container of child objects (a fill-box when it holds the fill limit and point)
    Group,
    Mesh {
        #[serde(default)]
        facets: Vec<Facet>,
    },
    /// Any host kind without a dedicated emission routine
    Other {
        type_id: String,
        #[serde(default)]
        facets: Vec<Facet>,
    },
}

impl HostShape {
    #[must_use]
    pub fn type_id(&self) -> &str {
        match self {
            Self::Box { .. } => "Part::Box",
            Self::Sphere { .. } => "Part::Sphere",
            Self::Cylinder { .. } => "Part::Cylinder",
            Self::Group => "App::DocumentObjectGroup",
            Self::Mesh { .. } => "Mesh::Feature",
            Self::Other { type_id, .. } => type_id.as_str(),
        }
    }

    fn facets(&self) -> &[Facet] {
        match self {
            Self::Mesh { facets } | Self::Other { facets, .. } => facets,
            Self::Box { .. } | Self::Sphere { .. } | Self::Cylinder { .. } | Self::Group => &[],
        }
    }
}

/// Read-only view of a host geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostObject {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub shape: HostShape,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub children: Vec<HostObject>,
}

impl HostObject {
    #[must_use]
    pub fn new(name: impl Into<String>, shape: HostShape, placement: Placement) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            shape,
            placement,
            children: Vec::new(),
        }
    }

    /// First child whose label starts with `prefix`.
    #[must_use]
    pub fn child_labelled(&self, prefix: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.label.starts_with(prefix))
    }

    fn find(&self, name: &str) -> Option<&Self> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Queries the exporter and the import workflow make against the host.
pub trait GeometryHost {
    /// Look up an object by its unique name, searching nested groups.
    fn get_object(&self, name: &str) -> Option<HostObject>;

    /// Import a mesh file and return the name of the new host object.
    fn import_mesh(&mut self, path: &Path, placement: Placement) -> Result<String>;

    /// Write an object's triangulated surface as STL at `destination`.
    fn export_mesh(&self, name: &str, destination: &Path) -> Result<()>;
}

/// Host geometry held in memory and (de)serialized as a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryGeometry {
    pub objects: Vec<HostObject>,
}

impl InMemoryGeometry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn insert(&mut self, object: HostObject) {
        self.objects.retain(|o| o.name != object.name);
        self.objects.push(object);
    }

    /// Parse a companion document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseError` if the document is not valid geometry JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::ParseError(format!("Failed to parse geometry document: {e}")))
    }

    /// # Errors
    ///
    /// Returns `Error::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::ParseError(format!("Failed to serialize geometry document: {e}")))
    }

    fn unique_name(&self, stem: &str) -> String {
        let taken = |name: &str| self.objects.iter().any(|o| o.find(name).is_some());
        if !taken(stem) {
            return stem.to_string();
        }
        (1_u32..)
            .map(|n| format!("{stem}{n:03}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| stem.to_string())
    }
}

impl GeometryHost for InMemoryGeometry {
    fn get_object(&self, name: &str) -> Option<HostObject> {
        self.objects.iter().find_map(|o| o.find(name)).cloned()
    }

    fn import_mesh(&mut self, path: &Path, placement: Placement) -> Result<String> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::io(path, e),
        })?;
        let facets = parse_ascii_stl(&content)
            .map_err(|e| Error::Host(format!("{}: {e}", path.display())))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("mesh");
        let name = self.unique_name(stem);
        debug!(name = %name, facets = facets.len(), "Imported mesh");

        self.insert(HostObject::new(
            name.clone(),
            HostShape::Mesh { facets },
            placement,
        ));
        Ok(name)
    }

    fn export_mesh(&self, name: &str, destination: &Path) -> Result<()> {
        let object = self
            .get_object(name)
            .ok_or_else(|| Error::Host(format!("no host object named '{name}'")))?;
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(destination, write_ascii_stl(name, object.shape.facets()))
            .map_err(|e| Error::io(destination, e))
    }
}

/// Render facets as an ASCII STL solid.
#[must_use]
pub fn write_ascii_stl(name: &str, facets: &[Facet]) -> String {
    let mut out = format!("solid {name}\n");
    for [a, b, c] in facets {
        let _ = writeln!(out, "  facet normal 0 0 0\n    outer loop");
        for v in [a, b, c] {
            let _ = writeln!(out, "      vertex {} {} {}", v.x, v.y, v.z);
        }
        let _ = writeln!(out, "    endloop\n  endfacet");
    }
    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Parse the vertices of an ASCII STL solid, three per facet.
///
/// # Errors
///
/// Returns a message when a vertex line is malformed or a facet is incomplete.
pub fn parse_ascii_stl(content: &str) -> std::result::Result<Vec<Facet>, String> {
    let vertices = content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("vertex"))
        .map(|line| {
            let coords: Vec<f64> = line
                .split_whitespace()
                .skip(1)
                .map(str::parse::<f64>)
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| format!("invalid vertex '{line}': {e}"))?;
            match coords.as_slice() {
                [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
                _ => Err(format!("vertex needs three coordinates: '{line}'")),
            }
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if vertices.len() % 3 != 0 {
        return Err(format!(
            "{} vertices do not form whole triangles",
            vertices.len()
        ));
    }

    Ok(vertices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Facet {
        [
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_get_object_finds_nested_children() {
        let mut group = HostObject::new("FillBox", HostShape::Group, Placement::default());
        let mut limit = HostObject::new(
            "FillLimit001",
            HostShape::Box {
                length: 1.0,
                width: 1.0,
                height: 1.0,
            },
            Placement::default(),
        );
        limit.label = "FillLimit".to_string();
        group.children.push(limit);

        let mut host = InMemoryGeometry::new();
        host.insert(group);
        assert!(host.get_object("FillLimit001").is_some());
        assert!(host
            .get_object("FillBox")
            .and_then(|g| g.child_labelled(FILL_LIMIT_LABEL).cloned())
            .is_some());
        assert!(host.get_object("Missing").is_none());
    }

    #[test]
    fn test_json_document_parses_shapes() -> Result<()> {
        let json = r#"{"objects":[
            {"name":"Tank","shape":{"kind":"box","length":1.0,"width":0.5,"height":0.4}},
            {"name":"Ball","shape":{"kind":"sphere","radius":0.1},
             "placement":{"base":{"x":0.5,"y":0.0,"z":0.2},"rotation":{"angle":0.0,"axis":{"x":0.0,"y":0.0,"z":1.0}}}}
        ]}"#;
        let host = InMemoryGeometry::from_json(json.as_bytes())?;
        assert_eq!(host.objects.len(), 2);
        assert!(matches!(
            host.get_object("Ball").map(|o| o.shape),
            Some(HostShape::Sphere { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            InMemoryGeometry::from_json(b"{not json"),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_stl_written_then_parsed() {
        let stl = write_ascii_stl("tri", &[unit_triangle()]);
        assert!(stl.starts_with("solid tri\n"));
        assert_eq!(parse_ascii_stl(&stl), Ok(vec![unit_triangle()]));
    }

    #[test]
    fn test_parse_stl_rejects_partial_facet() {
        let stl = "solid x\nvertex 0 0 0\nvertex 1 0 0\nendsolid x\n";
        assert!(parse_ascii_stl(stl).is_err());
    }

    #[test]
    fn test_import_mesh_assigns_unique_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("hull.stl");
        std::fs::write(&path, write_ascii_stl("hull", &[unit_triangle()]))?;

        let mut host = InMemoryGeometry::new();
        let first = host.import_mesh(&path, Placement::default())?;
        let second = host.import_mesh(&path, Placement::default())?;
        assert_eq!(first, "hull");
        assert_eq!(second, "hull001");
        Ok(())
    }

    #[test]
    fn test_export_mesh_unknown_object_is_host_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let host = InMemoryGeometry::new();
        let result = host.export_mesh("Ghost", &dir.path().join("ghost.stl"));
        assert!(matches!(result, Err(Error::Host(_))));
        Ok(())
    }
}
