//! Binary snapshot container and value tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::case::Case;
use crate::model::CaseInformation;
use crate::persistence::migration;
use crate::{Error, Result};

/// File signature of every snapshot
pub const MAGIC: [u8; 4] = *b"SPHC";

/// Protocol written by this release. Bumped only for deliberate format changes.
pub const PROTOCOL_VERSION: u32 = 3;

/// Persisted reference to an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    pub module: String,
    pub name: String,
}

impl ClassRef {
    #[must_use]
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Root class of the current case model.
    #[must_use]
    pub fn case_root() -> Self {
        Self::new("case", "Case")
    }

    /// Split a `module::Type` tag at its last separator.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        tag.rsplit_once("::")
            .filter(|(module, name)| !module.is_empty() && !name.is_empty())
            .map(|(module, name)| Self::new(module, name))
    }

    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }
}

/// Self-describing value tree stored in the snapshot body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<Node>),
    Map(Vec<(String, Node)>),
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_u64()
                .map(Self::UInt)
                .or_else(|| n.as_i64().map(Self::Int))
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Null => Self::Null,
            Node::Bool(b) => Self::Bool(b),
            Node::Int(i) => Self::Number(i.into()),
            Node::UInt(u) => Self::Number(u.into()),
            Node::Float(f) => Number::from_f64(f).map_or(Self::Null, Self::Number),
            Node::Str(s) => Self::String(s),
            Node::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Node::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect::<Map<String, Self>>(),
            ),
        }
    }
}

/// On-disk snapshot container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub magic: [u8; 4],
    pub protocol: u32,
    pub root: ClassRef,
    pub body: Node,
}

impl SnapshotFile {
    /// Wrap a raw value tree. Used for current saves and for building
    /// snapshots in older layouts.
    #[must_use]
    pub fn from_value(protocol: u32, root: ClassRef, body: Value) -> Self {
        Self {
            magic: MAGIC,
            protocol,
            root,
            body: Node::from(body),
        }
    }

    /// # Errors
    ///
    /// Returns `Error::SnapshotCorrupt` if bincode cannot encode the tree.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| Error::SnapshotCorrupt(format!("failed to encode snapshot: {e}")))
    }

    /// # Errors
    ///
    /// Returns `Error::SnapshotCorrupt` if the bytes are not a snapshot container.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let file: Self = bincode::deserialize(bytes)
            .map_err(|e| Error::SnapshotCorrupt(format!("unreadable snapshot container: {e}")))?;
        if file.magic != MAGIC {
            return Err(Error::SnapshotCorrupt(
                "missing snapshot signature".to_string(),
            ));
        }
        Ok(file)
    }
}

/// Encode a case with the current protocol.
///
/// The value tree must rebuild the same case, otherwise nothing is encoded:
/// non-finite numbers become `null` in the tree and could never be loaded.
///
/// # Errors
///
/// - `Error::InvalidInput` if the case holds values a snapshot cannot keep
/// - `Error::SnapshotCorrupt` if the case cannot be encoded
pub fn encode_snapshot(case: &Case) -> Result<Vec<u8>> {
    let body = serde_json::to_value(case)
        .map_err(|e| Error::SnapshotCorrupt(format!("failed to encode case: {e}")))?;
    ensure_reloadable(case, &body)?;
    SnapshotFile::from_value(PROTOCOL_VERSION, ClassRef::case_root(), body).to_bytes()
}

fn ensure_reloadable(case: &Case, body: &Value) -> Result<()> {
    let unstorable = || {
        Error::InvalidInput(format!(
            "case '{}' holds a non-finite number and cannot be saved",
            case.name
        ))
    };
    let rebuilt: Case = serde_json::from_value(body.clone()).map_err(|_| unstorable())?;

    let mut expected = case.clone();
    expected.info = CaseInformation::default();
    if rebuilt == expected {
        Ok(())
    } else {
        Err(unstorable())
    }
}

/// Decode, migrate and rebuild a case.
///
/// # Errors
///
/// - `Error::UnsupportedProtocol` if the snapshot is newer than this release
/// - `Error::SnapshotCorrupt` for any structural failure
pub fn decode_snapshot(bytes: &[u8]) -> Result<Case> {
    let file = SnapshotFile::from_bytes(bytes)?;
    if file.protocol > PROTOCOL_VERSION {
        return Err(Error::UnsupportedProtocol {
            found: file.protocol,
            supported: PROTOCOL_VERSION,
        });
    }

    let root = migration::resolve_class(&file.root);
    if root != ClassRef::case_root() {
        return Err(Error::SnapshotCorrupt(format!(
            "snapshot root '{}' is not a case",
            root.tag()
        )));
    }

    let mut body = Value::from(file.body);
    migration::migrate(&mut body);

    serde_json::from_value(body).map_err(|e| {
        Error::SnapshotCorrupt(format!(
            "protocol {} snapshot does not match the case model: {e}",
            file.protocol
        ))
    })
}
