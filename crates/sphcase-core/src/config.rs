//! Configuration loading and management
//!
//! # Configuration Hierarchy
//!
//! 1. Built-in defaults
//! 2. Global config: `~/.config/sphcase/config.toml`
//! 3. Project config: `<case dir>/.sphcase.toml`
//! 4. Environment variables: `SPHCASE_*`
//!
//! Each layer overrides only the keys it sets explicitly.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Project config file name inside a case directory
pub const PROJECT_CONFIG_FILE: &str = ".sphcase.toml";

const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576; // 1 MB

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATED BOOLEAN TYPE - rejects string values for boolean fields
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "bool")]
pub struct ValidatedBool(bool);

impl ValidatedBool {
    #[must_use]
    #[inline]
    pub const fn as_bool(self) -> bool {
        self.0
    }
}

impl From<bool> for ValidatedBool {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<ValidatedBool> for bool {
    fn from(v: ValidatedBool) -> Self {
        v.0
    }
}

impl<'de> Deserialize<'de> for ValidatedBool {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct BoolVisitor;

        impl serde::de::Visitor<'_> for BoolVisitor {
            type Value = ValidatedBool;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a boolean value (true or false)")
            }

            fn visit_bool<E>(self, v: bool) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ValidatedBool(v))
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Err(serde::de::Error::invalid_type(
                    serde::de::Unexpected::Str(v),
                    &self,
                ))
            }
        }

        deserializer.deserialize_bool(BoolVisitor)
    }
}

impl FromStr for ValidatedBool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "true" | "1" => Ok(Self(true)),
            "false" | "0" => Ok(Self(false)),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid boolean value: '{s}'. Must be 'true' or 'false'"
            ))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION STRUCTURES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub export: ExportConfig,
    pub executables: ExecutablesConfig,
}

/// File layout of a case directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub snapshot_file: String,
    pub export_suffix: String,
    pub out_dir_suffix: String,
    pub mesh_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub app_name: String,
    pub write_comments: ValidatedBool,
    /// Host object whose box bounds the particle domain
    pub case_limits_object: String,
}

/// Defaults copied into the executable paths of new cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutablesConfig {
    pub gencase: String,
    pub dualsphysics: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_file: "casedata.sphc".to_string(),
            export_suffix: "_Def.xml".to_string(),
            out_dir_suffix: "_out".to_string(),
            mesh_dir: "meshes".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            app_name: "sphcase".to_string(),
            write_comments: ValidatedBool(true),
            case_limits_object: "case_limits".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PARTIAL CONFIGURATION (explicit-key merge)
// ═══════════════════════════════════════════════════════════════════════════

/// Partial configuration with `Option<T>` fields for explicit-key merge semantics.
///
/// Only fields present in the TOML are `Some`; missing fields never reset
/// values coming from a lower-precedence layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default)]
    pub output: Option<PartialOutputConfig>,
    #[serde(default)]
    pub export: Option<PartialExportConfig>,
    #[serde(default)]
    pub executables: Option<PartialExecutablesConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PartialOutputConfig {
    #[serde(default)]
    pub snapshot_file: Option<String>,
    #[serde(default)]
    pub export_suffix: Option<String>,
    #[serde(default)]
    pub out_dir_suffix: Option<String>,
    #[serde(default)]
    pub mesh_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PartialExportConfig {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub write_comments: Option<ValidatedBool>,
    #[serde(default)]
    pub case_limits_object: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PartialExecutablesConfig {
    #[serde(default)]
    pub gencase: Option<String>,
    #[serde(default)]
    pub dualsphysics: Option<String>,
}

impl OutputConfig {
    fn merge_partial(&mut self, partial: PartialOutputConfig) {
        if let Some(snapshot_file) = partial.snapshot_file {
            self.snapshot_file = snapshot_file;
        }
        if let Some(export_suffix) = partial.export_suffix {
            self.export_suffix = export_suffix;
        }
        if let Some(out_dir_suffix) = partial.out_dir_suffix {
            self.out_dir_suffix = out_dir_suffix;
        }
        if let Some(mesh_dir) = partial.mesh_dir {
            self.mesh_dir = mesh_dir;
        }
    }
}

impl ExportConfig {
    fn merge_partial(&mut self, partial: PartialExportConfig) {
        if let Some(app_name) = partial.app_name {
            self.app_name = app_name;
        }
        if let Some(write_comments) = partial.write_comments {
            self.write_comments = write_comments;
        }
        if let Some(case_limits_object) = partial.case_limits_object {
            self.case_limits_object = case_limits_object;
        }
    }
}

impl ExecutablesConfig {
    fn merge_partial(&mut self, partial: PartialExecutablesConfig) {
        if let Some(gencase) = partial.gencase {
            self.gencase = gencase;
        }
        if let Some(dualsphysics) = partial.dualsphysics {
            self.dualsphysics = dualsphysics;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Load configuration from all layers for a case directory.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A config file is malformed TOML, symlinked or oversized
    /// - A config file contains unknown keys
    /// - An environment override is invalid
    /// - The merged values fail validation
    pub fn load(case_dir: Option<&Path>) -> Result<Self> {
        let project = case_dir.map(|dir| dir.join(PROJECT_CONFIG_FILE));
        Self::load_from(global_config_path().as_deref(), project.as_deref())
    }

    /// Load configuration from explicit global and project files.
    ///
    /// Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(global: Option<&Path>, project: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        for path in [global, project].into_iter().flatten() {
            if let Some(partial) = load_partial_toml_file(path)? {
                debug!(path = %path.display(), "Merging config layer");
                config.merge_partial(partial);
            }
        }

        config.apply_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Override only the keys a layer sets explicitly.
    pub fn merge_partial(&mut self, partial: PartialConfig) {
        if let Some(output) = partial.output {
            self.output.merge_partial(output);
        }
        if let Some(export) = partial.export {
            self.export.merge_partial(export);
        }
        if let Some(executables) = partial.executables {
            self.executables.merge_partial(executables);
        }
    }

    /// Apply environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    fn apply_env_vars(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("SPHCASE_APP_NAME") {
            self.export.app_name = value;
        }

        if let Ok(value) = std::env::var("SPHCASE_SNAPSHOT_FILE") {
            self.output.snapshot_file = value;
        }

        if let Ok(value) = std::env::var("SPHCASE_EXPORT_SUFFIX") {
            self.output.export_suffix = value;
        }

        if let Ok(value) = std::env::var("SPHCASE_WRITE_COMMENTS") {
            self.export.write_comments = value.parse().map_err(|e| {
                Error::InvalidConfig(format!("Invalid SPHCASE_WRITE_COMMENTS value: {e}"))
            })?;
        }

        if let Ok(value) = std::env::var("SPHCASE_CASE_LIMITS_OBJECT") {
            self.export.case_limits_object = value;
        }

        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any value is empty or malformed
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("output.snapshot_file", &self.output.snapshot_file),
            ("output.export_suffix", &self.output.export_suffix),
            ("output.mesh_dir", &self.output.mesh_dir),
            ("export.app_name", &self.export.app_name),
            ("export.case_limits_object", &self.export.case_limits_object),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!("{key} cannot be empty")));
        }

        if !self.output.export_suffix.ends_with(".xml") {
            return Err(Error::InvalidConfig(format!(
                "output.export_suffix must end in .xml, got '{}'",
                self.output.export_suffix
            )));
        }

        if Path::new(&self.output.mesh_dir).is_absolute() {
            return Err(Error::InvalidConfig(format!(
                "output.mesh_dir must be relative, got '{}'",
                self.output.mesh_dir
            )));
        }

        Ok(())
    }

    /// Snapshot path of a case directory.
    #[must_use]
    pub fn snapshot_path(&self, case_dir: &Path) -> PathBuf {
        case_dir.join(&self.output.snapshot_file)
    }

    /// Export document path of a case.
    #[must_use]
    pub fn export_path(&self, case_dir: &Path, case_name: &str) -> PathBuf {
        case_dir.join(format!("{case_name}{}", self.output.export_suffix))
    }

    /// Run output directory of a case.
    #[must_use]
    pub fn out_dir(&self, case_dir: &Path, case_name: &str) -> PathBuf {
        case_dir.join(format!("{case_name}{}", self.output.out_dir_suffix))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Get path to global config file
fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "sphcase")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Load a TOML file into a `PartialConfig`. A missing file yields `None`.
///
/// # Errors
///
/// Returns error if:
/// - The file is a symbolic link or exceeds the size limit
/// - File cannot be read
/// - TOML is malformed or contains unknown keys
pub fn load_partial_toml_file(path: &Path) -> Result<Option<PartialConfig>> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };

    if metadata.file_type().is_symlink() {
        return Err(Error::InvalidConfig(format!(
            "Config file {} is a symbolic link - refusing to follow",
            path.display()
        )));
    }

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(Error::InvalidConfig(format!(
            "Config file {} exceeds maximum size of {MAX_CONFIG_FILE_SIZE} bytes",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| Error::ParseError(format!("Failed to parse config {}: {e}", path.display())))
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> Result<PathBuf> {
        let path = dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.output.snapshot_file, "casedata.sphc");
        assert_eq!(config.output.export_suffix, "_Def.xml");
        assert_eq!(config.export.case_limits_object, "case_limits");
        assert!(config.export.write_comments.as_bool());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let result = load_partial_toml_file(&dir.path().join("absent.toml"))?;
        assert!(result.is_none());
        Ok(())
    }

    #[test]
    fn test_partial_merge_keeps_unset_keys() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "p.toml", "[output]\nmesh_dir = \"stl\"\n")?;
        let partial = load_partial_toml_file(&path)?.unwrap_or_default();

        let mut config = Config::default();
        config.merge_partial(partial);
        assert_eq!(config.output.mesh_dir, "stl");
        assert_eq!(config.output.snapshot_file, "casedata.sphc");
        Ok(())
    }

    #[test]
    fn test_project_overrides_global() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let global = write_config(
            &dir,
            "global.toml",
            "[export]\napp_name = \"global\"\nwrite_comments = false\n",
        )?;
        let project = write_config(&dir, "project.toml", "[export]\napp_name = \"project\"\n")?;

        let mut config = Config::default();
        for path in [&global, &project] {
            if let Some(partial) = load_partial_toml_file(path)? {
                config.merge_partial(partial);
            }
        }
        assert_eq!(config.export.app_name, "project");
        assert!(!config.export.write_comments.as_bool());
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "bad.toml", "[output\nsnapshot_file = ")?;
        assert!(matches!(
            load_partial_toml_file(&path),
            Err(Error::ParseError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_unknown_keys_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "typo.toml", "[output]\nsnapshot_fil = \"x\"\n")?;
        let result = load_partial_toml_file(&path);
        assert!(matches!(result, Err(Error::ParseError(ref m)) if m.contains("snapshot_fil")));
        Ok(())
    }

    #[test]
    fn test_unknown_section_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "section.toml", "[watch]\nenabled = true\n")?;
        assert!(load_partial_toml_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_boolean_string_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "bool.toml", "[export]\nwrite_comments = \"true\"\n")?;
        assert!(load_partial_toml_file(&path).is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_config_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = write_config(&dir, "real.toml", "")?;
        let link = dir.path().join("link.toml");
        std::os::unix::fs::symlink(&target, &link)?;
        assert!(matches!(
            load_partial_toml_file(&link),
            Err(Error::InvalidConfig(_))
        ));
        Ok(())
    }

    #[test]
    fn test_validation_rejects_non_xml_suffix() {
        let mut config = Config::default();
        config.output.export_suffix = "_Def.json".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validation_rejects_absolute_mesh_dir() {
        let mut config = Config::default();
        config.output.mesh_dir = "/tmp/meshes".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validated_bool_from_str() {
        assert_eq!("TRUE".parse::<ValidatedBool>().ok(), Some(ValidatedBool(true)));
        assert_eq!("0".parse::<ValidatedBool>().ok(), Some(ValidatedBool(false)));
        assert!("yes".parse::<ValidatedBool>().is_err());
    }

    #[test]
    fn test_case_paths() {
        let config = Config::default();
        let dir = Path::new("/cases/tank");
        assert_eq!(
            config.export_path(dir, "tank"),
            PathBuf::from("/cases/tank/tank_Def.xml")
        );
        assert_eq!(config.out_dir(dir, "tank"), PathBuf::from("/cases/tank/tank_out"));
        assert_eq!(
            config.snapshot_path(dir),
            PathBuf::from("/cases/tank/casedata.sphc")
        );
    }
}
