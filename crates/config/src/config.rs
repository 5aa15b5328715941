use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Settings for a single Houdini project.
///
/// Field names are snake_case, with camelCase aliases so a config written
/// for the JavaScript side of the framework loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root every relative path is resolved against.
    ///
    /// Left empty in the file, it becomes the directory holding the config.
    #[serde(default, alias = "projectRoot")]
    pub project_root: PathBuf,

    /// Schema file, relative to the project root
    #[serde(default = "default_schema_path", alias = "schemaPath", alias = "schema")]
    pub schema_path: PathBuf,

    /// Fields that identify a record of any type
    #[serde(default = "default_keys", alias = "defaultKeys")]
    pub default_keys: Vec<String>,

    /// Per-type overrides
    #[serde(default, alias = "typeConfig", alias = "types")]
    pub type_configs: HashMap<String, TypeConfig>,

    /// Custom scalar name -> schema scalar it is sent as
    #[serde(default, alias = "runtimeScalars")]
    pub runtime_scalars: HashMap<String, String>,
}

/// Settings that apply to one schema type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConfig {
    #[serde(default)]
    pub keys: Vec<String>,
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("schema.graphql")
}

fn default_keys() -> Vec<String> {
    vec!["id".to_string()]
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::new(),
            schema_path: default_schema_path(),
            default_keys: default_keys(),
            type_configs: HashMap::new(),
            runtime_scalars: HashMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Create a config rooted at the given directory with default settings
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Keys that identify a record of the given type.
    ///
    /// This is the default key list followed by the type's own keys, without
    /// duplicates and in declaration order.
    #[must_use]
    pub fn keys_for_type(&self, type_name: &str) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        let type_keys = self
            .type_configs
            .get(type_name)
            .map(|config| config.keys.as_slice())
            .unwrap_or_default();
        for key in self.default_keys.iter().chain(type_keys) {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }

    /// Absolute (or root-relative) location of the schema file
    #[must_use]
    pub fn resolved_schema_path(&self) -> PathBuf {
        if self.schema_path.is_absolute() {
            self.schema_path.clone()
        } else {
            self.project_root.join(&self.schema_path)
        }
    }

    /// Schema scalar a custom runtime scalar is sent as
    #[must_use]
    pub fn runtime_scalar(&self, name: &str) -> Option<&str> {
        self.runtime_scalars.get(name).map(String::as_str)
    }

    /// Fill in the project root when the file left it empty
    pub(crate) fn resolve_root(&mut self, config_dir: &Path) {
        if self.project_root.as_os_str().is_empty() {
            self.project_root = config_dir.to_path_buf();
        } else if self.project_root.is_relative() {
            self.project_root = config_dir.join(&self.project_root);
        }
    }
}
