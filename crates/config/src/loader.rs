use crate::{ConfigError, ProjectConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    "houdini.config.yaml",
    "houdini.config.yml",
    "houdini.config.json",
];

/// Find a config file by walking up the directory tree from `start_dir`.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::debug!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a project config from disk, detecting the format from the extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let contents = fs::read_to_string(path)?;
    let mut config = load_config_from_str(&contents, path)?;
    if let Some(dir) = path.parent() {
        config.resolve_root(dir);
    }
    tracing::debug!(
        root = %config.project_root.display(),
        runtime_scalars = config.runtime_scalars.len(),
        type_configs = config.type_configs.len(),
        "Config loaded"
    );
    Ok(config)
}

/// Load a project config from a string.
///
/// The path only drives format detection and error messages; the project
/// root is left as written.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<ProjectConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<ProjectConfig> {
    // an empty file is an all-defaults config
    if contents.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<ProjectConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

fn validate_config(config: &ProjectConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    if config.default_keys.is_empty() {
        return Err(invalid("default_keys must not be empty".to_string()));
    }
    if config.default_keys.iter().any(|key| key.trim().is_empty()) {
        return Err(invalid("default_keys contains an empty key".to_string()));
    }

    for (type_name, type_config) in &config.type_configs {
        if type_config.keys.is_empty() {
            return Err(invalid(format!("type '{type_name}' has an empty key list")));
        }
    }

    for (scalar, target) in &config.runtime_scalars {
        if target.trim().is_empty() {
            return Err(invalid(format!(
                "runtime scalar '{scalar}' has no schema scalar"
            )));
        }
    }

    Ok(())
}
