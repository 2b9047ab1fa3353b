use crate::error::CoreError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Prefix shared by every environment override, e.g. `APP_BACKEND__URL`.
pub const ENV_PREFIX: &str = "APP";

/// Where the base configuration file comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// `<crate>/config/base.yaml`, resolved from the working directory.
    /// Optional: missing file means defaults plus environment.
    CrateDefault { crate_name: String },
    /// A file the user pointed at explicitly. Must exist.
    File(PathBuf),
}

impl ConfigSource {
    pub fn crate_default(crate_name: impl Into<String>) -> Self {
        ConfigSource::CrateDefault {
            crate_name: crate_name.into(),
        }
    }
}

/// Resolve `config/base.yaml` whether the binary runs from the workspace root
/// or from inside the crate directory.
pub fn default_config_file(base_path: &Path, crate_name: &str) -> PathBuf {
    let configuration_directory = if base_path.ends_with(crate_name) {
        base_path.join("config")
    } else {
        base_path.join(crate_name).join("config")
    };
    configuration_directory.join("base.yaml")
}

/// Layer the base file and `APP_*` environment variables into `T`.
pub fn load_configuration<T: DeserializeOwned>(source: &ConfigSource) -> Result<T, CoreError> {
    let (file, required) = match source {
        ConfigSource::CrateDefault { crate_name } => {
            let base_path = std::env::current_dir()
                .map_err(|e| CoreError::MissingConfigFile(e.to_string()))?;
            (default_config_file(&base_path, crate_name), false)
        }
        ConfigSource::File(path) => {
            if !path.exists() {
                return Err(CoreError::MissingConfigFile(path.display().to_string()));
            }
            (path.clone(), true)
        }
    };

    tracing::debug!(file = %file.display(), required, "Loading configuration");

    let settings = Config::builder()
        .add_source(File::from(file).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}
