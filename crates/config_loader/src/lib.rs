//! # Config Loader
//!
//! Scene file loading.
//!
//! Responsibilities:
//! - Parse TOML/JSON scene files
//! - Validate world, output and sensor tables
//! - Produce a `SceneBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("scene.toml")).unwrap();
//! for element in blueprint.sensor_elements() {
//!     println!("{:?}", element.attributes());
//! }
//! ```

mod parser;
mod validator;

pub use contracts::SceneBlueprint;
pub use parser::ConfigFormat;
pub use validator::MAX_TICKS;

use contracts::ContractError;
use std::path::Path;
use tracing::debug;

/// Scene loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a scene file, picking the format from its extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported extension
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SceneBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), format = ?format, "loading scene");
        Self::load_from_str(&content, format)
    }

    /// Parse and validate scene content.
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<SceneBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Run validation on a blueprint built or edited in code.
    pub fn validate(blueprint: &SceneBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    pub fn to_toml(blueprint: &SceneBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    pub fn to_json(blueprint: &SceneBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| ContractError::config_parse(format!("unsupported config format: .{ext}")))
    }
}
