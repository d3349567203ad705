//! Settings Loader (Figment-based)
//!
//! Loads and merges settings from multiple sources:
//! 1. Built-in defaults (Serialized)
//! 2. Settings file (`repodoc.toml` or `--config`), if present
//! 3. Environment variables (`REPODOC_*` prefix)
//! 4. `MODEL_NAME` and `OPENAI_API_KEY`
//!
//! A `.env` file, when present, is applied to the process environment first
//! and overrides variables that are already set.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;

use tracing::debug;

use super::types::Settings;
use crate::types::{DocError, Result};

/// Settings loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings with the full resolution chain:
    /// defaults → file → prefixed env → well-known env
    pub fn load(path: &Path) -> Result<Settings> {
        let settings: Settings = Self::figment(path)
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Apply a dotenv file to the process environment, overriding existing
    /// variables. Returns `false` when the file does not exist.
    pub fn load_env_file(path: &Path) -> Result<bool> {
        match dotenvy::from_path_override(path) {
            Ok(()) => {
                debug!("Loaded environment from: {}", path.display());
                Ok(true)
            }
            Err(e) if e.not_found() => Ok(false),
            Err(e) => Err(DocError::Config(format!(
                "Invalid env file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Load settings from a file only (no environment)
    pub fn load_from_file(path: &Path) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;

        settings.validate()?;

        Ok(settings)
    }

    fn figment(path: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        if path.exists() {
            debug!("Loading settings from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // e.g. REPODOC_SCAN_CONTEXT_SIZE is not splittable on '_', so nested keys
        // use a double underscore: REPODOC_SCAN__CONTEXT_SIZE -> scan.context_size
        figment
            .merge(Env::prefixed("REPODOC_").split("__"))
            .merge(Env::raw().only(&["MODEL_NAME"]).map(|_| "llm.model".into()))
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "llm.api_key".into()),
            )
    }
}
