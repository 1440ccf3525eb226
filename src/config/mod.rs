pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::engine::context::RuleContext;
use crate::error::{CloudAuditError, Result};

pub use types::Config;

const CONFIG_FILE_NAME: &str = ".cloudaudit.toml";

/// Get the global config file path (~/.cloudaudit.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (cwd/.cloudaudit.toml)
pub fn local_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        CloudAuditError::ConfigFile(format!("cannot read {}: {e}", path.display()))
    })?;
    toml::from_str(&content).map_err(|e| {
        CloudAuditError::ConfigFile(format!("cannot parse {}: {e}", path.display()))
    })
}

/// Build the rule context for a run.
///
/// An explicit `--config` path must exist and parse; otherwise the local
/// file is tried, then the global one, then built-in defaults. Threshold
/// validation is left to the evaluation pass.
pub fn load_context(explicit: Option<&Path>) -> Result<RuleContext> {
    if let Some(path) = explicit {
        debug!("loading config from {}", path.display());
        return Ok(read_config(path)?.into_context());
    }

    for candidate in [Some(local_config_path()), global_config_path()]
        .into_iter()
        .flatten()
    {
        if candidate.exists() {
            debug!("loading config from {}", candidate.display());
            return Ok(read_config(&candidate)?.into_context());
        }
    }

    Ok(Config::default().into_context())
}
