//! Configuration loading
//!
//! Layers, lowest to highest precedence: built-in defaults, a TOML or YAML
//! config file, `REPO_TO_MD_*` environment variables, then CLI overrides
//! (see [`merge_cli_with_config`]).

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::Path;
use tracing::debug;

use crate::domain::Config;
use crate::error::{Error, Result};

/// Config file picked up from the anchor directory when `--config` is absent
pub const CONFIG_FILE_NAME: &str = "repo-to-md.toml";

/// Prefix for environment overrides, e.g. `REPO_TO_MD_IGNORE_FILE`
pub const ENV_PREFIX: &str = "REPO_TO_MD_";

/// Load configuration anchored at `anchor`, or from `explicit` when given.
///
/// A missing default file is fine; a missing explicit file is an error.
pub fn load_config(anchor: &Path, explicit: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            debug!(path = %path.display(), "Loading config file");
            figment = if is_yaml(path) {
                figment.merge(Yaml::file(path))
            } else {
                figment.merge(Toml::file(path))
            };
        }
        None => {
            let default_path = anchor.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                debug!(path = %default_path.display(), "Loading config file");
            }
            figment = figment.merge(Toml::file(default_path));
        }
    }

    let config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("yml" | "yaml"))
}
