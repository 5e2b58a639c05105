//! CLI argument merging with config

use crate::domain::{Config, ReadErrorPolicy};

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub ref_: Option<String>,
    pub ignore_file: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub follow_symlinks: Option<bool>,
    pub on_read_error: Option<ReadErrorPolicy>,
}

/// Apply CLI flags on top of the loaded config.
///
/// `exclude` patterns are appended to the configured ones; every other
/// override replaces its config value.
pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(ref_) = cli.ref_ {
        base_config.ref_ = Some(ref_);
    }
    if let Some(ignore_file) = cli.ignore_file {
        base_config.ignore_file = ignore_file;
    }
    if let Some(exclude) = cli.exclude {
        base_config.exclude.extend(exclude);
    }
    if let Some(follow_symlinks) = cli.follow_symlinks {
        base_config.follow_symlinks = follow_symlinks;
    }
    if let Some(on_read_error) = cli.on_read_error {
        base_config.on_read_error = on_read_error;
    }

    base_config
}
