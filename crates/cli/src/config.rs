//! Config resolution and `leadsync validate`.

use std::path::{Path, PathBuf};

use leadsync_recon::ReconConfig;
use tracing::debug;

use crate::CliError;

/// `<config dir>/leadsync/leadsync.toml`, e.g. `~/.config/leadsync/leadsync.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("leadsync").join("leadsync.toml"))
}

/// An explicit path must load. Otherwise the per-user file is used when it
/// exists, and built-in defaults when it does not.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ReconConfig, CliError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };

    let Some(path) = path else {
        debug!("no config file, using defaults");
        return Ok(ReconConfig::default());
    };

    debug!(path = %path.display(), "loading config");
    ReconConfig::load(&path).map_err(|e| {
        CliError::config(e).with_hint(format!("fix or remove {}", path.display()))
    })
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = ReconConfig::load(&config_path).map_err(CliError::config)?;

    eprintln!(
        "valid: origin marker '{}', exports '{}' and '{}'",
        config.origin_marker, config.export.missing_filename, config.export.combined_filename,
    );
    eprintln!(
        "  source:    email {:?}, phone {:?}, name {:?}",
        config.source.email, config.source.phone, config.source.name,
    );
    eprintln!(
        "  reference: email {:?}, phone {:?}",
        config.reference.email, config.reference.phone,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_CONFIG);
        assert!(err.hint.is_some());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leadsync.toml");
        std::fs::write(&path, "origin_marker = \"Meta Ads\"\n").unwrap();
        let config = resolve_config(Some(&path)).unwrap();
        assert_eq!(config.origin_marker, "Meta Ads");
        assert_eq!(config.projection.tags, "Tags");
    }

    #[test]
    fn default_path_is_under_leadsync() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("leadsync/leadsync.toml"));
        }
    }
}
