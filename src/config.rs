//! Engine config file discovery and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use gridcalc_core::EngineConfig;

const MAX_CONFIG_FILE_BYTES: u64 = 65_536; // 64 KiB

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn read_config_file(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        bail!(
            "Refusing to read {}: config file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        );
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))
}

fn load_file(path: &Path) -> Result<EngineConfig> {
    let content = read_config_file(path)?;
    EngineConfig::from_toml_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))
}

/// Resolve the engine config: an explicit file must exist; the per-user file
/// is optional. Falls back to defaults.
pub fn load_engine_config(explicit: Option<&Path>, skip_user: bool) -> Result<EngineConfig> {
    if let Some(path) = explicit {
        return load_file(path);
    }
    if skip_user {
        return Ok(EngineConfig::default());
    }
    match user_config_path() {
        Some(path) if path.exists() => load_file(&path),
        _ => Ok(EngineConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_propagation_depth = 3\n").unwrap();
        let config = load_engine_config(Some(&path), false).unwrap();
        assert_eq!(config.max_propagation_depth, 3);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_engine_config(Some(&dir.path().join("nope.toml")), false).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_depth = 3\n").unwrap();
        assert!(load_engine_config(Some(&path), false).is_err());
    }

    #[test]
    fn test_oversized_config_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "#".repeat(MAX_CONFIG_FILE_BYTES as usize + 1)).unwrap();
        let err = load_engine_config(Some(&path), false).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_skip_user_config_uses_defaults() {
        assert_eq!(load_engine_config(None, true).unwrap(), EngineConfig::default());
    }
}
