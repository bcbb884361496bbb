use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use dirs::config_dir;
use serde::Deserialize;

/// User-level configuration loaded from `~/.config/keygen/config.toml` (platform-specific).
/// Every field is optional; an absent file yields the native provider.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Which cryptographic provider generates the keys.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Settings for the `openssl` provider.
    pub openssl: Option<OpensslConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// In-process X25519 (no external tools required).
    #[default]
    Native,
    /// The `openssl` command-line toolkit.
    Openssl,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct OpensslConfig {
    /// Path to the `openssl` binary; looked up on `PATH` when unset.
    pub binary: Option<PathBuf>,
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config> {
    match default_path() {
        Some(path) => load_from_path(path),
        None => Ok(Config::default()),
    }
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = toml::from_str(&contents)?;
    Ok(cfg)
}

/// Resolve the default config path (platform aware). `None` when the platform
/// has no config directory, which simply means there is no config.
pub fn default_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("keygen").join("config.toml"))
}
