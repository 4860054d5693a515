use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Saved login state, kept as `auth.toml` in the platform config dir.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub api_url: Option<String>,
}

impl AuthConfig {
    pub fn get_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "players", "players")
            .context("Could not determine config directory")?;
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        Ok(config_dir.join("auth.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::get_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Could not parse {}", path.display()))?;
        log::debug!("Loaded credentials from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::get_path()?;
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        log::debug!("Saved credentials to {}", path.display());
        Ok(())
    }

    pub fn logout() -> Result<()> {
        let path = Self::get_path()?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// The stored token, but only if it was issued by the server we are about to talk to.
    pub fn token_for(&self, api_url: &str) -> Option<&str> {
        match (&self.token, &self.api_url) {
            (Some(token), Some(url)) if url == api_url => Some(token.as_str()),
            _ => None,
        }
    }
}
