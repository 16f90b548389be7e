//! Application settings, defaults and TOML persistence.
//!
//! The client talks to exactly two remote endpoints — the transcription
//! service and the chat service.  Their addresses and the shared HTTP request
//! timeout live in [`AppConfig`], serialised as `settings.toml` under the
//! platform config directory.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL of the transcription endpoint (multipart audio upload).
    pub transcribe_url: String,
    /// URL of the chat endpoint (JSON `{ "message": … }`).
    pub chat_url: String,
    /// Maximum seconds to wait for either service before timing out.
    ///
    /// Transcription of longer recordings can take a while on CPU-only
    /// services, so this default is generous.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transcribe_url: "http://localhost:5000/transcribe".into(),
            chat_url: "http://localhost:5000/chat".into(),
            request_timeout_secs: 120,
        }
    }
}

/// Platform-appropriate path of `settings.toml`
/// (e.g. `~/.config/voice-chat/settings.toml` on Linux).
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voice-chat")
        .join("settings.toml")
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_path())
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_service() {
        let config = AppConfig::default();
        assert_eq!(config.transcribe_url, "http://localhost:5000/transcribe");
        assert_eq!(config.chat_url, "http://localhost:5000/chat");
        assert!(config.request_timeout_secs > 0);
    }

    #[test]
    fn load_from_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.chat_url, AppConfig::default().chat_url);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut config = AppConfig::default();
        config.transcribe_url = "http://example.com/transcribe".into();
        config.request_timeout_secs = 7;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.transcribe_url, "http://example.com/transcribe");
        assert_eq!(loaded.request_timeout_secs, 7);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "transcribe_url = [not valid").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
