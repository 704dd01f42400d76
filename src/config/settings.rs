//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the
//! transport task.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Greeting shown as the first assistant message of every session.
pub const DEFAULT_GREETING: &str =
    "สวัสดีครับ! ผมคือผู้ช่วย AI สำหรับ PLCnext มีอะไรให้ผมช่วยเหลือไหมครับ?";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Where the assistant backend lives.
///
/// Read once at startup; the running window never changes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the backend, without a trailing slash
    /// (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// Seconds to wait for any single request before giving up.
    ///
    /// RAG answers from a local LLM are slow; keep this generous.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sample rate of the WAV clip uploaded for transcription.
    pub sample_rate: u32,
    /// Recording stops on its own once it reaches this length.
    pub max_recording_secs: u32,
    /// Input device name; `None` means the system default.
    pub input_device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            max_recording_secs: 120,
            input_device: None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Header title.
    pub title: String,
    /// Smaller line under the title.
    pub subtitle: String,
    /// First assistant message of every session.
    pub greeting: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (760.0, 820.0),
            title: "PLCnext AI Assistant".into(),
            subtitle: "ขับเคลื่อนโดย LLaMA 3 และ RAG".into(),
            greeting: DEFAULT_GREETING.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use panya_chat::config::AppConfig;
///
/// // Returns Default when the file is missing.
/// let config = AppConfig::load().unwrap();
/// println!("backend at {}", config.server.base_url);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend location and timeouts.
    #[serde(default)]
    pub server: ServerConfig,
    /// Microphone capture settings.
    #[serde(default)]
    pub audio: AudioConfig,
    /// Window settings.
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.server.base_url, loaded.server.base_url);
        assert_eq!(original.server.timeout_secs, loaded.server.timeout_secs);
        assert_eq!(original.audio.sample_rate, loaded.audio.sample_rate);
        assert_eq!(
            original.audio.max_recording_secs,
            loaded.audio.max_recording_secs
        );
        assert_eq!(original.audio.input_device, loaded.audio.input_device);
        assert_eq!(original.ui.window_size, loaded.ui.window_size);
        assert_eq!(original.ui.greeting, loaded.ui.greeting);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");

        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.audio.sample_rate, 16_000);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.server.base_url, "http://localhost:8000");
        assert_eq!(cfg.server.timeout_secs, 120);
        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.max_recording_secs, 120);
        assert!(cfg.audio.input_device.is_none());
        assert_eq!(cfg.ui.title, "PLCnext AI Assistant");
        assert_eq!(cfg.ui.greeting, DEFAULT_GREETING);
    }

    /// A file that only sets the server section still loads; the other
    /// sections fall back to their defaults.
    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[server]\nbase_url = \"http://10.0.0.5:8000\"\ntimeout_secs = 30\n",
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");

        assert_eq!(cfg.server.base_url, "http://10.0.0.5:8000");
        assert_eq!(cfg.server.timeout_secs, 30);
        assert_eq!(cfg.audio.max_recording_secs, 120);
        assert_eq!(cfg.ui.greeting, DEFAULT_GREETING);
    }

    /// Keys missing inside a section take that section's defaults instead
    /// of failing the whole file.
    #[test]
    fn partial_section_keeps_the_keys_it_sets() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("only_url.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://plc-lab:8000\"\n\n[audio]\nmax_recording_secs = 45\n")
            .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");

        assert_eq!(cfg.server.base_url, "http://plc-lab:8000");
        assert_eq!(cfg.server.timeout_secs, 120);
        assert_eq!(cfg.audio.max_recording_secs, 45);
        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.ui.title, "PLCnext AI Assistant");
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.server.base_url = "http://192.168.1.20:8000".into();
        cfg.audio.max_recording_secs = 30;
        cfg.audio.input_device = Some("USB Microphone".into());
        cfg.ui.window_size = (640.0, 700.0);

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.server.base_url, "http://192.168.1.20:8000");
        assert_eq!(loaded.audio.max_recording_secs, 30);
        assert_eq!(loaded.audio.input_device.as_deref(), Some("USB Microphone"));
        assert_eq!(loaded.ui.window_size, (640.0, 700.0));
    }
}
