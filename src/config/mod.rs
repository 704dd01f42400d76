//! Configuration module for Panya Chat.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the backend,
//! audio capture and window, `AppPaths` for cross-platform directories, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, ServerConfig, UiConfig, DEFAULT_GREETING};
