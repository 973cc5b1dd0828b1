//! DiagramKit Settings Crate
//!
//! Handles editor configuration: interaction tolerances, undo depth,
//! diagnostics cadence and viewport bounds, persisted as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{
    DiagnosticsSettings, EditorConfig, HistorySettings, InteractionSettings, ViewportSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
