//! Editor configuration
//!
//! Configuration is organized into logical sections:
//! - Interaction tolerances (screen-space pixels, divided by zoom at use)
//! - Undo journal depth
//! - Diagnostics cadence (state validator, transition history)
//! - Viewport scalar bounds enforced by the validator
//!
//! Files are TOML or JSON, selected by extension. Missing keys fall back to
//! their defaults so older config files keep loading.

use diagramkit_core::constants;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Pointer interaction tolerances and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Resize/rotate handle hit radius in screen pixels
    pub handle_tolerance_px: f64,
    /// Edge hit tolerance in screen pixels
    pub hit_tolerance_px: f64,
    /// Rotate handle distance above the selection in screen pixels
    pub rotate_handle_offset_px: f64,
    /// Snap step for rotation when the snap modifier is held
    pub rotation_snap_degrees: f64,
    /// Radius within which a repeated click continues an overlap cycle
    pub cycle_click_tolerance_px: f64,
    /// Creation gestures below this extent (world units) are discarded
    pub min_shape_extent: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            handle_tolerance_px: constants::HANDLE_TOLERANCE_PX,
            hit_tolerance_px: constants::HIT_TOLERANCE_PX,
            rotate_handle_offset_px: constants::ROTATE_HANDLE_OFFSET_PX,
            rotation_snap_degrees: constants::ROTATION_SNAP_DEGREES,
            cycle_click_tolerance_px: constants::CYCLE_CLICK_TOLERANCE_PX,
            min_shape_extent: constants::MIN_SHAPE_EXTENT,
        }
    }
}

/// Undo journal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undoable commands; the oldest is evicted past this
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: constants::DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Diagnostics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsSettings {
    /// The validator runs once every this many repaint ticks
    pub validator_interval_ticks: u32,
    /// Number of state transitions retained for diagnostics
    pub state_history_capacity: usize,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            validator_interval_ticks: constants::DEFAULT_VALIDATOR_INTERVAL,
            state_history_capacity: constants::DEFAULT_STATE_HISTORY,
        }
    }
}

/// Viewport scalar bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            min_zoom: constants::MIN_ZOOM,
            max_zoom: constants::MAX_ZOOM,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub interaction: InteractionSettings,
    pub history: HistorySettings,
    pub diagnostics: DiagnosticsSettings,
    pub viewport: ViewportSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for DiagramKit.
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("diagramkit"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Default config file location.
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join("editor.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise return defaults.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(
                "No config at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::SaveError(e.to_string()))?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let i = &self.interaction;
        positive("interaction.handle_tolerance_px", i.handle_tolerance_px)?;
        positive("interaction.hit_tolerance_px", i.hit_tolerance_px)?;
        positive("interaction.rotate_handle_offset_px", i.rotate_handle_offset_px)?;
        positive("interaction.rotation_snap_degrees", i.rotation_snap_degrees)?;
        positive("interaction.cycle_click_tolerance_px", i.cycle_click_tolerance_px)?;
        if !(i.min_shape_extent.is_finite() && i.min_shape_extent >= 0.0) {
            return Err(out_of_range("interaction.min_shape_extent", i.min_shape_extent));
        }

        if self.history.limit == 0 {
            return Err(out_of_range("history.limit", self.history.limit));
        }

        if self.diagnostics.validator_interval_ticks == 0 {
            return Err(out_of_range(
                "diagnostics.validator_interval_ticks",
                self.diagnostics.validator_interval_ticks,
            ));
        }
        if self.diagnostics.state_history_capacity == 0 {
            return Err(out_of_range(
                "diagnostics.state_history_capacity",
                self.diagnostics.state_history_capacity,
            ));
        }

        positive("viewport.min_zoom", self.viewport.min_zoom)?;
        positive("viewport.max_zoom", self.viewport.max_zoom)?;
        if self.viewport.min_zoom > self.viewport.max_zoom {
            return Err(ConfigError::ValueOutOfRange {
                key: "viewport.min_zoom".to_string(),
                value: format!(
                    "{} > max_zoom {}",
                    self.viewport.min_zoom, self.viewport.max_zoom
                ),
            });
        }

        Ok(())
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn out_of_range(key: &str, value: impl std::fmt::Display) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
