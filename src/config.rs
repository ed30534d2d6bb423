//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/archview/archview.toml`
//! 3. Local config: `<project_dir>/.archview.toml`
//! 4. Environment variables: `ARCHVIEW_*` prefix (`__` separates nesting)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::LayoutMetrics;

/// Default blueprint location, relative to the project directory.
pub const DEFAULT_BLUEPRINT: &str = "work/architecture-blueprint.toml";

/// Raw layout metrics for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutMetrics {
    pub layer_width: Option<f64>,
    pub layer_height: Option<f64>,
    pub gap: Option<f64>,
    pub padding: Option<f64>,
    pub spacing: Option<f64>,
    pub label_band: Option<f64>,
}

impl RawLayoutMetrics {
    /// Overlay specified fields onto `base`.
    pub fn apply(&self, base: &LayoutMetrics) -> LayoutMetrics {
        LayoutMetrics {
            layer_width: self.layer_width.unwrap_or(base.layer_width),
            layer_height: self.layer_height.unwrap_or(base.layer_height),
            gap: self.gap.unwrap_or(base.gap),
            padding: self.padding.unwrap_or(base.padding),
            spacing: self.spacing.unwrap_or(base.spacing),
            label_band: self.label_band.unwrap_or(base.label_band),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub blueprint: Option<PathBuf>,
    #[serde(default)]
    pub layout: RawLayoutMetrics,
}

/// Unified configuration for archview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Blueprint file (default: work/architecture-blueprint.toml)
    pub blueprint: PathBuf,
    /// Box dimensions used by the layout engine
    pub layout: LayoutMetrics,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blueprint: PathBuf::from(DEFAULT_BLUEPRINT),
            layout: LayoutMetrics::default(),
        }
    }
}

/// Get the XDG config directory for archview.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "archview").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("archview.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".archview.toml")
}

/// Expand environment variables and `~` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Resolve the blueprint path against `project_dir` when it is relative.
    pub fn blueprint_path(&self, project_dir: &Path) -> PathBuf {
        if self.blueprint.is_absolute() {
            self.blueprint.clone()
        } else {
            project_dir.join(&self.blueprint)
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.blueprint.to_string_lossy().as_ref());
        self.blueprint = PathBuf::from(expanded);
    }

    /// Overlay config onto self: specified values win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            blueprint: overlay
                .blueprint
                .clone()
                .unwrap_or_else(|| self.blueprint.clone()),
            layout: overlay.layout.apply(&self.layout),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/archview/archview.toml`
    /// 3. Local config: `<project_dir>/.archview.toml`
    /// 4. Environment variables: `ARCHVIEW_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project-local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        let env = Config::builder()
            .add_source(
                Environment::with_prefix("ARCHVIEW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;
        current = Self::apply_overrides(current, &env);

        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply explicit overrides (environment variables) onto settings.
    pub fn apply_overrides(mut settings: Self, config: &Config) -> Self {
        if let Ok(val) = config.get_string("blueprint") {
            settings.blueprint = PathBuf::from(val);
        }
        let layout = &mut settings.layout;
        if let Ok(val) = config.get_float("layout.layer_width") {
            layout.layer_width = val;
        }
        if let Ok(val) = config.get_float("layout.layer_height") {
            layout.layer_height = val;
        }
        if let Ok(val) = config.get_float("layout.gap") {
            layout.gap = val;
        }
        if let Ok(val) = config.get_float("layout.padding") {
            layout.padding = val;
        }
        if let Ok(val) = config.get_float("layout.spacing") {
            layout.spacing = val;
        }
        if let Ok(val) = config.get_float("layout.label_band") {
            layout.label_band = val;
        }
        settings
    }

    /// Reject metrics the layout engine cannot use.
    ///
    /// Box sizes must be positive; gaps, padding and label band non-negative.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let m = &self.layout;
        let positive = [("layer_width", m.layer_width), ("layer_height", m.layer_height)];
        let non_negative = [
            ("gap", m.gap),
            ("padding", m.padding),
            ("spacing", m.spacing),
            ("label_band", m.label_band),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ApplicationError::Config {
                    message: format!("layout.{name} must be a positive number, got {value}"),
                });
            }
        }
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ApplicationError::Config {
                    message: format!("layout.{name} must be zero or positive, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# archview configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/archview/archview.toml
#   Local:  <project_dir>/.archview.toml
#   Env:    ARCHVIEW_* environment variables, e.g. ARCHVIEW_LAYOUT__PADDING=10

# Blueprint file, relative to the project directory
# blueprint = "work/architecture-blueprint.toml"

[layout]
# Size of every layer box
# layer_width = 1200.0
# layer_height = 400.0

# Vertical gap between stacked layers
# gap = 50.0

# Inner padding of a box and spacing between siblings in a row
# padding = 20.0
# spacing = 20.0

# Label band at the top of a box; children start below it
# label_band = 40.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
