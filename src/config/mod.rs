use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("zoom scale must be a positive finite number, got {0}")]
    InvalidZoomScale(f64),
    #[error("mobile breakpoint must be a non-negative finite number, got {0}")]
    InvalidBreakpoint(f64),
    #[error("unknown move type {0:?}; expected \"pan\" or \"drag\"")]
    UnknownMoveType(String),
    #[error("unknown zoom type {0:?}; expected \"click\" or \"hover\"")]
    UnknownZoomType(String),
    #[error("image source is empty")]
    MissingSource,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

const APP_DIR: &str = "inner-zoom";
const APP_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_FADE_DURATION_MS: u64 = 150;
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 640.0;
pub const DEFAULT_ZOOM_SCALE: f64 = 1.0;

/// How the zoom image follows input once zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveType {
    #[default]
    Pan,
    Drag,
}

/// What zooms the image in for pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomType {
    #[default]
    Click,
    Hover,
}

impl FromStr for MoveType {
    type Err = ConfigError;

    fn from_str(value: &str) -> ConfigResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pan" => Ok(Self::Pan),
            "drag" => Ok(Self::Drag),
            _ => Err(ConfigError::UnknownMoveType(value.to_string())),
        }
    }
}

impl FromStr for ZoomType {
    type Err = ConfigError;

    fn from_str(value: &str) -> ConfigResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "click" => Ok(Self::Click),
            "hover" => Ok(Self::Hover),
            _ => Err(ConfigError::UnknownZoomType(value.to_string())),
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pan => f.write_str("pan"),
            Self::Drag => f.write_str("drag"),
        }
    }
}

/// Widget behavior settings, loadable from `config.json` or a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub move_type: MoveType,
    pub zoom_type: ZoomType,
    pub zoom_scale: f64,
    pub zoom_preload: bool,
    pub fade_duration_ms: u64,
    pub fullscreen_on_mobile: bool,
    pub mobile_breakpoint: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            move_type: MoveType::Pan,
            zoom_type: ZoomType::Click,
            zoom_scale: DEFAULT_ZOOM_SCALE,
            zoom_preload: false,
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            fullscreen_on_mobile: false,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
        }
    }
}

impl ZoomConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.zoom_scale.is_finite() || self.zoom_scale <= 0.0 {
            return Err(ConfigError::InvalidZoomScale(self.zoom_scale));
        }
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint < 0.0 {
            return Err(ConfigError::InvalidBreakpoint(self.mobile_breakpoint));
        }
        Ok(())
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// Equivalent of a `(max-width: <breakpoint>px)` media query.
    pub fn matches_mobile_breakpoint(&self, viewport_width: f64) -> bool {
        viewport_width <= self.mobile_breakpoint
    }
}

pub fn load_zoom_config() -> ZoomConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_zoom_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_zoom_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> ZoomConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return ZoomConfig::default(),
    };
    if !path.exists() {
        return ZoomConfig::default();
    }
    let config = match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            ZoomConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            return ZoomConfig::default();
        }
    };
    if let Err(err) = config.validate() {
        tracing::warn!(%err, ?path, "invalid config.json; using defaults");
        return ZoomConfig::default();
    }
    config
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "inner-zoom",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/inner-zoom/config.json"));
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path("inner-zoom", "config.json", None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/home/.config/inner-zoom/config.json"));
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("inner-zoom", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let config = load_zoom_config_with(
            Some(Path::new("/nonexistent/inner-zoom-test-root")),
            None,
        );
        assert_eq!(config, ZoomConfig::default());
    }

    #[test]
    fn partial_json_fills_remaining_fields_with_defaults() {
        let config: ZoomConfig =
            serde_json::from_str(r#"{"move_type":"drag","zoom_type":"hover","zoom_scale":2.5}"#)
                .expect("config should parse");

        assert_eq!(config.move_type, MoveType::Drag);
        assert_eq!(config.zoom_type, ZoomType::Hover);
        assert_eq!(config.zoom_scale, 2.5);
        assert_eq!(config.fade_duration_ms, DEFAULT_FADE_DURATION_MS);
        assert_eq!(config.mobile_breakpoint, DEFAULT_MOBILE_BREAKPOINT);
        assert!(!config.fullscreen_on_mobile);
    }

    #[test]
    fn move_and_zoom_types_parse_from_strings() {
        assert_eq!("pan".parse::<MoveType>(), Ok(MoveType::Pan));
        assert_eq!(" Drag ".parse::<MoveType>(), Ok(MoveType::Drag));
        assert_eq!("hover".parse::<ZoomType>(), Ok(ZoomType::Hover));
        assert_eq!(
            "swipe".parse::<MoveType>(),
            Err(ConfigError::UnknownMoveType("swipe".to_string()))
        );
        assert_eq!(
            "tap".parse::<ZoomType>(),
            Err(ConfigError::UnknownZoomType("tap".to_string()))
        );
    }

    #[test]
    fn validate_rejects_non_positive_zoom_scale() {
        let config = ZoomConfig {
            zoom_scale: 0.0,
            ..ZoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidZoomScale(0.0)));

        let config = ZoomConfig {
            mobile_breakpoint: f64::NAN,
            ..ZoomConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBreakpoint(_))
        ));
        assert!(ZoomConfig::default().validate().is_ok());
    }

    #[test]
    fn mobile_breakpoint_is_inclusive() {
        let config = ZoomConfig::default();
        assert!(config.matches_mobile_breakpoint(640.0));
        assert!(config.matches_mobile_breakpoint(375.0));
        assert!(!config.matches_mobile_breakpoint(641.0));
    }
}
