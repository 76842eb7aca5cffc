use crate::core::{
    Position, DEFAULT_ATTRIBUTION, DEFAULT_DRIFT_DEG, DEFAULT_SEED_LAT, DEFAULT_SEED_LON,
    DEFAULT_TILE_URL, DEFAULT_ZOOM, MAX_ZOOM,
};
use crate::geolocation::PositionOptions;
use crate::map::CircleStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ENV_SEED_LAT: &str = "TRACKER_SEED_LAT";
pub const ENV_SEED_LON: &str = "TRACKER_SEED_LON";
pub const ENV_ZOOM: &str = "TRACKER_ZOOM";
pub const ENV_DRIFT_DEG: &str = "TRACKER_DRIFT_DEG";
pub const ENV_TILE_URL: &str = "TRACKER_TILE_URL";

/// Tracker view configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Label shown in the device popup and page title
    pub device_name: String,
    /// Device position at startup
    pub seed_position: Position,
    /// Initial map zoom level
    pub zoom: f64,
    /// Half-width of the uniform refresh drift (degrees)
    pub drift_half_width_deg: f64,
    /// Clamp latitude and wrap longitude after each drift
    pub clamp_to_valid_range: bool,
    pub tiles: TileConfig,
    /// Options forwarded to the host with each locate request
    pub geolocation: PositionOptions,
    /// Drop locate completions that were overtaken by a newer request
    pub discard_stale_locates: bool,
    pub circle_style: CircleStyle,
    /// Meta refresh interval for rendered pages
    pub page_reload_secs: Option<u32>,
}

/// Map tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            device_name: "Asset Tracker #1".to_string(),
            seed_position: Position::new(DEFAULT_SEED_LAT, DEFAULT_SEED_LON),
            zoom: DEFAULT_ZOOM,
            drift_half_width_deg: DEFAULT_DRIFT_DEG,
            clamp_to_valid_range: false,
            tiles: TileConfig::default(),
            geolocation: PositionOptions::default(),
            discard_stale_locates: false,
            circle_style: CircleStyle::default(),
            page_reload_secs: Some(3),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("I/O error: {message}")]
    IoError { message: String },
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl ConfigError {
    fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn into_result(self) -> Result<Vec<String>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.warnings),
        }
    }
}

/// Owns the active tracker configuration and its backing file
pub struct ConfigurationManager {
    config: TrackerConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn into_config(self) -> TrackerConfig {
        self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: TrackerConfig) -> Result<(), ConfigError> {
        Self::validate(&config).into_result()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: TrackerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        for warning in Self::validate(&config).into_result()? {
            tracing::warn!(path = %path_str, "{}", warning);
        }

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            }
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            }),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Apply `TRACKER_*` environment variables on top of the current settings
    pub fn apply_env_overrides(&mut self) -> Result<usize, ConfigError> {
        self.apply_overrides_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup; returns how many were applied
    pub fn apply_overrides_with<F>(&mut self, lookup: F) -> Result<usize, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::invalid(key, raw, "not a number"))
        }

        let mut candidate = self.config.clone();
        let mut applied = 0;

        if let Some(raw) = lookup(ENV_SEED_LAT) {
            candidate.seed_position.lat = parse(ENV_SEED_LAT, &raw)?;
            applied += 1;
        }
        if let Some(raw) = lookup(ENV_SEED_LON) {
            candidate.seed_position.lon = parse(ENV_SEED_LON, &raw)?;
            applied += 1;
        }
        if let Some(raw) = lookup(ENV_ZOOM) {
            candidate.zoom = parse(ENV_ZOOM, &raw)?;
            applied += 1;
        }
        if let Some(raw) = lookup(ENV_DRIFT_DEG) {
            candidate.drift_half_width_deg = parse(ENV_DRIFT_DEG, &raw)?;
            applied += 1;
        }
        if let Some(raw) = lookup(ENV_TILE_URL) {
            candidate.tiles.url_template = raw;
            applied += 1;
        }

        if applied > 0 {
            self.update_config(candidate)?;
            tracing::debug!(applied, "applied configuration overrides");
        }
        Ok(applied)
    }

    // Runtime parameter adjustment

    /// Update the drift half-width, returning the previous value
    pub fn set_drift_half_width(&mut self, half_width_deg: f64) -> Result<f64, ConfigError> {
        let mut candidate = self.config.clone();
        candidate.drift_half_width_deg = half_width_deg;
        let old_value = self.config.drift_half_width_deg;
        self.update_config(candidate)?;
        Ok(old_value)
    }

    /// Update the initial zoom, returning the previous value
    pub fn set_zoom(&mut self, zoom: f64) -> Result<f64, ConfigError> {
        let mut candidate = self.config.clone();
        candidate.zoom = zoom;
        let old_value = self.config.zoom;
        self.update_config(candidate)?;
        Ok(old_value)
    }

    /// Validate a configuration
    pub fn validate(config: &TrackerConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !config.seed_position.is_valid() {
            result.errors.push(ConfigError::invalid(
                "seed_position",
                format!("{}, {}", config.seed_position.lat, config.seed_position.lon),
                "latitude must be within [-90, 90] and longitude within [-180, 180]",
            ));
        }

        if !(0.0..=MAX_ZOOM).contains(&config.zoom) {
            result.errors.push(ConfigError::invalid(
                "zoom",
                config.zoom,
                "zoom must be between 0 and 22",
            ));
        }

        if !config.drift_half_width_deg.is_finite() || config.drift_half_width_deg <= 0.0 {
            result.errors.push(ConfigError::invalid(
                "drift_half_width_deg",
                config.drift_half_width_deg,
                "drift half-width must be a positive number of degrees",
            ));
        } else if config.drift_half_width_deg > 0.1 {
            result.warnings.push(format!(
                "drift half-width {} deg moves the device kilometres per refresh",
                config.drift_half_width_deg
            ));
        }

        if config.tiles.url_template.trim().is_empty() {
            result.errors.push(ConfigError::invalid(
                "tiles.url_template",
                "",
                "a tile URL template is required",
            ));
        } else if !["{z}", "{x}", "{y}"]
            .iter()
            .all(|token| config.tiles.url_template.contains(token))
        {
            result.warnings.push(format!(
                "tile URL '{}' lacks {{z}}/{{x}}/{{y}} placeholders",
                config.tiles.url_template
            ));
        }

        if config.tiles.attribution.trim().is_empty() {
            result.errors.push(ConfigError::invalid(
                "tiles.attribution",
                "",
                "tile providers require an attribution string",
            ));
        }

        if !(0.0..=1.0).contains(&config.circle_style.fill_opacity) {
            result.errors.push(ConfigError::invalid(
                "circle_style.fill_opacity",
                config.circle_style.fill_opacity,
                "opacity must be between 0 and 1",
            ));
        }

        if config.geolocation.timeout_ms == Some(0) {
            result.warnings.push("geolocation timeout of 0 ms fails every request".to_string());
        }

        result.is_valid = result.errors.is_empty();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigurationManager::validate(&TrackerConfig::default());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let mut manager = ConfigurationManager::new();
        manager.set_drift_half_width(0.002).unwrap();
        assert!(manager.is_modified());

        let temp_path = std::env::temp_dir().join(format!("tracker_config_{}.json", std::process::id()));

        manager.save_to_file(&temp_path).unwrap();
        assert!(!manager.is_modified());
        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();

        assert_eq!(loaded.config(), manager.config());
        assert_eq!(loaded.config().drift_half_width_deg, 0.002);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_path = std::env::temp_dir().join(format!("tracker_partial_{}.json", std::process::id()));
        fs::write(&temp_path, r#"{ "device_name": "Van 7", "zoom": 15 }"#).unwrap();

        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();
        assert_eq!(loaded.config().device_name, "Van 7");
        assert_eq!(loaded.config().zoom, 15.0);
        assert_eq!(loaded.config().drift_half_width_deg, DEFAULT_DRIFT_DEG);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_partial_nested_sections_use_defaults() {
        let temp_path = std::env::temp_dir().join(format!("tracker_nested_{}.json", std::process::id()));
        fs::write(
            &temp_path,
            r#"{ "geolocation": { "timeout_ms": 5000 }, "circle_style": { "color": "red" } }"#,
        )
        .unwrap();

        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();
        let geolocation = &loaded.config().geolocation;
        assert_eq!(geolocation.timeout_ms, Some(5000));
        assert!(geolocation.enable_high_accuracy);
        assert_eq!(geolocation.maximum_age_ms, 0);

        let style = &loaded.config().circle_style;
        let defaults = CircleStyle::default();
        assert_eq!(style.color, "red");
        assert_eq!(style.fill_color, defaults.fill_color);
        assert_eq!(style.fill_opacity, defaults.fill_opacity);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigurationManager::from_file(PathBuf::from("/nonexistent/tracker.json"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut manager = ConfigurationManager::new();

        assert!(manager.set_drift_half_width(0.0).is_err());
        assert!(manager.set_drift_half_width(-0.001).is_err());
        assert!(manager.set_zoom(23.0).is_err());
        assert_eq!(manager.config().zoom, DEFAULT_ZOOM);
        assert!(!manager.is_modified());

        let mut config = TrackerConfig::default();
        config.seed_position = Position::new(95.0, 0.0);
        assert!(matches!(
            manager.update_config(config),
            Err(ConfigError::InvalidParameter { parameter, .. }) if parameter == "seed_position"
        ));

        let mut config = TrackerConfig::default();
        config.tiles.url_template = "  ".to_string();
        assert!(!ConfigurationManager::validate(&config).is_valid);
    }

    #[test]
    fn test_runtime_zoom_adjustment() {
        let mut manager = ConfigurationManager::new();
        let old = manager.set_zoom(16.0).unwrap();
        assert_eq!(old, DEFAULT_ZOOM);
        assert_eq!(manager.config().zoom, 16.0);
    }

    #[test]
    fn test_large_drift_is_warning_only() {
        let mut config = TrackerConfig::default();
        config.drift_half_width_deg = 0.5;
        let result = ConfigurationManager::validate(&config);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_SEED_LAT, "48.8566"),
            (ENV_SEED_LON, " 2.3522 "),
            (ENV_DRIFT_DEG, "0.0005"),
        ]
        .into_iter()
        .collect();

        let mut manager = ConfigurationManager::new();
        let applied = manager
            .apply_overrides_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(manager.config().seed_position, Position::new(48.8566, 2.3522));
        assert_eq!(manager.config().drift_half_width_deg, 0.0005);
        assert_eq!(manager.config().zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_bad_override_leaves_config_untouched() {
        let mut manager = ConfigurationManager::new();
        let result = manager.apply_overrides_with(|key| {
            (key == ENV_ZOOM).then(|| "close".to_string())
        });

        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { parameter, .. }) if parameter == ENV_ZOOM
        ));
        assert_eq!(manager.config(), &TrackerConfig::default());
    }
}
