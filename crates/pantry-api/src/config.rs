//! Service configuration
//!
//! Read from a YAML file, then overridden by environment variables.
use pantry_core::inventory::DEFAULT_CITY;
use pantry_core::PantryError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/pantry.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listen address (ex: "0.0.0.0:8787")
    pub listen_addr: String,
    /// Catalog seed file
    pub catalog_path: String,
    /// City used for users without one
    pub default_city: String,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap key; lookups are disabled without it
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8787".to_string(),
            catalog_path: "catalog/seed.yaml".to_string(),
            default_city: DEFAULT_CITY.to_string(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// Load config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, PantryError> {
        serde_yaml::from_str(yaml).map_err(|e| PantryError::Config(e.to_string()))
    }

    /// Reads `path` if it exists, defaults otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PantryError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| PantryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    /// File named by PANTRY_CONFIG, then environment overrides.
    pub fn from_env() -> Result<Self, PantryError> {
        let path = std::env::var("PANTRY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("PANTRY_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(path) = lookup("PANTRY_CATALOG") {
            self.catalog_path = path;
        }
        if let Some(city) = lookup("PANTRY_DEFAULT_CITY") {
            self.default_city = city;
        }
        if let Some(key) = lookup("WEATHER_API_KEY").filter(|k| !k.is_empty()) {
            self.weather.api_key = Some(key);
        }
    }
}
