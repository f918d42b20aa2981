//! Weather lookup by city
//!
//! Lookups are best effort. Callers go through [`reading_or_fallback`], which
//! substitutes `WeatherReading::FALLBACK` whenever a provider fails, so a
//! missing reading never blocks a prediction.

use crate::config::WeatherConfig;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use pantry_core::{PantryError, WeatherReading};
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

/// Administrative words geocoders append to Indian place names.
static ADMIN_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)taluk|district").expect("admin suffix pattern is valid"));

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReading, PantryError>;
}

/// Outcome of a lookup after fallback substitution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedWeather {
    pub reading: WeatherReading,
    /// True when `reading` is the fallback rather than a real observation
    pub fallback: bool,
}

impl ResolvedWeather {
    /// The reading worth persisting as a snapshot, if it was observed.
    pub fn observed(&self) -> Option<WeatherReading> {
        (!self.fallback).then_some(self.reading)
    }
}

pub async fn reading_or_fallback(provider: &dyn WeatherProvider, city: &str) -> ResolvedWeather {
    match provider.current(city).await {
        Ok(reading) => ResolvedWeather {
            reading,
            fallback: false,
        },
        Err(err) => {
            tracing::warn!(%city, error = %err, "weather unavailable, using fallback reading");
            ResolvedWeather {
                reading: WeatherReading::FALLBACK,
                fallback: true,
            }
        }
    }
}

/// Fixed provider: always the same reading, or always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticWeather {
    reading: Option<WeatherReading>,
}

impl StaticWeather {
    pub fn new(reading: WeatherReading) -> Self {
        Self {
            reading: Some(reading),
        }
    }

    pub fn unavailable() -> Self {
        Self { reading: None }
    }
}

#[async_trait]
impl WeatherProvider for StaticWeather {
    async fn current(&self, _city: &str) -> Result<WeatherReading, PantryError> {
        self.reading
            .ok_or_else(|| PantryError::Weather("no weather source configured".to_string()))
    }
}

/// OpenWeatherMap client: geocode, then current conditions in metric units.
pub struct OpenWeatherMap {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherMap {
    pub fn new(api_key: String, config: &WeatherConfig) -> Result<Self, PantryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PantryError::Config(format!("weather client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<(u16, Value), PantryError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PantryError::Weather(e.to_string()))?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Ok((status, Value::Null));
        }
        let body = resp
            .json::<Value>()
            .await
            .map_err(|e| PantryError::Weather(e.to_string()))?;
        Ok((status, body))
    }

    async fn geocode(&self, city: &str) -> Option<(f64, f64)> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let query = [("q", city.to_string()), ("limit", "1".to_string())];
        match self.get_json(&url, &query).await {
            Ok((_, body)) => {
                let first = body.get(0)?;
                Some((first.get("lat")?.as_f64()?, first.get("lon")?.as_f64()?))
            }
            Err(err) => {
                tracing::debug!(%city, error = %err, "geocoding failed");
                None
            }
        }
    }

    async fn fetch(&self, city: &str) -> Result<(u16, Option<WeatherReading>), PantryError> {
        let mut query = vec![("units", "metric".to_string())];
        match self.geocode(city).await {
            Some((lat, lon)) => {
                query.push(("lat", lat.to_string()));
                query.push(("lon", lon.to_string()));
            }
            None => query.push(("q", city.to_string())),
        }
        let url = format!("{}/data/2.5/weather", self.base_url);
        let (status, body) = self.get_json(&url, &query).await?;
        Ok((status, parse_current(&body)))
    }
}

/// Extracts temperature and humidity from a current-weather response body.
pub fn parse_current(body: &Value) -> Option<WeatherReading> {
    let main = body.get("main")?;
    let temp_c = main.get("temp")?.as_f64()?;
    let humidity = main
        .get("humidity")
        .and_then(Value::as_f64)
        .unwrap_or(WeatherReading::FALLBACK.humidity);
    Some(WeatherReading { temp_c, humidity })
}

/// Drops administrative suffixes the geocoder does not recognise.
pub fn simplify_city(city: &str) -> Option<String> {
    let stripped = ADMIN_SUFFIX.replace_all(city, "");
    let simplified = stripped
        .trim_matches(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .to_string();
    (!simplified.is_empty() && simplified != city).then_some(simplified)
}

#[async_trait]
impl WeatherProvider for OpenWeatherMap {
    async fn current(&self, city: &str) -> Result<WeatherReading, PantryError> {
        let (status, reading) = self.fetch(city).await?;
        if let Some(reading) = reading {
            return Ok(reading);
        }
        if status == 404 {
            if let Some(simplified) = simplify_city(city) {
                tracing::info!(%city, %simplified, "retrying weather lookup with simplified city");
                if let (_, Some(reading)) = self.fetch(&simplified).await? {
                    return Ok(reading);
                }
            }
        }
        Err(PantryError::Weather(format!(
            "no usable weather for '{}' (status {})",
            city, status
        )))
    }
}

/// Provider selected by configuration.
pub fn from_config(config: &WeatherConfig) -> Result<Box<dyn WeatherProvider>, PantryError> {
    match &config.api_key {
        Some(key) => Ok(Box::new(OpenWeatherMap::new(key.clone(), config)?)),
        None => {
            tracing::warn!("no weather API key configured, predictions use the fallback reading");
            Ok(Box::new(StaticWeather::unavailable()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_current() {
        let body = json!({ "main": { "temp": 31.5, "humidity": 80 }, "name": "Mysuru" });
        assert_eq!(parse_current(&body), Some(WeatherReading::new(31.5, 80.0)));

        let no_humidity = json!({ "main": { "temp": 4.0 } });
        assert_eq!(parse_current(&no_humidity), Some(WeatherReading::new(4.0, 60.0)));

        assert_eq!(parse_current(&json!({ "main": {} })), None);
        assert_eq!(parse_current(&Value::Null), None);
    }

    #[test]
    fn test_simplify_city() {
        assert_eq!(simplify_city("Hunsur Taluk"), Some("Hunsur".to_string()));
        assert_eq!(simplify_city("Mysore district"), Some("Mysore".to_string()));
        assert_eq!(simplify_city("London"), None);
        assert_eq!(simplify_city("Taluk"), None);
    }

    #[test]
    fn test_simplify_city_with_punctuation() {
        assert_eq!(
            simplify_city("Mysore District, Karnataka"),
            Some("Mysore , Karnataka".to_string())
        );
        assert_eq!(simplify_city("Hunsur-Taluk"), Some("Hunsur".to_string()));
        assert_eq!(simplify_city("Hunsur Taluk,"), Some("Hunsur".to_string()));
        assert_eq!(simplify_city("HUNSUR TALUK"), Some("HUNSUR".to_string()));
    }

    #[tokio::test]
    async fn test_fallback_substitution() {
        let resolved = reading_or_fallback(&StaticWeather::unavailable(), "London").await;
        assert!(resolved.fallback);
        assert_eq!(resolved.reading, WeatherReading::FALLBACK);
        assert_eq!(resolved.observed(), None);

        let real = WeatherReading::new(4.0, 65.0);
        let resolved = reading_or_fallback(&StaticWeather::new(real), "London").await;
        assert!(!resolved.fallback);
        assert_eq!(resolved.observed(), Some(real));
    }
}
