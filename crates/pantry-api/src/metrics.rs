//! Prometheus registry for the service counters.
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub predictions: IntCounterVec,
    pub weather_fallbacks: IntCounter,
    pub inventory_items: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let predictions = IntCounterVec::new(
            Opts::new("pantry_predictions_total", "Expiry predictions stored"),
            &["model_version"],
        )?;
        let weather_fallbacks = IntCounter::new(
            "pantry_weather_fallbacks_total",
            "Predictions made with the fallback weather reading",
        )?;
        let inventory_items = IntGauge::new("pantry_inventory_items", "Inventory items currently stored")?;

        registry.register(Box::new(predictions.clone()))?;
        registry.register(Box::new(weather_fallbacks.clone()))?;
        registry.register(Box::new(inventory_items.clone()))?;

        Ok(Self {
            registry,
            predictions,
            weather_fallbacks,
            inventory_items,
        })
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
