//! Data Model: predictor inputs and the Prediction it produces
//!
//! Every type here is a plain value. The predictor reads them and never
//! mutates or retains them.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shelf-life figures for one product, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductShelfLife {
    /// Used when no storage-specific figure applies
    pub base_shelf_life_days: u32,
    /// Room-temperature figure; `None` falls through, `Some(0)` is a real zero-day figure
    pub room_temp_shelf_life_days: Option<u32>,
    /// Refrigerated figure; `None` falls through, `Some(0)` is a real zero-day figure
    pub fridge_shelf_life_days: Option<u32>,
    /// Frozen figure; `None` falls through, `Some(0)` is a real zero-day figure
    pub freezer_shelf_life_days: Option<u32>,
}

impl ProductShelfLife {
    pub fn base(days: u32) -> Self {
        Self {
            base_shelf_life_days: days,
            room_temp_shelf_life_days: None,
            fridge_shelf_life_days: None,
            freezer_shelf_life_days: None,
        }
    }

    pub fn with_room(mut self, days: u32) -> Self {
        self.room_temp_shelf_life_days = Some(days);
        self
    }

    pub fn with_fridge(mut self, days: u32) -> Self {
        self.fridge_shelf_life_days = Some(days);
        self
    }

    pub fn with_freezer(mut self, days: u32) -> Self {
        self.freezer_shelf_life_days = Some(days);
        self
    }
}

/// Environmental profile of a storage method.
///
/// `name` is free text ("Refrigerator", "Chest Freezer", ...) and is the only
/// signal used to classify the storage. The temperature and humidity fields
/// are carried for callers but do not enter the `rb-1.1` arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageProfile {
    pub name: String,
    pub temp_range_min_c: f64,
    pub temp_range_max_c: f64,
    pub humidity_preferred: f64,
}

impl StorageProfile {
    /// Profile with only a name; ranges are zeroed.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temp_range_min_c: 0.0,
            temp_range_max_c: 0.0,
            humidity_preferred: 0.0,
        }
    }
}

/// Ambient conditions at prediction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temp_c: f64,
    /// Relative humidity, 0-100
    pub humidity: f64,
}

impl WeatherReading {
    /// Ambient-room reading substituted by callers when no lookup succeeds.
    pub const FALLBACK: WeatherReading = WeatherReading {
        temp_c: 20.0,
        humidity: 60.0,
    };

    pub fn new(temp_c: f64, humidity: f64) -> Self {
        Self { temp_c, humidity }
    }
}

impl Default for WeatherReading {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Dates as entered by the user; no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseContext {
    pub purchased_at: NaiveDate,
    pub opened_at: Option<NaiveDate>,
}

impl PurchaseContext {
    pub fn sealed(purchased_at: NaiveDate) -> Self {
        Self {
            purchased_at,
            opened_at: None,
        }
    }

    pub fn opened(purchased_at: NaiveDate, opened_at: NaiveDate) -> Self {
        Self {
            purchased_at,
            opened_at: Some(opened_at),
        }
    }

    pub fn is_opened(&self) -> bool {
        self.opened_at.is_some()
    }
}

/// Output of a shelf-life model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_expiry: NaiveDate,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub model_version: String,
}
