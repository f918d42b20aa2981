//! Pantry Core: expiry prediction and the inventory domain around it
//!
//! The only non-trivial logic is the shelf-life predictor in [`predictor`]:
//! a pure function from product shelf-life figures, storage method, weather
//! and purchase dates to a predicted expiry date.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pantry_core::{predict, ProductShelfLife, PurchaseContext, StorageProfile, WeatherReading};
//!
//! let product = ProductShelfLife::base(10).with_fridge(20);
//! let storage = StorageProfile::named("Fridge");
//! let bought = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//! let prediction = predict(&product, &storage, &WeatherReading::FALLBACK, &PurchaseContext::sealed(bought));
//! assert_eq!(prediction.predicted_expiry, NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
//! assert_eq!(prediction.model_version, "rb-1.1");
//! ```

pub mod catalog;
pub mod data_model;
pub mod error;
pub mod freshness;
pub mod insights;
pub mod inventory;
pub mod predictor;
pub mod valuation;

pub use catalog::{Catalog, Product, ShelfLifeExport, StorageMethod};
pub use data_model::{Prediction, ProductShelfLife, PurchaseContext, StorageProfile, WeatherReading};
pub use error::PantryError;
pub use freshness::{days_left, Freshness, FreshnessStatus};
pub use insights::{InsightEntry, Insights};
pub use inventory::{
    current_prediction, Feedback, InventoryItem, InventoryUpdate, NewFeedback, NewInventoryItem,
    PredictionRecord, User, WeatherSnapshot,
};
pub use predictor::{predict, RuleBased, ShelfLifeModel, StorageKind, CONFIDENCE, MODEL_VERSION};

/// Crate version
pub const PANTRY_VERSION: &str = env!("CARGO_PKG_VERSION");
