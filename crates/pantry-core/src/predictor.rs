//! Shelf-life predictor
//!
//! Combines a product's shelf-life table, the storage method, the weather and
//! the opened state into a predicted expiry date. Deterministic and total:
//! the same inputs always produce the same `Prediction`, and no input can make
//! it fail.
//!
//! ```text
//! storage name ──► StorageKind::matching ──► select_shelf_life ──┐
//!                                                                ▼
//! opened_at ─────────────────────────────► apply_opened_penalty ──► purchased_at + days
//! ```

use crate::data_model::{Prediction, ProductShelfLife, PurchaseContext, StorageProfile, WeatherReading};
use chrono::{Days, NaiveDate};

/// Revision tag of the rule-based arithmetic. Bump whenever it changes.
pub const MODEL_VERSION: &str = "rb-1.1";

/// Confidence reported by `rb-1.1`. Constant for this revision.
pub const CONFIDENCE: f64 = 0.85;

/// Fraction of shelf life retained once a package is opened.
pub const OPENED_SHELF_LIFE_FACTOR: f64 = 0.75;

/// Storage environments that carry a product-specific shelf-life override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Room,
    Fridge,
    Freezer,
}

impl StorageKind {
    /// Precedence order used when a name matches several kinds.
    pub const PRECEDENCE: [StorageKind; 3] = [Self::Room, Self::Fridge, Self::Freezer];

    /// Lower-case substrings that identify this kind in a storage name.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Room => &["room"],
            Self::Fridge => &["fridge", "refrig"],
            Self::Freezer => &["freezer"],
        }
    }

    /// Every kind whose keyword appears in `name`, case-insensitively, in
    /// precedence order.
    pub fn matching(name: &str) -> impl Iterator<Item = StorageKind> {
        let lowered = name.to_lowercase();
        Self::PRECEDENCE
            .into_iter()
            .filter(move |kind| kind.keywords().iter().any(|kw| lowered.contains(kw)))
    }

    /// The product's override for this kind, if the catalog has one.
    pub fn override_for(self, product: &ProductShelfLife) -> Option<u32> {
        match self {
            Self::Room => product.room_temp_shelf_life_days,
            Self::Fridge => product.fridge_shelf_life_days,
            Self::Freezer => product.freezer_shelf_life_days,
        }
    }
}

/// Picks the shelf life that applies to `storage_name`.
///
/// The first matching kind with an override wins; a matching kind without an
/// override falls through to the next. With nothing left the base figure is
/// used.
pub fn select_shelf_life(product: &ProductShelfLife, storage_name: &str) -> u32 {
    StorageKind::matching(storage_name)
        .find_map(|kind| kind.override_for(product))
        .unwrap_or(product.base_shelf_life_days)
}

/// Flat 25% reduction for opened packages, floored to whole days.
pub fn apply_opened_penalty(days: u32, opened: bool) -> u32 {
    if opened {
        (f64::from(days) * OPENED_SHELF_LIFE_FACTOR).floor() as u32
    } else {
        days
    }
}

/// Calendar-day addition, saturating at the last representable date.
fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// A revision of the expiry arithmetic.
pub trait ShelfLifeModel: Send + Sync {
    /// Tag stored with every prediction this model produces
    fn version(&self) -> &'static str;

    fn predict(
        &self,
        product: &ProductShelfLife,
        storage: &StorageProfile,
        weather: &WeatherReading,
        context: &PurchaseContext,
    ) -> Prediction;
}

/// The keyword-and-penalty model tagged `rb-1.1`.
///
/// Weather and the storage temperature/humidity ranges are accepted but do not
/// enter the arithmetic or the confidence in this revision.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBased;

impl RuleBased {
    /// Effective shelf life in days after storage selection and opened penalty.
    pub fn effective_days(
        &self,
        product: &ProductShelfLife,
        storage: &StorageProfile,
        context: &PurchaseContext,
    ) -> u32 {
        let selected = select_shelf_life(product, &storage.name);
        apply_opened_penalty(selected, context.is_opened())
    }
}

impl ShelfLifeModel for RuleBased {
    fn version(&self) -> &'static str {
        MODEL_VERSION
    }

    fn predict(
        &self,
        product: &ProductShelfLife,
        storage: &StorageProfile,
        _weather: &WeatherReading,
        context: &PurchaseContext,
    ) -> Prediction {
        let days = self.effective_days(product, storage, context);
        Prediction {
            predicted_expiry: add_days(context.purchased_at, days),
            confidence: CONFIDENCE,
            model_version: MODEL_VERSION.to_string(),
        }
    }
}

/// Predicts with the current model revision.
pub fn predict(
    product: &ProductShelfLife,
    storage: &StorageProfile,
    weather: &WeatherReading,
    context: &PurchaseContext,
) -> Prediction {
    RuleBased.predict(product, storage, weather, context)
}
