//! Inventory records: items, their predictions, weather snapshots and feedback
//!
//! Records here are what callers persist around the predictor. Predictions
//! are append-only; the most recently created one is the current prediction.

use crate::data_model::{Prediction, PurchaseContext, WeatherReading};
use crate::error::PantryError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CITY: &str = "London";

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default = "default_city")]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub storage_method_id: String,
    pub purchased_at: NaiveDate,
    pub opened_at: Option<NaiveDate>,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn purchase_context(&self) -> PurchaseContext {
        PurchaseContext {
            purchased_at: self.purchased_at,
            opened_at: self.opened_at,
        }
    }

    /// Applies an update and reports whether the prediction inputs changed.
    pub fn apply(&mut self, update: &InventoryUpdate, now: DateTime<Utc>) -> bool {
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone().filter(|n| !n.is_empty());
        }
        let mut repredict = false;
        if let Some(opened_at) = update.opened_at {
            repredict = self.opened_at != opened_at;
            self.opened_at = opened_at;
        }
        self.updated_at = now;
        repredict
    }
}

/// Body of an inventory creation request. Every field is optional on the
/// wire so that missing ones can be reported together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub product_id: Option<String>,
    pub storage_method_id: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub purchased_at: Option<NaiveDate>,
    pub opened_at: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidNewItem {
    pub product_id: String,
    pub storage_method_id: String,
    pub quantity: f64,
    pub unit: String,
    pub purchased_at: NaiveDate,
    pub opened_at: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

impl NewInventoryItem {
    pub fn validate(&self) -> Result<ValidNewItem, PantryError> {
        let product_id = present(&self.product_id);
        let storage_method_id = present(&self.storage_method_id);
        let unit = present(&self.unit);
        // a zero quantity is reported as missing
        let quantity = self.quantity.filter(|q| *q != 0.0);

        let mut missing = Vec::new();
        if product_id.is_none() {
            missing.push("Product");
        }
        if storage_method_id.is_none() {
            missing.push("Storage Method");
        }
        if quantity.is_none() {
            missing.push("Quantity");
        }
        if unit.is_none() {
            missing.push("Unit");
        }
        if self.purchased_at.is_none() {
            missing.push("Purchase Date");
        }

        match (product_id, storage_method_id, quantity, unit, self.purchased_at) {
            (Some(product_id), Some(storage_method_id), Some(quantity), Some(unit), Some(purchased_at)) => {
                if !quantity.is_finite() || quantity < 0.0 {
                    return Err(PantryError::Validation(
                        "Quantity must be a positive number".to_string(),
                    ));
                }
                Ok(ValidNewItem {
                    product_id,
                    storage_method_id,
                    quantity,
                    unit,
                    purchased_at,
                    opened_at: self.opened_at,
                    notes: present(&self.notes),
                })
            }
            _ => Err(PantryError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

impl ValidNewItem {
    pub fn into_item(self, user_id: &str, now: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            product_id: self.product_id,
            storage_method_id: self.storage_method_id,
            purchased_at: self.purchased_at,
            opened_at: self.opened_at,
            quantity: self.quantity,
            unit: self.unit,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub opened_at: Option<Option<NaiveDate>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl InventoryUpdate {
    pub fn validate(&self) -> Result<(), PantryError> {
        match self.quantity {
            Some(q) if !q.is_finite() || q <= 0.0 => Err(PantryError::Validation(
                "Quantity must be a positive number".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub inventory_item_id: String,
    pub predicted_expiry: NaiveDate,
    pub confidence: f64,
    pub model_version: String,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(inventory_item_id: &str, prediction: Prediction, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            inventory_item_id: inventory_item_id.to_string(),
            predicted_expiry: prediction.predicted_expiry,
            confidence: prediction.confidence,
            model_version: prediction.model_version,
            created_at: now,
        }
    }
}

/// Picks the current prediction: latest `created_at`, later insertion wins ties.
pub fn current_prediction<'a, I>(records: I) -> Option<&'a PredictionRecord>
where
    I: IntoIterator<Item = &'a PredictionRecord>,
{
    records
        .into_iter()
        .fold(None, |best: Option<&PredictionRecord>, r| match best {
            Some(b) if b.created_at > r.created_at => Some(b),
            _ => Some(r),
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub id: String,
    pub inventory_item_id: String,
    pub captured_at: DateTime<Utc>,
    pub temp_c: f64,
    pub humidity: f64,
}

impl WeatherSnapshot {
    pub fn capture(inventory_item_id: &str, reading: WeatherReading, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            inventory_item_id: inventory_item_id.to_string(),
            captured_at: now,
            temp_c: reading.temp_c,
            humidity: reading.humidity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub inventory_item_id: String,
    pub user_reported_expiry: Option<NaiveDate>,
    /// 1 (spoiled) to 5 (fresh)
    pub freshness_score: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFeedback {
    pub inventory_item_id: Option<String>,
    pub user_reported_expiry: Option<NaiveDate>,
    pub freshness_score: Option<i64>,
    pub notes: Option<String>,
}

impl NewFeedback {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Feedback, PantryError> {
        let inventory_item_id = present(&self.inventory_item_id).ok_or_else(|| {
            PantryError::Validation("Inventory item ID is required".to_string())
        })?;
        let freshness_score = match self.freshness_score {
            Some(score) if !(1..=5).contains(&score) => {
                return Err(PantryError::Validation(
                    "Freshness score must be between 1 and 5".to_string(),
                ))
            }
            Some(score) => Some(score as u8),
            None => None,
        };
        Ok(Feedback {
            id: Uuid::new_v4().to_string(),
            inventory_item_id,
            user_reported_expiry: self.user_reported_expiry,
            freshness_score,
            notes: present(&self.notes),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn complete() -> NewInventoryItem {
        NewInventoryItem {
            product_id: Some("milk".to_string()),
            storage_method_id: Some("fridge".to_string()),
            quantity: Some(2.0),
            unit: Some("l".to_string()),
            purchased_at: Some(date(2024, 1, 1)),
            opened_at: None,
            notes: Some(String::new()),
        }
    }

    #[test]
    fn test_valid_item() {
        let valid = complete().validate().unwrap();
        assert_eq!(valid.product_id, "milk");
        assert_eq!(valid.notes, None);
        let item = valid.into_item("demo", Utc::now());
        assert_eq!(item.purchase_context(), PurchaseContext::sealed(date(2024, 1, 1)));
    }

    #[test]
    fn test_missing_fields_listed_in_order() {
        let err = NewInventoryItem::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: Product, Storage Method, Quantity, Unit, Purchase Date"
        );

        let mut request = complete();
        request.unit = Some("  ".to_string());
        request.quantity = Some(0.0);
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: Quantity, Unit");
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut request = complete();
        request.quantity = Some(-1.0);
        assert!(matches!(request.validate(), Err(PantryError::Validation(_))));
    }

    #[test]
    fn test_update_reports_repredict_only_on_opened_change() {
        let mut item = complete().validate().unwrap().into_item("demo", Utc::now());
        let now = Utc::now();

        let quantity_only = InventoryUpdate { quantity: Some(3.0), ..Default::default() };
        assert!(!item.apply(&quantity_only, now));
        assert_eq!(item.quantity, 3.0);

        let open = InventoryUpdate { opened_at: Some(Some(date(2024, 1, 3))), ..Default::default() };
        assert!(item.apply(&open, now));
        assert!(!item.apply(&open, now));

        let clear_notes: InventoryUpdate = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        item.notes = Some("x".to_string());
        assert!(!item.apply(&clear_notes, now));
        assert_eq!(item.notes, None);
    }

    #[test]
    fn test_update_rejects_non_positive_quantity() {
        let update = InventoryUpdate { quantity: Some(0.0), ..Default::default() };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_current_prediction_is_latest() {
        let now = Utc::now();
        let make = |days: u32, at| PredictionRecord {
            id: Uuid::new_v4().to_string(),
            inventory_item_id: "item".to_string(),
            predicted_expiry: date(2024, 1, days),
            confidence: 0.85,
            model_version: "rb-1.1".to_string(),
            created_at: at,
        };
        let records = vec![make(5, now - Duration::hours(2)), make(9, now), make(7, now - Duration::hours(1))];
        assert_eq!(current_prediction(&records).unwrap().predicted_expiry, date(2024, 1, 9));
        assert!(current_prediction(&Vec::<PredictionRecord>::new()).is_none());

        let tied = vec![make(3, now), make(4, now)];
        assert_eq!(current_prediction(&tied).unwrap().predicted_expiry, date(2024, 1, 4));
    }

    #[test]
    fn test_feedback_validation() {
        let now = Utc::now();
        let missing = NewFeedback::default().validate(now).unwrap_err();
        assert_eq!(missing.to_string(), "Inventory item ID is required");

        let out_of_range = NewFeedback {
            inventory_item_id: Some("item".to_string()),
            freshness_score: Some(6),
            ..Default::default()
        };
        assert_eq!(
            out_of_range.validate(now).unwrap_err().to_string(),
            "Freshness score must be between 1 and 5"
        );

        let ok = NewFeedback {
            inventory_item_id: Some("item".to_string()),
            freshness_score: Some(4),
            ..Default::default()
        };
        assert_eq!(ok.validate(now).unwrap().freshness_score, Some(4));
    }
}
