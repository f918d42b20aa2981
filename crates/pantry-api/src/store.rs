//! In-memory record store
//!
//! Items keep insertion order so that "newest first" is stable for records
//! created within the same clock tick. Predictions are only ever appended.
use pantry_core::{
    current_prediction, Feedback, InventoryItem, PredictionRecord, User, WeatherSnapshot,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    items: Vec<InventoryItem>,
    predictions: Vec<PredictionRecord>,
    snapshots: Vec<WeatherSnapshot>,
    feedback: Vec<Feedback>,
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
}

/// Newest first by `created_at`; among equal timestamps the later insert wins.
fn newest_first<T, F>(mut records: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    records.reverse();
    records.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    records
}

impl Store {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let tables = Tables {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            ..Default::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    // === Users ===

    pub async fn user(&self, id: &str) -> Option<User> {
        self.tables.read().await.users.get(id).cloned()
    }

    pub async fn update_city(&self, id: &str, city: &str) -> Option<User> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(id)?;
        user.city = city.to_string();
        Some(user.clone())
    }

    // === Inventory ===

    pub async fn insert_item(&self, item: InventoryItem) {
        self.tables.write().await.items.push(item);
    }

    pub async fn item(&self, id: &str) -> Option<InventoryItem> {
        self.tables.read().await.items.iter().find(|i| i.id == id).cloned()
    }

    /// An item only if it belongs to `user_id`.
    pub async fn owned_item(&self, id: &str, user_id: &str) -> Option<InventoryItem> {
        self.item(id).await.filter(|i| i.user_id == user_id)
    }

    pub async fn items_for(&self, user_id: &str) -> Vec<InventoryItem> {
        let items = self
            .tables
            .read()
            .await
            .items
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        newest_first(items, |i: &InventoryItem| i.created_at)
    }

    /// Runs `update` on the stored item and returns its result with the new item.
    pub async fn update_item<F, R>(&self, id: &str, update: F) -> Option<(InventoryItem, R)>
    where
        F: FnOnce(&mut InventoryItem) -> R,
    {
        let mut tables = self.tables.write().await;
        let item = tables.items.iter_mut().find(|i| i.id == id)?;
        let result = update(item);
        Some((item.clone(), result))
    }

    /// Deletes an item with its predictions, snapshots and feedback.
    pub async fn delete_item(&self, id: &str) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        if tables.items.len() == before {
            return false;
        }
        tables.predictions.retain(|p| p.inventory_item_id != id);
        tables.snapshots.retain(|s| s.inventory_item_id != id);
        tables.feedback.retain(|f| f.inventory_item_id != id);
        true
    }

    pub async fn item_count(&self) -> usize {
        self.tables.read().await.items.len()
    }

    // === Predictions ===

    pub async fn insert_prediction(&self, record: PredictionRecord) {
        self.tables.write().await.predictions.push(record);
    }

    pub async fn predictions_for(&self, item_id: &str) -> Vec<PredictionRecord> {
        let records = self
            .tables
            .read()
            .await
            .predictions
            .iter()
            .filter(|p| p.inventory_item_id == item_id)
            .cloned()
            .collect();
        newest_first(records, |p: &PredictionRecord| p.created_at)
    }

    pub async fn current_prediction(&self, item_id: &str) -> Option<PredictionRecord> {
        let tables = self.tables.read().await;
        let current = current_prediction(tables.predictions.iter().filter(|p| p.inventory_item_id == item_id)).cloned();
        current
    }

    // === Weather snapshots ===

    pub async fn insert_snapshot(&self, snapshot: WeatherSnapshot) {
        self.tables.write().await.snapshots.push(snapshot);
    }

    pub async fn snapshots_for(&self, item_id: &str) -> Vec<WeatherSnapshot> {
        self.tables
            .read()
            .await
            .snapshots
            .iter()
            .filter(|s| s.inventory_item_id == item_id)
            .cloned()
            .collect()
    }

    // === Feedback ===

    pub async fn insert_feedback(&self, feedback: Feedback) {
        self.tables.write().await.feedback.push(feedback);
    }

    /// Feedback attached to any of `item_ids`, newest first.
    pub async fn feedback_for(&self, item_ids: &[String]) -> Vec<Feedback> {
        let records = self
            .tables
            .read()
            .await
            .feedback
            .iter()
            .filter(|f| item_ids.contains(&f.inventory_item_id))
            .cloned()
            .collect();
        newest_first(records, |f: &Feedback| f.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use pantry_core::inventory::NewInventoryItem;
    use pantry_core::{NewFeedback, Prediction, WeatherReading};

    fn user() -> User {
        User {
            id: "demo".to_string(),
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
            city: "London".to_string(),
        }
    }

    fn item(user_id: &str) -> InventoryItem {
        NewInventoryItem {
            product_id: Some("milk".to_string()),
            storage_method_id: Some("fridge".to_string()),
            quantity: Some(1.0),
            unit: Some("l".to_string()),
            purchased_at: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .into_item(user_id, Utc::now())
    }

    fn prediction(day: u32) -> Prediction {
        Prediction {
            predicted_expiry: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            confidence: 0.85,
            model_version: "rb-1.1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_items_newest_first_and_scoped() {
        let store = Store::with_users([user()]);
        let first = item("demo");
        let second = item("demo");
        store.insert_item(first.clone()).await;
        store.insert_item(second.clone()).await;
        store.insert_item(item("someone-else")).await;

        let ids: Vec<_> = store.items_for("demo").await.into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
        assert!(store.owned_item(&first.id, "someone-else").await.is_none());
        assert_eq!(store.item_count().await, 3);
    }

    #[tokio::test]
    async fn test_current_prediction_is_most_recent() {
        let store = Store::default();
        let now = Utc::now();
        store
            .insert_prediction(PredictionRecord::new("a", prediction(8), now - Duration::minutes(5)))
            .await;
        store.insert_prediction(PredictionRecord::new("a", prediction(6), now)).await;
        store.insert_prediction(PredictionRecord::new("b", prediction(2), now)).await;

        let current = store.current_prediction("a").await.unwrap();
        assert_eq!(current.predicted_expiry, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!(store.predictions_for("a").await.len(), 2);
        assert!(store.current_prediction("c").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let store = Store::with_users([user()]);
        let kept = item("demo");
        let doomed = item("demo");
        store.insert_item(kept.clone()).await;
        store.insert_item(doomed.clone()).await;
        let now = Utc::now();
        for id in [&kept.id, &doomed.id] {
            store.insert_prediction(PredictionRecord::new(id, prediction(3), now)).await;
            store
                .insert_snapshot(WeatherSnapshot::capture(id, WeatherReading::new(4.0, 65.0), now))
                .await;
            let feedback = NewFeedback {
                inventory_item_id: Some(id.clone()),
                freshness_score: Some(3),
                ..Default::default()
            };
            store.insert_feedback(feedback.validate(now).unwrap()).await;
        }

        assert!(store.delete_item(&doomed.id).await);
        assert!(!store.delete_item(&doomed.id).await);
        assert!(store.predictions_for(&doomed.id).await.is_empty());
        assert!(store.snapshots_for(&doomed.id).await.is_empty());
        assert!(store.feedback_for(&[doomed.id.clone()]).await.is_empty());
        assert_eq!(store.predictions_for(&kept.id).await.len(), 1);
        assert_eq!(store.feedback_for(&[kept.id.clone()]).await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_city() {
        let store = Store::with_users([user()]);
        let updated = store.update_city("demo", "Mysuru").await.unwrap();
        assert_eq!(updated.city, "Mysuru");
        assert!(store.update_city("ghost", "Paris").await.is_none());
    }
}
