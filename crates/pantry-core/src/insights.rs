//! Pantry-wide breakdowns: top categories, freshness counts and where items
//! are stored
//!
//! Freshness comes from each item's current prediction, so the counts agree
//! with the inventory and dashboard views. Storage names are classified with
//! the same keywords the predictor uses.

use crate::freshness::{Freshness, FreshnessStatus};
use crate::predictor::StorageKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Categories listed in [`Insights::top_categories`].
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// One inventory item as seen by the insights computation.
#[derive(Debug, Clone, Copy)]
pub struct InsightEntry<'a> {
    pub category: &'a str,
    pub storage_name: &'a str,
    /// Current predicted expiry; `None` when no prediction was stored
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub expired: usize,
    pub expiring: usize,
    pub fresh: usize,
}

impl StatusCounts {
    fn record(&mut self, status: FreshnessStatus) {
        match status {
            FreshnessStatus::Expired => self.expired += 1,
            FreshnessStatus::Expiring => self.expiring += 1,
            FreshnessStatus::Good => self.fresh += 1,
        }
    }
}

/// Item counts per storage kind. A name matching several kinds counts once,
/// under the first in [`StorageKind::PRECEDENCE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDistribution {
    pub room: usize,
    pub fridge: usize,
    pub freezer: usize,
    /// Names that match no keyword
    pub other: usize,
}

impl StorageDistribution {
    fn record(&mut self, storage_name: &str) {
        match StorageKind::matching(storage_name).next() {
            Some(StorageKind::Room) => self.room += 1,
            Some(StorageKind::Fridge) => self.fridge += 1,
            Some(StorageKind::Freezer) => self.freezer += 1,
            None => self.other += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub total_items: usize,
    pub top_categories: Vec<CategoryCount>,
    pub freshness: StatusCounts,
    pub storage: StorageDistribution,
}

impl Insights {
    /// Aggregates `entries` as of `today`.
    ///
    /// Categories are ranked by item count, ties broken by name. Items
    /// without a prediction count towards categories and storage but not
    /// towards freshness.
    pub fn compute<'a, I>(entries: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = InsightEntry<'a>>,
    {
        let mut total_items = 0;
        let mut categories: HashMap<&str, usize> = HashMap::new();
        let mut freshness = StatusCounts::default();
        let mut storage = StorageDistribution::default();

        for entry in entries {
            total_items += 1;
            *categories.entry(entry.category).or_default() += 1;
            storage.record(entry.storage_name);
            if let Some(expiry) = entry.expiry {
                freshness.record(Freshness::assess(expiry, today).status);
            }
        }

        let mut top_categories: Vec<CategoryCount> = categories
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();
        top_categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
        top_categories.truncate(TOP_CATEGORY_LIMIT);

        Self {
            total_items,
            top_categories,
            freshness,
            storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry<'a>(category: &'a str, storage_name: &'a str, expiry: Option<NaiveDate>) -> InsightEntry<'a> {
        InsightEntry {
            category,
            storage_name,
            expiry,
        }
    }

    #[test]
    fn test_empty_pantry() {
        let insights = Insights::compute(Vec::new(), date(2024, 3, 1));
        assert_eq!(insights.total_items, 0);
        assert!(insights.top_categories.is_empty());
        assert_eq!(insights.freshness, StatusCounts::default());
        assert_eq!(insights.storage, StorageDistribution::default());
    }

    #[test]
    fn test_freshness_counts_follow_status_thresholds() {
        let today = date(2024, 3, 10);
        let entries = [
            entry("Dairy", "Refrigerator", Some(date(2024, 3, 9))),
            entry("Dairy", "Refrigerator", Some(date(2024, 3, 10))),
            entry("Dairy", "Refrigerator", Some(date(2024, 3, 13))),
            entry("Dairy", "Refrigerator", Some(date(2024, 3, 14))),
            entry("Dairy", "Refrigerator", None),
        ];
        let insights = Insights::compute(entries, today);
        assert_eq!(
            insights.freshness,
            StatusCounts {
                expired: 1,
                expiring: 2,
                fresh: 1
            }
        );
        assert_eq!(insights.total_items, 5);
    }

    #[test]
    fn test_top_categories_ranked_and_capped() {
        let today = date(2024, 3, 1);
        let mut entries = Vec::new();
        for (category, n) in [("Meat", 3), ("Dairy", 3), ("Fruits", 2), ("Grains", 1), ("Snacks", 1), ("Bakery", 1)] {
            for _ in 0..n {
                entries.push(entry(category, "Room Temperature", None));
            }
        }
        let insights = Insights::compute(entries, today);
        let ranked: Vec<(&str, usize)> = insights
            .top_categories
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            ranked,
            vec![("Dairy", 3), ("Meat", 3), ("Fruits", 2), ("Bakery", 1), ("Grains", 1)]
        );
    }

    #[test]
    fn test_storage_distribution_uses_keyword_precedence() {
        let entries = [
            entry("Dairy", "Room Temperature", None),
            entry("Dairy", "Refrigerator", None),
            entry("Dairy", "Mini fridge", None),
            entry("Meat", "Chest Freezer", None),
            entry("Meat", "Fridge freezer", None),
            entry("Grains", "Cellar", None),
        ];
        let insights = Insights::compute(entries, date(2024, 3, 1));
        assert_eq!(
            insights.storage,
            StorageDistribution {
                room: 1,
                fridge: 3,
                freezer: 1,
                other: 1
            }
        );
    }
}
