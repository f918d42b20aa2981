//! Estimated inventory value by product category
//!
//! A flat per-category price table. Unrelated to shelf-life prediction.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Price used for categories missing from the table.
pub const DEFAULT_CATEGORY_PRICE: f64 = 150.0;

static CATEGORY_PRICES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("Meat & Poultry", 550.0),
        ("Seafood", 600.0),
        ("Dairy", 150.0),
        ("Cheese", 300.0),
        ("Bakery", 80.0),
        ("Beverages", 120.0),
        ("Fresh Fruits", 100.0),
        ("Fresh Vegetables", 60.0),
        ("Snacks", 50.0),
        ("Frozen Foods", 250.0),
        ("Pantry Staples", 100.0),
        ("Grains & Pasta", 90.0),
        ("Condiments & Sauces", 180.0),
        ("Canned Goods", 120.0),
        ("Breakfast", 200.0),
        ("Herbs & Spices", 200.0),
        ("Eggs & Tofu", 100.0),
    ])
});

pub fn category_price(category: &str) -> f64 {
    CATEGORY_PRICES
        .get(category)
        .copied()
        .unwrap_or(DEFAULT_CATEGORY_PRICE)
}

/// Category price times quantity; a non-positive quantity counts as one unit.
pub fn item_value(category: &str, quantity: f64) -> f64 {
    let quantity = if quantity > 0.0 { quantity } else { 1.0 };
    category_price(category) * quantity
}

pub fn total_value<'a, I>(items: I) -> f64
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    items
        .into_iter()
        .map(|(category, quantity)| item_value(category, quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_default_prices() {
        assert_eq!(category_price("Seafood"), 600.0);
        assert_eq!(category_price("Fresh Vegetables"), 60.0);
        assert_eq!(category_price("Mystery"), DEFAULT_CATEGORY_PRICE);
    }

    #[test]
    fn test_total_value() {
        let items = vec![("Dairy", 2.0), ("Bakery", 0.0), ("Unknown", 1.0)];
        assert_eq!(total_value(items), 300.0 + 80.0 + 150.0);
    }
}
