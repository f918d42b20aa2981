//! Integration tests against the real catalog/seed.yaml.
//!
//! Each test loads the seeded catalog, maps records into predictor inputs and
//! checks the predicted expiry for representative products.

use chrono::NaiveDate;
use pantry_core::{predict, Catalog, PurchaseContext, WeatherReading, MODEL_VERSION};

/// Path to the seed file relative to the workspace root
const SEED_PATH: &str = "catalog/seed.yaml";

fn seed_catalog() -> Catalog {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    Catalog::load(workspace_root.join(SEED_PATH)).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expiry(catalog: &Catalog, product: &str, storage: &str, context: PurchaseContext) -> NaiveDate {
    let product = catalog.product(product).unwrap().shelf_life();
    let storage = catalog.storage_method(storage).unwrap().profile();
    predict(&product, &storage, &WeatherReading::FALLBACK, &context).predicted_expiry
}

#[test]
fn test_seed_loads() {
    let catalog = seed_catalog();
    assert_eq!(catalog.storage_methods.len(), 3);
    assert_eq!(catalog.products.len(), 24);
    assert_eq!(catalog.users[0].city, "London");
}

#[test]
fn test_every_seeded_pair_predicts() {
    let catalog = seed_catalog();
    let context = PurchaseContext::opened(date(2024, 5, 1), date(2024, 5, 2));
    for product in &catalog.products {
        for method in &catalog.storage_methods {
            let prediction = predict(
                &product.shelf_life(),
                &method.profile(),
                &WeatherReading::FALLBACK,
                &context,
            );
            assert!(prediction.predicted_expiry >= context.purchased_at, "{} in {}", product.name, method.name);
            assert_eq!(prediction.model_version, MODEL_VERSION);
        }
    }
}

// =============================================================================
// Storage selection on real catalog data
// =============================================================================

#[test]
fn test_milk_in_refrigerator() {
    let catalog = seed_catalog();
    assert_eq!(
        expiry(&catalog, "milk", "fridge", PurchaseContext::sealed(date(2024, 1, 1))),
        date(2024, 1, 8)
    );
}

#[test]
fn test_milk_without_room_figure_uses_base() {
    let catalog = seed_catalog();
    assert_eq!(
        expiry(&catalog, "milk", "room", PurchaseContext::sealed(date(2024, 1, 1))),
        date(2024, 1, 8)
    );
}

#[test]
fn test_frozen_chicken() {
    let catalog = seed_catalog();
    assert_eq!(
        expiry(&catalog, "chicken-breast", "freezer", PurchaseContext::sealed(date(2024, 1, 1))),
        date(2024, 9, 27)
    );
}

#[test]
fn test_opened_yogurt() {
    let catalog = seed_catalog();
    // fridge figure 21, opened: floor(15.75) = 15
    assert_eq!(
        expiry(&catalog, "yogurt", "fridge", PurchaseContext::opened(date(2024, 2, 20), date(2024, 2, 21))),
        date(2024, 3, 6)
    );
}
