//! API Handlers
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::{AppState, CurrentUser};
use crate::weather::reading_or_fallback;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use pantry_core::{
    valuation, Feedback, Freshness, InsightEntry, Insights, InventoryItem, InventoryUpdate,
    NewFeedback, NewInventoryItem, PantryError, PredictionRecord, Product, StorageMethod, WeatherSnapshot, MODEL_VERSION,
    PANTRY_VERSION,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Expiring items shown on the dashboard.
const DASHBOARD_EXPIRING_LIMIT: usize = 3;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Inventory item joined with its catalog records and current prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub product: Product,
    pub storage_method: StorageMethod,
    /// Current prediction only, empty if none was stored
    pub predictions: Vec<PredictionRecord>,
    pub freshness: Option<Freshness>,
}

async fn view(state: &AppState, item: InventoryItem, today: NaiveDate) -> Option<InventoryView> {
    let product = state.catalog.product(&item.product_id)?.clone();
    let storage_method = state.catalog.storage_method(&item.storage_method_id)?.clone();
    let current = state.store.current_prediction(&item.id).await;
    let freshness = current
        .as_ref()
        .map(|p| Freshness::assess(p.predicted_expiry, today));
    Some(InventoryView {
        item,
        product,
        storage_method,
        predictions: current.into_iter().collect(),
        freshness,
    })
}

async fn view_or_missing(state: &AppState, item: InventoryItem) -> ApiResult<InventoryView> {
    let id = item.id.clone();
    view(state, item, today()).await.ok_or_else(|| {
        ApiError(PantryError::Internal(format!(
            "item {} references a product or storage method missing from the catalog",
            id
        )))
    })
}

/// Looks up weather, stores a snapshot when it was observed, predicts and
/// appends the prediction for `item`.
async fn record_prediction(
    state: &AppState,
    item: &InventoryItem,
    product: &Product,
    storage: &StorageMethod,
    city: &str,
) -> PredictionRecord {
    let weather = reading_or_fallback(state.weather.as_ref(), city).await;
    let now = Utc::now();

    if let Some(reading) = weather.observed() {
        state
            .store
            .insert_snapshot(WeatherSnapshot::capture(&item.id, reading, now))
            .await;
    } else {
        state.metrics.weather_fallbacks.inc();
    }

    let prediction = state.model.predict(
        &product.shelf_life(),
        &storage.profile(),
        &weather.reading,
        &item.purchase_context(),
    );
    state
        .metrics
        .predictions
        .with_label_values(&[prediction.model_version.as_str()])
        .inc();
    tracing::info!(
        item = %item.id,
        product = %product.name,
        storage = %storage.name,
        expiry = %prediction.predicted_expiry,
        fallback_weather = weather.fallback,
        "prediction recorded"
    );

    let record = PredictionRecord::new(&item.id, prediction, now);
    state.store.insert_prediction(record.clone()).await;
    record
}

fn catalog_pair<'a>(state: &'a AppState, product_id: &str, storage_id: &str) -> ApiResult<(&'a Product, &'a StorageMethod)> {
    match (
        state.catalog.product(product_id),
        state.catalog.storage_method(storage_id),
    ) {
        (Some(product), Some(storage)) => Ok((product, storage)),
        _ => Err(PantryError::NotFound("Product or storage method not found".to_string()).into()),
    }
}

// === Health & catalog ===

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": PANTRY_VERSION,
            "model_version": MODEL_VERSION
        })),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    Json(state.catalog.products_in(category).into_iter().cloned().collect())
}

pub async fn list_storage_methods(State(state): State<AppState>) -> Json<Vec<StorageMethod>> {
    Json(state.catalog.storage_methods_sorted().into_iter().cloned().collect())
}

pub async fn export_shelf_life(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.export_rows())
}

// === Inventory ===

pub async fn list_inventory(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<InventoryView>> {
    let today = today();
    let mut views = Vec::new();
    for item in state.store.items_for(&user.id).await {
        match view(&state, item, today).await {
            Some(v) => views.push(v),
            None => tracing::warn!(user = %user.id, "skipping item with unknown catalog reference"),
        }
    }
    Json(views)
}

pub async fn create_inventory(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<NewInventoryItem>,
) -> ApiResult<(StatusCode, Json<InventoryView>)> {
    let valid = payload.validate()?;
    let (product, storage) = catalog_pair(&state, &valid.product_id, &valid.storage_method_id)?;

    let item = valid.into_item(&user.id, Utc::now());
    state.store.insert_item(item.clone()).await;
    state.metrics.inventory_items.set(state.store.item_count().await as i64);

    record_prediction(&state, &item, product, storage, state.city_for(&user)).await;

    Ok((StatusCode::CREATED, Json(view_or_missing(&state, item).await?)))
}

pub async fn update_inventory(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<InventoryUpdate>,
) -> ApiResult<Json<InventoryView>> {
    update.validate()?;
    state
        .store
        .owned_item(&id, &user.id)
        .await
        .ok_or_else(|| PantryError::NotFound("Item not found".to_string()))?;

    let (item, repredict) = state
        .store
        .update_item(&id, |item| item.apply(&update, Utc::now()))
        .await
        .ok_or_else(|| PantryError::NotFound("Item not found".to_string()))?;

    if repredict {
        let (product, storage) = catalog_pair(&state, &item.product_id, &item.storage_method_id)?;
        record_prediction(&state, &item, product, storage, state.city_for(&user)).await;
    }

    Ok(Json(view_or_missing(&state, item).await?))
}

pub async fn delete_inventory(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .store
        .owned_item(&id, &user.id)
        .await
        .ok_or_else(|| PantryError::NotFound("Item not found".to_string()))?;

    state.store.delete_item(&id).await;
    state.metrics.inventory_items.set(state.store.item_count().await as i64);
    tracing::info!(item = %id, user = %user.id, "inventory item deleted");

    Ok(Json(json!({ "message": "Item deleted successfully" })))
}

// === Feedback ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackView {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub inventory_item: Option<InventoryItem>,
}

pub async fn list_feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<FeedbackView>> {
    let items = state.store.items_for(&user.id).await;
    let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
    let views = state
        .store
        .feedback_for(&ids)
        .await
        .into_iter()
        .map(|feedback| {
            let inventory_item = items.iter().find(|i| i.id == feedback.inventory_item_id).cloned();
            FeedbackView {
                feedback,
                inventory_item,
            }
        })
        .collect();
    Json(views)
}

pub async fn create_feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<NewFeedback>,
) -> ApiResult<(StatusCode, Json<FeedbackView>)> {
    let feedback = payload.validate(Utc::now())?;
    let item = state
        .store
        .owned_item(&feedback.inventory_item_id, &user.id)
        .await
        .ok_or_else(|| PantryError::NotFound("Inventory item not found or unauthorized".to_string()))?;

    state.store.insert_feedback(feedback.clone()).await;
    Ok((
        StatusCode::CREATED,
        Json(FeedbackView {
            feedback,
            inventory_item: Some(item),
        }),
    ))
}

// === Dashboard & profile ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringItem {
    pub id: String,
    pub product_name: String,
    pub category: String,
    pub storage_name: String,
    pub expiry: NaiveDate,
    pub days_left: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_items: usize,
    pub expiring_soon_count: usize,
    pub expiring_items: Vec<ExpiringItem>,
    pub total_value: f64,
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Dashboard> {
    let today = today();
    let items = state.store.items_for(&user.id).await;
    let mut expiring = Vec::new();
    let mut priced = Vec::new();

    for item in &items {
        let (Some(product), Some(storage)) = (
            state.catalog.product(&item.product_id),
            state.catalog.storage_method(&item.storage_method_id),
        ) else {
            continue;
        };
        priced.push((product.category.as_str(), item.quantity));

        let Some(current) = state.store.current_prediction(&item.id).await else {
            continue;
        };
        let freshness = Freshness::assess(current.predicted_expiry, today);
        if freshness.expiring_soon() {
            expiring.push(ExpiringItem {
                id: item.id.clone(),
                product_name: product.name.clone(),
                category: product.category.clone(),
                storage_name: storage.name.clone(),
                expiry: freshness.expiry,
                days_left: freshness.days_left,
            });
        }
    }

    expiring.sort_by_key(|e| e.days_left);
    let expiring_soon_count = expiring.len();
    expiring.truncate(DASHBOARD_EXPIRING_LIMIT);

    Json(Dashboard {
        total_items: items.len(),
        expiring_soon_count,
        expiring_items: expiring,
        total_value: valuation::total_value(priced),
    })
}

/// Category, freshness and storage breakdowns of the user's pantry.
pub async fn insights(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Insights> {
    let items = state.store.items_for(&user.id).await;
    let mut entries = Vec::with_capacity(items.len());
    for item in &items {
        let (Some(product), Some(storage)) = (
            state.catalog.product(&item.product_id),
            state.catalog.storage_method(&item.storage_method_id),
        ) else {
            continue;
        };
        let expiry = state
            .store
            .current_prediction(&item.id)
            .await
            .map(|p| p.predicted_expiry);
        entries.push(InsightEntry {
            category: product.category.as_str(),
            storage_name: storage.name.as_str(),
            expiry,
        });
    }
    Json(Insights::compute(entries, today()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Value> {
    let items = state.store.items_for(&user.id).await;
    let total_value = valuation::total_value(items.iter().filter_map(|item| {
        state
            .catalog
            .product(&item.product_id)
            .map(|p| (p.category.as_str(), item.quantity))
    }));
    Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "city": user.city,
        "stats": {
            "total_items": items.len(),
            "total_value": total_value
        }
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub city: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<Value>> {
    let city = update
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| PantryError::Validation("Invalid city name".to_string()))?;

    let updated = state
        .store
        .update_city(&user.id, city)
        .await
        .ok_or_else(|| PantryError::NotFound("User not found".to_string()))?;
    Ok(Json(json!({
        "id": updated.id,
        "name": updated.name,
        "email": updated.email,
        "city": updated.city
    })))
}

pub async fn current_weather(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Value> {
    let city = state.city_for(&user);
    let weather = reading_or_fallback(state.weather.as_ref(), city).await;
    Json(json!({
        "city": city,
        "temp_c": weather.reading.temp_c,
        "humidity": weather.reading.humidity,
        "fallback": weather.fallback
    }))
}

// === Metrics ===

pub async fn metrics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| PantryError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
