//! Shared application state and the request owner extractor
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::store::Store;
use crate::weather::{self, WeatherProvider};
use axum::{extract::FromRequestParts, http::request::Parts};
use pantry_core::{Catalog, PantryError, RuleBased, ShelfLifeModel, User};
use std::sync::Arc;

/// Header naming the user a request acts for.
pub const USER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Store,
    pub weather: Arc<dyn WeatherProvider>,
    pub model: Arc<dyn ShelfLifeModel>,
    pub metrics: Metrics,
    pub default_city: String,
}

impl AppState {
    pub fn new(catalog: Catalog, weather: Arc<dyn WeatherProvider>, default_city: impl Into<String>) -> Result<Self, PantryError> {
        let store = Store::with_users(catalog.users.iter().cloned());
        let metrics = Metrics::new().map_err(|e| PantryError::Internal(e.to_string()))?;
        Ok(Self {
            catalog: Arc::new(catalog),
            store,
            weather,
            model: Arc::new(RuleBased),
            metrics,
            default_city: default_city.into(),
        })
    }

    /// Loads the catalog and picks the weather provider named by `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, PantryError> {
        let catalog = Catalog::load(&config.catalog_path)?;
        tracing::info!(
            products = catalog.products.len(),
            storage_methods = catalog.storage_methods.len(),
            "catalog loaded"
        );
        let weather: Arc<dyn WeatherProvider> = Arc::from(weather::from_config(&config.weather)?);
        Self::new(catalog, weather, config.default_city.clone())
    }

    /// City used for a user's weather lookups.
    pub fn city_for<'a>(&'a self, user: &'a User) -> &'a str {
        if user.city.trim().is_empty() {
            &self.default_city
        } else {
            &user.city
        }
    }
}

/// The user named by the `x-user-id` header.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(PantryError::Unauthorized)?;

        let user = state
            .store
            .user(id)
            .await
            .ok_or_else(|| PantryError::NotFound("User not found".to_string()))?;
        Ok(CurrentUser(user))
    }
}
