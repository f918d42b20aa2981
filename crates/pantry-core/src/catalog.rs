//! Product and storage-method catalog
//!
//! Loaded from a YAML seed file. Catalog records are mapped into the value
//! types the predictor consumes.

use crate::data_model::{ProductShelfLife, StorageProfile};
use crate::error::PantryError;
use crate::inventory::User;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageMethod {
    /// Short slug, e.g. "fridge"
    pub id: String,
    /// Display name, free text
    pub name: String,
    pub temp_range_min_c: f64,
    pub temp_range_max_c: f64,
    pub humidity_preferred: f64,
}

impl StorageMethod {
    pub fn profile(&self) -> StorageProfile {
        StorageProfile {
            name: self.name.clone(),
            temp_range_min_c: self.temp_range_min_c,
            temp_range_max_c: self.temp_range_max_c,
            humidity_preferred: self.humidity_preferred,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub base_shelf_life_days: u32,
    #[serde(default)]
    pub room_temp_shelf_life_days: Option<u32>,
    #[serde(default)]
    pub fridge_shelf_life_days: Option<u32>,
    #[serde(default)]
    pub freezer_shelf_life_days: Option<u32>,
    #[serde(default)]
    pub storage_notes: Option<String>,
    pub default_storage_method_id: String,
}

impl Product {
    pub fn shelf_life(&self) -> ProductShelfLife {
        ProductShelfLife {
            base_shelf_life_days: self.base_shelf_life_days,
            room_temp_shelf_life_days: self.room_temp_shelf_life_days,
            fridge_shelf_life_days: self.fridge_shelf_life_days,
            freezer_shelf_life_days: self.freezer_shelf_life_days,
        }
    }
}

/// One row of the shelf-life export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfLifeExport {
    pub name: String,
    pub category: String,
    pub shelf_life: ShelfLifeColumns,
    pub default_storage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfLifeColumns {
    pub pantry: Option<u32>,
    pub fridge: Option<u32>,
    pub freezer: Option<u32>,
    pub base: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub storage_methods: Vec<StorageMethod>,
    #[serde(default)]
    pub products: Vec<Product>,
    /// Accounts seeded alongside the catalog
    #[serde(default)]
    pub users: Vec<User>,
}

impl Catalog {
    /// Parse and validate a catalog from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, PantryError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PantryError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| PantryError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    /// Reject duplicate ids and products pointing at unknown storage methods.
    pub fn validate(&self) -> Result<(), PantryError> {
        let mut storage_ids = HashSet::new();
        for method in &self.storage_methods {
            if !storage_ids.insert(method.id.as_str()) {
                return Err(PantryError::Catalog(format!(
                    "duplicate storage method id '{}'",
                    method.id
                )));
            }
        }

        let mut product_ids = HashSet::new();
        for product in &self.products {
            if !product_ids.insert(product.id.as_str()) {
                return Err(PantryError::Catalog(format!(
                    "duplicate product id '{}'",
                    product.id
                )));
            }
            if !storage_ids.contains(product.default_storage_method_id.as_str()) {
                return Err(PantryError::Catalog(format!(
                    "product '{}' references unknown storage method '{}'",
                    product.id, product.default_storage_method_id
                )));
            }
        }

        let mut user_ids = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id.as_str()) {
                return Err(PantryError::Catalog(format!("duplicate user id '{}'", user.id)));
            }
        }

        Ok(())
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn storage_method(&self, id: &str) -> Option<&StorageMethod> {
        self.storage_methods.iter().find(|m| m.id == id)
    }

    /// Products sorted by name, optionally restricted to one category.
    pub fn products_in(&self, category: Option<&str>) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    pub fn storage_methods_sorted(&self) -> Vec<&StorageMethod> {
        let mut methods: Vec<&StorageMethod> = self.storage_methods.iter().collect();
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        methods
    }

    pub fn export_rows(&self) -> Vec<ShelfLifeExport> {
        self.products
            .iter()
            .map(|p| ShelfLifeExport {
                name: p.name.clone(),
                category: p.category.clone(),
                shelf_life: ShelfLifeColumns {
                    pantry: p.room_temp_shelf_life_days,
                    fridge: p.fridge_shelf_life_days,
                    freezer: p.freezer_shelf_life_days,
                    base: p.base_shelf_life_days,
                },
                default_storage: p.default_storage_method_id.clone(),
            })
            .collect()
    }
}
