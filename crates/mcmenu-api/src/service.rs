//! Lookups over a loaded snapshot.

use crate::error::{ApiError, ApiResult};
use mcmenu::{ProductRecord, ProductSnapshot, SnapshotReader, SnapshotResult};
use serde_json::{Map, Value};
use std::path::Path;

/// Read-only view of the products served by the API.
///
/// The snapshot is loaded once; handlers share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ProductService {
    products: ProductSnapshot,
}

impl ProductService {
    pub fn new(products: ProductSnapshot) -> Self {
        Self { products }
    }

    /// Load the snapshot at `path`.
    pub fn open(path: &Path) -> SnapshotResult<Self> {
        let products = SnapshotReader::read_from_file(path)?;
        tracing::info!(path = %path.display(), products = products.len(), "snapshot loaded");
        Ok(Self::new(products))
    }

    pub fn all(&self) -> &ProductSnapshot {
        &self.products
    }

    /// First record whose name matches exactly.
    pub fn find_product_by_name(&self, name: &str) -> ApiResult<&ProductRecord> {
        self.products
            .find_by_name(name)
            .ok_or(ApiError::ProductNotFound)
    }

    /// `{field: value}` for one field of a named product.
    pub fn get_product_field_value(&self, name: &str, field: &str) -> ApiResult<Map<String, Value>> {
        let product = self.find_product_by_name(name)?;
        let value = product.field(field).ok_or(ApiError::FieldNotFound)?;

        let mut single = Map::new();
        single.insert(field.to_string(), value.clone());
        Ok(single)
    }
}
