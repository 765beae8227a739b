//! Category and product CRUD.
//!
//! The same foreign key failure means different things depending on the
//! direction of the write:
//!
//! ```text
//! insert/update product, unknown category_id   ──► 400 INVALID_REFERENCE
//! delete category still used by products        ──► 409 CONFLICT
//! delete product already recorded in a sale     ──► 409 CONFLICT
//! ```

use kasir_core::validation::{validate_category, validate_product};
use kasir_core::{Category, CategoryDraft, Product, ProductDraft};
use kasir_db::DbError;
use tracing::info;

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::AppState;

const CATEGORY_NOT_FOUND: &str = "Kategori tidak ditemukan.";
const PRODUCT_NOT_FOUND: &str = "Produk tidak ditemukan.";

/// Catalog service.
pub struct CatalogService {
    state: AppState,
}

impl CatalogService {
    pub fn new(state: AppState) -> Self {
        CatalogService { state }
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        Ok(self.state.db.categories().list().await?)
    }

    pub async fn get_category(&self, id: i64) -> ApiResult<Category> {
        self.state
            .db
            .categories()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(CATEGORY_NOT_FOUND))
    }

    pub async fn create_category(&self, draft: CategoryDraft) -> ApiResult<Category> {
        let category = validate_category(draft)?;

        let created = self
            .state
            .db
            .categories()
            .insert(&category)
            .await
            .map_err(category_write_error)?;

        info!(category_id = created.id, name = %created.name, "Category created");
        Ok(created)
    }

    pub async fn update_category(&self, id: i64, draft: CategoryDraft) -> ApiResult<Category> {
        let category = validate_category(draft)?;

        self.state
            .db
            .categories()
            .update(id, &category)
            .await
            .map_err(category_write_error)
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        self.state
            .db
            .categories()
            .delete(id)
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation { .. } => ApiError::conflict(
                    "Tidak dapat menghapus kategori. Masih ada produk yang terikat.",
                ),
                other => category_write_error(other),
            })?;

        info!(category_id = id, "Category deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.state.db.products().list().await?)
    }

    pub async fn get_product(&self, id: i64) -> ApiResult<Product> {
        self.state
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(PRODUCT_NOT_FOUND))
    }

    pub async fn create_product(&self, draft: ProductDraft) -> ApiResult<Product> {
        let product = validate_product(draft)?;

        let created = self
            .state
            .db
            .products()
            .insert(&product)
            .await
            .map_err(product_write_error)?;

        info!(product_id = created.id, sku = %created.sku, "Product created");
        Ok(created)
    }

    pub async fn update_product(&self, id: i64, draft: ProductDraft) -> ApiResult<Product> {
        let product = validate_product(draft)?;

        self.state
            .db
            .products()
            .update(id, &product)
            .await
            .map_err(product_write_error)
    }

    pub async fn delete_product(&self, id: i64) -> ApiResult<()> {
        self.state
            .db
            .products()
            .delete(id)
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation { .. } => ApiError::conflict(
                    "Tidak dapat menghapus produk. Produk sudah tercatat dalam transaksi.",
                ),
                other => product_write_error(other),
            })?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }
}

fn category_write_error(err: DbError) -> ApiError {
    match err {
        DbError::UniqueViolation { .. } => ApiError::duplicate("Nama kategori sudah ada."),
        DbError::NotFound { .. } => ApiError::not_found(CATEGORY_NOT_FOUND),
        other => other.into(),
    }
}

fn product_write_error(err: DbError) -> ApiError {
    match err {
        DbError::UniqueViolation { .. } => ApiError::duplicate("SKU produk sudah ada."),
        DbError::ForeignKeyViolation { .. } => {
            ApiError::new(ErrorCode::InvalidReference, "ID kategori tidak valid.")
        }
        DbError::NotFound { .. } => ApiError::not_found(PRODUCT_NOT_FOUND),
        other => other.into(),
    }
}
