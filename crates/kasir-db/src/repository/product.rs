//! Product storage.
//!
//! Reads always join the category so callers get `category_name` without a
//! second query. Stock is written only through [`ProductRepository::set_stock`],
//! which the sale workflow calls on its reserved connection.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::sale::StockSnapshot;
use kasir_core::{NewProduct, Product};

const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id,
        p.category_id,
        c.name AS category_name,
        p.sku,
        p.name,
        p.price,
        p.stock,
        p.description,
        p.created_at,
        p.updated_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

/// Repository for the `products` table.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// All products ordered by id, with category names.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!("{PRODUCT_SELECT} ORDER BY p.id ASC"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{PRODUCT_SELECT} WHERE p.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    /// * `Err(DbError::ForeignKeyViolation)` - category_id does not exist
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(sku = %product.sku, "Inserting product");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                category_id, sku, name, price, stock, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(product.category_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Replaces every editable field of a product, stock included.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such product
    /// * `Err(DbError::UniqueViolation)` - SKU taken by another product
    /// * `Err(DbError::ForeignKeyViolation)` - category_id does not exist
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        debug!(id, sku = %product.sku, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET category_id = ?1, sku = ?2, name = ?3, price = ?4, stock = ?5,
                description = ?6, updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(product.category_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.description)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such product
    /// * `Err(DbError::ForeignKeyViolation)` - recorded sales reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Unit-of-work operations (caller's connection)
    // -------------------------------------------------------------------------

    /// Reads price, stock and name for one product on the caller's connection.
    pub async fn snapshot(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<StockSnapshot>> {
        let snapshot = sqlx::query_as::<_, StockSnapshot>(
            "SELECT id AS product_id, name, price, stock FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(snapshot)
    }

    /// Writes an absolute stock value computed by the caller.
    pub async fn set_stock(conn: &mut SqliteConnection, id: i64, stock: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(stock)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
