//! # Product Repository
//!
//! Catalog CRUD for products.
//!
//! Stock is only changed here by a full product edit or through the
//! connection-level helpers at the bottom of this file, which the
//! [`StockLedger`](crate::ledger::StockLedger) calls inside its transactions.
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ Read-then-overwrite (lost update under concurrent sales)        │
//! │     stock = read(); UPDATE products SET stock_quantity = stock - 3  │
//! │                                                                     │
//! │  ✅ Guarded delta                                                   │
//! │     UPDATE products SET stock_quantity = stock_quantity - 3         │
//! │     WHERE id = ? AND stock_quantity >= 3                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, LedgerResult};
use crate::pool::begin_immediate;
use tally_core::validation::{
    validate_new_product, validate_price_cents, validate_product_name, validate_stock_quantity,
};
use tally_core::{CoreError, NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let coffee = repo.insert(&NewProduct { name: "Coffee".into(), ..Default::default() }).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, image_ref, unit_price_cents, stock_quantity, description
            FROM products
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// Inserts a new product and returns it with its generated id.
    ///
    /// ## Errors
    /// * `LedgerError::Rejected` - name, price or stock failed validation
    pub async fn insert(&self, product: &NewProduct) -> LedgerResult<Product> {
        validate_new_product(product)?;

        debug!(name = %product.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, image_ref, unit_price_cents, stock_quantity, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(product.name.trim())
        .bind(&product.image_ref)
        .bind(product.unit_price_cents)
        .bind(product.stock_quantity)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: product.name.trim().to_string(),
            image_ref: product.image_ref.clone(),
            unit_price_cents: product.unit_price_cents,
            stock_quantity: product.stock_quantity,
            description: product.description.clone(),
        })
    }

    /// Updates every field of an existing product, stock included.
    ///
    /// Changing the price never touches line items already written:
    /// they keep their snapshot.
    ///
    /// ## Errors
    /// * `LedgerError::Store(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> LedgerResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.unit_price_cents)?;
        validate_stock_quantity(product.stock_quantity)?;

        debug!(id = product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                image_ref = ?3,
                unit_price_cents = ?4,
                stock_quantity = ?5,
                description = ?6
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(product.name.trim())
        .bind(&product.image_ref)
        .bind(product.unit_price_cents)
        .bind(product.stock_quantity)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id).into());
        }

        Ok(())
    }

    /// Deletes a product that no sale references.
    ///
    /// ## Errors
    /// * `CoreError::ProductInUse` - line items still point at it
    /// * `DbError::NotFound` - Product doesn't exist
    pub async fn delete(&self, id: i64) -> LedgerResult<()> {
        let mut tx = begin_immediate(&self.pool).await?;

        let sales: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE product_id = ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if sales > 0 {
            return Err(CoreError::ProductInUse {
                product_id: id,
                sales,
            }
            .into());
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id).into());
        }

        tx.commit().await?;

        debug!(id, "Deleted product");
        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level helpers (used inside ledger transactions)
// =============================================================================

/// Reads one product on the given connection.
pub(crate) async fn fetch(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, image_ref, unit_price_cents, stock_quantity, description
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

/// Reads each listed product; ids with no row are skipped.
pub(crate) async fn fetch_many(conn: &mut SqliteConnection, ids: &[i64]) -> DbResult<Vec<Product>> {
    let mut products = Vec::with_capacity(ids.len());
    for &id in ids {
        if let Some(product) = fetch(conn, id).await? {
            products.push(product);
        }
    }
    Ok(products)
}

/// Removes `quantity` units from stock if that many are on hand.
///
/// Returns `false` when the guard fails (missing product or too little
/// stock) and nothing was changed.
pub(crate) async fn take_stock(conn: &mut SqliteConnection, id: i64, quantity: i64) -> DbResult<bool> {
    debug!(product_id = id, delta = -quantity, "Taking stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock_quantity = stock_quantity - ?2
        WHERE id = ?1 AND stock_quantity >= ?2
        "#,
    )
    .bind(id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Puts `quantity` units back on stock.
pub(crate) async fn return_stock(conn: &mut SqliteConnection, id: i64, quantity: i64) -> DbResult<()> {
    debug!(product_id = id, delta = quantity, "Returning stock");

    let result = sqlx::query("UPDATE products SET stock_quantity = stock_quantity + ?2 WHERE id = ?1")
        .bind(id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Overwrites the stock level.
pub(crate) async fn set_stock(conn: &mut SqliteConnection, id: i64, quantity: i64) -> DbResult<()> {
    debug!(product_id = id, quantity, "Setting stock");

    let result = sqlx::query("UPDATE products SET stock_quantity = ?2 WHERE id = ?1")
        .bind(id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::{Database, DbConfig};

    fn new_product(name: &str, price: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            unit_price_cents: price,
            stock_quantity: stock,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let coffee = repo.insert(&new_product(" Coffee ", 500, 10)).await.unwrap();
        assert_eq!(coffee.name, "Coffee");

        let fetched = repo.get_by_id(coffee.id).await.unwrap().unwrap();
        assert_eq!(fetched, coffee);
        assert!(repo.get_by_id(coffee.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&new_product("Milk", 299, 1)).await.unwrap();
        repo.insert(&new_product("Bread", 150, 1)).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Bread", "Milk"]);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.products().insert(&new_product("Coffee", 500, -1)).await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_price_above_limit_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let err = repo
            .insert(&new_product("Gold", i64::MAX / 2, 1))
            .await
            .unwrap_err();
        assert!(err.is_rejection());

        let mut coffee = repo.insert(&new_product("Coffee", 500, 10)).await.unwrap();
        coffee.unit_price_cents = tally_core::MAX_PRICE_CENTS + 1;
        assert!(repo.update(&coffee).await.unwrap_err().is_rejection());

        coffee.unit_price_cents = tally_core::MAX_PRICE_CENTS;
        repo.update(&coffee).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let ghost = Product {
            id: 99,
            name: "Ghost".to_string(),
            image_ref: None,
            unit_price_cents: 100,
            stock_quantity: 1,
            description: None,
        };
        let err = db.products().update(&ghost).await.unwrap_err();
        assert!(matches!(err, LedgerError::Store(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let coffee = repo.insert(&new_product("Coffee", 500, 10)).await.unwrap();
        repo.delete(coffee.id).await.unwrap();

        assert!(repo.get_by_id(coffee.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_take_stock_guard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let coffee = db.products().insert(&new_product("Coffee", 500, 2)).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(!take_stock(&mut conn, coffee.id, 3).await.unwrap());
        assert!(take_stock(&mut conn, coffee.id, 2).await.unwrap());
        drop(conn);

        let after = db.products().get_by_id(coffee.id).await.unwrap().unwrap();
        assert_eq!(after.stock_quantity, 0);
    }
}
