//! # Sale Repository
//!
//! Read side of sales, plus the row-level writes the ledger composes.
//!
//! ## Who Writes What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale Data Access                                 │
//! │                                                                         │
//! │  SaleRepository (pool)              StockLedger (one transaction)      │
//! │  ─────────────────────              ─────────────────────────────      │
//! │  get_by_id / get_summary            insert_header ─┐                   │
//! │  list_with_customer                 insert_line    │  row helpers      │
//! │  list_by_customer                   update_header  ├─ in this file     │
//! │  get_items / get_line_items         delete_lines   │                   │
//! │  count                              delete_header ─┘                   │
//! │                                                                         │
//! │  Sales are never written through the pool directly: every write       │
//! │  also moves stock, so it belongs to the ledger.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{LineItemView, PaymentStatus, Sale, SaleLineItem, SaleSummary};

const SUMMARY_SELECT: &str = r#"
    SELECT
        s.id,
        s.sold_at,
        s.total_cents,
        s.payment_status,
        s.payment_method,
        s.customer_id,
        c.name AS customer_name,
        c.phone AS customer_phone
    FROM sales s
    LEFT JOIN customers c ON c.id = s.customer_id
"#;

/// Repository for sale reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        fetch_header(&mut conn, id).await
    }

    /// Gets a sale with its customer's name and phone.
    pub async fn get_summary(&self, id: i64) -> DbResult<Option<SaleSummary>> {
        let query = format!("{SUMMARY_SELECT} WHERE s.id = ?1");

        let summary = sqlx::query_as::<_, SaleSummary>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(summary)
    }

    /// Lists every sale, newest first, with customer details.
    pub async fn list_with_customer(&self) -> DbResult<Vec<SaleSummary>> {
        let query = format!("{SUMMARY_SELECT} ORDER BY s.sold_at DESC, s.id DESC");

        let sales = sqlx::query_as::<_, SaleSummary>(&query)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Lists one customer's sales, newest first.
    pub async fn list_by_customer(&self, customer_id: i64) -> DbResult<Vec<SaleSummary>> {
        let query = format!(
            "{SUMMARY_SELECT} WHERE s.customer_id = ?1 ORDER BY s.sold_at DESC, s.id DESC"
        );

        let sales = sqlx::query_as::<_, SaleSummary>(&query)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets a sale's line items with product names.
    ///
    /// Prices are the snapshots taken when the lines were written.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<LineItemView>> {
        let items = sqlx::query_as::<_, LineItemView>(
            r#"
            SELECT
                i.sale_id,
                i.product_id,
                p.name AS product_name,
                i.quantity,
                i.unit_price_cents
            FROM sale_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.sale_id = ?1
            ORDER BY i.rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a sale's raw line items.
    pub async fn get_line_items(&self, sale_id: i64) -> DbResult<Vec<SaleLineItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_lines(&mut conn, sale_id).await
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level helpers (used inside ledger transactions)
// =============================================================================

pub(crate) async fn fetch_header(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, sold_at, total_cents, payment_status, payment_method, customer_id
        FROM sales
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(sale)
}

pub(crate) async fn fetch_lines(conn: &mut SqliteConnection, sale_id: i64) -> DbResult<Vec<SaleLineItem>> {
    let lines = sqlx::query_as::<_, SaleLineItem>(
        r#"
        SELECT sale_id, product_id, quantity, unit_price_cents
        FROM sale_items
        WHERE sale_id = ?1
        ORDER BY rowid
        "#,
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(lines)
}

/// Writes a sale header and returns its id.
pub(crate) async fn insert_header(
    conn: &mut SqliteConnection,
    sold_at: DateTime<Utc>,
    total_cents: i64,
    payment_status: PaymentStatus,
    payment_method: &str,
    customer_id: i64,
) -> DbResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO sales (sold_at, total_cents, payment_status, payment_method, customer_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(sold_at)
    .bind(total_cents)
    .bind(payment_status)
    .bind(payment_method)
    .bind(customer_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub(crate) async fn update_header(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE sales SET
            sold_at = ?2,
            total_cents = ?3,
            payment_status = ?4,
            payment_method = ?5,
            customer_id = ?6
        WHERE id = ?1
        "#,
    )
    .bind(sale.id)
    .bind(sale.sold_at)
    .bind(sale.total_cents)
    .bind(sale.payment_status)
    .bind(&sale.payment_method)
    .bind(sale.customer_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Sale", sale.id));
    }

    Ok(())
}

pub(crate) async fn insert_line(conn: &mut SqliteConnection, line: &SaleLineItem) -> DbResult<()> {
    debug!(sale_id = line.sale_id, product_id = line.product_id, "Adding sale item");

    sqlx::query(
        r#"
        INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(line.sale_id)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(line.unit_price_cents)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Removes every line of a sale; returns how many were removed.
pub(crate) async fn delete_lines(conn: &mut SqliteConnection, sale_id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
        .bind(sale_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub(crate) async fn delete_header(conn: &mut SqliteConnection, sale_id: i64) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
        .bind(sale_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Sale", sale_id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use tally_core::{NewCustomer, NewProduct, PaymentStatus, SaleDraft, SaleItemRequest};

    async fn seeded() -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let coffee = db
            .products()
            .insert(&NewProduct {
                name: "Coffee".to_string(),
                unit_price_cents: 500,
                stock_quantity: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        let ana = db
            .customers()
            .insert(&NewCustomer {
                name: "Ana".to_string(),
                phone: Some("11987654321".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        (db, coffee.id, ana.id)
    }

    #[tokio::test]
    async fn test_summary_joins_customer() {
        let (db, coffee, ana) = seeded().await;
        let draft = SaleDraft::new(ana, vec![SaleItemRequest::new(coffee, 2)])
            .paid_with(PaymentStatus::Paid, "Cash");
        let sale = db.ledger().create_sale(&draft).await.unwrap();

        let summary = db.sales().get_summary(sale.id).await.unwrap().unwrap();
        assert_eq!(summary.customer_name.as_deref(), Some("Ana"));
        assert_eq!(summary.customer_phone.as_deref(), Some("11987654321"));
        assert_eq!(summary.total_cents, 1000);
        assert_eq!(summary.payment_status, PaymentStatus::Paid);

        assert_eq!(db.sales().list_by_customer(ana).await.unwrap().len(), 1);
        assert!(db.sales().list_by_customer(ana + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (db, coffee, ana) = seeded().await;
        let first = db
            .ledger()
            .create_sale(&SaleDraft::new(ana, vec![SaleItemRequest::new(coffee, 1)]))
            .await
            .unwrap();
        let second = db
            .ledger()
            .create_sale(&SaleDraft::new(ana, vec![SaleItemRequest::new(coffee, 1)]))
            .await
            .unwrap();

        let ids: Vec<i64> = db
            .sales()
            .list_with_customer()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_items_keep_snapshot_price() {
        let (db, coffee, ana) = seeded().await;
        let sale = db
            .ledger()
            .create_sale(&SaleDraft::new(ana, vec![SaleItemRequest::new(coffee, 3)]))
            .await
            .unwrap();

        let mut product = db.products().get_by_id(coffee).await.unwrap().unwrap();
        product.unit_price_cents = 900;
        db.products().update(&product).await.unwrap();

        let items = db.sales().get_items(sale.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name.as_deref(), Some("Coffee"));
        assert_eq!(items[0].unit_price_cents, 500);
        assert_eq!(items[0].line_total().cents(), 1500);
    }
}
