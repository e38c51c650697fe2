//! # Stock Ledger
//!
//! The only writer of sales. Every operation here moves stock and sale rows
//! together inside one SQLite transaction, so after any call (success or
//! failure) each product's stock equals its starting stock minus the
//! quantities of every line item still on record.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stock Ledger                                    │
//! │                                                                         │
//! │  create_sale(draft)                                                    │
//! │    validate → read products → plan → insert header                     │
//! │    → insert lines → take stock per line → COMMIT                       │
//! │                                                                         │
//! │  edit_sale(id, draft)                                                  │
//! │    UNDO: return every old line's quantity, delete old lines            │
//! │    REDO: read products (post-undo) → plan → update header              │
//! │          → insert lines → take stock per line → COMMIT                 │
//! │                                                                         │
//! │  delete_sale(id)                                                       │
//! │    return every line's quantity → delete lines → delete header         │
//! │    → COMMIT                                                            │
//! │                                                                         │
//! │  adjust_stock(product, qty)                                            │
//! │    overwrite stock, no line items involved                             │
//! │                                                                         │
//! │  Any error drops the transaction: nothing is left half-applied.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use crate::error::{DbError, LedgerError, LedgerResult};
use crate::pool::begin_immediate;
use crate::repository::{customer, product, sale};
use tally_core::validation::validate_stock_quantity;
use tally_core::{validate_draft, CoreError, Sale, SaleDraft, SaleLineItem, SalePlan};

/// Transactional sale and stock operations.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = db.ledger();
/// let sale = ledger.create_sale(&draft).await?;
/// ledger.edit_sale(sale.id, &changed).await?;
/// ledger.delete_sale(sale.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Records a new sale and takes its quantities out of stock.
    ///
    /// Each line snapshots the product's price at this moment; the sale's
    /// total is the sum of those lines.
    ///
    /// ## Errors
    /// * `CoreError::EmptySale`, `DuplicateLineItem`, `Validation` - malformed draft
    /// * `CoreError::CustomerNotFound` / `ProductNotFound` - unknown reference
    /// * `CoreError::InsufficientStock` - a quantity exceeds stock on hand
    pub async fn create_sale(&self, draft: &SaleDraft) -> LedgerResult<Sale> {
        let result = self.try_create_sale(draft).await;

        match &result {
            Ok(sale) => info!(
                sale_id = sale.id,
                customer_id = sale.customer_id,
                total = %sale.total(),
                lines = draft.items.len(),
                "Sale created"
            ),
            Err(e) => log_failure("create_sale", e),
        }

        result
    }

    async fn try_create_sale(&self, draft: &SaleDraft) -> LedgerResult<Sale> {
        validate_draft(draft)?;

        let mut tx = begin_immediate(&self.pool).await?;

        if !customer::exists(&mut tx, draft.customer_id).await? {
            return Err(CoreError::CustomerNotFound(draft.customer_id).into());
        }

        let plan = plan_sale(&mut tx, draft).await?;
        let sold_at = Utc::now();

        let sale_id = sale::insert_header(
            &mut tx,
            sold_at,
            plan.total.cents(),
            draft.payment_status,
            draft.payment_method.trim(),
            draft.customer_id,
        )
        .await?;

        debug!(sale_id, total = %plan.total, "Sale header written");

        write_lines(&mut tx, sale_id, &plan).await?;

        tx.commit().await?;

        Ok(Sale {
            id: sale_id,
            sold_at,
            total_cents: plan.total.cents(),
            payment_status: draft.payment_status,
            payment_method: draft.payment_method.trim().to_string(),
            customer_id: draft.customer_id,
        })
    }

    /// Replaces a sale's customer, payment fields and items.
    ///
    /// Old quantities go back to stock before the new ones are checked, so
    /// a sale can be edited up to everything its own lines were holding.
    /// Prices are re-read now, and `sold_at` moves to the edit time.
    ///
    /// ## Errors
    /// * `CoreError::SaleNotFound` - no sale with that id
    /// * everything [`create_sale`](Self::create_sale) can reject
    pub async fn edit_sale(&self, sale_id: i64, draft: &SaleDraft) -> LedgerResult<Sale> {
        let result = self.try_edit_sale(sale_id, draft).await;

        match &result {
            Ok(sale) => info!(
                sale_id,
                total = %sale.total(),
                lines = draft.items.len(),
                "Sale edited"
            ),
            Err(e) => log_failure("edit_sale", e),
        }

        result
    }

    async fn try_edit_sale(&self, sale_id: i64, draft: &SaleDraft) -> LedgerResult<Sale> {
        validate_draft(draft)?;

        let mut tx = begin_immediate(&self.pool).await?;

        if sale::fetch_header(&mut tx, sale_id).await?.is_none() {
            return Err(CoreError::SaleNotFound(sale_id).into());
        }

        if !customer::exists(&mut tx, draft.customer_id).await? {
            return Err(CoreError::CustomerNotFound(draft.customer_id).into());
        }

        // Undo
        let old_lines = sale::fetch_lines(&mut tx, sale_id).await?;
        restore_lines(&mut tx, &old_lines).await?;
        sale::delete_lines(&mut tx, sale_id).await?;

        // Redo
        let plan = plan_sale(&mut tx, draft).await?;

        let edited = Sale {
            id: sale_id,
            sold_at: Utc::now(),
            total_cents: plan.total.cents(),
            payment_status: draft.payment_status,
            payment_method: draft.payment_method.trim().to_string(),
            customer_id: draft.customer_id,
        };
        sale::update_header(&mut tx, &edited).await?;

        write_lines(&mut tx, sale_id, &plan).await?;

        tx.commit().await?;

        Ok(edited)
    }

    /// Deletes a sale and puts all of its quantities back on stock.
    ///
    /// ## Errors
    /// * `CoreError::SaleNotFound` - no sale with that id
    pub async fn delete_sale(&self, sale_id: i64) -> LedgerResult<()> {
        let result = self.try_delete_sale(sale_id).await;

        match &result {
            Ok(restored) => info!(sale_id, lines = *restored, "Sale deleted"),
            Err(e) => log_failure("delete_sale", e),
        }

        result.map(|_| ())
    }

    async fn try_delete_sale(&self, sale_id: i64) -> LedgerResult<usize> {
        let mut tx = begin_immediate(&self.pool).await?;

        if sale::fetch_header(&mut tx, sale_id).await?.is_none() {
            return Err(CoreError::SaleNotFound(sale_id).into());
        }

        let lines = sale::fetch_lines(&mut tx, sale_id).await?;
        restore_lines(&mut tx, &lines).await?;
        sale::delete_lines(&mut tx, sale_id).await?;
        sale::delete_header(&mut tx, sale_id).await?;

        tx.commit().await?;

        Ok(lines.len())
    }

    /// Overwrites a product's stock, e.g. after a physical count.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - negative quantity
    /// * `CoreError::ProductNotFound` - no product with that id
    pub async fn adjust_stock(&self, product_id: i64, new_quantity: i64) -> LedgerResult<()> {
        let result = self.try_adjust_stock(product_id, new_quantity).await;

        match &result {
            Ok(()) => info!(product_id, quantity = new_quantity, "Stock adjusted"),
            Err(e) => log_failure("adjust_stock", e),
        }

        result
    }

    async fn try_adjust_stock(&self, product_id: i64, new_quantity: i64) -> LedgerResult<()> {
        validate_stock_quantity(new_quantity)?;

        let mut tx = begin_immediate(&self.pool).await?;

        match product::set_stock(&mut tx, product_id, new_quantity).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                return Err(CoreError::ProductNotFound(product_id).into())
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }
}

fn log_failure(operation: &str, err: &LedgerError) {
    if err.is_rejection() {
        warn!(operation, error = %err, "Ledger operation rejected");
    } else {
        error!(operation, error = %err, "Ledger operation failed");
    }
}

/// Reads the draft's products on `conn` and prices the sale against them.
async fn plan_sale(conn: &mut SqliteConnection, draft: &SaleDraft) -> LedgerResult<SalePlan> {
    let ids: Vec<i64> = draft.items.iter().map(|item| item.product_id).collect();
    let products = product::fetch_many(conn, &ids).await?;

    Ok(SalePlan::build(&draft.items, &products)?)
}

/// Inserts the planned lines under `sale_id` and takes their stock.
async fn write_lines(conn: &mut SqliteConnection, sale_id: i64, plan: &SalePlan) -> LedgerResult<()> {
    for planned in &plan.lines {
        let line = planned.into_line_item(sale_id);
        sale::insert_line(conn, &line).await?;

        if !product::take_stock(conn, line.product_id, line.quantity).await? {
            return Err(shortage(conn, &line).await?.into());
        }
    }

    Ok(())
}

/// Puts each line's quantity back on its product.
async fn restore_lines(conn: &mut SqliteConnection, lines: &[SaleLineItem]) -> LedgerResult<()> {
    for line in lines {
        product::return_stock(conn, line.product_id, line.quantity).await?;
    }

    Ok(())
}

/// Describes why the guarded decrement for `line` matched no row.
async fn shortage(conn: &mut SqliteConnection, line: &SaleLineItem) -> LedgerResult<CoreError> {
    let error = match product::fetch(conn, line.product_id).await? {
        Some(found) => CoreError::InsufficientStock {
            product: found.name,
            available: found.stock_quantity,
            requested: line.quantity,
        },
        None => CoreError::ProductNotFound(line.product_id),
    };

    Ok(error)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use std::time::Duration;
    use tally_core::ledger::net_stock_change;
    use tally_core::{NewCustomer, NewProduct, PaymentStatus, SaleItemRequest};

    struct Shop {
        db: Database,
        coffee: i64,
        milk: i64,
        ana: i64,
    }

    async fn shop() -> Shop {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let coffee = add_product(&db, "Coffee", 500, 10).await;
        let milk = add_product(&db, "Milk", 299, 4).await;
        let ana = db
            .customers()
            .insert(&NewCustomer {
                name: "Ana".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id;
        Shop {
            db,
            coffee,
            milk,
            ana,
        }
    }

    async fn add_product(db: &Database, name: &str, price: i64, stock: i64) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                unit_price_cents: price,
                stock_quantity: stock,
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    async fn stock(db: &Database, id: i64) -> i64 {
        db.products()
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    fn items(lines: &[(i64, i64)]) -> Vec<SaleItemRequest> {
        lines
            .iter()
            .map(|&(product, qty)| SaleItemRequest::new(product, qty))
            .collect()
    }

    #[tokio::test]
    async fn test_sell_edit_delete_scenario() {
        let s = shop().await;
        let ledger = s.db.ledger();

        let sale = ledger
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 3)])))
            .await
            .unwrap();
        assert_eq!(sale.total_cents, 1500);
        assert_eq!(stock(&s.db, s.coffee).await, 7);

        let edited = ledger
            .edit_sale(sale.id, &SaleDraft::new(s.ana, items(&[(s.coffee, 5)])))
            .await
            .unwrap();
        assert_eq!(edited.total_cents, 2500);
        assert_eq!(stock(&s.db, s.coffee).await, 5);

        ledger.delete_sale(sale.id).await.unwrap();
        assert_eq!(stock(&s.db, s.coffee).await, 10);
        assert_eq!(s.db.sales().count().await.unwrap(), 0);
        assert!(s.db.sales().get_line_items(sale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_writes_lines_and_total() {
        let s = shop().await;

        let draft = SaleDraft::new(s.ana, items(&[(s.coffee, 2), (s.milk, 3)]))
            .paid_with(PaymentStatus::Paid, " Pix ");
        let sale = s.db.ledger().create_sale(&draft).await.unwrap();

        let stored = s.db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 2 * 500 + 3 * 299);
        assert_eq!(stored.payment_status, PaymentStatus::Paid);
        assert_eq!(stored.payment_method, "Pix");

        let lines = s.db.sales().get_line_items(sale.id).await.unwrap();
        let sum: i64 = lines.iter().map(|l| l.line_total().cents()).sum();
        assert_eq!(sum, stored.total_cents);

        assert_eq!(stock(&s.db, s.coffee).await, 8);
        assert_eq!(stock(&s.db, s.milk).await, 1);
    }

    #[tokio::test]
    async fn test_create_rolls_back_on_shortage() {
        let s = shop().await;

        let err = s
            .db
            .ledger()
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 2), (s.milk, 5)])))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::InsufficientStock {
                available: 4,
                requested: 5,
                ..
            })
        ));
        assert_eq!(stock(&s.db, s.coffee).await, 10);
        assert_eq!(stock(&s.db, s.milk).await, 4);
        assert_eq!(s.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_guard_discards_rows_already_written() {
        let s = shop().await;
        let draft = SaleDraft::new(s.ana, items(&[(s.coffee, 2), (s.milk, 3)]));

        let mut tx = s.db.pool().begin().await.unwrap();
        let plan = plan_sale(&mut tx, &draft).await.unwrap();

        // Milk drains between planning and writing.
        product::set_stock(&mut tx, s.milk, 1).await.unwrap();

        let sale_id = sale::insert_header(
            &mut tx,
            Utc::now(),
            plan.total.cents(),
            draft.payment_status,
            "",
            s.ana,
        )
        .await
        .unwrap();

        let err = write_lines(&mut tx, sale_id, &plan).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::InsufficientStock {
                available: 1,
                requested: 3,
                ..
            })
        ));

        // The header, the coffee line and its decrement are in the transaction.
        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        assert_eq!(lines, 1);
        let coffee_left = product::fetch(&mut tx, s.coffee).await.unwrap().unwrap();
        assert_eq!(coffee_left.stock_quantity, 8);

        drop(tx);

        assert_eq!(s.db.sales().count().await.unwrap(), 0);
        assert!(s.db.sales().get_line_items(sale_id).await.unwrap().is_empty());
        assert_eq!(stock(&s.db, s.coffee).await, 10);
        assert_eq!(stock(&s.db, s.milk).await, 4);
    }

    #[tokio::test]
    async fn test_zero_stock_cannot_be_sold() {
        let s = shop().await;
        let ledger = s.db.ledger();

        ledger.adjust_stock(s.milk, 0).await.unwrap();

        let err = ledger
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.milk, 1)])))
            .await
            .unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(stock(&s.db, s.milk).await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_references() {
        let s = shop().await;
        let ledger = s.db.ledger();

        let err = ledger
            .create_sale(&SaleDraft::new(s.ana + 50, items(&[(s.coffee, 1)])))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::CustomerNotFound(_))
        ));

        let err = ledger
            .create_sale(&SaleDraft::new(s.ana, items(&[(999, 1)])))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::ProductNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_draft() {
        let s = shop().await;

        let err = s
            .db
            .ledger()
            .create_sale(&SaleDraft::new(s.ana, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::EmptySale)));
    }

    #[tokio::test]
    async fn test_edit_net_effect_across_products() {
        let s = shop().await;
        let ledger = s.db.ledger();

        let sale = ledger
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 3), (s.milk, 1)])))
            .await
            .unwrap();

        let before = [
            (s.coffee, stock(&s.db, s.coffee).await),
            (s.milk, stock(&s.db, s.milk).await),
        ];
        let old_lines = s.db.sales().get_line_items(sale.id).await.unwrap();
        let new_items = items(&[(s.milk, 4)]);

        ledger
            .edit_sale(sale.id, &SaleDraft::new(s.ana, new_items.clone()))
            .await
            .unwrap();

        let expected = net_stock_change(&old_lines, &new_items);
        for (id, stock_before) in before {
            assert_eq!(stock(&s.db, id).await, stock_before + expected[&id]);
        }
        assert_eq!(stock(&s.db, s.coffee).await, 10);
        assert_eq!(stock(&s.db, s.milk).await, 0);

        let lines = s.db.sales().get_line_items(sale.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, s.milk);
        assert_eq!(lines[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_edit_checks_stock_after_undo() {
        let s = shop().await;
        let ledger = s.db.ledger();

        let sale = ledger
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 10)])))
            .await
            .unwrap();
        assert_eq!(stock(&s.db, s.coffee).await, 0);

        ledger
            .edit_sale(sale.id, &SaleDraft::new(s.ana, items(&[(s.coffee, 10)])))
            .await
            .unwrap();
        assert_eq!(stock(&s.db, s.coffee).await, 0);
    }

    #[tokio::test]
    async fn test_failed_edit_leaves_sale_untouched() {
        let s = shop().await;
        let ledger = s.db.ledger();

        let sale = ledger
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 3)])))
            .await
            .unwrap();

        let err = ledger
            .edit_sale(sale.id, &SaleDraft::new(s.ana, items(&[(s.coffee, 11)])))
            .await
            .unwrap_err();
        assert!(err.is_rejection());

        assert_eq!(stock(&s.db, s.coffee).await, 7);
        let lines = s.db.sales().get_line_items(sale.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        let stored = s.db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(stored, sale);
    }

    #[tokio::test]
    async fn test_edit_reprices_and_moves_customer() {
        let s = shop().await;
        let ledger = s.db.ledger();
        let bia = s
            .db
            .customers()
            .insert(&NewCustomer {
                name: "Bia".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id;

        let sale = ledger
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 2)])))
            .await
            .unwrap();

        let mut coffee = s.db.products().get_by_id(s.coffee).await.unwrap().unwrap();
        coffee.unit_price_cents = 600;
        s.db.products().update(&coffee).await.unwrap();

        let edited = ledger
            .edit_sale(
                sale.id,
                &SaleDraft::new(bia, items(&[(s.coffee, 2)])).paid_with(PaymentStatus::Paid, "Cash"),
            )
            .await
            .unwrap();

        assert_eq!(edited.customer_id, bia);
        assert_eq!(edited.total_cents, 1200);
        assert!(edited.sold_at >= sale.sold_at);
        assert_eq!(s.db.sales().get_by_id(sale.id).await.unwrap(), Some(edited));
    }

    #[tokio::test]
    async fn test_edit_and_delete_missing_sale() {
        let s = shop().await;
        let ledger = s.db.ledger();

        let err = ledger
            .edit_sale(77, &SaleDraft::new(s.ana, items(&[(s.coffee, 1)])))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::SaleNotFound(77))));

        let err = ledger.delete_sale(77).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(CoreError::SaleNotFound(77))));
        assert_eq!(stock(&s.db, s.coffee).await, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("tally.db"))
            .max_connections(8)
            .busy_timeout(Duration::from_secs(30));
        let db = Database::new(config).await.unwrap();

        let coffee = add_product(&db, "Coffee", 500, 1000).await;
        let ana = db
            .customers()
            .insert(&NewCustomer {
                name: "Ana".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id;

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let ledger = db.ledger();
            tasks.push(tokio::spawn(async move {
                let mut failures = 0;
                for _ in 0..10 {
                    let draft = SaleDraft::new(ana, vec![SaleItemRequest::new(coffee, 1)]);
                    if ledger.create_sale(&draft).await.is_err() {
                        failures += 1;
                    }
                }
                failures
            }));
        }

        let mut failures = 0;
        for task in tasks {
            failures += task.await.unwrap();
        }

        assert_eq!(failures, 0);
        assert_eq!(stock(&db, coffee).await, 920);
        assert_eq!(db.sales().count().await.unwrap(), 80);

        db.close().await;
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let s = shop().await;
        let ledger = s.db.ledger();

        ledger.adjust_stock(s.coffee, 42).await.unwrap();
        assert_eq!(stock(&s.db, s.coffee).await, 42);

        let err = ledger.adjust_stock(s.coffee, -1).await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(stock(&s.db, s.coffee).await, 42);

        let err = ledger.adjust_stock(999, 5).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::ProductNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_reads_do_not_change_state() {
        let s = shop().await;
        let sale = s
            .db
            .ledger()
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 1)])))
            .await
            .unwrap();

        let first = s.db.sales().list_with_customer().await.unwrap();
        let items_first = s.db.sales().get_items(sale.id).await.unwrap();
        let second = s.db.sales().list_with_customer().await.unwrap();
        let items_second = s.db.sales().get_items(sale.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(items_first, items_second);
        assert_eq!(stock(&s.db, s.coffee).await, 9);
    }

    #[tokio::test]
    async fn test_referenced_rows_cannot_be_deleted() {
        let s = shop().await;
        let sale = s
            .db
            .ledger()
            .create_sale(&SaleDraft::new(s.ana, items(&[(s.coffee, 1)])))
            .await
            .unwrap();

        let err = s.db.products().delete(s.coffee).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::ProductInUse { sales: 1, .. })
        ));

        let err = s.db.customers().delete(s.ana).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Rejected(CoreError::CustomerHasSales { sales: 1, .. })
        ));

        s.db.ledger().delete_sale(sale.id).await.unwrap();
        s.db.products().delete(s.coffee).await.unwrap();
        s.db.customers().delete(s.ana).await.unwrap();
    }
}
