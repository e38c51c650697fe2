//! # Sale Planning
//!
//! Pure half of the stock ledger: turns a requested item list into priced
//! lines and a total, checking each quantity against a product snapshot.
//! The database half (`tally_db::ledger`) reads the snapshots, calls
//! [`SalePlan::build`], and writes the result inside one transaction.
//!
//! ## Where This Runs
//! ```text
//! create_sale(draft)                 edit_sale(id, draft)
//!      │                                  │
//!      ▼                                  ▼
//! validate_draft ◄── shape only ──► validate_draft
//!      │                                  │
//!      │                            undo: restore old quantities
//!      ▼                                  ▼
//! read products ─────────────────► read products (post-undo stock)
//!      │                                  │
//!      ▼                                  ▼
//! SalePlan::build ◄── stock check, price snapshot, total
//!      │
//!      ▼
//! write header + lines, take stock
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, SaleDraft, SaleItemRequest, SaleLineItem};
use crate::validation::{validate_payment_method, validate_quantity};
use crate::MAX_SALE_LINES;

/// Checks the parts of a draft that need no database access.
///
/// ## Rules
/// - At least one item, at most `MAX_SALE_LINES`
/// - Every quantity within `1..=MAX_ITEM_QUANTITY`
/// - No product listed twice
/// - Payment method within length limit
pub fn validate_draft(draft: &SaleDraft) -> CoreResult<()> {
    if draft.items.is_empty() {
        return Err(CoreError::EmptySale);
    }

    if draft.items.len() > MAX_SALE_LINES {
        return Err(CoreError::SaleTooLarge {
            max: MAX_SALE_LINES,
        });
    }

    let mut seen = HashSet::with_capacity(draft.items.len());
    for item in &draft.items {
        validate_quantity(item.quantity)?;
        if !seen.insert(item.product_id) {
            return Err(CoreError::DuplicateLineItem(item.product_id));
        }
    }

    validate_payment_method(&draft.payment_method)?;

    Ok(())
}

// =============================================================================
// Sale Plan
// =============================================================================

/// A line ready to be written: quantity plus the price snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl PlannedLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }

    /// Binds the line to a sale id.
    pub fn into_line_item(self, sale_id: i64) -> SaleLineItem {
        SaleLineItem {
            sale_id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
        }
    }
}

/// Priced lines and total for a sale about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    pub lines: Vec<PlannedLine>,
    pub total: Money,
}

impl SalePlan {
    /// Prices `items` against `products` and checks stock.
    ///
    /// `products` must be read at the moment the sale is written: each
    /// line snapshots that product's current price, and quantities are
    /// checked against its current stock.
    ///
    /// ## Errors
    /// - `ProductNotFound` when an item's product is absent from `products`
    /// - `InsufficientStock` when a quantity exceeds the product's stock
    pub fn build(items: &[SaleItemRequest], products: &[Product]) -> CoreResult<SalePlan> {
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(CoreError::ProductNotFound(item.product_id))?;

            if !product.can_sell(item.quantity) {
                return Err(CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock_quantity,
                    requested: item.quantity,
                });
            }

            lines.push(PlannedLine {
                product_id: product.id,
                quantity: item.quantity,
                unit_price_cents: product.unit_price_cents,
            });
        }

        let total = lines.iter().map(PlannedLine::line_total).sum();

        Ok(SalePlan { lines, total })
    }
}

/// Net stock change per product when a sale's lines go from `old` to `new`.
///
/// Positive means stock goes up. Equals reversing every old line and then
/// applying every new one, whatever the overlap between the two sets.
///
/// ```rust
/// use tally_core::ledger::net_stock_change;
/// use tally_core::{SaleItemRequest, SaleLineItem};
///
/// let old = [SaleLineItem { sale_id: 1, product_id: 7, quantity: 3, unit_price_cents: 500 }];
/// let new = [SaleItemRequest::new(7, 5)];
/// assert_eq!(net_stock_change(&old, &new)[&7], -2);
/// ```
pub fn net_stock_change(old: &[SaleLineItem], new: &[SaleItemRequest]) -> BTreeMap<i64, i64> {
    let mut change = BTreeMap::new();
    for line in old {
        *change.entry(line.product_id).or_insert(0) += line.quantity;
    }
    for item in new {
        *change.entry(item.product_id).or_insert(0) -= item.quantity;
    }
    change
}

// =============================================================================
// Unit Tests
// =============================================================================
