//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄┐ │  id             │──►│  id             │       │
//! │  │  unit_price     │ │ │  total_cents    │   │  name, phone    │       │
//! │  │  stock_quantity │ │ │  payment_status │   │  birth_date     │       │
//! │  └─────────────────┘ │ └────────┬────────┘   └─────────────────┘       │
//! │                      │          │ 1..n                                  │
//! │                      │ ┌────────▼────────┐                              │
//! │                      └─│  SaleLineItem   │  key: (sale_id, product_id)  │
//! │                        │  quantity       │                              │
//! │                        │  unit_price     │  ← snapshot at sale time     │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are SQLite rowids assigned by the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Path or URI of the product picture.
    pub image_ref: Option<String>,

    /// Current list price in cents.
    pub unit_price_cents: i64,

    /// Quantity on hand. Never negative.
    pub stock_quantity: i64,

    pub description: Option<String>,
}

impl Product {
    /// Returns the list price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Checks if `quantity` units can be taken from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.stock_quantity
    }
}

/// Fields for a product that doesn't exist yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub image_ref: Option<String>,
    pub unit_price_cents: i64,
    pub stock_quantity: i64,
    pub description: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Digits only, at most 11 (area code + number).
    pub phone: Option<String>,
    #[ts(as = "Option<String>")]
    pub birth_date: Option<NaiveDate>,
    pub photo_ref: Option<String>,
}

/// Fields for a customer that doesn't exist yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    #[ts(as = "Option<String>")]
    pub birth_date: Option<NaiveDate>,
    pub photo_ref: Option<String>,
}

// =============================================================================
// Payment Status
// =============================================================================

/// Whether a sale has been paid.
///
/// Set on create and edit; never transitioned automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header.
///
/// `total_cents` is stored redundantly; the ledger keeps it equal to the
/// sum of the sale's line totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    pub total_cents: i64,
    pub payment_status: PaymentStatus,
    /// Free text ("Cash", "Pix", "Credit card", ...). May be empty.
    pub payment_method: String,
    pub customer_id: i64,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One product on a sale.
///
/// `unit_price_cents` is frozen when the line is written and is never
/// recomputed from the product's current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLineItem {
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleLineItem {
    /// Returns the snapshot unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns quantity × snapshot price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale Requests
// =============================================================================

/// A product and quantity the caller wants on a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

impl SaleItemRequest {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        SaleItemRequest {
            product_id,
            quantity,
        }
    }
}

/// Everything needed to create a sale, or to replace one on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDraft {
    pub customer_id: i64,
    pub items: Vec<SaleItemRequest>,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
}

impl SaleDraft {
    /// Creates an unpaid draft with no payment method.
    pub fn new(customer_id: i64, items: Vec<SaleItemRequest>) -> Self {
        SaleDraft {
            customer_id,
            items,
            payment_status: PaymentStatus::default(),
            payment_method: String::new(),
        }
    }

    /// Sets the payment status and method.
    pub fn paid_with(mut self, status: PaymentStatus, method: impl Into<String>) -> Self {
        self.payment_status = status;
        self.payment_method = method.into();
        self
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// A sale with its customer's contact details, for list and detail views.
///
/// Customer fields are `None` when the customer row is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleSummary {
    pub id: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    pub total_cents: i64,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// A line item with the product's name.
///
/// `unit_price_cents` is the snapshot, not the product's current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LineItemView {
    pub sale_id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl LineItemView {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
