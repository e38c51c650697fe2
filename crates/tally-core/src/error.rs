//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LedgerError      - CoreError | DbError, per ledger operation      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is raised before the ledger commits anything: the
//! transaction it was raised in is rolled back.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product id doesn't exist.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Customer id doesn't exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// Sale id doesn't exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Insufficient stock to complete the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// New sale: 5 × Coffee
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Coffee", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Coffee in stock"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A sale must carry at least one line item.
    #[error("Sale must contain at least one item")]
    EmptySale,

    /// The same product was listed twice on one sale.
    ///
    /// Line items are keyed by (sale, product), so quantities must be
    /// combined by the caller.
    #[error("Product {0} appears more than once on the sale")]
    DuplicateLineItem(i64),

    /// Sale has more distinct products than allowed.
    #[error("Sale cannot have more than {max} items")]
    SaleTooLarge { max: usize },

    /// Product is still referenced by sale line items.
    #[error("Product {product_id} is referenced by {sales} sale(s)")]
    ProductInUse { product_id: i64, sales: i64 },

    /// Customer still owns sales.
    #[error("Customer {customer_id} has {sales} sale(s)")]
    CustomerHasSales { customer_id: i64, sales: i64 },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field failed its check. `field` names it for the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("{field} cannot exceed {max}")]
    TooLarge { field: &'static str, max: i64 },

    #[error("{field} {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
