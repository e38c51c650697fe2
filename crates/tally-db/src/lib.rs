//! # tally-db: Database Layer for Tally
//!
//! SQLite storage for the shop ledger, with sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  Caller (UI shell, seed binary, tests)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ ProductRepo   │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ CustomerRepo  │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │    │ SaleRepo      │    │              │  │   │
//! │  │   │               │    └───────▲───────┘    └──────────────┘  │   │
//! │  │   │               │            │ row helpers                   │   │
//! │  │   │               │◄───┌───────┴───────┐                       │   │
//! │  │   └───────────────┘    │  StockLedger  │  one tx per op        │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (TALLY_DB_PATH, default ./tally.db)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and ledger error types
//! - [`repository`] - Product, customer and sale repositories
//! - [`ledger`] - Transactional sale and stock operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//! use tally_core::{SaleDraft, SaleItemRequest};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//!
//! let draft = SaleDraft::new(customer_id, vec![SaleItemRequest::new(coffee_id, 3)]);
//! let sale = db.ledger().create_sale(&draft).await?;
//! let items = db.sales().get_items(sale.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, LedgerError, LedgerResult};
pub use ledger::StockLedger;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
