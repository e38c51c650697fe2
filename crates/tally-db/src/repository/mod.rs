//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.products().list()                                          │
//! │       ▼                                                                 │
//! │  ProductRepository / CustomerRepository / SaleRepository               │
//! │  ├── pub methods      take the pool, one statement or one tx each     │
//! │  └── pub(crate) fns   take &mut SqliteConnection, used by the ledger  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer registry CRUD
//! - [`SaleRepository`](sale::SaleRepository) - Sale reads and list views

pub mod customer;
pub mod product;
pub mod sale;
