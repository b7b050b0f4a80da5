//! # Repository Module
//!
//! SQLite repositories for Slice POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    What Each Repository Owns                            │
//! │                                                                         │
//! │  CatalogStore / checkout command                                       │
//! │       │                                                                 │
//! │       │  db.catalog().load_document()                                  │
//! │       │  db.order_counter().next_order_number(today)                   │
//! │       ▼                                                                 │
//! │  CatalogRepository             OrderCounterRepository                  │
//! │  ├── load_document()           ├── current()                           │
//! │  └── save_document(&catalog)   └── next_order_number(today)            │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  catalog_document (1 row)      order_counter (1 row)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Whole-document menu read/write
//! - [`OrderCounterRepository`](counter::OrderCounterRepository) - Daily order numbers

pub mod catalog;
pub mod counter;
