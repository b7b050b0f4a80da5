//! # State Module
//!
//! Everything the command loop works on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────────────────────────────┐    │
//! │  │   AppConfig      │  │   AppState                               │    │
//! │  │                  │  │                                          │    │
//! │  │  store, pricing  │─►│  catalog ◄──── CatalogStore (load/save)  │    │
//! │  │  admin, storage  │  │  session       (cart, options, promo)    │    │
//! │  │  printer         │  │  admin         (PIN gate)                │    │
//! │  └──────────────────┘  │  formatter, printer                      │    │
//! │                        └──────────────────────────────────────────┘    │
//! │                                                                         │
//! │  One loop owns AppState; commands borrow it mutably. No locks.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod config;

pub use app::AppState;
pub use config::{
    AdminSettings, AppConfig, ConfigError, ConfigResult, PricingSettings, PrinterSettings,
    StorageSettings, StoreSettings,
};
