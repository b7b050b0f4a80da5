//! # slice-core: Pure Business Logic for Slice POS
//!
//! This crate is the order composition and pricing engine of Slice POS. It
//! holds every rule of the counter (what a button adds, how a promotion is
//! composed, what the customer pays, what the ticket says) as plain
//! functions and values with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Slice POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/counter (terminal front end)               │   │
//! │  │    menu ──► add / promo ──► qty / pay / mode ──► send / print  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ slice-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   cart    │  │ promotion │  │  pricing  │  │   │
//! │  │   │  items    │  │  CartKey  │  │   flow    │  │  totals   │  │   │
//! │  │   │  drinks   │  │  CartLine │  │  steps    │  │ surcharge │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  session  │  │  format   │  │  counter  │  │ validation│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    slice-db (Storage Layer)                     │   │
//! │  │        catalog document, fallback cache, order counter          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Exact decimal Money, currency formatting
//! - [`types`] - Category, payment method, fulfillment, order options
//! - [`catalog`] - Menu items, drinks, phone; normalization and admin edits
//! - [`cart`] - Structural cart keys and accumulating lines
//! - [`promotion`] - Multi-step promotion composition
//! - [`pricing`] - Subtotal, surcharge, delivery, grand total
//! - [`format`] - Chat message and receipt rendering
//! - [`session`] - The explicit order session that owns all of the above
//! - [`counter`] - Daily order numbering arithmetic
//! - [`validation`] - Operator input parsing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use slice_core::catalog::Catalog;
//! use slice_core::pricing::PricingPolicy;
//! use slice_core::session::{OrderSession, Portion};
//! use slice_core::{Money, PaymentMethod};
//!
//! let catalog = Catalog::seed_defaults("5490000000000");
//! let mut session = OrderSession::new(PricingPolicy::default(), Money::from_units(1000));
//!
//! let napolitana = &catalog.items[0];
//! session.add_catalog_item(napolitana, Portion::Whole).unwrap();
//! session.add_catalog_item(napolitana, Portion::Half).unwrap();
//! session.set_payment_method(PaymentMethod::Cash);
//!
//! let totals = session.totals();
//! assert_eq!(totals.grand_total, Money::from_units(8000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod counter;
pub mod error;
pub mod format;
pub mod money;
pub mod pricing;
pub mod promotion;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, PromotionError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How many items a customer picks inside one promotion.
pub const PROMO_PICK_COUNT: usize = 2;

/// Contact phone used until the shop configures its own.
///
/// International format, digits only, as `wa.me` expects.
pub const DEFAULT_PHONE: &str = "5490000000000";

/// Delivery fee pre-filled when the operator switches to delivery.
pub const DEFAULT_DELIVERY_FEE_UNITS: i64 = 1000;

/// Shared admin PIN shipped with a fresh install.
pub const DEFAULT_ADMIN_PIN: &str = "4321";

/// Longest catalog name accepted by the admin screen.
pub const MAX_NAME_LEN: usize = 80;

/// Largest amount (in whole currency units) accepted for a price or fee.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Largest quantity a single cart line can hold.
pub const MAX_QUANTITY: u32 = 9_999;
