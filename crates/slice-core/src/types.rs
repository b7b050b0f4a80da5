//! # Domain Types
//!
//! Small value types shared by the catalog, the cart and the pricing engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Category      │   │  PaymentMethod  │   │   Fulfillment   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Standard       │   │  Cash     0%    │   │  Pickup         │       │
//! │  │  Promo          │   │  Debit    5%    │   │  Delivery + fee │       │
//! │  │  Calzone        │   │  Credit  10%    │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────────┐     │
//! │  │ SurchargeRate   │   │  OrderOptions                           │     │
//! │  │  bps (u32)      │   │  payment_method, fulfillment,           │     │
//! │  │  500 = 5%       │   │  delivery_fee (0 unless Delivery)       │     │
//! │  └─────────────────┘   └─────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Surcharge Rate
// =============================================================================

/// Card surcharge rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (debit), 1000 bps = 10% (credit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeRate(u32);

impl SurchargeRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        SurchargeRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact percentage (500 bps → 5).
    pub fn percent(&self) -> Decimal {
        (Decimal::from(self.0) / Decimal::from(100)).normalize()
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        SurchargeRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for SurchargeRate {
    fn default() -> Self {
        SurchargeRate::zero()
    }
}

// =============================================================================
// Category
// =============================================================================

/// What kind of sellable unit a catalog item is.
///
/// ## Button Rules
/// - `Standard`: two buttons, whole and half
/// - `Calzone`: one button, then "half or whole?"
/// - `Promo`: one button, then the promotion selection flow
///
/// On the wire `Standard` is spelled `"pizza"`; anything unrecognized
/// normalizes to `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    #[serde(rename = "pizza")]
    Standard,
    #[serde(rename = "promo")]
    Promo,
    #[serde(rename = "calzone")]
    Calzone,
}

impl Category {
    /// Normalizes a raw category string (case-insensitive).
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::types::Category;
    ///
    /// assert_eq!(Category::from_raw("PROMO"), Category::Promo);
    /// assert_eq!(Category::from_raw(" calzone "), Category::Calzone);
    /// assert_eq!(Category::from_raw("empanada"), Category::Standard);
    /// ```
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "promo" => Category::Promo,
            "calzone" => Category::Calzone,
            _ => Category::Standard,
        }
    }

    /// Wire name, as stored in the catalog document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Standard => "pizza",
            Category::Promo => "promo",
            Category::Calzone => "calzone",
        }
    }

    /// Heading used when grouping order lines.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Standard => "Pizzas",
            Category::Promo => "Promos",
            Category::Calzone => "Calzones",
        }
    }

    /// Whether items of this category can be picked inside a promotion.
    #[inline]
    pub fn is_promo_eligible(&self) -> bool {
        !matches!(self, Category::Promo)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. Card methods carry a surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash or bank transfer, no surcharge.
    #[default]
    Cash,
    Debit,
    Credit,
}

impl PaymentMethod {
    /// Label printed on messages and tickets.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash / Transfer",
            PaymentMethod::Debit => "Debit",
            PaymentMethod::Credit => "Credit",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "transfer" | "efectivo" => Ok(PaymentMethod::Cash),
            "debit" | "debito" => Ok(PaymentMethod::Debit),
            "credit" | "credito" => Ok(PaymentMethod::Credit),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["cash".into(), "debit".into(), "credit".into()],
            }),
        }
    }
}

// =============================================================================
// Fulfillment
// =============================================================================

/// Pickup at the counter or delivery to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Fulfillment {
    #[default]
    Pickup,
    Delivery,
}

impl Fulfillment {
    pub fn label(&self) -> &'static str {
        match self {
            Fulfillment::Pickup => "Pickup",
            Fulfillment::Delivery => "Delivery",
        }
    }
}

impl FromStr for Fulfillment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pickup" | "retira" => Ok(Fulfillment::Pickup),
            "delivery" => Ok(Fulfillment::Delivery),
            _ => Err(ValidationError::NotAllowed {
                field: "fulfillment".to_string(),
                allowed: vec!["pickup".into(), "delivery".into()],
            }),
        }
    }
}

// =============================================================================
// Order Options
// =============================================================================

/// Order-level choices that feed the pricing calculator.
///
/// ## Invariant
/// `delivery_fee` is zero whenever `fulfillment` is `Pickup`. The setters
/// below are the only way to change these fields, and they keep it so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderOptions {
    payment_method: PaymentMethod,
    fulfillment: Fulfillment,
    delivery_fee: Money,
}

impl OrderOptions {
    #[inline]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    #[inline]
    pub fn fulfillment(&self) -> Fulfillment {
        self.fulfillment
    }

    /// The fee as entered; zero for pickup.
    #[inline]
    pub fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Switches fulfillment mode.
    ///
    /// Pickup clears the fee. Delivery with no fee yet pre-fills
    /// `default_fee`, matching the till's "1000 unless told otherwise".
    pub fn set_fulfillment(&mut self, fulfillment: Fulfillment, default_fee: Money) {
        self.fulfillment = fulfillment;
        match fulfillment {
            Fulfillment::Pickup => self.delivery_fee = Money::zero(),
            Fulfillment::Delivery => {
                if self.delivery_fee.is_zero() {
                    self.delivery_fee = default_fee.clamp_non_negative();
                }
            }
        }
    }

    /// Sets the delivery fee. Ignored (stays zero) while in pickup mode.
    pub fn set_delivery_fee(&mut self, fee: Money) {
        if self.fulfillment == Fulfillment::Delivery {
            self.delivery_fee = fee.clamp_non_negative();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surcharge_rate_percent() {
        assert_eq!(SurchargeRate::from_bps(500).percent(), Decimal::from(5));
        assert_eq!(SurchargeRate::from_bps(1000).percent(), Decimal::from(10));
        assert_eq!(SurchargeRate::from_bps(250).percent().to_string(), "2.5");
        assert!(SurchargeRate::default().is_zero());
    }

    #[test]
    fn test_category_normalization() {
        assert_eq!(Category::from_raw("pizza"), Category::Standard);
        assert_eq!(Category::from_raw("Promo"), Category::Promo);
        assert_eq!(Category::from_raw(""), Category::Standard);
        assert!(Category::Calzone.is_promo_eligible());
        assert!(!Category::Promo.is_promo_eligible());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("DEBIT".parse::<PaymentMethod>().unwrap(), PaymentMethod::Debit);
        assert_eq!("credito".parse::<PaymentMethod>().unwrap(), PaymentMethod::Credit);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_pickup_forces_zero_fee() {
        let mut options = OrderOptions::default();
        options.set_delivery_fee(Money::from_units(1500));
        assert!(options.delivery_fee().is_zero());

        options.set_fulfillment(Fulfillment::Delivery, Money::from_units(1000));
        assert_eq!(options.delivery_fee(), Money::from_units(1000));

        options.set_delivery_fee(Money::from_units(1500));
        assert_eq!(options.delivery_fee(), Money::from_units(1500));

        options.set_fulfillment(Fulfillment::Pickup, Money::from_units(1000));
        assert!(options.delivery_fee().is_zero());
    }

    #[test]
    fn test_delivery_keeps_entered_fee() {
        let mut options = OrderOptions::default();
        options.set_fulfillment(Fulfillment::Delivery, Money::from_units(1000));
        options.set_delivery_fee(Money::from_units(700));
        options.set_fulfillment(Fulfillment::Delivery, Money::from_units(1000));
        assert_eq!(options.delivery_fee(), Money::from_units(700));
    }
}
