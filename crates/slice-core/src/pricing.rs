//! # Pricing Module
//!
//! Turns a cart and the order options into what the customer pays.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal   = Σ unit_price × quantity                                  │
//! │  delivery   = fee if Delivery, else 0                                  │
//! │  base       = subtotal + delivery        (SubtotalAndDelivery)         │
//! │             = subtotal                   (SubtotalOnly)                │
//! │  surcharge  = base × rate(payment method)                              │
//! │  grand      = subtotal + delivery + surcharge                          │
//! │                                                                         │
//! │  Example: Whole 5000 + Half 3000, Credit 10%, Delivery 1000            │
//! │    subtotal 8000, base 9000, surcharge 900, grand 9900                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything stays exact. Rounding is left to whoever displays the totals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::{Fulfillment, OrderOptions, PaymentMethod, SurchargeRate};

/// What the card surcharge is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeBase {
    #[default]
    SubtotalAndDelivery,
    SubtotalOnly,
}

/// Surcharge rules for the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub debit_rate: SurchargeRate,
    pub credit_rate: SurchargeRate,
    pub surcharge_base: SurchargeBase,
}

impl Default for PricingPolicy {
    /// Debit 5%, credit 10%, applied to subtotal plus delivery.
    fn default() -> Self {
        PricingPolicy {
            debit_rate: SurchargeRate::from_bps(500),
            credit_rate: SurchargeRate::from_bps(1000),
            surcharge_base: SurchargeBase::SubtotalAndDelivery,
        }
    }
}

impl PricingPolicy {
    /// Rate for a payment method. Cash never carries a surcharge.
    pub fn rate_for(&self, method: PaymentMethod) -> SurchargeRate {
        match method {
            PaymentMethod::Cash => SurchargeRate::zero(),
            PaymentMethod::Debit => self.debit_rate,
            PaymentMethod::Credit => self.credit_rate,
        }
    }
}

/// Derived totals. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub surcharge_rate: SurchargeRate,
    pub surcharge_amount: Money,
    pub delivery_fee: Money,
    pub grand_total: Money,
    pub item_count: u64,
}

/// Computes the totals for `cart` under `options` and `policy`.
///
/// ## Example
/// ```rust
/// use slice_core::cart::{Cart, CartKey, VariantKind};
/// use slice_core::pricing::{compute, PricingPolicy};
/// use slice_core::{Fulfillment, Money, OrderOptions, PaymentMethod};
///
/// let mut cart = Cart::new();
/// cart.add(CartKey::new(VariantKind::Whole, "Napolitana"), Money::from_units(5000), None, None);
/// cart.add(CartKey::new(VariantKind::Half, "Napolitana"), Money::from_units(3000), None, None);
///
/// let mut options = OrderOptions::default();
/// options.set_payment_method(PaymentMethod::Credit);
/// options.set_fulfillment(Fulfillment::Delivery, Money::from_units(1000));
///
/// let totals = compute(&cart, &options, &PricingPolicy::default());
/// assert_eq!(totals.surcharge_amount, Money::from_units(900));
/// assert_eq!(totals.grand_total, Money::from_units(9900));
/// ```
pub fn compute(cart: &Cart, options: &OrderOptions, policy: &PricingPolicy) -> OrderTotals {
    let subtotal = cart.subtotal();
    let delivery_fee = match options.fulfillment() {
        Fulfillment::Delivery => options.delivery_fee(),
        Fulfillment::Pickup => Money::zero(),
    };

    let surcharge_rate = policy.rate_for(options.payment_method());
    let base = match policy.surcharge_base {
        SurchargeBase::SubtotalAndDelivery => subtotal + delivery_fee,
        SurchargeBase::SubtotalOnly => subtotal,
    };
    let surcharge_amount = base.apply_rate(surcharge_rate);
    let grand_total = subtotal + delivery_fee + surcharge_amount;

    debug!(
        %subtotal,
        %delivery_fee,
        surcharge_bps = surcharge_rate.bps(),
        %grand_total,
        "Totals computed"
    );

    OrderTotals {
        subtotal,
        surcharge_rate,
        surcharge_amount,
        delivery_fee,
        grand_total,
        item_count: cart.item_count(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartKey, VariantKind};

    fn napolitana_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(CartKey::new(VariantKind::Whole, "Napolitana"), Money::from_units(5000), None, None);
        cart.add(CartKey::new(VariantKind::Half, "Napolitana"), Money::from_units(3000), None, None);
        cart
    }

    fn options(method: PaymentMethod, fee: Option<i64>) -> OrderOptions {
        let mut options = OrderOptions::default();
        options.set_payment_method(method);
        if let Some(fee) = fee {
            options.set_fulfillment(Fulfillment::Delivery, Money::from_units(fee));
        }
        options
    }

    #[test]
    fn test_cash_pickup() {
        let totals = compute(&napolitana_cart(), &options(PaymentMethod::Cash, None), &PricingPolicy::default());

        assert_eq!(totals.subtotal, Money::from_units(8000));
        assert_eq!(totals.surcharge_amount, Money::zero());
        assert!(totals.surcharge_rate.is_zero());
        assert_eq!(totals.delivery_fee, Money::zero());
        assert_eq!(totals.grand_total, Money::from_units(8000));
        assert_eq!(totals.item_count, 2);
    }

    #[test]
    fn test_credit_delivery() {
        let totals = compute(
            &napolitana_cart(),
            &options(PaymentMethod::Credit, Some(1000)),
            &PricingPolicy::default(),
        );

        assert_eq!(totals.surcharge_rate.bps(), 1000);
        assert_eq!(totals.delivery_fee, Money::from_units(1000));
        assert_eq!(totals.surcharge_amount, Money::from_units(900));
        assert_eq!(totals.grand_total, Money::from_units(9900));
    }

    #[test]
    fn test_subtotal_only_base() {
        let policy = PricingPolicy {
            surcharge_base: SurchargeBase::SubtotalOnly,
            ..PricingPolicy::default()
        };
        let totals = compute(&napolitana_cart(), &options(PaymentMethod::Credit, Some(1000)), &policy);

        assert_eq!(totals.surcharge_amount, Money::from_units(800));
        assert_eq!(totals.grand_total, Money::from_units(9800));
    }

    #[test]
    fn test_grand_total_is_exact_sum() {
        let mut cart = Cart::new();
        cart.add(CartKey::new(VariantKind::Whole, "Odd"), Money::from_units(8333), None, None);
        let totals = compute(&cart, &options(PaymentMethod::Debit, None), &PricingPolicy::default());

        assert_eq!(totals.surcharge_amount, Money::parse("416.65").unwrap());
        assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.delivery_fee + totals.surcharge_amount
        );
    }

    #[test]
    fn test_surcharge_increases_with_subtotal_and_fee() {
        let policy = PricingPolicy::default();
        for method in [PaymentMethod::Debit, PaymentMethod::Credit] {
            let mut previous = Money::zero();
            for (price, fee) in [(1000, 0), (2000, 0), (2000, 500), (3000, 500), (3000, 1500)] {
                let mut cart = Cart::new();
                cart.add(CartKey::new(VariantKind::Whole, "A"), Money::from_units(price), None, None);
                let opts = options(method, if fee > 0 { Some(fee) } else { None });
                let surcharge = compute(&cart, &opts, &policy).surcharge_amount;
                assert!(surcharge > previous, "{:?} {} {}", method, price, fee);
                previous = surcharge;
            }
        }
    }

    #[test]
    fn test_cash_never_surcharged() {
        let totals = compute(&napolitana_cart(), &options(PaymentMethod::Cash, Some(2500)), &PricingPolicy::default());
        assert_eq!(totals.surcharge_amount, Money::zero());
        assert_eq!(totals.grand_total, Money::from_units(10500));
    }

    #[test]
    fn test_empty_cart() {
        let totals = compute(&Cart::new(), &OrderOptions::default(), &PricingPolicy::default());
        assert_eq!(totals.grand_total, Money::zero());
        assert_eq!(totals.item_count, 0);
    }
}
