//! # Session Module
//!
//! [`OrderSession`] is the one owner of an order in progress: the cart, the
//! order options, the pricing policy and any promotion being composed. The
//! front end holds exactly one and calls into it; nothing here is global.
//!
//! ## Session States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   EmptyCart ── add ──► Building ── finalize ──► Finalizing            │
//! │       ▲                  │  ▲                       │                   │
//! │       └─ last line gone ─┘  └── finish_finalizing ──┘                   │
//! │                                                                         │
//! │   finalize on EmptyCart → CoreError::EmptyCart, nothing happens        │
//! │   finalize never clears the cart; reset() does                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Each Button Adds
//! | Category | Portion       | Line                          |
//! |----------|---------------|-------------------------------|
//! | Standard | Whole / Half  | `(Whole, name)` `(Half, name)`|
//! | Calzone  | asked         | `(Whole, name)` `(Half, name)`|
//! | Promo    | -             | promotion flow, `(Unit, ..)`  |
//! | drink    | -             | `(Beverage, name)`            |

use chrono::NaiveDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cart::{Cart, CartKey, VariantKind};
use crate::catalog::{BeverageItem, Catalog, CatalogItem};
use crate::error::{CoreError, CoreResult, PromotionError};
use crate::format::FinalizedOrder;
use crate::money::Money;
use crate::pricing::{compute, OrderTotals, PricingPolicy};
use crate::promotion::{PromotionFlow, PromotionStep};
use crate::types::{Category, Fulfillment, OrderOptions, PaymentMethod};
use crate::validation::parse_delivery_fee_input;
use crate::PROMO_PICK_COUNT;

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    EmptyCart,
    Building,
    /// An order was handed to the exporter/printer and not yet acknowledged.
    Finalizing,
}

/// Whole or half portion of a standard item or calzone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portion {
    Whole,
    Half,
}

/// An order being built at the counter.
#[derive(Debug, Clone)]
pub struct OrderSession {
    cart: Cart,
    options: OrderOptions,
    policy: PricingPolicy,
    default_delivery_fee: Money,
    pick_count: usize,
    promotion: Option<PromotionFlow>,
    customer_name: Option<String>,
    comment: Option<String>,
    finalizing: bool,
}

impl OrderSession {
    pub fn new(policy: PricingPolicy, default_delivery_fee: Money) -> Self {
        OrderSession {
            cart: Cart::new(),
            options: OrderOptions::default(),
            policy,
            default_delivery_fee,
            pick_count: PROMO_PICK_COUNT,
            promotion: None,
            customer_name: None,
            comment: None,
            finalizing: false,
        }
    }

    /// Overrides how many items a promotion includes.
    pub fn with_pick_count(mut self, pick_count: usize) -> Self {
        self.pick_count = pick_count.max(1);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn options(&self) -> &OrderOptions {
        &self.options
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn state(&self) -> SessionState {
        if self.finalizing {
            SessionState::Finalizing
        } else if self.cart.is_empty() {
            SessionState::EmptyCart
        } else {
            SessionState::Building
        }
    }

    /// Totals for the current cart and options, computed fresh.
    pub fn totals(&self) -> OrderTotals {
        compute(&self.cart, &self.options, &self.policy)
    }

    // =========================================================================
    // Adding
    // =========================================================================

    /// Adds one portion of a standard item or calzone.
    ///
    /// Promotions are refused here; they go through [`Self::begin_promotion`].
    pub fn add_catalog_item(&mut self, item: &CatalogItem, portion: Portion) -> CoreResult<()> {
        if item.category == Category::Promo {
            return Err(CoreError::PromotionRequiresSelection(item.name.clone()));
        }

        let (variant, price) = match portion {
            Portion::Whole => (VariantKind::Whole, item.whole_price),
            Portion::Half => (VariantKind::Half, item.half_price),
        };
        self.cart.add(
            CartKey::new(variant, item.name.clone()),
            price,
            None,
            Some(item.category),
        );
        self.finalizing = false;
        Ok(())
    }

    /// Adds one drink.
    pub fn add_beverage(&mut self, beverage: &BeverageItem) {
        self.cart.add(
            CartKey::new(VariantKind::Beverage, beverage.name.clone()),
            beverage.price,
            None,
            None,
        );
        self.finalizing = false;
    }

    // =========================================================================
    // Promotions
    // =========================================================================

    /// Starts composing `promo`, replacing any flow already in progress.
    pub fn begin_promotion(&mut self, catalog: &Catalog, promo: &CatalogItem) -> CoreResult<PromotionStep> {
        self.promotion = None;
        let flow = PromotionFlow::begin(catalog, promo, self.pick_count)?;
        let step = flow.step();
        self.promotion = Some(flow);
        Ok(step)
    }

    /// The promotion being composed, if any.
    pub fn promotion(&self) -> Option<&PromotionFlow> {
        self.promotion.as_ref()
    }

    /// Feeds the item selection to the current promotion.
    ///
    /// Any error aborts the promotion.
    pub fn submit_promotion_selection(&mut self, input: &str) -> CoreResult<PromotionStep> {
        self.advance_promotion(|flow| flow.submit_selection(input))
    }

    /// Answers the "add a drink?" question.
    pub fn answer_promotion_beverage(&mut self, wants_beverage: bool) -> CoreResult<PromotionStep> {
        self.advance_promotion(|flow| flow.answer_beverage(wants_beverage))
    }

    /// Picks the promotion drink by ordinal.
    pub fn choose_promotion_beverage(&mut self, input: &str) -> CoreResult<PromotionStep> {
        self.advance_promotion(|flow| flow.choose_beverage(input))
    }

    /// Adds the composed promotion to the cart.
    pub fn commit_promotion(&mut self) -> CoreResult<()> {
        let flow = self.promotion.take().ok_or(CoreError::NoPromotionInProgress)?;
        flow.commit(&mut self.cart)?;
        self.finalizing = false;
        Ok(())
    }

    /// Drops the promotion being composed. The cart is untouched.
    pub fn cancel_promotion(&mut self) {
        if let Some(flow) = self.promotion.take() {
            debug!(promo = %flow.promo_name(), "Promotion cancelled");
        }
    }

    fn advance_promotion<F>(&mut self, step: F) -> CoreResult<PromotionStep>
    where
        F: FnOnce(PromotionFlow) -> Result<PromotionFlow, PromotionError>,
    {
        let flow = self.promotion.take().ok_or(CoreError::NoPromotionInProgress)?;
        let flow = step(flow)?;
        let next = flow.step();
        self.promotion = Some(flow);
        Ok(next)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Sets a line's quantity; 0 or less removes it.
    ///
    /// Returns `false` when `key` is not in the cart.
    pub fn set_quantity(&mut self, key: &CartKey, quantity: i64) -> bool {
        self.cart.set_quantity(key, quantity)
    }

    /// Sets a line's quantity from typed text; unreadable text removes it.
    pub fn set_quantity_input(&mut self, key: &CartKey, input: &str) -> bool {
        self.cart.set_quantity_input(key, input)
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.options.set_payment_method(method);
    }

    /// Switches pickup/delivery; delivery pre-fills the default fee.
    pub fn set_fulfillment(&mut self, fulfillment: Fulfillment) {
        self.options.set_fulfillment(fulfillment, self.default_delivery_fee);
    }

    /// Sets the delivery fee (ignored for pickup).
    pub fn set_delivery_fee(&mut self, fee: Money) {
        self.options.set_delivery_fee(fee);
    }

    /// Sets the delivery fee from typed text; garbage reads as zero.
    pub fn set_delivery_fee_input(&mut self, input: &str) {
        self.options.set_delivery_fee(parse_delivery_fee_input(input));
    }

    /// Sets the customer name; blank clears it.
    pub fn set_customer_name(&mut self, name: &str) {
        self.customer_name = non_blank(name);
    }

    /// Sets the order note; blank clears it.
    pub fn set_comment(&mut self, comment: &str) {
        self.comment = non_blank(comment);
    }

    // =========================================================================
    // Finalizing
    // =========================================================================

    /// Refuses to go on with an empty cart.
    ///
    /// Callers check this before taking an order number, so an empty cart
    /// never burns one.
    pub fn check_orderable(&self) -> CoreResult<()> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        Ok(())
    }

    /// Snapshots the order for sending or printing.
    ///
    /// The cart is kept: the operator may print after sending, or fix a
    /// mistake and send again.
    pub fn finalize(&mut self, number: Option<u32>, placed_at: NaiveDateTime) -> CoreResult<FinalizedOrder> {
        self.check_orderable()?;

        let order = FinalizedOrder {
            id: Uuid::new_v4(),
            number,
            placed_at,
            lines: self.cart.lines().to_vec(),
            options: self.options,
            totals: self.totals(),
            customer_name: self.customer_name.clone(),
            comment: self.comment.clone(),
        };
        self.finalizing = true;

        info!(
            order_id = %order.id,
            number = ?order.number,
            items = order.totals.item_count,
            total = %order.totals.grand_total,
            "Order finalized"
        );
        Ok(order)
    }

    /// Back to building after the message was sent or the ticket printed.
    pub fn finish_finalizing(&mut self) {
        self.finalizing = false;
    }

    /// Starts a new order: empty cart, default options, no promotion.
    pub fn reset(&mut self) {
        self.cart.clear();
        self.options = OrderOptions::default();
        self.promotion = None;
        self.customer_name = None;
        self.comment = None;
        self.finalizing = false;
        debug!("Session reset");
    }
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemDraft;
    use chrono::NaiveDate;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::seed_defaults("5490000000000");
        catalog
            .add_item(
                &ItemDraft {
                    name: "Muzzarella".into(),
                    whole_price: "4800".into(),
                    half_price: "2800".into(),
                    category: "pizza".into(),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        catalog
            .add_item(
                &ItemDraft {
                    name: "Calzone Jamón".into(),
                    whole_price: "7000".into(),
                    half_price: "4000".into(),
                    category: "calzone".into(),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        catalog.add_beverage("Coca 1.5L", "2500").unwrap();
        catalog
    }

    fn session() -> OrderSession {
        OrderSession::new(PricingPolicy::default(), Money::from_units(1000))
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_whole_plus_half_cash_pickup() {
        let catalog = catalog();
        let mut session = session();
        session.add_catalog_item(&catalog.items[0], Portion::Whole).unwrap();
        session.add_catalog_item(&catalog.items[0], Portion::Half).unwrap();

        let totals = session.totals();
        assert_eq!(totals.subtotal, Money::from_units(8000));
        assert_eq!(totals.surcharge_amount, Money::zero());
        assert_eq!(totals.delivery_fee, Money::zero());
        assert_eq!(totals.grand_total, Money::from_units(8000));
    }

    #[test]
    fn test_whole_plus_half_credit_delivery() {
        let catalog = catalog();
        let mut session = session();
        session.add_catalog_item(&catalog.items[0], Portion::Whole).unwrap();
        session.add_catalog_item(&catalog.items[0], Portion::Half).unwrap();
        session.set_payment_method(PaymentMethod::Credit);
        session.set_fulfillment(Fulfillment::Delivery);

        let totals = session.totals();
        assert_eq!(totals.delivery_fee, Money::from_units(1000));
        assert_eq!(totals.surcharge_amount, Money::from_units(900));
        assert_eq!(totals.grand_total, Money::from_units(9900));
    }

    #[test]
    fn test_calzone_half_uses_half_price() {
        let catalog = catalog();
        let mut session = session();
        session.add_catalog_item(&catalog.items[3], Portion::Half).unwrap();

        let line = &session.cart().lines()[0];
        assert_eq!(line.display_name(), "Calzone Jamón (1/2)");
        assert_eq!(line.unit_price, Money::from_units(4000));
        assert_eq!(line.category, Some(Category::Calzone));
    }

    #[test]
    fn test_promo_cannot_be_added_directly() {
        let catalog = catalog();
        let mut session = session();
        let err = session.add_catalog_item(&catalog.items[1], Portion::Whole).unwrap_err();
        assert!(matches!(err, CoreError::PromotionRequiresSelection(_)));
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_promotion_through_session() {
        let catalog = catalog();
        let mut session = session();

        assert_eq!(
            session.begin_promotion(&catalog, &catalog.items[1]).unwrap(),
            PromotionStep::AwaitingSelection
        );
        assert_eq!(
            session.submit_promotion_selection("1, 2, 3").unwrap(),
            PromotionStep::AwaitingBeverageChoice
        );
        assert_eq!(
            session.answer_promotion_beverage(true).unwrap(),
            PromotionStep::AwaitingBeverage
        );
        assert_eq!(
            session.choose_promotion_beverage("1").unwrap(),
            PromotionStep::Ready
        );
        session.commit_promotion().unwrap();

        assert!(session.promotion().is_none());
        assert_eq!(session.cart().line_count(), 2);
        assert_eq!(session.totals().subtotal, Money::from_units(14500));
    }

    #[test]
    fn test_failed_selection_aborts_without_residue() {
        let catalog = catalog();
        let mut session = session();
        session.add_beverage(&catalog.beverages[0]);
        let before = session.cart().clone();

        session.begin_promotion(&catalog, &catalog.items[1]).unwrap();
        let err = session.submit_promotion_selection("2").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Promotion(PromotionError::IncompleteSelection { required: 2, valid: 1 })
        ));

        assert!(session.promotion().is_none());
        assert_eq!(session.cart(), &before);
        assert!(matches!(
            session.commit_promotion(),
            Err(CoreError::NoPromotionInProgress)
        ));
    }

    #[test]
    fn test_cancel_promotion() {
        let catalog = catalog();
        let mut session = session();
        session.begin_promotion(&catalog, &catalog.items[1]).unwrap();
        session.submit_promotion_selection("1 2").unwrap();
        session.cancel_promotion();

        assert!(session.promotion().is_none());
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_quantity_to_zero_by_input() {
        let catalog = catalog();
        let mut session = session();
        for _ in 0..3 {
            session.add_catalog_item(&catalog.items[0], Portion::Whole).unwrap();
        }
        session.add_beverage(&catalog.beverages[0]);
        assert_eq!(session.totals().item_count, 4);

        let key = CartKey::new(VariantKind::Whole, "Napolitana");
        assert!(session.set_quantity_input(&key, "0"));
        assert!(session.cart().get(&key).is_none());
        assert_eq!(session.totals().item_count, 1);
    }

    #[test]
    fn test_delivery_fee_input() {
        let mut session = session();
        session.set_delivery_fee_input("1500");
        assert_eq!(session.options().delivery_fee(), Money::zero());

        session.set_fulfillment(Fulfillment::Delivery);
        assert_eq!(session.options().delivery_fee(), Money::from_units(1000));
        session.set_delivery_fee_input("1500");
        assert_eq!(session.options().delivery_fee(), Money::from_units(1500));
        session.set_delivery_fee_input("n/a");
        assert_eq!(session.options().delivery_fee(), Money::zero());
    }

    #[test]
    fn test_oversized_inputs_keep_totals_computable() {
        let catalog = catalog();
        let mut session = session();
        session.add_catalog_item(&catalog.items[0], Portion::Whole).unwrap();
        session.set_fulfillment(Fulfillment::Delivery);
        session.set_payment_method(PaymentMethod::Credit);

        session.set_delivery_fee_input("79228162514264337593543950335");
        assert_eq!(session.options().delivery_fee(), Money::zero());

        let key = CartKey::new(VariantKind::Whole, "Napolitana");
        session.set_quantity_input(&key, "99999999999");
        let totals = session.totals();
        assert_eq!(totals.item_count, u64::from(crate::MAX_QUANTITY));
        assert_eq!(totals.subtotal, Money::from_units(5000 * 9_999));
        assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.delivery_fee + totals.surcharge_amount
        );
    }

    #[test]
    fn test_state_machine() {
        let catalog = catalog();
        let mut session = session();
        assert_eq!(session.state(), SessionState::EmptyCart);

        assert!(matches!(session.finalize(Some(1), now()), Err(CoreError::EmptyCart)));
        assert_eq!(session.state(), SessionState::EmptyCart);

        session.add_catalog_item(&catalog.items[0], Portion::Whole).unwrap();
        assert_eq!(session.state(), SessionState::Building);

        let order = session.finalize(Some(1), now()).unwrap();
        assert_eq!(session.state(), SessionState::Finalizing);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.totals, session.totals());

        session.finish_finalizing();
        assert_eq!(session.state(), SessionState::Building);
        assert_eq!(session.cart().line_count(), 1);
    }

    #[test]
    fn test_names_and_reset() {
        let catalog = catalog();
        let mut session = session();
        session.set_customer_name("  Ana ");
        session.set_comment("   ");
        assert_eq!(session.customer_name(), Some("Ana"));
        assert_eq!(session.comment(), None);

        session.add_catalog_item(&catalog.items[0], Portion::Whole).unwrap();
        session.set_fulfillment(Fulfillment::Delivery);
        session.reset();

        assert_eq!(session.state(), SessionState::EmptyCart);
        assert_eq!(session.customer_name(), None);
        assert_eq!(session.options(), &OrderOptions::default());
    }
}
