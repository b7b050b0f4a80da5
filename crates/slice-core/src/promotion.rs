//! # Promotion Module
//!
//! Composing a promotion: pick the items it includes, optionally a drink,
//! then commit it to the cart as one line.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  begin(catalog, promo)                                                 │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  AwaitingSelection ── submit_selection("1, 3") ──┐                      │
//! │      │ fewer than pick_count valid refs          │                      │
//! │      ▼                                            ▼                      │
//! │    ABORT                              AwaitingBeverageChoice            │
//! │                                        │ yes            │ no            │
//! │                                        ▼                │               │
//! │                               AwaitingBeverage          │               │
//! │                                │ choose_beverage("2")   │               │
//! │                                │ not exactly one → ABORT│               │
//! │                                ▼                        ▼               │
//! │                                         Ready                           │
//! │                                           │ commit(cart)                │
//! │                                           ▼                             │
//! │                  bundle line (+ drink line) added in one call          │
//! │                                                                         │
//! │  ABORT = the flow value is dropped. The cart is only ever touched by   │
//! │  `commit`, so an aborted or cancelled flow leaves no trace.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition consumes the flow and either returns the next state or
//! an error. There is no way to keep using a flow after it failed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::{BundleDetail, Cart, CartKey, VariantKind};
use crate::catalog::{BeverageItem, Catalog, CatalogItem};
use crate::error::{CoreError, CoreResult, PromotionError};
use crate::money::Money;
use crate::types::Category;
use crate::validation::parse_ordinals;

/// Where a promotion flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStep {
    AwaitingSelection,
    AwaitingBeverageChoice,
    AwaitingBeverage,
    Ready,
}

/// An in-flight promotion.
///
/// Holds its own copy of the candidate items and drinks, taken at `begin`,
/// so the ordinals the operator sees stay valid for the whole flow.
#[derive(Debug, Clone)]
pub struct PromotionFlow {
    promo_name: String,
    promo_price: Money,
    pick_count: usize,
    candidates: Vec<CatalogItem>,
    beverages: Vec<BeverageItem>,
    step: PromotionStep,
    chosen_items: Vec<String>,
    chosen_beverage: Option<BeverageItem>,
}

impl PromotionFlow {
    /// Starts composing `promo`.
    ///
    /// ## Errors
    /// - [`CoreError::NotAPromotion`] when `promo` is not in the promo category
    /// - [`PromotionError::NoEligibleItems`] when nothing can go inside it
    pub fn begin(catalog: &Catalog, promo: &CatalogItem, pick_count: usize) -> CoreResult<Self> {
        if promo.category != Category::Promo {
            return Err(CoreError::NotAPromotion(promo.name.clone()));
        }

        let candidates: Vec<CatalogItem> = catalog
            .eligible_promo_items()
            .into_iter()
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Err(PromotionError::NoEligibleItems.into());
        }

        debug!(promo = %promo.name, candidates = candidates.len(), "Promotion started");
        Ok(PromotionFlow {
            promo_name: promo.name.clone(),
            promo_price: promo.whole_price,
            pick_count: pick_count.max(1),
            candidates,
            beverages: catalog.beverages.clone(),
            step: PromotionStep::AwaitingSelection,
            chosen_items: Vec::new(),
            chosen_beverage: None,
        })
    }

    pub fn step(&self) -> PromotionStep {
        self.step
    }

    pub fn promo_name(&self) -> &str {
        &self.promo_name
    }

    pub fn pick_count(&self) -> usize {
        self.pick_count
    }

    /// Items offered for selection, in ordinal order (ordinal = index + 1).
    pub fn candidates(&self) -> &[CatalogItem] {
        &self.candidates
    }

    /// Drinks offered, in ordinal order.
    pub fn beverages(&self) -> &[BeverageItem] {
        &self.beverages
    }

    /// Items chosen so far, in the order they were typed.
    pub fn chosen_items(&self) -> &[String] {
        &self.chosen_items
    }

    pub fn chosen_beverage(&self) -> Option<&BeverageItem> {
        self.chosen_beverage.as_ref()
    }

    /// Reads the selection, e.g. `"1, 3"` or `"2 2"`.
    ///
    /// Invalid and out-of-range tokens are skipped; references beyond the
    /// first `pick_count` valid ones are ignored.
    pub fn submit_selection(mut self, input: &str) -> Result<Self, PromotionError> {
        self.expect(PromotionStep::AwaitingSelection)?;

        let mut picks = parse_ordinals(input, self.candidates.len());
        if picks.len() < self.pick_count {
            debug!(promo = %self.promo_name, valid = picks.len(), "Promotion selection rejected");
            return Err(PromotionError::IncompleteSelection {
                required: self.pick_count,
                valid: picks.len(),
            });
        }
        picks.truncate(self.pick_count);

        self.chosen_items = picks
            .into_iter()
            .map(|index| self.candidates[index].name.clone())
            .collect();
        self.step = PromotionStep::AwaitingBeverageChoice;
        Ok(self)
    }

    /// Answers "add a drink?".
    pub fn answer_beverage(mut self, wants_beverage: bool) -> Result<Self, PromotionError> {
        self.expect(PromotionStep::AwaitingBeverageChoice)?;

        if !wants_beverage {
            self.step = PromotionStep::Ready;
            return Ok(self);
        }
        if self.beverages.is_empty() {
            return Err(PromotionError::NoBeverages);
        }
        self.step = PromotionStep::AwaitingBeverage;
        Ok(self)
    }

    /// Reads the drink choice. Exactly one valid ordinal is accepted.
    pub fn choose_beverage(mut self, input: &str) -> Result<Self, PromotionError> {
        self.expect(PromotionStep::AwaitingBeverage)?;

        let picks = parse_ordinals(input, self.beverages.len());
        let [index] = picks.as_slice() else {
            return Err(PromotionError::InvalidBeverageChoice);
        };

        self.chosen_beverage = Some(self.beverages[*index].clone());
        self.step = PromotionStep::Ready;
        Ok(self)
    }

    /// Adds the promotion (and its drink, if any) to `cart`.
    ///
    /// Identical compositions land on the same line; the stored detail is
    /// replaced by this one, so it shows the latest selection order.
    pub fn commit(self, cart: &mut Cart) -> Result<(), PromotionError> {
        self.expect(PromotionStep::Ready)?;

        let beverage_name = self.chosen_beverage.as_ref().map(|b| b.name.clone());
        let key = CartKey::bundle(
            self.promo_name.clone(),
            self.chosen_items.clone(),
            beverage_name.clone(),
        );
        let detail = BundleDetail {
            promo_label: self.promo_name.clone(),
            included_item_names: self.chosen_items,
            beverage_name,
        };
        cart.add(key, self.promo_price, Some(detail), Some(Category::Promo));

        if let Some(beverage) = self.chosen_beverage {
            cart.add(
                CartKey::new(VariantKind::Beverage, beverage.name),
                beverage.price,
                None,
                None,
            );
        }

        debug!(promo = %self.promo_name, "Promotion committed");
        Ok(())
    }

    fn expect(&self, attempted: PromotionStep) -> Result<(), PromotionError> {
        if self.step == attempted {
            Ok(())
        } else {
            Err(PromotionError::OutOfOrder {
                expected: self.step,
                attempted,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemDraft;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        for (name, whole, category) in [
            ("Muzzarella", "5000", "pizza"),
            ("Fugazzeta", "6000", "pizza"),
            ("Promo 1", "12000", "promo"),
            ("Calzone", "7000", "calzone"),
        ] {
            catalog
                .add_item(
                    &ItemDraft {
                        name: name.into(),
                        whole_price: whole.into(),
                        category: category.into(),
                        ..Default::default()
                    },
                    None,
                )
                .unwrap();
        }
        catalog.add_beverage("Coca 1.5L", "2500").unwrap();
        catalog.add_beverage("Agua", "1200").unwrap();
        catalog
    }

    fn promo(catalog: &Catalog) -> &CatalogItem {
        &catalog.items[2]
    }

    #[test]
    fn test_candidates_exclude_promos() {
        let catalog = catalog();
        let flow = PromotionFlow::begin(&catalog, promo(&catalog), 2).unwrap();

        let names: Vec<&str> = flow.candidates().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Muzzarella", "Fugazzeta", "Calzone"]);
        assert_eq!(flow.step(), PromotionStep::AwaitingSelection);
    }

    #[test]
    fn test_begin_rejects_non_promo() {
        let catalog = catalog();
        let err = PromotionFlow::begin(&catalog, &catalog.items[0], 2).unwrap_err();
        assert!(matches!(err, CoreError::NotAPromotion(_)));
    }

    #[test]
    fn test_begin_without_eligible_items() {
        let mut catalog = catalog();
        catalog.items.retain(|i| i.category == Category::Promo);
        let err = PromotionFlow::begin(&catalog, &catalog.items[0], 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Promotion(PromotionError::NoEligibleItems)
        ));
    }

    #[test]
    fn test_three_valid_refs_uses_first_two() {
        let catalog = catalog();
        let mut cart = Cart::new();

        let flow = PromotionFlow::begin(&catalog, promo(&catalog), 2)
            .unwrap()
            .submit_selection("3, 1, 2")
            .unwrap();
        assert_eq!(flow.chosen_items(), &["Calzone".to_string(), "Muzzarella".to_string()]);

        flow.answer_beverage(false).unwrap().commit(&mut cart).unwrap();

        assert_eq!(cart.line_count(), 1);
        let line = &cart.lines()[0];
        assert_eq!(line.key.variant, VariantKind::Unit);
        assert_eq!(line.unit_price, Money::from_units(12000));
        let detail = line.bundle_detail.as_ref().unwrap();
        assert_eq!(detail.included_item_names, vec!["Calzone", "Muzzarella"]);
        assert_eq!(detail.beverage_name, None);
    }

    #[test]
    fn test_one_valid_ref_aborts() {
        let catalog = catalog();
        let err = PromotionFlow::begin(&catalog, promo(&catalog), 2)
            .unwrap()
            .submit_selection("1, 9, x")
            .unwrap_err();

        assert_eq!(
            err,
            PromotionError::IncompleteSelection {
                required: 2,
                valid: 1
            }
        );
    }

    #[test]
    fn test_same_item_twice_is_allowed() {
        let catalog = catalog();
        let flow = PromotionFlow::begin(&catalog, promo(&catalog), 2)
            .unwrap()
            .submit_selection("1 1")
            .unwrap();
        assert_eq!(flow.chosen_items(), &["Muzzarella".to_string(), "Muzzarella".to_string()]);
    }

    #[test]
    fn test_with_beverage_adds_two_lines() {
        let catalog = catalog();
        let mut cart = Cart::new();

        PromotionFlow::begin(&catalog, promo(&catalog), 2)
            .unwrap()
            .submit_selection("1,2")
            .unwrap()
            .answer_beverage(true)
            .unwrap()
            .choose_beverage("1")
            .unwrap()
            .commit(&mut cart)
            .unwrap();

        assert_eq!(cart.line_count(), 2);
        let drink = &cart.lines()[1];
        assert_eq!(drink.key, CartKey::new(VariantKind::Beverage, "Coca 1.5L"));
        assert_eq!(drink.unit_price, Money::from_units(2500));
        assert_eq!(cart.subtotal(), Money::from_units(14500));
    }

    #[test]
    fn test_invalid_beverage_choice_aborts() {
        let catalog = catalog();
        let flow = PromotionFlow::begin(&catalog, promo(&catalog), 2)
            .unwrap()
            .submit_selection("1,2")
            .unwrap()
            .answer_beverage(true)
            .unwrap();

        let err = flow.clone().choose_beverage("1 2").unwrap_err();
        assert_eq!(err, PromotionError::InvalidBeverageChoice);

        let err = flow.choose_beverage("7").unwrap_err();
        assert_eq!(err, PromotionError::InvalidBeverageChoice);
    }

    #[test]
    fn test_no_beverages_in_catalog() {
        let mut catalog = catalog();
        catalog.beverages.clear();
        let err = PromotionFlow::begin(&catalog, promo(&catalog), 2)
            .unwrap()
            .submit_selection("1,2")
            .unwrap()
            .answer_beverage(true)
            .unwrap_err();
        assert_eq!(err, PromotionError::NoBeverages);
    }

    #[test]
    fn test_out_of_order_commit() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let err = PromotionFlow::begin(&catalog, promo(&catalog), 2)
            .unwrap()
            .commit(&mut cart)
            .unwrap_err();

        assert_eq!(
            err,
            PromotionError::OutOfOrder {
                expected: PromotionStep::AwaitingSelection,
                attempted: PromotionStep::Ready
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_identical_compositions_accumulate() {
        let catalog = catalog();
        let mut cart = Cart::new();

        for selection in ["1,2", "2,1"] {
            PromotionFlow::begin(&catalog, promo(&catalog), 2)
                .unwrap()
                .submit_selection(selection)
                .unwrap()
                .answer_beverage(false)
                .unwrap()
                .commit(&mut cart)
                .unwrap();
        }

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        let detail = cart.lines()[0].bundle_detail.as_ref().unwrap();
        assert_eq!(detail.included_item_names, vec!["Fugazzeta", "Muzzarella"]);
    }

    #[test]
    fn test_different_beverage_is_a_different_line() {
        let catalog = catalog();
        let mut cart = Cart::new();

        for drink in ["1", "2"] {
            PromotionFlow::begin(&catalog, promo(&catalog), 2)
                .unwrap()
                .submit_selection("1,2")
                .unwrap()
                .answer_beverage(true)
                .unwrap()
                .choose_beverage(drink)
                .unwrap()
                .commit(&mut cart)
                .unwrap();
        }

        // two bundle lines, two drink lines
        assert_eq!(cart.line_count(), 4);
        assert_eq!(cart.item_count(), 4);
    }
}
