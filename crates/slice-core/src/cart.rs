//! # Cart Module
//!
//! The in-memory order being built at the counter.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartKey = (variant, item name, disambiguator)                         │
//! │                                                                         │
//! │  (Whole,    "Napolitana", None)              ─┐                         │
//! │  (Half,     "Napolitana", None)               │ different lines         │
//! │  (Beverage, "Coca 1.5L",  None)              ─┘                         │
//! │                                                                         │
//! │  (Unit, "Promo 1", Bundle{[Fuga, Muzza], Some(Coca)})  ─┐ same line,    │
//! │  (Unit, "Promo 1", Bundle{[Muzza, Fuga], Some(Coca)})  ─┘ quantity 2    │
//! │  (Unit, "Promo 1", Bundle{[Muzza, Fuga], None})        ── another line  │
//! │                                                                         │
//! │  Adding an existing key increments its quantity; the unit price       │
//! │  recorded on the first add is kept.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Keys are unique; lines keep the order in which they were first added
//! - Every stored line has quantity ≥ 1 (setting 0 or less removes it)
//! - `unit_price` is a snapshot and never re-derived from the catalog

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::money::Money;
use crate::types::Category;
use crate::validation::parse_quantity_input;
use crate::MAX_QUANTITY;

// =============================================================================
// Cart Key
// =============================================================================

/// Which button produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Whole,
    Half,
    /// A promotion, sold as one unit.
    Unit,
    Beverage,
}

/// Separates lines that share a variant and name but are different things.
///
/// Structured, so two promotions differ exactly when their chosen items or
/// drink differ. Item names are kept sorted: the same two pizzas chosen in
/// either order are the same composition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Disambiguator {
    #[default]
    None,
    Bundle {
        items: Vec<String>,
        /// `None` is the "no drink" choice.
        beverage: Option<String>,
    },
}

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey {
    pub variant: VariantKind,
    pub item_name: String,
    pub disambiguator: Disambiguator,
}

impl CartKey {
    /// Key for an ordinary line (whole, half or drink).
    pub fn new(variant: VariantKind, item_name: impl Into<String>) -> Self {
        CartKey {
            variant,
            item_name: item_name.into(),
            disambiguator: Disambiguator::None,
        }
    }

    /// Key for a promotion line.
    pub fn bundle(promo_name: impl Into<String>, mut items: Vec<String>, beverage: Option<String>) -> Self {
        items.sort();
        CartKey {
            variant: VariantKind::Unit,
            item_name: promo_name.into(),
            disambiguator: Disambiguator::Bundle { items, beverage },
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// What went into a promotion line, shown under it on messages and tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDetail {
    pub promo_label: String,
    pub included_item_names: Vec<String>,
    pub beverage_name: Option<String>,
}

/// One line of the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub key: CartKey,

    /// Price per unit, frozen when the line was first added.
    pub unit_price: Money,

    pub quantity: u32,

    pub bundle_detail: Option<BundleDetail>,

    /// Catalog category the line came from; `None` for drinks.
    pub category: Option<Category>,
}

impl CartLine {
    /// Name as printed: half portions carry a `" (1/2)"` suffix.
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::cart::{Cart, CartKey, VariantKind};
    /// use slice_core::money::Money;
    ///
    /// let mut cart = Cart::new();
    /// let line = cart.add(CartKey::new(VariantKind::Half, "Napolitana"), Money::from_units(3000), None, None);
    /// assert_eq!(line.display_name(), "Napolitana (1/2)");
    /// ```
    pub fn display_name(&self) -> String {
        match self.key.variant {
            VariantKind::Half => format!("{} (1/2)", self.key.item_name),
            _ => self.key.item_name.clone(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered collection of lines keyed by [`CartKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit under `key`.
    ///
    /// ## Behavior
    /// - Key absent: a new line is appended with `unit_price` and quantity 1
    /// - Key present: quantity + 1, the original unit price is kept
    /// - A supplied `bundle_detail` replaces the stored one
    /// - Quantity stops at [`MAX_QUANTITY`]
    pub fn add(
        &mut self,
        key: CartKey,
        unit_price: Money,
        bundle_detail: Option<BundleDetail>,
        category: Option<Category>,
    ) -> &CartLine {
        let index = match self.position(&key) {
            Some(index) => index,
            None => {
                self.lines.push(CartLine {
                    key,
                    unit_price,
                    quantity: 0,
                    bundle_detail: None,
                    category,
                });
                self.lines.len() - 1
            }
        };

        let line = &mut self.lines[index];
        line.quantity = line.quantity.saturating_add(1).min(MAX_QUANTITY);
        if bundle_detail.is_some() {
            line.bundle_detail = bundle_detail;
        }

        debug!(item = %line.key.item_name, variant = ?line.key.variant, quantity = line.quantity, "Cart add");
        &self.lines[index]
    }

    /// Sets a line's quantity directly.
    ///
    /// Zero or negative removes the line; anything above [`MAX_QUANTITY`]
    /// is capped. Returns `false` when no line has `key` (nothing changes).
    pub fn set_quantity(&mut self, key: &CartKey, quantity: i64) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };

        if quantity <= 0 {
            let removed = self.lines.remove(index);
            debug!(item = %removed.key.item_name, "Cart line removed");
        } else {
            let quantity = u32::try_from(quantity).map_or(MAX_QUANTITY, |q| q.min(MAX_QUANTITY));
            self.lines[index].quantity = quantity;
            debug!(item = %key.item_name, quantity, "Cart quantity set");
        }
        true
    }

    /// Sets a quantity from typed text; unreadable text removes the line.
    pub fn set_quantity_input(&mut self, key: &CartKey, input: &str) -> bool {
        self.set_quantity(key, parse_quantity_input(input))
    }

    /// Removes a line outright.
    pub fn remove(&mut self, key: &CartKey) -> Option<CartLine> {
        self.position(key).map(|index| self.lines.remove(index))
    }

    pub fn get(&self, key: &CartKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key == key)
    }

    /// Lines in first-added order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Σ unit price × quantity.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, key: &CartKey) -> Option<usize> {
        self.lines.iter().position(|line| &line.key == key)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(name: &str) -> CartKey {
        CartKey::new(VariantKind::Whole, name)
    }

    fn half(name: &str) -> CartKey {
        CartKey::new(VariantKind::Half, name)
    }

    #[test]
    fn test_repeated_add_accumulates() {
        let mut cart = Cart::new();
        for _ in 0..4 {
            cart.add(whole("Napolitana"), Money::from_units(5000), None, Some(Category::Standard));
        }

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get(&whole("Napolitana")).unwrap().quantity, 4);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_whole_and_half_are_distinct_lines() {
        let mut cart = Cart::new();
        cart.add(whole("Napolitana"), Money::from_units(5000), None, None);
        cart.add(half("Napolitana"), Money::from_units(3000), None, None);

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.lines()[1].display_name(), "Napolitana (1/2)");
        assert_eq!(cart.subtotal(), Money::from_units(8000));
    }

    #[test]
    fn test_unit_price_is_snapshot() {
        let mut cart = Cart::new();
        cart.add(whole("Muzza"), Money::from_units(5000), None, None);
        cart.add(whole("Muzza"), Money::from_units(9999), None, None);

        let line = cart.get(&whole("Muzza")).unwrap();
        assert_eq!(line.unit_price, Money::from_units(5000));
        assert_eq!(line.line_total(), Money::from_units(10000));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(whole("Muzza"), Money::from_units(5000), None, None);
        }
        cart.add(half("Fuga"), Money::from_units(3000), None, None);
        assert_eq!(cart.item_count(), 4);

        assert!(cart.set_quantity(&whole("Muzza"), 0));
        assert!(cart.get(&whole("Muzza")).is_none());
        assert_eq!(cart.item_count(), 1);

        assert!(cart.set_quantity(&half("Fuga"), -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_input_is_forgiving() {
        let mut cart = Cart::new();
        cart.add(whole("Muzza"), Money::from_units(5000), None, None);

        assert!(cart.set_quantity_input(&whole("Muzza"), "3"));
        assert_eq!(cart.get(&whole("Muzza")).unwrap().quantity, 3);

        assert!(cart.set_quantity_input(&whole("Muzza"), "lots"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_huge_quantity_is_capped() {
        let mut cart = Cart::new();
        let price = Money::parse("1000000000000").unwrap();
        cart.add(whole("Muzza"), price, None, None);

        assert!(cart.set_quantity_input(&whole("Muzza"), "99999999999"));
        let line = cart.get(&whole("Muzza")).unwrap();
        assert_eq!(line.quantity, MAX_QUANTITY);
        assert_eq!(cart.subtotal(), price.multiply_quantity(MAX_QUANTITY));

        cart.add(whole("Muzza"), price, None, None);
        assert_eq!(cart.get(&whole("Muzza")).unwrap().quantity, MAX_QUANTITY);
    }

    #[test]
    fn test_set_quantity_unknown_key_is_noop() {
        let mut cart = Cart::new();
        cart.add(whole("Muzza"), Money::from_units(5000), None, None);

        assert!(!cart.set_quantity(&whole("Fuga"), 5));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_subtotal_independent_of_add_order() {
        let adds = [
            (whole("A"), 5000),
            (half("A"), 3000),
            (whole("B"), 4200),
            (whole("A"), 5000),
        ];

        let mut forward = Cart::new();
        for (key, price) in adds.iter() {
            forward.add(key.clone(), Money::from_units(*price), None, None);
        }

        let mut backward = Cart::new();
        for (key, price) in adds.iter().rev() {
            backward.add(key.clone(), Money::from_units(*price), None, None);
        }

        assert_eq!(forward.subtotal(), backward.subtotal());
        assert_eq!(forward.subtotal(), Money::from_units(17200));
        let manual: Money = forward.lines().iter().map(|l| l.unit_price.multiply_quantity(l.quantity)).sum();
        assert_eq!(forward.subtotal(), manual);
    }

    #[test]
    fn test_bundle_keys_ignore_selection_order() {
        let a = CartKey::bundle("Promo 1", vec!["Muzza".into(), "Fuga".into()], Some("Coca".into()));
        let b = CartKey::bundle("Promo 1", vec!["Fuga".into(), "Muzza".into()], Some("Coca".into()));
        let c = CartKey::bundle("Promo 1", vec!["Fuga".into(), "Muzza".into()], None);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_bundle_detail_overwritten_on_add() {
        let key = CartKey::bundle("Promo 1", vec!["A".into(), "B".into()], None);
        let first = BundleDetail {
            promo_label: "Promo 1".into(),
            included_item_names: vec!["A".into(), "B".into()],
            beverage_name: None,
        };
        let second = BundleDetail {
            included_item_names: vec!["B".into(), "A".into()],
            ..first.clone()
        };

        let mut cart = Cart::new();
        cart.add(key.clone(), Money::from_units(12000), Some(first), Some(Category::Promo));
        cart.add(key.clone(), Money::from_units(12000), Some(second.clone()), Some(Category::Promo));

        let line = cart.get(&key).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.bundle_detail.as_ref(), Some(&second));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(whole("Muzza"), Money::from_units(5000), None, None);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }
}
