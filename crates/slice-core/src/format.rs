//! # Format Module
//!
//! Renders a finalized order as a chat message and as receipt lines.
//!
//! ## Two Renderings, One Source
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FinalizedOrder                                  │
//! │      lines (snapshot) + options + OrderTotals (already computed)       │
//! │                 │                                 │                     │
//! │                 ▼                                 ▼                     │
//! │        message_lines()                    receipt_lines()              │
//! │        ───────────────                    ───────────────              │
//! │        🍕 *Store* - Order #12             centered title               │
//! │        grouped lines with totals          fixed-width separators       │
//! │        bundle sub-lines                   "xN" only when N > 1         │
//! │        payment, mode, subtotal,           totals, payment, mode        │
//! │        surcharge, delivery, TOTAL         courtesy line                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The formatter never recomputes money: every amount shown comes from
//! [`OrderTotals`] or a line's own total, rounded once for display.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::CartLine;
use crate::money::CurrencyFormat;
use crate::pricing::OrderTotals;
use crate::types::{Category, OrderOptions, PaymentMethod};

// =============================================================================
// Finalized Order
// =============================================================================

/// A snapshot of the session taken when the operator sends or prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedOrder {
    /// Ticket reference, unique across days (the number is not).
    pub id: Uuid,
    /// Daily order number, when a counter was available.
    pub number: Option<u32>,
    pub placed_at: NaiveDateTime,
    pub lines: Vec<CartLine>,
    pub options: OrderOptions,
    pub totals: OrderTotals,
    pub customer_name: Option<String>,
    pub comment: Option<String>,
}

/// Display groups, in the order they are printed. `None` is drinks.
const GROUPS: [(Option<Category>, &str); 4] = [
    (Some(Category::Standard), "Pizzas"),
    (Some(Category::Calzone), "Calzones"),
    (Some(Category::Promo), "Promos"),
    (None, "Drinks"),
];

impl FinalizedOrder {
    /// Lines grouped for display, empty groups skipped.
    pub fn grouped_lines(&self) -> Vec<(&'static str, Vec<&CartLine>)> {
        GROUPS
            .iter()
            .filter_map(|(category, heading)| {
                let lines: Vec<&CartLine> = self
                    .lines
                    .iter()
                    .filter(|line| line.category == *category)
                    .collect();
                (!lines.is_empty()).then_some((*heading, lines))
            })
            .collect()
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Shop-specific rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFormatter {
    pub store_name: String,
    pub currency: CurrencyFormat,
    /// Receipt width in characters.
    pub paper_width: usize,
}

impl Default for OrderFormatter {
    fn default() -> Self {
        OrderFormatter {
            store_name: "Slice Pizzeria".to_string(),
            currency: CurrencyFormat::default(),
            paper_width: 32,
        }
    }
}

impl OrderFormatter {
    // -------------------------------------------------------------------------
    // Chat message
    // -------------------------------------------------------------------------

    /// The chat message, one entry per line.
    pub fn message_lines(&self, order: &FinalizedOrder) -> Vec<String> {
        let money = |m| self.currency.format(m);
        let mut out = Vec::new();

        match order.number {
            Some(number) => out.push(format!("🍕 *{}* - Order #{}", self.store_name, number)),
            None => out.push(format!("🍕 *{}*", self.store_name)),
        }
        out.push(String::new());

        if let Some(name) = &order.customer_name {
            out.push(format!("👤 *Customer:* {}", name));
            out.push(String::new());
        }

        out.push("*Order:*".to_string());
        for (heading, lines) in order.grouped_lines() {
            out.push(format!("_{}_", heading));
            for line in lines {
                out.push(format!(
                    "- {}x {} ({})",
                    line.quantity,
                    line.display_name(),
                    money(line.line_total())
                ));
                out.extend(bundle_sub_lines(line, "    • "));
            }
        }
        out.push(String::new());

        out.push(format!("💳 Payment: {}", self.payment_label(order, true)));
        out.push(format!("🛵 Mode: {}", order.options.fulfillment().label()));
        out.push(format!("Subtotal: {}", money(order.totals.subtotal)));
        if !order.totals.surcharge_amount.is_zero() {
            out.push(format!(
                "Surcharge ({}%): {}",
                order.totals.surcharge_rate.percent(),
                money(order.totals.surcharge_amount)
            ));
        }
        if !order.totals.delivery_fee.is_zero() {
            out.push(format!("Delivery: {}", money(order.totals.delivery_fee)));
        }
        out.push(format!("*TOTAL: {}*", money(order.totals.grand_total)));

        if let Some(comment) = &order.comment {
            out.push(String::new());
            out.push(format!("📝 Note: {}", comment));
        }

        out
    }

    /// The chat message as one string.
    pub fn message_text(&self, order: &FinalizedOrder) -> String {
        self.message_lines(order).join("\n")
    }

    // -------------------------------------------------------------------------
    // Receipt
    // -------------------------------------------------------------------------

    /// Receipt lines for a narrow thermal printer.
    pub fn receipt_lines(&self, order: &FinalizedOrder) -> Vec<String> {
        let money = |m| self.currency.format(m);
        let separator = "-".repeat(self.paper_width.max(1));
        let mut out = Vec::new();

        out.push(self.center(&self.store_name.to_uppercase()));
        out.push(separator.clone());
        if let Some(number) = order.number {
            out.push(format!("Order #: {}", number));
        }
        out.push(format!("Date: {}", order.placed_at.format("%d/%m/%Y %H:%M")));
        if let Some(name) = &order.customer_name {
            out.push(format!("Customer: {}", name));
        }
        out.push(separator.clone());

        out.push("ORDER:".to_string());
        for (heading, lines) in order.grouped_lines() {
            out.push(format!("[{}]", heading));
            for line in lines {
                if line.quantity > 1 {
                    out.push(format!("- {} x{}", line.display_name(), line.quantity));
                } else {
                    out.push(format!("- {}", line.display_name()));
                }
                out.extend(bundle_sub_lines(line, "   + "));
            }
        }
        out.push(separator.clone());

        out.push(format!("Subtotal: {}", money(order.totals.subtotal)));
        if !order.totals.delivery_fee.is_zero() {
            out.push(format!("Delivery: {}", money(order.totals.delivery_fee)));
        }
        if !order.totals.surcharge_amount.is_zero() {
            out.push(format!(
                "Surcharge {}%: {}",
                order.totals.surcharge_rate.percent(),
                money(order.totals.surcharge_amount)
            ));
        }
        out.push(format!("TOTAL: {}", money(order.totals.grand_total)));
        out.push(format!("Payment: {}", self.payment_label(order, false)));
        out.push(format!("Mode: {}", order.options.fulfillment().label()));

        if let Some(comment) = &order.comment {
            out.push(separator.clone());
            out.push(format!("Note: {}", comment));
        }
        out.push(separator);
        out.push(self.center("THANK YOU FOR YOUR PURCHASE!"));

        out
    }

    // -------------------------------------------------------------------------
    // Live summary
    // -------------------------------------------------------------------------

    /// One-line total shown while the order is being built.
    ///
    /// ## Example
    /// `Total: $9900 (Surcharge 10%, Delivery $1000)`
    pub fn total_summary(&self, totals: &OrderTotals) -> String {
        let mut text = format!("Total: {}", self.currency.format(totals.grand_total));

        let mut details = Vec::new();
        if !totals.surcharge_amount.is_zero() {
            details.push(format!("Surcharge {}%", totals.surcharge_rate.percent()));
        }
        if !totals.delivery_fee.is_zero() {
            details.push(format!("Delivery {}", self.currency.format(totals.delivery_fee)));
        }
        if !details.is_empty() {
            text.push_str(&format!(" ({})", details.join(", ")));
        }
        text
    }

    fn payment_label(&self, order: &FinalizedOrder, with_rate: bool) -> String {
        let method = order.options.payment_method();
        let rate = order.totals.surcharge_rate;
        if with_rate && method != PaymentMethod::Cash && !rate.is_zero() {
            format!("{} (+{}%)", method.label(), rate.percent())
        } else {
            method.label().to_string()
        }
    }

    fn center(&self, text: &str) -> String {
        let len = text.chars().count();
        if len >= self.paper_width {
            return text.to_string();
        }
        format!("{}{}", " ".repeat((self.paper_width - len) / 2), text)
    }
}

/// "1 item" / "3 items".
pub fn item_count_label(count: u64) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    }
}

fn bundle_sub_lines(line: &CartLine, bullet: &str) -> Vec<String> {
    let Some(detail) = &line.bundle_detail else {
        return Vec::new();
    };

    let mut out: Vec<String> = detail
        .included_item_names
        .iter()
        .map(|name| format!("{}{}", bullet, name))
        .collect();
    if let Some(beverage) = &detail.beverage_name {
        out.push(format!("{}Drink: {}", bullet, beverage));
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
