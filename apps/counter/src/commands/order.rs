//! # Order Commands
//!
//! Menu display, adding items, editing lines and order options.

use slice_core::cart::CartLine;
use slice_core::format::item_count_label;
use slice_core::session::Portion;
use slice_core::validation::parse_yes_no;
use slice_core::{Category, Fulfillment, PaymentMethod};
use std::io::{BufRead, Write};

use super::{parse_position, promotion};
use crate::console::Console;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// =============================================================================
// Menu
// =============================================================================

pub fn show_menu<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let config = state.config();

    for category in [Category::Standard, Category::Calzone, Category::Promo] {
        let entries: Vec<String> = state
            .catalog
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.category == category)
            .map(|(i, item)| match category {
                Category::Promo => format!(
                    "  {:>2}. {}  {}  {}",
                    i + 1,
                    item.name,
                    config.format_currency(item.whole_price),
                    item.description
                ),
                _ => format!(
                    "  {:>2}. {}  {} / half {}",
                    i + 1,
                    item.name,
                    config.format_currency(item.whole_price),
                    config.format_currency(item.half_price)
                ),
            })
            .collect();

        if !entries.is_empty() {
            console.say(format!("[{}]", category.heading()))?;
            console.say_all(entries)?;
        }
    }

    if !state.catalog.beverages.is_empty() {
        console.say("[Drinks]")?;
        for (i, beverage) in state.catalog.beverages.iter().enumerate() {
            console.say(format!(
                "  {:>2}. {}  {}",
                i + 1,
                beverage.name,
                config.format_currency(beverage.price)
            ))?;
        }
    }
    Ok(())
}

// =============================================================================
// Adding
// =============================================================================

/// `add <n> [whole|half]`. Promotions hand over to the promotion prompts.
pub fn add_item<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    let mut parts = args.split_whitespace();
    let index = parse_position(parts.next(), "item")?;
    let item = state.catalog.item(index)?.clone();

    let portion = match (item.category, parts.next()) {
        (Category::Promo, _) => return promotion::compose(state, console, &item),
        (_, Some(text)) => parse_portion(text)?,
        (Category::Standard, None) => match console.prompt("Whole or half? (w/h)")? {
            Some(text) => parse_portion(&text)?,
            None => return Ok(()),
        },
        (Category::Calzone, None) => match console.prompt("Half calzone? (y/n)")? {
            Some(text) => match parse_yes_no(&text) {
                Some(true) => Portion::Half,
                Some(false) => Portion::Whole,
                None => return Err(AppError::validation("Answer y or n")),
            },
            None => return Ok(()),
        },
    };

    state.session.add_catalog_item(&item, portion)?;
    let label = match portion {
        Portion::Whole => item.name.clone(),
        Portion::Half => format!("{} (1/2)", item.name),
    };
    console.say(format!("+ {}", label))?;
    show_summary(state, console)
}

/// `drink <n>`.
pub fn add_drink<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    let index = parse_position(args.split_whitespace().next(), "drink")?;
    let beverage = state.catalog.beverage(index)?.clone();

    state.session.add_beverage(&beverage);
    console.say(format!("+ {}", beverage.name))?;
    show_summary(state, console)
}

fn parse_portion(text: &str) -> AppResult<Portion> {
    match text.trim().to_lowercase().as_str() {
        "w" | "whole" | "entera" => Ok(Portion::Whole),
        "h" | "half" | "media" | "1/2" => Ok(Portion::Half),
        other => Err(AppError::validation(format!(
            "Portion must be whole or half, got '{}'",
            other
        ))),
    }
}

// =============================================================================
// Cart
// =============================================================================

pub fn show_cart<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let cart = state.session.cart();
    if cart.is_empty() {
        return console.say("Cart is empty.");
    }

    let config = state.config();
    for (i, line) in cart.lines().iter().enumerate() {
        console.say(format!(
            "  {:>2}. {}x {}  {}",
            i + 1,
            line.quantity,
            line.display_name(),
            config.format_currency(line.line_total())
        ))?;
        if let Some(detail) = &line.bundle_detail {
            for name in &detail.included_item_names {
                console.say(format!("        • {}", name))?;
            }
            if let Some(beverage) = &detail.beverage_name {
                console.say(format!("        • Drink: {}", beverage))?;
            }
        }
    }

    let totals = state.session.totals();
    let options = state.session.options();
    console.say(format!("Subtotal: {}", config.format_currency(totals.subtotal)))?;
    console.say(format!(
        "Payment: {} / Mode: {}",
        options.payment_method().label(),
        options.fulfillment().label()
    ))?;
    if let Some(name) = state.session.customer_name() {
        console.say(format!("Customer: {}", name))?;
    }
    if let Some(comment) = state.session.comment() {
        console.say(format!("Note: {}", comment))?;
    }
    show_summary(state, console)
}

/// `qty <line> <quantity>`. Unreadable quantities remove the line.
pub fn set_quantity<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    let (position, quantity) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    let line = cart_line(state, position)?;

    state.session.set_quantity_input(&line.key, quantity);
    if state.session.cart().get(&line.key).is_none() {
        console.say(format!("- {}", line.display_name()))?;
    }
    show_summary(state, console)
}

/// `remove <line>`.
pub fn remove_line<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    let line = cart_line(state, args)?;
    state.session.set_quantity(&line.key, 0);
    console.say(format!("- {}", line.display_name()))?;
    show_summary(state, console)
}

fn cart_line(state: &AppState, position: &str) -> AppResult<CartLine> {
    let index = parse_position(Some(position), "line")?;
    state
        .session
        .cart()
        .lines()
        .get(index)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Line #{} does not exist", index + 1)))
}

// =============================================================================
// Order Options
// =============================================================================

/// `pay cash|debit|credit`.
pub fn set_payment<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    let method: PaymentMethod = args.parse().map_err(slice_core::CoreError::from)?;
    state.session.set_payment_method(method);
    show_summary(state, console)
}

/// `mode pickup|delivery`. Delivery pre-fills the default fee.
pub fn set_mode<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    let fulfillment: Fulfillment = args.parse().map_err(slice_core::CoreError::from)?;
    state.session.set_fulfillment(fulfillment);
    show_summary(state, console)
}

/// `fee <amount>`. Garbage reads as zero; ignored for pickup.
pub fn set_fee<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    if state.session.options().fulfillment() == Fulfillment::Pickup {
        return Err(AppError::validation("Delivery fee only applies to delivery orders"));
    }
    state.session.set_delivery_fee_input(args);
    show_summary(state, console)
}

/// `name <text>`; no text clears it.
pub fn set_name<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    state.session.set_customer_name(args);
    match state.session.customer_name() {
        Some(name) => console.say(format!("Customer: {}", name)),
        None => console.say("Customer name cleared."),
    }
}

/// `note <text>`; no text clears it.
pub fn set_note<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<()> {
    state.session.set_comment(args);
    match state.session.comment() {
        Some(comment) => console.say(format!("Note: {}", comment)),
        None => console.say("Note cleared."),
    }
}

pub fn new_order<R: BufRead, W: Write>(state: &mut AppState, console: &mut Console<R, W>) -> AppResult<()> {
    state.session.reset();
    console.say("New order.")
}

/// Item count and running total, printed after every change.
pub(crate) fn show_summary<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let totals = state.session.totals();
    console.say(format!(
        "{} | {}",
        item_count_label(totals.item_count),
        state.formatter().total_summary(&totals)
    ))
}
