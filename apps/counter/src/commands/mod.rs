//! # Commands Module
//!
//! The counter's command loop and the commands it dispatches to.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Invocation Flow                              │
//! │                                                                         │
//! │  Operator types: add 1 half                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  run_loop ── dispatch("add", "1 half")                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  order::add_item(state, console, "1 half")                             │
//! │       │  state.catalog.item(0)                                         │
//! │       │  state.session.add_catalog_item(&item, Portion::Half)          │
//! │       ▼                                                                 │
//! │  Ok(()) ─► print running total                                         │
//! │  Err(AppError) ─► print message, keep looping (fatal errors stop)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`order`] - menu, adding, quantities, order options
//! - [`promotion`] - composing a promotion step by step
//! - [`checkout`] - chat message and receipt
//! - [`admin`] - PIN-gated catalog editing

pub mod admin;
pub mod checkout;
pub mod order;
pub mod promotion;

use chrono::Local;
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::console::Console;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const HELP: &[&str] = &[
    "Commands:",
    "  menu                     show the menu",
    "  add <n> [whole|half]     add item n (promotions ask for their items)",
    "  drink <n>                add drink n",
    "  cart                     show the order",
    "  qty <line> <quantity>    change a line's quantity (0 removes)",
    "  remove <line>            remove a line",
    "  pay cash|debit|credit    payment method",
    "  mode pickup|delivery     pickup or delivery",
    "  fee <amount>             delivery fee",
    "  name <text>              customer name",
    "  note <text>              order note",
    "  send                     build the chat message",
    "  print                    print the receipt",
    "  new                      start a new order",
    "  admin                    edit the catalog (PIN)",
    "  quit",
];

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads commands until `quit` or end of input.
pub async fn run_loop<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    console.say(format!("{} - counter ready. Type 'help' for commands.", state.config().store.name))?;

    loop {
        let Some(line) = console.prompt(">")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        match dispatch(state, console, &line).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!(code = ?e.code, message = %e.message, "Command failed");
                console.say(format!("! {}", e.message))?;
            }
        }
    }

    info!("Counter closed");
    Ok(())
}

async fn dispatch<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    line: &str,
) -> AppResult<Flow> {
    let (command, args) = split_command(line);

    match command.to_lowercase().as_str() {
        "help" | "?" => console.say_all(HELP)?,
        "menu" => order::show_menu(state, console)?,
        "add" => order::add_item(state, console, args)?,
        "drink" => order::add_drink(state, console, args)?,
        "cart" => order::show_cart(state, console)?,
        "qty" => order::set_quantity(state, console, args)?,
        "remove" => order::remove_line(state, console, args)?,
        "pay" => order::set_payment(state, console, args)?,
        "mode" => order::set_mode(state, console, args)?,
        "fee" => order::set_fee(state, console, args)?,
        "name" => order::set_name(state, console, args)?,
        "note" => order::set_note(state, console, args)?,
        "new" => order::new_order(state, console)?,
        "send" => checkout::send(state, console, Local::now().naive_local()).await?,
        "print" => checkout::print(state, console, Local::now().naive_local()).await?,
        "admin" => admin::run(state, console).await?,
        "quit" | "exit" => return Ok(Flow::Quit),
        other => {
            return Err(AppError::validation(format!(
                "Unknown command '{}'. Type 'help'.",
                other
            )))
        }
    }

    Ok(Flow::Continue)
}

/// `"add 1 half"` → `("add", "1 half")`.
pub(crate) fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

/// Reads a 1-based position typed by the operator as a 0-based index.
pub(crate) fn parse_position(text: Option<&str>, what: &str) -> AppResult<usize> {
    let text = text.map(str::trim).unwrap_or_default();
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(AppError::validation(format!(
            "Expected a {} number, got '{}'",
            what, text
        ))),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use slice_core::Money;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  add 1   half "), ("add", "1   half"));
        assert_eq!(split_command("cart"), ("cart", ""));
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position(Some("3"), "item").unwrap(), 2);
        assert!(parse_position(Some("0"), "item").is_err());
        assert!(parse_position(Some("x"), "item").is_err());
        assert!(parse_position(None, "item").is_err());
    }

    #[tokio::test]
    async fn test_loop_builds_order_and_reports_errors() {
        let mut state = state_with("loop", sample_catalog()).await;
        let mut console = console("add 1 whole\nadd 1 half\nbogus\npay credit\nmode delivery\nquit\nadd 1 whole\n");

        run_loop(&mut state, &mut console).await.unwrap();

        // subtotal 8000 + delivery 1000, credit 10% on both
        assert_eq!(state.session.totals().grand_total, Money::from_units(9900));
        assert_eq!(state.session.cart().line_count(), 2);

        let out = output(console);
        assert!(out.contains("! Unknown command 'bogus'"));
        assert!(out.contains("Total: $9900 (Surcharge 10%, Delivery $1000)"));
    }

    #[tokio::test]
    async fn test_loop_ends_at_end_of_input() {
        let mut state = state_with("eof", sample_catalog()).await;
        let mut console = console("menu\n");

        run_loop(&mut state, &mut console).await.unwrap();
        assert!(output(console).contains("Napolitana"));
    }
}
