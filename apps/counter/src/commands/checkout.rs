//! # Checkout Commands
//!
//! `send` and `print`. Both snapshot the session, take a daily order
//! number and leave the cart as it is.
//!
//! ```text
//! send / print
//!     │
//!     ▼
//! check_orderable() ── empty ──► "Nothing to order" (no number taken)
//!     │
//!     ▼
//! next_order_number(today) ── database out ──► cache counter file
//!     │
//!     ▼
//! session.finalize(number, now)
//!     │
//!     ├── send:  message text ──► chat link
//!     └── print: receipt lines ──► printer
//!     │
//!     ▼
//! session.finish_finalizing()
//! ```

use chrono::NaiveDateTime;
use slice_core::format::FinalizedOrder;
use std::io::{BufRead, Write};
use tracing::info;

use crate::console::Console;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::export::{ChatExporter, PrintTarget};
use crate::state::AppState;

async fn finalize(state: &mut AppState, now: NaiveDateTime) -> AppResult<FinalizedOrder> {
    state.session.check_orderable()?;
    let number = state.next_order_number(now.date()).await;
    Ok(state.session.finalize(number, now)?)
}

/// Builds the chat message and its link.
pub async fn send<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    now: NaiveDateTime,
) -> AppResult<()> {
    let order = finalize(state, now).await?;
    let text = state.formatter().message_text(&order);
    let link = ChatExporter::chat_link(&state.catalog.phone, &text);
    state.session.finish_finalizing();
    let link = link?;

    console.say(&text)?;
    console.say("")?;
    console.say(format!("Open: {}", link))?;
    info!(order_id = %order.id, number = ?order.number, "Chat link ready");
    Ok(())
}

/// Prints the receipt.
pub async fn print<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    now: NaiveDateTime,
) -> AppResult<()> {
    let order = finalize(state, now).await?;
    let lines = state.formatter().receipt_lines(&order);
    let printed = state.printer().print(&lines, console.output_mut());
    state.session.finish_finalizing();

    printed.map_err(|e| AppError::new(ErrorCode::Internal, format!("Printing failed: {}", e.message)))?;

    if let PrintTarget::Spool(path) = state.printer().target() {
        console.say(format!("Receipt sent to {}", path.display()))?;
    }
    info!(order_id = %order.id, number = ?order.number, "Receipt printed");
    Ok(())
}
