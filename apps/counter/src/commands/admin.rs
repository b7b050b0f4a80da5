//! # Admin Commands
//!
//! PIN-gated catalog editing. Every successful edit is saved right away;
//! a failed database write is reported as a warning and the edit is kept.
//!
//! ```text
//! admin ── PIN ──► wrong: "Incorrect PIN", back to the counter
//!                  right: admin> prompt until `done`
//!
//! admin> add-item | edit-item <n> | remove-item <n> | clear-image <n>
//!        add-drink | edit-drink <n> | remove-drink <n>
//!        phone <number> | items | drinks | save | done
//! ```

use slice_core::catalog::{ImageEdit, ItemDraft};
use slice_core::validation::parse_yes_no;
use slice_core::{Category, CoreError};
use slice_db::SaveOutcome;
use std::io::{BufRead, Write};
use tracing::{debug, info};

use super::{parse_position, split_command};
use crate::console::Console;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ADMIN_HELP: &[&str] = &[
    "Admin commands:",
    "  items | drinks           list the catalog",
    "  add-item                 new item (asks for each field)",
    "  edit-item <n>            edit item n (blank keeps the current value)",
    "  remove-item <n>          delete item n",
    "  clear-image <n>          remove item n's image",
    "  add-drink                new drink",
    "  edit-drink <n>           edit drink n",
    "  remove-drink <n>         delete drink n",
    "  phone <number>           chat phone number",
    "  save                     save the catalog again",
    "  done                     leave admin mode",
];

/// Asks for the PIN and runs the admin prompt until `done`.
pub async fn run<R: BufRead, W: Write>(state: &mut AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let Some(pin) = console.prompt("PIN:")? else {
        return Ok(());
    };
    state.admin.unlock(&pin)?;
    info!("Admin mode unlocked");
    console.say("Admin mode. Type 'help' for commands, 'done' to leave.")?;

    let result = admin_loop(state, console).await;
    state.admin.lock();
    info!("Admin mode locked");
    result
}

async fn admin_loop<R: BufRead, W: Write>(state: &mut AppState, console: &mut Console<R, W>) -> AppResult<()> {
    loop {
        let Some(line) = console.prompt("admin>")? else {
            return Ok(());
        };
        if line.is_empty() {
            continue;
        }

        match dispatch(state, console, &line).await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => console.say(format!("! {}", e.message))?,
        }
    }
}

/// Runs one admin command. `Ok(true)` means leave admin mode.
async fn dispatch<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    line: &str,
) -> AppResult<bool> {
    if !state.admin.is_unlocked() {
        return Err(CoreError::WrongPin.into());
    }

    let (command, args) = split_command(line);
    let changed = match command.to_lowercase().as_str() {
        "help" | "?" => {
            console.say_all(ADMIN_HELP)?;
            false
        }
        "items" => {
            list_items(state, console)?;
            false
        }
        "drinks" => {
            list_drinks(state, console)?;
            false
        }
        "add-item" => add_item(state, console)?,
        "edit-item" => edit_item(state, console, args)?,
        "remove-item" => {
            let index = parse_position(Some(args), "item")?;
            let name = state.catalog.item(index)?.name.clone();
            if confirm(console, &format!("Delete {}? (y/n)", name))? {
                state.catalog.remove_item(index)?;
                true
            } else {
                false
            }
        }
        "clear-image" => {
            let index = parse_position(Some(args), "item")?;
            state.catalog.clear_item_image(index)?;
            true
        }
        "add-drink" => add_drink(state, console)?,
        "edit-drink" => edit_drink(state, console, args)?,
        "remove-drink" => {
            let index = parse_position(Some(args), "drink")?;
            let name = state.catalog.beverage(index)?.name.clone();
            if confirm(console, &format!("Delete {}? (y/n)", name))? {
                state.catalog.remove_beverage(index)?;
                true
            } else {
                false
            }
        }
        "phone" => {
            state.catalog.set_phone(args)?;
            console.say(format!("Phone: {}", state.catalog.phone))?;
            true
        }
        "save" => true,
        "done" | "exit" => return Ok(true),
        other => {
            return Err(AppError::validation(format!(
                "Unknown admin command '{}'. Type 'help'.",
                other
            )))
        }
    };

    if changed {
        save(state, console).await?;
    }
    Ok(false)
}

async fn save<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    match state.save_catalog().await {
        SaveOutcome::Saved => console.say("Saved."),
        SaveOutcome::Degraded { reason } => {
            debug!(reason = %reason, "Catalog kept locally");
            console.say("Warning: could not save to the database. Changes are kept on this terminal.")
        }
    }
}

// =============================================================================
// Listing
// =============================================================================

fn list_items<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let config = state.config();
    for (i, item) in state.catalog.items.iter().enumerate() {
        console.say(format!(
            "  {:>2}. [{}] {}  {} / {}{}",
            i + 1,
            item.category.as_str(),
            item.name,
            config.format_currency(item.whole_price),
            config.format_currency(item.half_price),
            if item.has_image() { "  (image)" } else { "" }
        ))?;
    }
    console.say(format!("Phone: {}", state.catalog.phone))
}

fn list_drinks<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let config = state.config();
    for (i, beverage) in state.catalog.beverages.iter().enumerate() {
        console.say(format!(
            "  {:>2}. {}  {}",
            i + 1,
            beverage.name,
            config.format_currency(beverage.price)
        ))?;
    }
    Ok(())
}

// =============================================================================
// Items
// =============================================================================

/// Returns `Ok(false)` when input ended before the form was complete.
fn add_item<R: BufRead, W: Write>(state: &mut AppState, console: &mut Console<R, W>) -> AppResult<bool> {
    let Some(draft) = item_form(console, &ItemDraft::default())? else {
        return Ok(false);
    };
    let Some(image) = console.prompt("Image (blank for none):")? else {
        return Ok(false);
    };

    let image = (!image.is_empty()).then_some(image);
    state.catalog.add_item(&draft, image)?;
    console.say(format!("Added {}", draft.name.trim()))?;
    Ok(true)
}

fn edit_item<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<bool> {
    let index = parse_position(Some(args), "item")?;
    let item = state.catalog.item(index)?;
    let current = ItemDraft {
        name: item.name.clone(),
        whole_price: item.whole_price.to_string(),
        half_price: item.half_price.to_string(),
        description: item.description.clone(),
        category: item.category.as_str().to_string(),
    };

    let Some(draft) = item_form(console, &current)? else {
        return Ok(false);
    };
    let Some(image) = console.prompt("Image (blank keeps, '-' removes):")? else {
        return Ok(false);
    };
    let image = match image.as_str() {
        "" => ImageEdit::Keep,
        "-" => ImageEdit::Remove,
        other => ImageEdit::Replace(other.to_string()),
    };

    state.catalog.update_item(index, &draft, image)?;
    console.say(format!("Updated {}", draft.name.trim()))?;
    Ok(true)
}

/// Asks for each item field; blank answers keep `current`.
fn item_form<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    current: &ItemDraft,
) -> AppResult<Option<ItemDraft>> {
    let categories = [Category::Standard, Category::Calzone, Category::Promo]
        .map(|c| c.as_str())
        .join("/");

    let fields = [
        ("Name", &current.name),
        ("Whole price", &current.whole_price),
        ("Half price (blank = whole)", &current.half_price),
        ("Description", &current.description),
        (categories.as_str(), &current.category),
    ];

    let mut answers = Vec::with_capacity(fields.len());
    for (label, value) in fields {
        let label = if value.is_empty() {
            format!("{}:", label)
        } else {
            format!("{} [{}]:", label, value)
        };
        let Some(answer) = console.prompt(&label)? else {
            return Ok(None);
        };
        answers.push(if answer.is_empty() { value.clone() } else { answer });
    }

    let [name, whole_price, half_price, description, category]: [String; 5] = answers
        .try_into()
        .map_err(|_| AppError::new(crate::error::ErrorCode::Internal, "Incomplete item form"))?;

    Ok(Some(ItemDraft {
        name,
        whole_price,
        half_price,
        description,
        category,
    }))
}

// =============================================================================
// Drinks
// =============================================================================

fn add_drink<R: BufRead, W: Write>(state: &mut AppState, console: &mut Console<R, W>) -> AppResult<bool> {
    let Some(name) = console.prompt("Drink name:")? else {
        return Ok(false);
    };
    let Some(price) = console.prompt("Price:")? else {
        return Ok(false);
    };

    state.catalog.add_beverage(&name, &price)?;
    console.say(format!("Added {}", name.trim()))?;
    Ok(true)
}

fn edit_drink<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    args: &str,
) -> AppResult<bool> {
    let index = parse_position(Some(args), "drink")?;
    let beverage = state.catalog.beverage(index)?.clone();

    let Some(name) = console.prompt(&format!("Drink name [{}]:", beverage.name))? else {
        return Ok(false);
    };
    let Some(price) = console.prompt(&format!("Price [{}]:", beverage.price))? else {
        return Ok(false);
    };
    let name = if name.is_empty() { beverage.name } else { name };
    let price = if price.is_empty() { beverage.price.to_string() } else { price };

    state.catalog.update_beverage(index, &name, &price)?;
    console.say(format!("Updated {}", name.trim()))?;
    Ok(true)
}

fn confirm<R: BufRead, W: Write>(console: &mut Console<R, W>, question: &str) -> AppResult<bool> {
    Ok(console
        .prompt(question)?
        .and_then(|answer| parse_yes_no(&answer))
        .unwrap_or(false))
}
