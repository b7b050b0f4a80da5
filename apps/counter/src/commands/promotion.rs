//! # Promotion Commands
//!
//! Walks the operator through a promotion, one prompt per step.
//!
//! ```text
//! add 2  (a promo)
//!   │
//!   ├─ "Choose 2 items (e.g. 1,3):"   ─► submit_promotion_selection
//!   ├─ "Add a drink? (y/n):"          ─► answer_promotion_beverage
//!   ├─ "Drink number:"                ─► choose_promotion_beverage
//!   └─ Ready                          ─► commit_promotion
//!
//! "cancel" (or end of input) at any prompt drops the promotion.
//! ```

use slice_core::catalog::CatalogItem;
use slice_core::promotion::PromotionStep;
use slice_core::validation::parse_yes_no;
use slice_core::PromotionError;
use std::io::{BufRead, Write};
use tracing::debug;

use super::order::show_summary;
use crate::console::Console;
use crate::error::AppResult;
use crate::state::AppState;

const CANCEL: &str = "cancel";

/// Composes `promo` and adds it to the cart.
///
/// Errors from the flow abort the promotion; the cart is untouched.
pub fn compose<R: BufRead, W: Write>(
    state: &mut AppState,
    console: &mut Console<R, W>,
    promo: &CatalogItem,
) -> AppResult<()> {
    let mut step = state.session.begin_promotion(&state.catalog, promo)?;

    loop {
        step = match step {
            PromotionStep::AwaitingSelection => {
                list_candidates(state, console)?;
                let label = match state.session.promotion() {
                    Some(flow) => format!("Choose {} items (e.g. 1,3):", flow.pick_count()),
                    None => "Choose items:".to_string(),
                };
                let Some(answer) = ask(console, &label)? else {
                    return cancel(state, console);
                };
                state.session.submit_promotion_selection(&answer)?
            }
            PromotionStep::AwaitingBeverageChoice => {
                let Some(answer) = ask(console, "Add a drink? (y/n):")? else {
                    return cancel(state, console);
                };
                match parse_yes_no(&answer) {
                    Some(yes) => state.session.answer_promotion_beverage(yes)?,
                    None => {
                        console.say("Answer y or n.")?;
                        PromotionStep::AwaitingBeverageChoice
                    }
                }
            }
            PromotionStep::AwaitingBeverage => {
                list_beverages(state, console)?;
                let Some(answer) = ask(console, "Drink number:")? else {
                    return cancel(state, console);
                };
                state.session.choose_promotion_beverage(&answer)?
            }
            PromotionStep::Ready => {
                state.session.commit_promotion()?;
                console.say(format!("+ {}", promo.name))?;
                return show_summary(state, console);
            }
        };
    }
}

/// Prompts; `None` when the operator cancels or input ends.
fn ask<R: BufRead, W: Write>(console: &mut Console<R, W>, label: &str) -> AppResult<Option<String>> {
    Ok(console
        .prompt(label)?
        .filter(|answer| !answer.eq_ignore_ascii_case(CANCEL)))
}

fn cancel<R: BufRead, W: Write>(state: &mut AppState, console: &mut Console<R, W>) -> AppResult<()> {
    debug!("Promotion cancelled at prompt");
    state.session.cancel_promotion();
    console.say(PromotionError::Cancelled.to_string())
}

fn list_candidates<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let Some(flow) = state.session.promotion() else {
        return Ok(());
    };
    for (i, item) in flow.candidates().iter().enumerate() {
        console.say(format!("  {:>2}. {}", i + 1, item.name))?;
    }
    Ok(())
}

fn list_beverages<R: BufRead, W: Write>(state: &AppState, console: &mut Console<R, W>) -> AppResult<()> {
    let Some(flow) = state.session.promotion() else {
        return Ok(());
    };
    for (i, beverage) in flow.beverages().iter().enumerate() {
        console.say(format!("  {:>2}. {}", i + 1, beverage.name))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::order::add_item;
    use crate::commands::test_support::*;
    use crate::error::ErrorCode;
    use slice_core::cart::VariantKind;
    use slice_core::catalog::ItemDraft;
    use slice_core::Money;

    fn promo_catalog() -> slice_core::catalog::Catalog {
        let mut catalog = sample_catalog();
        catalog
            .add_item(
                &ItemDraft {
                    name: "Muzzarella".to_string(),
                    whole_price: "4500".to_string(),
                    half_price: "2500".to_string(),
                    description: String::new(),
                    category: "pizza".to_string(),
                },
                None,
            )
            .unwrap();
        catalog
    }

    #[tokio::test]
    async fn test_promotion_with_drink() {
        // items: 1 Napolitana, 2 Promo 1, 3 Muzzarella; candidates 1 Napolitana, 2 Muzzarella
        let mut state = state_with("promo-drink", promo_catalog()).await;
        let mut console = console("2,1\ny\n1\n");

        add_item(&mut state, &mut console, "2").unwrap();

        let lines = state.session.cart().lines();
        assert_eq!(lines.len(), 2);
        let bundle = &lines[0];
        assert_eq!(bundle.key.variant, VariantKind::Unit);
        assert_eq!(bundle.unit_price, Money::from_units(12000));
        let detail = bundle.bundle_detail.as_ref().unwrap();
        assert_eq!(detail.included_item_names, vec!["Muzzarella", "Napolitana"]);
        assert_eq!(detail.beverage_name.as_deref(), Some("Cola"));
        assert_eq!(lines[1].key.variant, VariantKind::Beverage);
        assert_eq!(state.session.totals().subtotal, Money::from_units(13500));
        assert!(state.session.promotion().is_none());
    }

    #[tokio::test]
    async fn test_promotion_without_drink_merges_same_selection() {
        let mut state = state_with("promo-merge", promo_catalog()).await;
        let mut console = console("1 2\nn\n2,1\nno\n");

        add_item(&mut state, &mut console, "2").unwrap();
        add_item(&mut state, &mut console, "2").unwrap();

        let lines = state.session.cart().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_incomplete_selection_aborts() {
        let mut state = state_with("promo-incomplete", promo_catalog()).await;
        let mut console = console("1, 9, x\n");

        let err = add_item(&mut state, &mut console, "2").unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("2 items required, 1 valid given"));
        assert!(state.session.cart().is_empty());
        assert!(state.session.promotion().is_none());
    }

    #[tokio::test]
    async fn test_invalid_drink_choice_aborts() {
        let mut state = state_with("promo-bad-drink", promo_catalog()).await;
        let mut console = console("1,2\ny\n1,2\n");

        let err = add_item(&mut state, &mut console, "2").unwrap_err();
        assert!(err.message.contains("exactly one drink"));
        assert!(state.session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_at_prompt() {
        let mut state = state_with("promo-cancel", promo_catalog()).await;
        let mut console = console("1,2\ncancel\n");

        add_item(&mut state, &mut console, "2").unwrap();

        assert!(state.session.cart().is_empty());
        assert!(state.session.promotion().is_none());
        assert!(output(console).contains("Promotion cancelled"));
    }

    #[tokio::test]
    async fn test_unclear_answer_asks_again() {
        let mut state = state_with("promo-reask", promo_catalog()).await;
        let mut console = console("1,2\nmaybe\nn\n");

        add_item(&mut state, &mut console, "2").unwrap();

        assert_eq!(state.session.cart().line_count(), 1);
        assert!(output(console).contains("Answer y or n."));
    }
}
