//! Cart commands.

use std::sync::Arc;

use anyhow::{bail, Result};
use rocketshoes_commerce::notify::{RecordingNotifier, Toast};
use rocketshoes_commerce::{Cart, CartOutcome, UpdateProductAmount};
use serde::Serialize;

use super::{AddArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;
use crate::output::{outcome_badge, truncate};

const TITLE_WIDTH: usize = 40;

/// JSON view of a command result.
#[derive(Serialize)]
struct CartReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<CartOutcome>,
    toasts: Vec<Toast>,
    cart: &'a Cart,
    item_count: u64,
    total: String,
}

/// Print the current cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let notifier = Arc::new(RecordingNotifier::new());
    let store = ctx.cart_store(Arc::clone(&notifier))?;

    report(ctx, None, &notifier, store.cart());
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let notifier = Arc::new(RecordingNotifier::new());
    let mut store = ctx.cart_store(Arc::clone(&notifier))?;

    let outcome = store.add_product(args.id).await;
    finish(ctx, "add", outcome, &notifier, store.cart())
}

/// Remove a product.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let notifier = Arc::new(RecordingNotifier::new());
    let mut store = ctx.cart_store(Arc::clone(&notifier))?;

    let outcome = store.remove_product(args.id);
    finish(ctx, "remove", outcome, &notifier, store.cart())
}

/// Set a product's amount.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let notifier = Arc::new(RecordingNotifier::new());
    let mut store = ctx.cart_store(Arc::clone(&notifier))?;

    let outcome = store
        .update_product_amount(UpdateProductAmount::new(args.id, args.amount))
        .await;
    finish(ctx, "update", outcome, &notifier, store.cart())
}

fn finish(
    ctx: &Context,
    command: &str,
    outcome: CartOutcome,
    notifier: &RecordingNotifier,
    cart: &Cart,
) -> Result<()> {
    report(ctx, Some(outcome), notifier, cart);
    check_outcome(command, outcome)
}

/// Map an outcome to the command's exit result.
fn check_outcome(command: &str, outcome: CartOutcome) -> Result<()> {
    match outcome {
        CartOutcome::Updated | CartOutcome::Unchanged => Ok(()),
        CartOutcome::OutOfStock | CartOutcome::Failed => {
            bail!("{} was rejected: {}", command, outcome.as_str())
        }
    }
}

fn report(ctx: &Context, outcome: Option<CartOutcome>, notifier: &RecordingNotifier, cart: &Cart) {
    let toasts = notifier.take();

    if ctx.output.is_json() {
        ctx.output.json(&CartReport {
            outcome,
            toasts,
            cart,
            item_count: cart.item_count(),
            total: cart.total().display(),
        });
        return;
    }

    for toast in &toasts {
        ctx.output.toast(toast);
    }
    if let Some(outcome) = outcome {
        ctx.output.info(&format!("Cart {}", outcome_badge(outcome.as_str())));
    }

    print_cart(ctx, cart);
}

fn print_cart(ctx: &Context, cart: &Cart) {
    ctx.output.header("Cart");

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    let widths = [6, TITLE_WIDTH, 14, 6, 14];
    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"], &widths);

    for product in cart {
        let id = product.id.to_string();
        let title = truncate(&product.title, TITLE_WIDTH);
        let price = product.unit_price().display();
        let amount = product.amount.to_string();
        let subtotal = product.subtotal().display();
        ctx.output
            .table_row(&[&id, &title, &price, &amount, &subtotal], &widths);
    }

    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &cart.total().display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use rocketshoes_commerce::notify::{messages, Notifier};

    use crate::config::CliConfig;
    use crate::output::Output;

    fn json_context() -> Context {
        Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: PathBuf::from("."),
        }
    }

    #[test]
    fn test_successful_outcomes_exit_ok() {
        assert!(check_outcome("add", CartOutcome::Updated).is_ok());
        assert!(check_outcome("remove", CartOutcome::Unchanged).is_ok());
    }

    #[test]
    fn test_rejected_outcomes_exit_with_error() {
        let err = check_outcome("add", CartOutcome::OutOfStock).unwrap_err();
        assert_eq!(err.to_string(), "add was rejected: out_of_stock");

        let err = check_outcome("update", CartOutcome::Failed).unwrap_err();
        assert_eq!(err.to_string(), "update was rejected: failed");
    }

    #[test]
    fn test_finish_drains_toasts_and_reports_failure() {
        let ctx = json_context();
        let notifier = RecordingNotifier::new();
        notifier.notify(Toast::error(messages::REMOVE_FAILED));

        let result = finish(&ctx, "remove", CartOutcome::Failed, &notifier, &Cart::new());

        assert!(result.is_err());
        assert!(notifier.toasts().is_empty());
    }

    #[test]
    fn test_finish_unchanged_is_ok() {
        let ctx = json_context();
        let notifier = RecordingNotifier::new();

        assert!(finish(&ctx, "remove", CartOutcome::Unchanged, &notifier, &Cart::new()).is_ok());
    }
}
