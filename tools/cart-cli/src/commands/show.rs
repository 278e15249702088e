//! Show command.

use anyhow::Result;
use serde_json::json;

use crate::commands::ShowArgs;
use crate::context::Context;

/// Print the cart.
pub fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let snapshot = cart.snapshot();
    ctx.output
        .debug(&format!("Storage: {}", ctx.storage_dir().display()));

    if args.totals {
        if ctx.output.is_json() {
            ctx.output.json(&json!({
                "total_items": snapshot.total_items,
                "total_price": snapshot.total_price,
                "unique_items": snapshot.unique_item_count(),
            }));
        } else {
            ctx.output.kv("Items", &snapshot.total_items.to_string());
            ctx.output.kv("Lines", &snapshot.unique_item_count().to_string());
            ctx.output.kv("Total", &snapshot.total_price.display());
        }
        return Ok(());
    }

    ctx.output.snapshot(&snapshot);
    Ok(())
}
