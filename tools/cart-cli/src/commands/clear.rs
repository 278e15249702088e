//! Clear command.

use anyhow::Result;
use dialoguer::Confirm;

use crate::commands::ClearArgs;
use crate::context::Context;

/// Empty the cart.
pub fn run(args: ClearArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let snapshot = cart.snapshot();

    if !args.yes && !snapshot.is_empty() && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove all {} items ({})?",
                snapshot.total_items,
                snapshot.total_price.display()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Cart left unchanged");
            return Ok(());
        }
    }

    cart.clear();
    ctx.output.success("Cart cleared");
    ctx.output.snapshot(&cart.snapshot());
    Ok(())
}
