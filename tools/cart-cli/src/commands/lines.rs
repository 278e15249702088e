//! Commands that edit cart lines.

use anyhow::{bail, Result};
use turbo_cart::{LineItemCandidate, Money};

use crate::commands::{
    customization_from, resolve_line, AddArgs, CustomizeArgs, QtyArgs, RemoveArgs,
};
use crate::context::Context;

/// Add a product, merging with an identical line.
pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let currency = cart.currency();

    let mut candidate = LineItemCandidate::new(
        args.product_id,
        args.name,
        Money::from_decimal(args.price, currency),
    )
    .with_quantity(args.qty);
    if !args.options.is_empty() {
        candidate = candidate.with_customization(customization_from(&args.options));
    }
    if let Some(surcharge) = args.surcharge {
        candidate = candidate.with_customization_cost(Money::from_decimal(surcharge, currency));
    }
    if let Some(image) = args.image {
        candidate = candidate.with_image(image);
    }

    let identity = cart.add_item(candidate);
    let snapshot = cart.snapshot();
    if let Some(item) = snapshot.item(&identity) {
        ctx.output
            .success(&format!("{} now at quantity {}", identity, item.quantity));
    }

    ctx.output.snapshot(&snapshot);
    Ok(())
}

/// Remove a line.
pub fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let identity = resolve_line(&cart.snapshot(), &args.line)?;

    cart.remove_item(&identity);
    ctx.output.success(&format!("Removed {}", identity));
    ctx.output.snapshot(&cart.snapshot());
    Ok(())
}

/// Set a line's quantity.
pub fn qty(args: QtyArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let identity = resolve_line(&cart.snapshot(), &args.line)?;

    cart.update_quantity(&identity, args.quantity);
    if args.quantity <= 0 {
        ctx.output.success(&format!("Removed {}", identity));
    } else {
        ctx.output
            .success(&format!("{} now at quantity {}", identity, args.quantity));
    }
    ctx.output.snapshot(&cart.snapshot());
    Ok(())
}

/// Replace a line's customization.
pub fn customize(args: CustomizeArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let identity = resolve_line(&cart.snapshot(), &args.line)?;

    let customization = customization_from(&args.options);
    match cart.update_customization(&identity, customization) {
        Some(landed) if landed == identity => ctx.output.info("Options unchanged"),
        Some(landed) => ctx.output.success(&format!("Moved to {}", landed)),
        None => bail!("Line {} disappeared before it could be updated", identity),
    }
    ctx.output.snapshot(&cart.snapshot());
    Ok(())
}
