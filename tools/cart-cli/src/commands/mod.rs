//! CLI commands.

pub mod clear;
pub mod config;
pub mod lines;
pub mod show;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use turbo_cart::{CartSnapshot, Customization, ItemIdentity};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Only print the totals
    #[arg(long)]
    pub totals: bool,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id
    pub product_id: String,

    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Unit price in major units (e.g. 19.99); negative counts as 0
    #[arg(short, long, allow_negative_numbers = true)]
    pub price: f64,

    /// Quantity to add
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub qty: i64,

    /// Customization option as key=value (repeatable)
    #[arg(short, long = "option", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Per-unit surcharge for the customization
    #[arg(long, allow_negative_numbers = true)]
    pub surcharge: Option<f64>,

    /// Image reference
    #[arg(long)]
    pub image: Option<String>,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Line number from `cart show`, item identity or product id
    pub line: String,
}

/// Arguments for the qty command.
#[derive(Args)]
pub struct QtyArgs {
    /// Line number from `cart show`, item identity or product id
    pub line: String,

    /// New quantity (0 or less removes the line)
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the customize command.
#[derive(Args)]
pub struct CustomizeArgs {
    /// Line number from `cart show`, item identity or product id
    pub line: String,

    /// Customization option as key=value (repeatable; none clears options)
    #[arg(short, long = "option", value_parser = parse_option)]
    pub options: Vec<(String, String)>,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default cart.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a `key=value` option.
pub fn parse_option(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// Build a customization from parsed options. Later keys win.
pub fn customization_from(options: &[(String, String)]) -> Customization {
    options
        .iter()
        .map(|(key, value)| (key.clone(), serde_json::Value::from(value.as_str())))
        .collect()
}

/// Resolve a line reference against the current cart.
///
/// Accepts a 1-based line number, a full item identity, or a product id
/// that matches exactly one line.
pub fn resolve_line(snapshot: &CartSnapshot, reference: &str) -> Result<ItemIdentity> {
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(item) = position.checked_sub(1).and_then(|i| snapshot.items.get(i)) {
            return Ok(item.identity());
        }
    }

    let identity = ItemIdentity::new(reference);
    if snapshot.item(&identity).is_some() {
        return Ok(identity);
    }

    let matches: Vec<_> = snapshot
        .items
        .iter()
        .filter(|item| item.product_id.as_str() == reference)
        .collect();
    match matches.as_slice() {
        [item] => Ok(item.identity()),
        [] => bail!("No cart line matches '{}'", reference),
        _ => bail!(
            "'{}' matches {} lines; use a line number from `cart show`",
            reference,
            matches.len()
        ),
    }
}
