//! Cart CLI - drive a TurboCart session from the terminal.
//!
//! Commands:
//! - `cart show` - List lines and totals
//! - `cart add` - Add a product (merging with an identical line)
//! - `cart remove` - Remove a line
//! - `cart qty` - Set a line's quantity (0 or less removes it)
//! - `cart customize` - Change a line's options
//! - `cart clear` - Empty the cart
//! - `cart config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, ClearArgs, ConfigArgs, CustomizeArgs, QtyArgs, RemoveArgs, ShowArgs};

/// Cart CLI - inspect and edit a persisted shopping cart
#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cart lines and totals
    Show(ShowArgs),

    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a line from the cart
    Remove(RemoveArgs),

    /// Set the quantity of a line
    Qty(QtyArgs),

    /// Replace the options of a line
    Customize(CustomizeArgs),

    /// Remove every line
    Clear(ClearArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Show(args) => commands::show::run(args, &ctx),
        Commands::Add(args) => commands::lines::add(args, &ctx),
        Commands::Remove(args) => commands::lines::remove(args, &ctx),
        Commands::Qty(args) => commands::lines::qty(args, &ctx),
        Commands::Customize(args) => commands::lines::customize(args, &ctx),
        Commands::Clear(args) => commands::clear::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
