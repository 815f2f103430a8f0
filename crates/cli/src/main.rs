//! Rocket Cart CLI - drive a locally persisted cart from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rcart show
//!
//! # Add one unit of product 3
//! rcart add 3
//!
//! # Set product 3 to 2 units
//! rcart update 3 2
//!
//! # Remove product 3
//! rcart remove 3
//! ```
//!
//! # Exit Codes
//!
//! - `0` - the command succeeded (or an update was ignored)
//! - `1` - configuration, storage or startup failure
//! - `2` - the cart operation was refused (out of stock, not in cart, lookup failed)
//!
//! Configuration comes from the environment; see `rocket_cart::config`.
//! Logs go to stderr (`RUST_LOG` filters, `RUST_LOG_FORMAT=json` for JSON lines).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocket_cart::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rcart")]
#[command(author, version, about = "Rocket Cart command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New amount; zero or negative is ignored
        #[arg(allow_negative_numbers = true)]
        amount: i32,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocket_cart=info,rocket_cart_cli=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Run a command. `Ok(false)` means the cart refused the operation.
async fn run(cli: Cli) -> Result<bool, rocket_cart::CartError> {
    let store = commands::cart::open_store()?;

    let accepted = match cli.command {
        Commands::Show => {
            commands::cart::show(&store);
            true
        }
        Commands::Add { product_id } => commands::cart::add(&store, product_id).await,
        Commands::Remove { product_id } => commands::cart::remove(&store, product_id).await,
        Commands::Update { product_id, amount } => {
            commands::cart::update(&store, product_id, amount).await
        }
    };
    Ok(accepted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_accepts_negative_amount() {
        let cli = Cli::try_parse_from(["rcart", "update", "3", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Update { product_id, amount: -1 } if product_id == ProductId::new(3)
        ));
    }

    #[test]
    fn test_rejects_non_numeric_product_id() {
        assert!(Cli::try_parse_from(["rcart", "add", "shoe"]).is_err());
    }
}
