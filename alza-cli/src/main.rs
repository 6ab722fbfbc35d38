// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! alza CLI - shop at alza.sk from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Who am I logged in as?
//! alza whoami
//!
//! # Search the catalog
//! alza search "usb-c kábel" -n 5
//!
//! # Cart
//! alza cart add 7911234 -q 2
//! alza cart --format json --pretty
//!
//! # Price quote without ordering
//! alza quickbuy 7911234 --quote --no-coupon
//!
//! # Mint a fresh token from the browser session
//! alza token refresh
//! ```

mod commands;
mod countdown;
mod output;

use alza_client::ClientError;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{cart, favorites, lists, orders, product, quickbuy, search, token, whoami};

// ============================================================================
// CLI Definition
// ============================================================================

/// alza CLI - shop at alza.sk.
#[derive(Parser)]
#[command(name = "alza")]
#[command(about = "Command-line client for the alza.sk shop")]
#[command(long_about = r#"
alza talks to the alza.sk API with the token of your browser session.

Run `alza token refresh` after signing in to https://www.alza.sk/ in
Chrome, Chromium, Brave, Edge or Firefox. Expired tokens are refreshed
automatically when the browser session is still alive.

Examples:
  alza whoami                        # Account summary
  alza search iphone -n 5            # Catalog search
  alza cart                          # Cart contents
  alza orders -n 20                  # Recent orders
  alza quickbuy 7911234 --dry-run    # Simulated purchase
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Whether text output may use ANSI colors.
    pub fn use_colors(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the signed-in account.
    Whoami,

    /// Search the catalog.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Show product detail.
    #[command(visible_alias = "p")]
    Product(product::ProductArgs),

    /// Show or change the cart.
    #[command(visible_alias = "c")]
    Cart(cart::CartArgs),

    /// Manage favorites.
    #[command(visible_alias = "fav")]
    Favorites(favorites::FavoritesArgs),

    /// Manage shopping lists.
    Lists(lists::ListsArgs),

    /// Show recent orders.
    #[command(visible_alias = "o")]
    Orders(orders::OrdersArgs),

    /// Buy one product with fast checkout.
    Quickbuy(quickbuy::QuickbuyArgs),

    /// Manage the auth token.
    Token(token::TokenArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Auth failure that survived the token refresh.
    AuthRequired = 2,
}

impl ExitCode {
    fn for_error(err: &anyhow::Error) -> Self {
        let auth_failure = err
            .chain()
            .filter_map(|cause| cause.downcast_ref::<ClientError>())
            .any(ClientError::is_auth_failure);
        if auth_failure {
            Self::AuthRequired
        } else {
            Self::Error
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let default = if verbose { "alza=debug,info" } else { "alza=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Whoami => whoami::run(&cli).await,
        Commands::Search(args) => search::run(args, &cli).await,
        Commands::Product(args) => product::run(args, &cli).await,
        Commands::Cart(args) => cart::run(args, &cli).await,
        Commands::Favorites(args) => favorites::run(args, &cli).await,
        Commands::Lists(args) => lists::run(args, &cli).await,
        Commands::Orders(args) => orders::run(args, &cli).await,
        Commands::Quickbuy(args) => quickbuy::run(args, &cli).await,
        Commands::Token(args) => token::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_for_auth_failure() {
        let err = anyhow::Error::new(ClientError::TokenExpired);
        assert_eq!(ExitCode::for_error(&err) as i32, 2);

        let err = anyhow::Error::new(ClientError::ProductNotInCart(1)).context("cart remove");
        assert_eq!(ExitCode::for_error(&err) as i32, 1);

        let err = anyhow::anyhow!("plain failure");
        assert_eq!(ExitCode::for_error(&err) as i32, 1);
    }

    #[test]
    fn test_cli_parses_quickbuy_flags() {
        let cli = Cli::try_parse_from([
            "alza", "quickbuy", "42", "--quote", "--coupon", "A,B", "--coupon", "C", "-q", "2",
        ])
        .unwrap();
        let Commands::Quickbuy(args) = cli.command else {
            panic!("expected quickbuy");
        };
        assert_eq!(args.product_id, 42);
        assert_eq!(args.quantity, 2);
        assert!(args.quote);
        assert_eq!(args.coupons, vec!["A", "B", "C"]);
    }
}
