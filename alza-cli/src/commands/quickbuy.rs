//! Quickbuy command - fast checkout of one product.
//!
//! Flags and `ALZA_QUICKBUY_*` env vars are layered over `quickbuy.env`.
//! Real orders need a coupon (or `--no-coupon`) and, unless `--yes` is
//! given, survive a cancellable countdown before anything is sent.

use alza_core::QuickBuyConfig;
use alza_store::{load_quickbuy_defaults, quickbuy_env_path};
use anyhow::{Result, anyhow};
use clap::Args;
use tracing::{debug, info};

use super::{Shop, emit};
use crate::countdown::{self, Outcome};
use crate::output::TextFormatter;
use crate::{Cli, OutputFormat};

const REQUIRED_KEYS_HINT: &str = "Set required flags or env vars: ALZA_QUICKBUY_ALZABOX_ID, \
     ALZA_QUICKBUY_DELIVERY_ID, ALZA_QUICKBUY_PAYMENT_ID, ALZA_QUICKBUY_CARD_ID, \
     ALZA_QUICKBUY_VISITOR_ID";

/// Arguments for the quickbuy command.
#[derive(Args)]
pub struct QuickbuyArgs {
    /// Product ID to order.
    pub product_id: u64,

    /// Quantity.
    #[arg(long, short = 'q', default_value = "1")]
    pub quantity: u32,

    /// Skip the countdown (the card is charged immediately).
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Simulate only; nothing is sent.
    #[arg(long)]
    pub dry_run: bool,

    /// Get a price quote only; no order is placed.
    #[arg(long)]
    pub quote: bool,

    /// Countdown seconds before ordering.
    #[arg(long, short = 't', default_value = "10")]
    pub timeout: u64,

    /// AlzaBox location ID.
    #[arg(long, env = "ALZA_QUICKBUY_ALZABOX_ID")]
    pub alzabox_id: Option<u64>,

    /// Delivery type ID.
    #[arg(long, env = "ALZA_QUICKBUY_DELIVERY_ID")]
    pub delivery_id: Option<u64>,

    /// Payment method ID.
    #[arg(long, env = "ALZA_QUICKBUY_PAYMENT_ID")]
    pub payment_id: Option<String>,

    /// Saved card ID.
    #[arg(long, env = "ALZA_QUICKBUY_CARD_ID")]
    pub card_id: Option<String>,

    /// Device fingerprint / visitor ID.
    #[arg(long, env = "ALZA_QUICKBUY_VISITOR_ID")]
    pub visitor_id: Option<String>,

    /// Use AlzaPlus+ pricing.
    #[arg(long, env = "ALZA_QUICKBUY_ALZAPLUS")]
    pub alza_plus: bool,

    /// Promo code(s), comma-separated or repeated.
    #[arg(long = "coupon", value_delimiter = ',', env = "ALZA_QUICKBUY_COUPON")]
    pub coupons: Vec<String>,

    /// Proceed without a coupon.
    #[arg(long)]
    pub no_coupon: bool,
}

impl QuickbuyArgs {
    /// The configuration given on the command line and in the environment.
    fn config(&self) -> QuickBuyConfig {
        QuickBuyConfig {
            alzabox_id: self.alzabox_id.unwrap_or_default(),
            delivery_id: self.delivery_id.unwrap_or_default(),
            payment_id: self.payment_id.clone().unwrap_or_default(),
            card_id: self.card_id.clone().unwrap_or_default(),
            is_alza_plus: self.alza_plus,
            visitor_id: self.visitor_id.clone().unwrap_or_default(),
            dry_run: self.dry_run,
            quote_only: self.quote,
            promo_codes: self.coupons.clone(),
        }
    }

    fn needs_countdown(&self) -> bool {
        !(self.yes || self.dry_run || self.quote)
    }
}

/// Merges defaults and enforces the coupon and required-field rules.
fn resolve_config(args: &QuickbuyArgs, defaults: &QuickBuyConfig) -> Result<QuickBuyConfig> {
    let config = args.config().with_defaults(defaults);

    if config.promo_codes.is_empty() && !args.no_coupon && !args.dry_run {
        return Err(anyhow!(
            "coupon is required\nUse --coupon <CODE> or --no-coupon to proceed without discount"
        ));
    }

    config
        .validate()
        .map_err(|e| anyhow!("{e}\n{REQUIRED_KEYS_HINT}"))?;
    Ok(config)
}

/// Runs the quickbuy command.
pub async fn run(args: &QuickbuyArgs, cli: &Cli) -> Result<()> {
    let defaults = load_quickbuy_defaults(&quickbuy_env_path()?)?;
    let config = &resolve_config(args, &defaults)?;
    debug!(mode = config.mode_label(), "Purchase configured");

    let shop = &Shop::connect()?;
    shop.run(|| async move { shop.open().await.map(|_| ()) })
        .await?;

    let text = cli.format == OutputFormat::Text && !cli.quiet;
    let formatter = TextFormatter::new(cli.use_colors());
    if text {
        println!("{}", formatter.format_purchase_plan(args.product_id, args.quantity, config));
        println!();
    }

    if args.needs_countdown() {
        println!("{}", formatter.warning("Your card will be charged. Press Enter to cancel."));
        if countdown::run(args.timeout).await? == Outcome::Cancelled {
            println!("{}", formatter.red("Cancelled by user"));
            return Ok(());
        }
    }

    info!(product_id = args.product_id, quantity = args.quantity, "Submitting purchase");
    let (product_id, quantity) = (args.product_id, args.quantity.max(1));
    let result = shop
        .run(|| async move {
            let session = shop.open().await?;
            shop.client.quick_buy(&session, product_id, quantity, config).await
        })
        .await
        .map_err(|e| anyhow::Error::new(e).context("quickbuy failed"))?;

    emit(cli, &result, |f, r| f.format_purchase(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Commands;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn parse(extra: &[&str]) -> QuickbuyArgs {
        let argv = ["alza", "quickbuy", "42"].iter().chain(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Quickbuy(args) => args,
            _ => panic!("expected quickbuy"),
        }
    }

    fn defaults() -> QuickBuyConfig {
        QuickBuyConfig {
            alzabox_id: 1,
            delivery_id: 2,
            payment_id: "3".into(),
            card_id: "card".into(),
            visitor_id: "visitor".into(),
            ..QuickBuyConfig::default()
        }
    }

    #[test]
    fn test_coupon_required_for_orders() {
        let err = resolve_config(&parse(&[]), &defaults()).unwrap_err();
        assert!(err.to_string().contains("coupon is required"));
    }

    #[test]
    fn test_no_coupon_and_dry_run_skip_coupon_rule() {
        assert!(resolve_config(&parse(&["--no-coupon"]), &defaults()).is_ok());

        let config = resolve_config(&parse(&["--dry-run"]), &QuickBuyConfig::default()).unwrap();
        assert!(config.dry_run);
    }

    #[test]
    fn test_flags_win_over_defaults() {
        let config =
            resolve_config(&parse(&["--alzabox-id", "99", "--coupon", "A, B,A"]), &defaults())
                .unwrap();
        assert_eq!(config.alzabox_id, 99);
        assert_eq!(config.delivery_id, 2);
        assert_eq!(config.promo_codes, vec!["A", "B"]);
    }

    #[test]
    fn test_missing_fields_listed() {
        let err = resolve_config(&parse(&["--quote", "--no-coupon"]), &QuickBuyConfig::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ALZA_QUICKBUY_ALZABOX_ID"));
        assert!(message.contains("Set required flags or env vars"));
    }

    #[test]
    fn test_countdown_skipped() {
        assert!(parse(&[]).needs_countdown());
        assert!(!parse(&["-y"]).needs_countdown());
        assert!(!parse(&["--dry-run"]).needs_countdown());
        assert!(!parse(&["--quote"]).needs_countdown());
    }
}
