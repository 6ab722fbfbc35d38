//! Fast-checkout ("quickbuy") types.
//!
//! A purchase run needs a pickup box, a delivery type, a payment method
//! and, for real orders, a saved card and a device fingerprint. Values
//! come from CLI flags layered over persisted defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CoreError;

// ============================================================================
// Config Keys
// ============================================================================

/// Env key for the pickup box ID.
pub const KEY_ALZABOX_ID: &str = "ALZA_QUICKBUY_ALZABOX_ID";
/// Env key for the delivery type ID.
pub const KEY_DELIVERY_ID: &str = "ALZA_QUICKBUY_DELIVERY_ID";
/// Env key for the payment method ID.
pub const KEY_PAYMENT_ID: &str = "ALZA_QUICKBUY_PAYMENT_ID";
/// Env key for the saved card ID.
pub const KEY_CARD_ID: &str = "ALZA_QUICKBUY_CARD_ID";
/// Env key for the device fingerprint.
pub const KEY_VISITOR_ID: &str = "ALZA_QUICKBUY_VISITOR_ID";
/// Env key for membership pricing.
pub const KEY_ALZAPLUS: &str = "ALZA_QUICKBUY_ALZAPLUS";
/// Env key for promo codes.
pub const KEY_COUPON: &str = "ALZA_QUICKBUY_COUPON";

/// Order ID reported by a dry run.
pub const DRY_RUN_ORDER_ID: &str = "DRY-RUN-000000";

/// Order ID reported by a quote-only run.
pub const QUOTE_ONLY_ORDER_ID: &str = "QUOTE-ONLY";

// ============================================================================
// QuickBuy Config
// ============================================================================

/// Purchase configuration.
///
/// Zero and empty values mean "unset"; [`QuickBuyConfig::with_defaults`]
/// fills them from stored defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickBuyConfig {
    /// Pickup box location ID.
    pub alzabox_id: u64,
    /// Delivery type ID.
    pub delivery_id: u64,
    /// Payment method ID.
    pub payment_id: String,
    /// Saved card ID.
    pub card_id: String,
    /// Whether membership pricing applies.
    pub is_alza_plus: bool,
    /// Device fingerprint / visitor ID.
    pub visitor_id: String,
    /// Simulate only; no endpoint is called.
    pub dry_run: bool,
    /// Compute the price but do not place an order.
    pub quote_only: bool,
    /// Promo codes applied at the quote step.
    pub promo_codes: Vec<String>,
}

impl QuickBuyConfig {
    /// Checks that every field the selected mode needs is set.
    ///
    /// Dry runs need nothing. Quotes need box, delivery and payment.
    /// Real orders also need card and visitor. All missing fields are
    /// reported in one error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] listing the missing env keys.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.dry_run {
            return Ok(());
        }

        let mut missing = Vec::new();
        if self.alzabox_id == 0 {
            missing.push(KEY_ALZABOX_ID);
        }
        if self.delivery_id == 0 {
            missing.push(KEY_DELIVERY_ID);
        }
        if self.payment_id.is_empty() {
            missing.push(KEY_PAYMENT_ID);
        }
        if !self.quote_only {
            if self.card_id.is_empty() {
                missing.push(KEY_CARD_ID);
            }
            if self.visitor_id.is_empty() {
                missing.push(KEY_VISITOR_ID);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation { missing })
        }
    }

    /// Fills unset fields from `defaults` and normalizes promo codes.
    ///
    /// Explicit values always win. Mode flags (`dry_run`, `quote_only`)
    /// are never inherited.
    #[must_use]
    pub fn with_defaults(mut self, defaults: &QuickBuyConfig) -> Self {
        if self.alzabox_id == 0 {
            self.alzabox_id = defaults.alzabox_id;
        }
        if self.delivery_id == 0 {
            self.delivery_id = defaults.delivery_id;
        }
        if self.payment_id.is_empty() {
            self.payment_id.clone_from(&defaults.payment_id);
        }
        if self.card_id.is_empty() {
            self.card_id.clone_from(&defaults.card_id);
        }
        if self.visitor_id.is_empty() {
            self.visitor_id.clone_from(&defaults.visitor_id);
        }
        if !self.is_alza_plus {
            self.is_alza_plus = defaults.is_alza_plus;
        }
        if self.promo_codes.is_empty() {
            self.promo_codes.clone_from(&defaults.promo_codes);
        }
        self.promo_codes = normalize_promo_codes(&self.promo_codes);
        self
    }

    /// Short label for the selected mode.
    pub fn mode_label(&self) -> &'static str {
        if self.dry_run {
            "dry-run"
        } else if self.quote_only {
            "quote"
        } else {
            "order"
        }
    }
}

/// Splits, trims and de-duplicates promo codes, keeping first-seen order.
///
/// Entries may be comma-joined (`"A, B"`) or repeated; both forms
/// normalize the same way. The function is idempotent.
pub fn normalize_promo_codes<S: AsRef<str>>(codes: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .filter(|code| seen.insert(code.to_string()))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Payment Status
// ============================================================================

/// Outcome of the payment step.
///
/// The order exists once the commit step succeeds, so a failing payment
/// call does not fail the purchase. This records what is actually known.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentStatus {
    /// The payment call succeeded.
    Confirmed,
    /// The payment call failed; the order must be checked in order history.
    Uncertain {
        /// Error reported by the payment call.
        reason: String,
    },
    /// No payment was attempted (dry run or quote).
    #[default]
    NotAttempted,
}

impl PaymentStatus {
    /// Returns true if payment needs manual verification.
    pub fn needs_verification(&self) -> bool {
        matches!(self, Self::Uncertain { .. })
    }
}

// ============================================================================
// QuickBuy Result
// ============================================================================

/// Terminal record of a purchase run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickBuyResult {
    /// Order number, or a sentinel for dry runs and quotes.
    pub order_id: String,
    /// Total price computed by the quote step.
    pub total_price: f64,
    /// Whether the run reached its terminal state.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Payment step outcome.
    pub payment: PaymentStatus,
}

impl QuickBuyResult {
    /// The synthetic result of a dry run.
    pub fn dry_run() -> Self {
        Self {
            order_id: DRY_RUN_ORDER_ID.to_string(),
            total_price: 0.0,
            success: true,
            message: "dry run, no order was placed".to_string(),
            payment: PaymentStatus::NotAttempted,
        }
    }

    /// The result of a quote-only run.
    pub fn quote(total_price: f64) -> Self {
        Self {
            order_id: QUOTE_ONLY_ORDER_ID.to_string(),
            total_price,
            success: true,
            message: "quote only, no order was placed".to_string(),
            payment: PaymentStatus::NotAttempted,
        }
    }

    /// The result of a committed order.
    pub fn placed(order_id: impl Into<String>, total_price: f64, payment: PaymentStatus) -> Self {
        let order_id = order_id.into();
        let message = match &payment {
            PaymentStatus::Uncertain { .. } => {
                format!("order #{order_id} created, payment unconfirmed")
            }
            _ => format!("order #{order_id} created"),
        };
        Self {
            order_id,
            total_price,
            success: true,
            message,
            payment,
        }
    }

    /// Returns true if no remote order was placed.
    pub fn is_simulated(&self) -> bool {
        self.order_id == DRY_RUN_ORDER_ID || self.order_id == QUOTE_ONLY_ORDER_ID
    }
}

// ============================================================================
// Tests
// ============================================================================
