//! Purchase defaults from `quickbuy.env`.
//!
//! `KEY=VALUE` lines with `#` comments. Unknown keys are ignored, and a
//! missing file yields empty defaults.

use alza_core::models::quickbuy::{
    KEY_ALZABOX_ID, KEY_ALZAPLUS, KEY_CARD_ID, KEY_COUPON, KEY_DELIVERY_ID, KEY_PAYMENT_ID,
    KEY_VISITOR_ID,
};
use alza_core::{QuickBuyConfig, normalize_promo_codes};
use std::path::Path;
use tracing::{debug, instrument};

use crate::error::StoreError;

/// Loads purchase defaults from `path`.
///
/// # Errors
///
/// [`StoreError::EnvFile`] for unparseable lines and
/// [`StoreError::InvalidValue`] for non-numeric IDs.
#[instrument(fields(path = %path.display()))]
pub fn load_quickbuy_defaults(path: &Path) -> Result<QuickBuyConfig, StoreError> {
    if !path.is_file() {
        debug!("No quickbuy defaults file");
        return Ok(QuickBuyConfig::default());
    }

    let env_error = |source| StoreError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let mut config = QuickBuyConfig::default();
    for item in dotenvy::from_path_iter(path).map_err(env_error)? {
        let (key, value) = item.map_err(env_error)?;
        let value = value.trim();
        match key.as_str() {
            KEY_ALZABOX_ID => config.alzabox_id = parse_id(&key, value, path)?,
            KEY_DELIVERY_ID => config.delivery_id = parse_id(&key, value, path)?,
            KEY_PAYMENT_ID => config.payment_id = value.to_string(),
            KEY_CARD_ID => config.card_id = value.to_string(),
            KEY_VISITOR_ID => config.visitor_id = value.to_string(),
            KEY_ALZAPLUS => config.is_alza_plus = parse_env_bool(value),
            KEY_COUPON => config.promo_codes = normalize_promo_codes(&[value]),
            _ => {}
        }
    }

    debug!(
        has_box = config.alzabox_id != 0,
        has_card = !config.card_id.is_empty(),
        promo_codes = config.promo_codes.len(),
        "Loaded quickbuy defaults"
    );
    Ok(config)
}

/// Truthy env values: `1`, `true`, `yes`, `y`, `on` (any case).
pub fn parse_env_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn parse_id(key: &str, value: &str, path: &Path) -> Result<u64, StoreError> {
    value.parse().map_err(|_| StoreError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_env(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quickbuy.env");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_quickbuy_defaults(&dir.path().join("quickbuy.env")).unwrap();
        assert_eq!(config, QuickBuyConfig::default());
    }

    #[test]
    fn test_parses_all_keys() {
        let (_dir, path) = write_env(
            "# pickup defaults\n\
             ALZA_QUICKBUY_ALZABOX_ID=1234\n\
             ALZA_QUICKBUY_DELIVERY_ID=5678\n\
             ALZA_QUICKBUY_PAYMENT_ID=216\n\
             ALZA_QUICKBUY_CARD_ID=card-1\n\
             ALZA_QUICKBUY_VISITOR_ID=visitor-1\n\
             ALZA_QUICKBUY_ALZAPLUS=yes\n\
             ALZA_QUICKBUY_COUPON=\"SAVE10, SAVE10 ,EXTRA\"\n\
             UNRELATED=1\n",
        );

        let config = load_quickbuy_defaults(&path).unwrap();
        assert_eq!(
            config,
            QuickBuyConfig {
                alzabox_id: 1234,
                delivery_id: 5678,
                payment_id: "216".into(),
                card_id: "card-1".into(),
                visitor_id: "visitor-1".into(),
                is_alza_plus: true,
                promo_codes: vec!["SAVE10".into(), "EXTRA".into()],
                ..QuickBuyConfig::default()
            }
        );
    }

    #[test]
    fn test_invalid_id() {
        let (_dir, path) = write_env("ALZA_QUICKBUY_ALZABOX_ID=abc\n");
        let err = load_quickbuy_defaults(&path).unwrap_err();
        match err {
            StoreError::InvalidValue { key, value, .. } => {
                assert_eq!(key, KEY_ALZABOX_ID);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_flags_override_file_defaults() {
        let (_dir, path) = write_env(
            "ALZA_QUICKBUY_ALZABOX_ID=1\nALZA_QUICKBUY_DELIVERY_ID=2\nALZA_QUICKBUY_PAYMENT_ID=3\n",
        );
        let defaults = load_quickbuy_defaults(&path).unwrap();

        let flags = QuickBuyConfig {
            alzabox_id: 99,
            quote_only: true,
            ..QuickBuyConfig::default()
        };
        let merged = flags.with_defaults(&defaults);
        assert_eq!(merged.alzabox_id, 99);
        assert_eq!(merged.delivery_id, 2);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_parse_env_bool() {
        for truthy in ["1", "true", "YES", "y", "On"] {
            assert!(parse_env_bool(truthy), "{truthy}");
        }
        for falsy in ["0", "false", "no", "", "maybe"] {
            assert!(!parse_env_bool(falsy), "{falsy}");
        }
    }
}
