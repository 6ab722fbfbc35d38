//! Integration tests for the core models and extraction rules.

use alza_core::extract::{basket_id_from_href, parse_price, product_id_from_url};
use alza_core::{CartView, QuickBuyConfig, normalize_promo_codes};

#[test]
fn test_product_id_for_generated_urls() {
    for id in [1_u64, 42, 12345, 9_876_543_210] {
        let dash = format!("https://www.alza.sk/produkt-d{id}.htm");
        let slash = format!("/kategoria/d{id}.htm");
        assert_eq!(product_id_from_url(&dash), id);
        assert_eq!(product_id_from_url(&slash), id);
    }
    assert_eq!(product_id_from_url("https://www.alza.sk/"), 0);
}

#[test]
fn test_price_separators_agree() {
    for (comma, period) in [("1,5", "1.5"), ("1 299,90 €", "1299.90"), ("0,99€", "0.99")] {
        assert!((parse_price(comma) - parse_price(period)).abs() < f64::EPSILON);
    }
}

#[test]
fn test_basket_link_extraction() {
    assert_eq!(
        basket_id_from_href("https://www.alza.sk/api/basket/1538710316/preview").as_deref(),
        Some("1538710316")
    );
}

#[test]
fn test_promo_normalization_is_idempotent() {
    let inputs = vec![
        vec!["A,B,C".to_string()],
        vec!["  x ".to_string(), "x".to_string(), "y,,z".to_string()],
        Vec::new(),
    ];
    for input in inputs {
        let once = normalize_promo_codes(&input);
        assert_eq!(normalize_promo_codes(&once), once);
    }
}

#[test]
fn test_config_roundtrip_through_defaults() {
    let defaults = QuickBuyConfig {
        alzabox_id: 10,
        delivery_id: 20,
        payment_id: "30".into(),
        card_id: "c".into(),
        visitor_id: "v".into(),
        ..QuickBuyConfig::default()
    };
    let config = QuickBuyConfig::default().with_defaults(&defaults);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_cart_view() {
    let view = CartView::default();
    assert!(view.is_empty());
    assert!(!view.is_degraded());
}
