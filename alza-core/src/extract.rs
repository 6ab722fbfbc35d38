//! Extraction rules shared by several endpoints.
//!
//! The API rarely hands out the identifiers we need directly. Product IDs
//! live inside display URLs, basket IDs inside navigation links, and prices
//! arrive either as numbers or as locale-formatted strings.

use chrono::DateTime;
use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// Patterns
// ============================================================================

/// Pattern for "-d12345.htm" or "/d12345.htm" product links.
static PRODUCT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:-d|/d)(\d+)\.htm").expect("Invalid regex")
});

/// Path segment that precedes the basket ID in preview links.
const BASKET_MARKER: &str = "basket";

/// Default length for error body snippets.
pub const SNIPPET_LIMIT: usize = 500;

// ============================================================================
// Product IDs
// ============================================================================

/// Recovers a product ID from a product URL.
///
/// Returns `0` when the URL carries no product marker. Zero is the
/// "unknown" sentinel and callers treat it as such, not as an error.
pub fn product_id_from_url(url: &str) -> u64 {
    PRODUCT_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

// ============================================================================
// Prices
// ============================================================================

/// Parses a locale-formatted price string such as `"1 299,90 €"`.
///
/// Everything except digits, commas and periods is dropped and the comma
/// becomes the decimal separator. Unparseable input yields `0.0`.
///
/// Only spaces work as thousands separators. `"1.299,90"` has two
/// separators after cleaning and parses as `0.0`.
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    cleaned.parse().unwrap_or(0.0)
}

// ============================================================================
// Basket Links
// ============================================================================

/// Extracts the basket ID from a basket preview link.
///
/// The ID is the path segment right after the `basket` segment, e.g.
/// `https://www.alza.sk/api/basket/1538710316/preview` yields
/// `1538710316`. Returns `None` when the marker segment is missing or has
/// nothing after it.
pub fn basket_id_from_href(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let mut segments = path.split('/');

    segments.find(|segment| *segment == BASKET_MARKER)?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Text Helpers
// ============================================================================

/// Trims a response body and caps it at `limit` characters.
///
/// Longer bodies get a `...` suffix. Used for error messages so that a
/// failing endpoint is diagnosable without dumping whole pages.
pub fn snippet(body: &str, limit: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

/// Renders an RFC 3339 timestamp as `YYYY-MM-DD`.
///
/// Values that do not parse are returned unchanged.
pub fn format_order_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Strips a leading protocol-relative `//` by prefixing `https:`.
pub fn normalize_external_url(value: &str) -> String {
    let value = value.trim();
    if value.starts_with("//") {
        format!("https:{value}")
    } else {
        value.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_dash_marker() {
        assert_eq!(
            product_id_from_url("https://www.alza.sk/iphone-15-d12345.htm"),
            12345
        );
    }

    #[test]
    fn test_product_id_slash_marker_case_insensitive() {
        assert_eq!(product_id_from_url("/kategoria/D7654321.HTM"), 7_654_321);
    }

    #[test]
    fn test_product_id_first_match_wins() {
        assert_eq!(product_id_from_url("/a-d11.htm?ref=/b-d22.htm"), 11);
    }

    #[test]
    fn test_product_id_missing_marker() {
        assert_eq!(product_id_from_url("https://www.alza.sk/iphone"), 0);
        assert_eq!(product_id_from_url(""), 0);
        assert_eq!(product_id_from_url("/d123.html5"), 123);
        assert_eq!(product_id_from_url("/xd123.htm"), 0);
    }

    #[test]
    fn test_parse_price_formats() {
        let cases = [
            ("1 299,90 €", 1299.90),
            ("1299.90", 1299.90),
            ("€ 1299,90", 1299.90),
            ("  49,00 EUR", 49.0),
            ("12", 12.0),
        ];
        for (input, expected) in cases {
            let parsed = parse_price(input);
            assert!(
                (parsed - expected).abs() < f64::EPSILON * 1024.0,
                "{input:?} parsed as {parsed}"
            );
        }
    }

    #[test]
    fn test_parse_price_comma_and_period_agree() {
        assert!((parse_price("19,99 €") - parse_price("19.99")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_price_garbage() {
        assert!(parse_price("").abs() < f64::EPSILON);
        assert!(parse_price("zadarmo").abs() < f64::EPSILON);
        assert!(parse_price("1.299,90").abs() < f64::EPSILON);
    }

    #[test]
    fn test_basket_id_from_href() {
        assert_eq!(
            basket_id_from_href("https://host/api/basket/1538710316/preview").as_deref(),
            Some("1538710316")
        );
        assert_eq!(
            basket_id_from_href("/api/basket/42?country=SK").as_deref(),
            Some("42")
        );
    }

    #[test]
    fn test_basket_id_missing_marker() {
        assert_eq!(basket_id_from_href("https://host/api/cart/1/preview"), None);
        assert_eq!(basket_id_from_href("https://host/api/basket"), None);
        assert_eq!(basket_id_from_href("https://host/api/basket/"), None);
    }

    #[test]
    fn test_snippet_short_body_trimmed() {
        assert_eq!(snippet("  hello \n", 10), "hello");
    }

    #[test]
    fn test_snippet_long_body_truncated() {
        let body = "x".repeat(600);
        let cut = snippet(&body, SNIPPET_LIMIT);
        assert_eq!(cut.len(), SNIPPET_LIMIT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_snippet_multibyte() {
        assert_eq!(snippet("čšžťď", 3), "čšž...");
    }

    #[test]
    fn test_format_order_date() {
        assert_eq!(format_order_date("2024-03-05T10:20:30+01:00"), "2024-03-05");
        assert_eq!(format_order_date("5.3.2024"), "5.3.2024");
        assert_eq!(format_order_date(""), "");
    }

    #[test]
    fn test_normalize_external_url() {
        assert_eq!(
            normalize_external_url("//cdn.alza.sk/desc.htm"),
            "https://cdn.alza.sk/desc.htm"
        );
        assert_eq!(
            normalize_external_url(" https://x.sk/a "),
            "https://x.sk/a"
        );
    }
}
