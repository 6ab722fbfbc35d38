//! Ordered field probing over loosely-typed JSON documents.
//!
//! Several endpoints return "the same" value under different names
//! depending on response version (`TotalPrice` vs `Data.TotalPriceDec`,
//! `accessToken` vs `AccessToken`). A [`FieldProbe`] lists the candidate
//! locations in order and the first one that yields a usable value wins.
//!
//! ```
//! use alza_core::FieldProbe;
//! use serde_json::json;
//!
//! let doc = json!({"d": {"TotalPrice": 0, "Data": {"TotalPriceDec": 19.9}}});
//! let total = FieldProbe::new()
//!     .or(&["d", "TotalPrice"])
//!     .or(&["d", "Data", "TotalPriceDec"])
//!     .f64(&doc);
//! assert_eq!(total, Some(19.9));
//! ```

use serde_json::Value;

/// A path of object keys from the document root.
pub type Lookup = &'static [&'static str];

/// An ordered list of candidate field locations.
#[derive(Debug, Clone, Default)]
pub struct FieldProbe {
    lookups: Vec<Lookup>,
}

impl FieldProbe {
    /// Creates an empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate location.
    #[must_use]
    pub fn or(mut self, lookup: Lookup) -> Self {
        self.lookups.push(lookup);
        self
    }

    /// Returns the first location holding any non-null value.
    pub fn value<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.lookups
            .iter()
            .filter_map(|path| resolve(doc, path))
            .find(|v| !v.is_null())
    }

    /// Returns the first non-zero number.
    ///
    /// Numeric strings count, since some endpoints quote their numbers.
    pub fn f64(&self, doc: &Value) -> Option<f64> {
        self.lookups
            .iter()
            .filter_map(|path| resolve(doc, path))
            .filter_map(as_f64)
            .find(|n| *n != 0.0)
    }

    /// Returns the first non-empty string.
    ///
    /// Numbers are rendered as strings, so an integer order ID and a
    /// string order ID probe the same way.
    pub fn string(&self, doc: &Value) -> Option<String> {
        self.lookups
            .iter()
            .filter_map(|path| resolve(doc, path))
            .filter_map(as_string)
            .find(|s| !s.is_empty())
    }

    /// Returns the first boolean present.
    pub fn bool(&self, doc: &Value) -> Option<bool> {
        self.lookups
            .iter()
            .filter_map(|path| resolve(doc, path))
            .find_map(Value::as_bool)
    }
}

fn resolve<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, key| node.get(key))
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_location_wins() {
        let doc = json!({"accessToken": "abc", "AccessToken": "def"});
        let probe = FieldProbe::new().or(&["accessToken"]).or(&["AccessToken"]);
        assert_eq!(probe.string(&doc).as_deref(), Some("abc"));
    }

    #[test]
    fn test_falls_through_on_zero() {
        let doc = json!({"d": {"TotalPrice": 0, "Data": {"TotalPriceDec": 42.5}}});
        let probe = FieldProbe::new()
            .or(&["d", "TotalPrice"])
            .or(&["d", "Data", "TotalPriceDec"]);
        assert_eq!(probe.f64(&doc), Some(42.5));
    }

    #[test]
    fn test_falls_through_on_empty_string() {
        let doc = json!({"d": {"Code": "", "OrderId": 987_654}});
        let probe = FieldProbe::new().or(&["d", "Code"]).or(&["d", "OrderId"]);
        assert_eq!(probe.string(&doc).as_deref(), Some("987654"));
    }

    #[test]
    fn test_missing_everywhere() {
        let doc = json!({"d": null});
        let probe = FieldProbe::new().or(&["d", "Code"]);
        assert_eq!(probe.string(&doc), None);
        assert_eq!(probe.f64(&doc), None);
        assert_eq!(probe.value(&doc), None);
    }

    #[test]
    fn test_bool_false_is_found() {
        let doc = json!({"LogOut": false, "logOut": true});
        let probe = FieldProbe::new().or(&["logOut"]).or(&["LogOut"]);
        assert_eq!(probe.bool(&doc), Some(true));

        let doc = json!({"LogOut": false});
        assert_eq!(probe.bool(&doc), Some(false));
    }

    #[test]
    fn test_numeric_string() {
        let doc = json!({"price": " 12.5 "});
        assert_eq!(FieldProbe::new().or(&["price"]).f64(&doc), Some(12.5));
    }

    #[test]
    fn test_value_skips_null() {
        let doc = json!({"Type": null, "type": {"x": 1}});
        let probe = FieldProbe::new().or(&["Type"]).or(&["type"]);
        assert_eq!(probe.value(&doc), Some(&json!({"x": 1})));
    }
}
