//! Line identity resolution.
//!
//! Two additions land on the same cart line exactly when they name the same
//! product with the same customization. The customization is folded into the
//! identity through a canonical serialization: object keys are sorted at every
//! nesting level, so the order options were chosen in never splits a line.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{ItemIdentity, ProductId};

/// Separator between the product id and the serialized customization.
const IDENTITY_SEPARATOR: char = '#';
const IDENTITY_ESCAPE: char = '\\';

/// Shopper-chosen options for a line: color, size, engraving text,
/// instructions, uploaded image references.
///
/// An empty customization is the same as none at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customization(BTreeMap<String, Value>);

impl Customization {
    /// An empty customization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, option: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(option, value);
        self
    }

    /// Set an option, returning the previous value.
    pub fn insert(&mut self, option: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(option.into(), value.into())
    }

    /// Look up an option.
    pub fn get(&self, option: &str) -> Option<&Value> {
        self.0.get(option)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Options in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Deterministic text form: sorted keys at every level, no whitespace.
    pub fn canonical(&self) -> String {
        let object: serde_json::Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), canonical_value(v)))
            .collect();
        Value::Object(object).to_string()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Customization {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Rebuild nested objects with keys inserted in sorted order.
///
/// `serde_json::Map` keeps insertion order when the `preserve_order` feature
/// is enabled anywhere in the build, so sorting cannot be left to it.
fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonical_value(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}

/// Derive the identity of the line holding `product_id` at `customization`.
///
/// Product ids containing `#` or `\` are escaped so the product part never
/// contains a bare separator. Ordinary ids are used as-is.
///
/// ```
/// use turbo_cart::cart::{identity, Customization};
/// use turbo_cart::ProductId;
///
/// let p1 = ProductId::new("p1");
/// assert_eq!(identity(&p1, None).as_str(), "p1");
///
/// let a = Customization::new().with("color", "red").with("size", "M");
/// let b = Customization::new().with("size", "M").with("color", "red");
/// assert_eq!(identity(&p1, Some(&a)), identity(&p1, Some(&b)));
/// ```
pub fn identity(product_id: &ProductId, customization: Option<&Customization>) -> ItemIdentity {
    let product = escape_product_id(product_id.as_str());
    match customization {
        Some(custom) if !custom.is_empty() => ItemIdentity::new(format!(
            "{}{}{}",
            product,
            IDENTITY_SEPARATOR,
            custom.canonical()
        )),
        _ => ItemIdentity::new(product),
    }
}

fn escape_product_id(id: &str) -> Cow<'_, str> {
    if !id.contains([IDENTITY_SEPARATOR, IDENTITY_ESCAPE]) {
        return Cow::Borrowed(id);
    }
    let mut escaped = String::with_capacity(id.len() + 4);
    for c in id.chars() {
        if c == IDENTITY_SEPARATOR || c == IDENTITY_ESCAPE {
            escaped.push(IDENTITY_ESCAPE);
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_empty_customization_match_product_id() {
        let p = ProductId::new("p1");
        assert_eq!(identity(&p, None).as_str(), "p1");
        assert_eq!(identity(&p, Some(&Customization::new())).as_str(), "p1");
    }

    #[test]
    fn test_customization_is_folded_in() {
        let p = ProductId::new("p1");
        let red = Customization::new().with("color", "red");
        assert_eq!(identity(&p, Some(&red)).as_str(), r#"p1#{"color":"red"}"#);
    }

    #[test]
    fn test_distinct_values_give_distinct_identities() {
        let p = ProductId::new("p1");
        let red = Customization::new().with("color", "red");
        let blue = Customization::new().with("color", "blue");
        assert_ne!(identity(&p, Some(&red)), identity(&p, Some(&blue)));
    }

    #[test]
    fn test_separator_in_product_id_cannot_collide() {
        let poster = ProductId::new(r#"p1#{"color":"red"}"#);
        let mug = ProductId::new("p1");
        let red = Customization::new().with("color", "red");

        assert_ne!(identity(&poster, None), identity(&mug, Some(&red)));
        assert_eq!(identity(&poster, None).as_str(), r#"p1\#{"color":"red"}"#);
        assert_eq!(identity(&mug, Some(&red)).as_str(), r#"p1#{"color":"red"}"#);
    }

    #[test]
    fn test_escape_characters_in_product_id_cannot_collide() {
        let red = Customization::new().with("color", "red");
        let a = identity(&ProductId::new("a\\"), Some(&red));
        let b = identity(&ProductId::new("a\\#"), None);
        let c = identity(&ProductId::new("a\\\\"), Some(&red));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(identity(&ProductId::new("a\\"), None).as_str(), "a\\\\");
    }

    #[test]
    fn test_nested_objects_are_canonical() {
        let p = ProductId::new("tee");
        let a: Customization = serde_json::from_value(json!({
            "print": {"text": "hi", "font": "serif"},
            "size": "L"
        }))
        .unwrap();
        let b: Customization = serde_json::from_value(json!({
            "size": "L",
            "print": {"font": "serif", "text": "hi"}
        }))
        .unwrap();
        assert_eq!(identity(&p, Some(&a)), identity(&p, Some(&b)));
        assert_eq!(
            a.canonical(),
            r#"{"print":{"font":"serif","text":"hi"},"size":"L"}"#
        );
    }

    #[test]
    fn test_from_iterator() {
        let c: Customization = [("size", "M"), ("color", "red")].into_iter().collect();
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("size"), Some(&json!("M")));
        let keys: Vec<&str> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["color", "size"]);
    }

    proptest! {
        #[test]
        fn identity_ignores_insertion_order(
            options in proptest::collection::btree_map("[a-z]{1,6}", "[a-zA-Z0-9 ]{0,8}", 0..6)
        ) {
            let p = ProductId::new("p");
            let forward: Customization = options.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let reversed: Customization = options.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect();
            prop_assert_eq!(identity(&p, Some(&forward)), identity(&p, Some(&reversed)));
        }
    }
}
