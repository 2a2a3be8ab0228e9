//! The per-round action a seat submits.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A played card: `{ "id": <number>, ... }`.
///
/// Only `id` means anything to the server; it is the card's strength.
/// Every other field is kept as-is in `extra` so the reveal echoes the
/// card back exactly as the client sent it. `id` is held as a JSON
/// [`Number`] rather than a float so `5` round-trips as `5`, not `5.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Strength of the card. Higher wins.
    pub id: Number,

    /// Client-defined fields (name, image, suit, ...), carried opaquely.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    /// Creates a card with an integer strength and no extra fields.
    pub fn new(id: i64) -> Self {
        Self {
            id: Number::from(id),
            extra: Map::new(),
        }
    }

    /// Adds a client-defined field.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_owned(), value.into());
        self
    }

    /// Compares the strength of two cards.
    ///
    /// Integers compare exactly. Anything else (a float on either side,
    /// or integers of incompatible signedness) compares as `f64`. Equal
    /// strengths are `Ordering::Equal`; there is no epsilon.
    pub fn cmp_strength(&self, other: &Card) -> Ordering {
        if let (Some(a), Some(b)) = (self.id.as_i64(), other.id.as_i64()) {
            return a.cmp(&b);
        }
        if let (Some(a), Some(b)) = (self.id.as_u64(), other.id.as_u64()) {
            return a.cmp(&b);
        }
        let a = self.id.as_f64().unwrap_or_default();
        let b = other.id.as_f64().unwrap_or_default();
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(json: &str) -> Card {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extra_fields_are_preserved() {
        let c = card(r#"{"id":7,"name":"Striker","img":"s.png"}"#);
        assert_eq!(c.id, Number::from(7));
        assert_eq!(c.extra["name"], "Striker");

        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(
            back,
            serde_json::json!({"id": 7, "name": "Striker", "img": "s.png"})
        );
    }

    #[test]
    fn test_integer_id_does_not_become_float() {
        let json = serde_json::to_string(&Card::new(5)).unwrap();
        assert_eq!(json, r#"{"id":5}"#);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"name":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"id":"5"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cmp_strength_integers() {
        assert_eq!(Card::new(5).cmp_strength(&Card::new(3)), Ordering::Greater);
        assert_eq!(Card::new(-2).cmp_strength(&Card::new(1)), Ordering::Less);
        assert_eq!(Card::new(4).cmp_strength(&Card::new(4)), Ordering::Equal);
    }

    #[test]
    fn test_cmp_strength_mixed_int_and_float() {
        assert_eq!(card(r#"{"id":4.5}"#).cmp_strength(&Card::new(4)), Ordering::Greater);
        assert_eq!(card(r#"{"id":4.0}"#).cmp_strength(&Card::new(4)), Ordering::Equal);
    }

    #[test]
    fn test_cmp_strength_large_unsigned() {
        let big = card(r#"{"id":18446744073709551615}"#);
        assert_eq!(big.cmp_strength(&Card::new(1)), Ordering::Greater);
        assert_eq!(Card::new(-1).cmp_strength(&big), Ordering::Less);
    }

    #[test]
    fn test_extra_fields_do_not_affect_strength() {
        let a = Card::new(3).with_field("name", "a");
        let b = Card::new(3).with_field("name", "b");
        assert_eq!(a.cmp_strength(&b), Ordering::Equal);
        assert_ne!(a, b);
    }
}
