//! Helpers for form-encoded recipe input

use serde::de::DeserializeOwned;
use tracing::warn;

/// Decode a JSON array carried in a form field.
///
/// Missing, blank or malformed input gives an empty list.
pub fn parse_json_list<T: DeserializeOwned>(raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed JSON list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_share_core::Ingredient;

    #[test]
    fn test_parses_ingredients() {
        let items: Vec<Ingredient> =
            parse_json_list(Some(r#"[{"name":"jaja","quantity":"3","unit":"kom"}]"#));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display(), "3 kom jaja");
    }

    #[test]
    fn test_bad_input_is_empty() {
        assert!(parse_json_list::<String>(None).is_empty());
        assert!(parse_json_list::<String>(Some("  ")).is_empty());
        assert!(parse_json_list::<String>(Some("[1, 2")).is_empty());
        assert!(parse_json_list::<String>(Some(r#"{"a":1}"#)).is_empty());
    }
}
