use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Namespaces Trakt accepts on a show (anime included)
pub const SHOW_ID_NAMESPACES: [&str; 4] = ["mal", "imdb", "tmdb", "anidb"];

/// Namespaces Trakt accepts on a movie
pub const MOVIE_ID_NAMESPACES: [&str; 3] = ["slug", "imdb", "tmdb"];

/// External identifiers keyed by namespace (`imdb`, `tmdb`, `mal`, ...)
///
/// Values are kept as raw JSON so they round-trip exactly as the source sent
/// them: Simkl mixes numeric and string ids, and sends `null` for ids it
/// knows about but has no value for. A namespace mapped to `null` is different
/// from a namespace that is missing, and both are preserved.
///
/// Backed by a `BTreeMap` so serialization order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierSet(BTreeMap<String, Value>);

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for a namespace. `Some(Value::Null)` means "present but null".
    pub fn get(&self, namespace: &str) -> Option<&Value> {
        self.0.get(namespace)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.0.contains_key(namespace)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy only the given namespaces.
    ///
    /// Namespaces missing from `self` are left out of the result rather than
    /// filled with a default.
    pub fn project(&self, namespaces: &[&str]) -> IdentifierSet {
        let projected = namespaces
            .iter()
            .filter_map(|ns| self.0.get(*ns).map(|value| (ns.to_string(), value.clone())))
            .collect();
        IdentifierSet(projected)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        IdentifierSet(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn simkl_show_ids() -> IdentifierSet {
        serde_json::from_value(json!({
            "simkl": 37090,
            "slug": "one-piece",
            "mal": "21",
            "imdb": null,
            "tmdb": 37854,
            "anidb": "69"
        }))
        .unwrap()
    }

    #[test]
    fn test_project_keeps_only_requested_namespaces() {
        let ids = simkl_show_ids();
        let projected = ids.project(&SHOW_ID_NAMESPACES);

        assert_eq!(projected.len(), 4);
        assert!(!projected.contains("slug"));
        assert!(!projected.contains("simkl"));
        assert_eq!(projected.get("mal"), Some(&json!("21")));
        assert_eq!(projected.get("tmdb"), Some(&json!(37854)));
    }

    #[test]
    fn test_project_preserves_explicit_null() {
        let projected = simkl_show_ids().project(&SHOW_ID_NAMESPACES);
        assert_eq!(projected.get("imdb"), Some(&Value::Null));
    }

    #[test]
    fn test_project_omits_missing_namespaces() {
        let ids: IdentifierSet = [("imdb", json!("tt0111161"))].into_iter().collect();
        let projected = ids.project(&MOVIE_ID_NAMESPACES);

        assert_eq!(projected.len(), 1);
        assert!(!projected.contains("slug"));
        assert!(!projected.contains("tmdb"));
    }

    #[test]
    fn test_serializes_in_stable_order() {
        let ids = simkl_show_ids().project(&SHOW_ID_NAMESPACES);
        let json = serde_json::to_string(&ids).unwrap();
        assert_eq!(json, r#"{"anidb":"69","imdb":null,"mal":"21","tmdb":37854}"#);
    }
}
