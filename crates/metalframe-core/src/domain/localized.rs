use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Lang;

/// A text field that is either a single string or a per-language mapping.
///
/// Both shapes appear in stored data: older records carry plain strings,
/// records written by the admin form carry `{"en": .., "uk": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Build a mapping with both site languages.
    pub fn translations(en: impl Into<String>, uk: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(Lang::En.code().to_string(), en.into());
        map.insert(Lang::Uk.code().to_string(), uk.into());
        Self::Localized(map)
    }

    /// Resolve the text for `lang`: exact match, then `en`, then `uk`, then `""`.
    ///
    /// Empty translations count as missing. Plain strings are returned as-is.
    pub fn resolve(&self, lang: Lang) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Localized(map) => [lang, Lang::En, Lang::Uk]
                .into_iter()
                .filter_map(|l| map.get(l.code()))
                .map(String::as_str)
                .find(|text| !text.is_empty())
                .unwrap_or(""),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Plain(text) => text.trim().is_empty(),
            Self::Localized(map) => map.values().all(|v| v.trim().is_empty()),
        }
    }

    /// Short label used in logs.
    pub fn display_title(&self) -> &str {
        match self.resolve(Lang::En) {
            "" => "Untitled",
            text => text,
        }
    }

    /// Parse a multipart form value: a JSON object becomes a mapping,
    /// anything else is kept as a plain string.
    pub fn from_form_value(raw: &str) -> Self {
        if raw.trim_start().starts_with('{') {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(raw) {
                return Self::from_json_value(value);
            }
        }
        Self::Plain(raw.to_string())
    }

    /// Lenient conversion from stored JSON (JSONB columns, cache slots).
    pub fn from_json_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Plain(text),
            Value::Object(entries) => Self::Localized(
                entries
                    .into_iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(text) => Some((k, text)),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Null => Self::Plain(String::new()),
            other => Self::Plain(other.to_string()),
        }
    }

    pub fn to_json_value(&self) -> Value {
        match self {
            Self::Plain(text) => Value::String(text.clone()),
            Self::Localized(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        }
    }
}

impl Default for LocalizedText {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for LocalizedText {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_json_value)
    }
}
