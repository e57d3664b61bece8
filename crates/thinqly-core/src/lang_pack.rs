// Language packs
//
// The vendor publishes per-model and per-product packs mapping
// vocabulary labels to display strings. Lookup only -- the packs feed
// UI output, never protocol behavior.

use serde_json::{Map, Value};

/// A display-string pack fetched from a pack URL.
#[derive(Debug, Clone)]
pub struct LangPack {
    data: Value,
}

impl LangPack {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    fn packs(&self) -> Option<&Map<String, Value>> {
        self.data.get("pack").and_then(Value::as_object)
    }

    /// Display string for a vocabulary label.
    pub fn enum_name(&self, label: &str) -> Option<String> {
        self.packs()?
            .get(label)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    /// Vocabulary label for a display string (the inverse lookup).
    pub fn enum_value(&self, name: &str) -> Option<String> {
        self.packs()?
            .iter()
            .find(|(_, v)| v.as_str() == Some(name))
            .map(|(label, _)| label.clone())
    }
}
