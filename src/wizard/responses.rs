//! Response store: the last submitted value per field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::fields::{FieldKey, FieldValue};

/// Committed answers for one session. A key is present only once the step
/// that asks for it has been submitted; readers supply their own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseStore {
    values: HashMap<FieldKey, FieldValue>,
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    /// Text content of a field, if it holds text.
    pub fn text(&self, key: FieldKey) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// Text content of a field, skipping blank answers.
    pub fn non_empty_text(&self, key: FieldKey) -> Option<&str> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    /// Store a value, returning the one it replaced.
    pub fn insert(&mut self, key: FieldKey, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(key, value)
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<FieldValue> {
        self.values.remove(&key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(FieldKey, FieldValue)> for ResponseStore {
    fn from_iter<I: IntoIterator<Item = (FieldKey, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<(FieldKey, FieldValue)> for ResponseStore {
    fn extend<I: IntoIterator<Item = (FieldKey, FieldValue)>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}
