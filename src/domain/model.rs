use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One input row: the header names paired with the row's raw cell values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecord {
    /// 1-based position among the data rows (the header is not counted).
    pub position: u64,
    fields: Vec<(String, String)>,
}

impl SourceRecord {
    pub fn new(position: u64, fields: Vec<(String, String)>) -> Self {
        Self { position, fields }
    }

    pub fn from_pairs<K, V, I>(position: u64, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            position,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Looks up a column by header name. With duplicated headers the last one wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Identifier used in diagnostics: the `item number` cell, or the row position.
    pub fn identifier(&self) -> String {
        match self.get(ITEM_NUMBER_FIELD) {
            Some(item) if !item.trim().is_empty() => item.to_string(),
            _ => format!("row {}", self.position),
        }
    }
}

#[cfg(test)]
impl SourceRecord {
    pub(crate) fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.fields.iter().rposition(|(key, _)| key == name)?;
        Some(self.fields.remove(index).1)
    }
}

pub const ITEM_NUMBER_FIELD: &str = "item number";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationValue {
    Null,
    Text(String),
    Bool(bool),
    Integer(u64),
}

impl DestinationValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Cell text for the output file.
    pub fn render(&self, tokens: &BooleanTokens) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(value) => value.clone(),
            Self::Bool(value) => tokens.token(*value).to_string(),
            Self::Integer(value) => value.to_string(),
        }
    }
}

impl From<&str> for DestinationValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DestinationValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for DestinationValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for DestinationValue {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<DestinationValue>> From<Option<T>> for DestinationValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Literal cell values written for boolean fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanTokens {
    pub true_token: String,
    pub false_token: String,
}

impl BooleanTokens {
    pub fn token(&self, value: bool) -> &str {
        if value {
            &self.true_token
        } else {
            &self.false_token
        }
    }
}

impl Default for BooleanTokens {
    fn default() -> Self {
        Self {
            true_token: "True".to_string(),
            false_token: "False".to_string(),
        }
    }
}

/// Ordered output column names, taken from the template header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationSchema {
    fields: Vec<String>,
}

impl DestinationSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field == name)
    }

    /// Compares the template against the fields the transformer knows how to fill.
    pub fn coverage(&self, known_fields: &[&str]) -> SchemaCoverage {
        let known: HashSet<&str> = known_fields.iter().copied().collect();

        let mut unmapped: Vec<String> = Vec::new();
        for field in &self.fields {
            if !known.contains(field.as_str()) && !unmapped.contains(field) {
                unmapped.push(field.clone());
            }
        }

        let dropped = known_fields
            .iter()
            .filter(|field| !self.contains(field))
            .map(|field| field.to_string())
            .collect();

        SchemaCoverage { unmapped, dropped }
    }
}

/// Result of [`DestinationSchema::coverage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCoverage {
    /// Template columns with no derivation rule; always written empty.
    pub unmapped: Vec<String>,
    /// Derived fields the template does not ask for; never written.
    pub dropped: Vec<String>,
}

impl SchemaCoverage {
    pub fn is_complete(&self) -> bool {
        self.unmapped.is_empty() && self.dropped.is_empty()
    }
}

/// A transformed row, one value per schema column in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRecord {
    fields: Vec<(String, DestinationValue)>,
}

impl DestinationRecord {
    pub fn new(fields: Vec<(String, DestinationValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&DestinationValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn matches_schema(&self, schema: &DestinationSchema) -> bool {
        self.names().eq(schema.fields().iter().map(String::as_str))
    }

    pub fn render(&self, tokens: &BooleanTokens) -> Vec<String> {
        self.fields
            .iter()
            .map(|(_, value)| value.render(tokens))
            .collect()
    }
}

#[cfg(test)]
impl DestinationRecord {
    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }
}
