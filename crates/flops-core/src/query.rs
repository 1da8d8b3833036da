//! Request parameter builder and query-string encoding.
//!
//! Parameters are collected under client-facing snake_case keys as JSON values.
//! The pipeline transcodes the keys and flattens the values into query pairs
//! with [`encode_pairs`].

use serde_json::{Map, Value};

/// Builder for assembling request parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParams {
    values: Map<String, Value>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { values: Map::new() }
    }

    /// Insert a required key/value pair.
    pub fn push<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Into<Value>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: Into<Value>,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Insert a sequence value.
    pub fn push_list<I, T>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let items = values.into_iter().map(Into::into).collect::<Vec<_>>();
        self.values.insert(key.into(), Value::Array(items));
    }

    /// Builder-style variant of [`QueryParams::push`].
    #[must_use]
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Into<Value>,
    {
        self.push(key, value);
        self
    }

    /// Look up a value by its snake_case key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the builder, returning the parameters as a JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

/// Flatten a parameter object into query-string pairs.
///
/// Nulls are omitted, arrays become one pair per non-null element, nested
/// objects are sent as compact JSON text and booleans as `true`/`false`.
#[must_use]
pub fn encode_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = encode_scalar(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = encode_scalar(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    pairs
}

fn encode_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested => Some(nested.to_string()),
    }
}
