//! Operation input parameters

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Named input values handed to an operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build params from a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            _ => Err(Error::Parse("params must be a JSON object".to_string())),
        }
    }

    /// Add a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a parameter that must be present.
    pub fn require(&self, key: &str) -> Result<&Value> {
        self.0
            .get(key)
            .ok_or_else(|| Error::MissingParam(key.to_string()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_requires_object() {
        assert!(Params::from_value(json!({"album": "{}"})).is_ok());
        assert_eq!(Params::from_value(Value::Null), Ok(Params::new()));
        assert!(Params::from_value(json!([1])).is_err());
    }

    #[test]
    fn test_require_missing_param() {
        let params = Params::new().with("id", 1);
        assert_eq!(params.require("id"), Ok(&json!(1)));
        assert_eq!(params.require("album"), Err(Error::MissingParam("album".into())));
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let params = Params::new().with("b", 1).with("a", 2);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
