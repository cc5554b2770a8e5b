use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Targeting key used when a request carries no user id
pub const DEFAULT_USER_ID: &str = "user123";
/// Role used when a request carries no role
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    String(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Identity and attributes a flag is evaluated against.
///
/// Serializes flat, as `{ "targetingKey": ..., "<attribute>": ... }`, which is the
/// shape remote flag backends expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    targeting_key: String,
    #[serde(flatten)]
    attributes: BTreeMap<String, AttributeValue>,
}

impl EvaluationContext {
    /// Build the per-request context from optional query values.
    ///
    /// Empty values count as absent.
    pub fn build(user_id: Option<&str>, role: Option<&str>) -> Self {
        let user_id = user_id.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_USER_ID);
        let role = role.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_ROLE);

        Self::new(user_id)
            .with_attribute("userId", user_id)
            .with_attribute("role", role)
    }

    pub fn new(targeting_key: &str) -> Self {
        let targeting_key = if targeting_key.is_empty() {
            DEFAULT_USER_ID
        } else {
            targeting_key
        };

        Self {
            targeting_key: targeting_key.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn targeting_key(&self) -> &str {
        &self.targeting_key
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// The role attribute, or the default role for contexts built without one
    pub fn role(&self) -> &str {
        match self.attributes.get("role") {
            Some(AttributeValue::String(role)) => role,
            _ => DEFAULT_ROLE,
        }
    }
}
