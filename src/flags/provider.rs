use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::context::EvaluationContext;
use super::error::FlagError;

/// A resolved flag value. Only boolean and string flags exist in this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    String(String),
}

impl FlagValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FlagValue::Bool(_) => "boolean",
            FlagValue::String(_) => "string",
        }
    }
}

/// Rust types a flag can be resolved into
pub trait FlagType: Sized + Clone + Send + Sync {
    const TYPE_NAME: &'static str;

    fn into_value(self) -> FlagValue;
    fn from_value(value: FlagValue) -> Option<Self>;
}

impl FlagType for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn into_value(self) -> FlagValue {
        FlagValue::Bool(self)
    }

    fn from_value(value: FlagValue) -> Option<Self> {
        match value {
            FlagValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FlagType for String {
    const TYPE_NAME: &'static str = "string";

    fn into_value(self) -> FlagValue {
        FlagValue::String(self)
    }

    fn from_value(value: FlagValue) -> Option<Self> {
        match value {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Why a flag resolved the way it did, using the remote evaluation protocol's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    Static,
    Default,
    TargetingMatch,
    Split,
    Disabled,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEvaluation {
    pub value: FlagValue,
    pub reason: Reason,
    pub variant: Option<String>,
}

/// A flag-evaluation backend.
///
/// Implementations report every problem as an error; deciding what to do about it
/// is the resolver's job.
#[async_trait]
pub trait FlagProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(
        &self,
        flag_key: &str,
        default_value: &FlagValue,
        context: &EvaluationContext,
    ) -> Result<ProviderEvaluation, FlagError>;

    /// Hook run once by [`FlagClient::shutdown`](super::FlagClient::shutdown) after the
    /// server stops. The built-in providers hold nothing that needs closing, so the default
    /// does nothing; backends with background sync or open streams override it.
    async fn shutdown(&self) {}
}
