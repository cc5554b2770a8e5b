//! Flag resolution.
//!
//! [`FlagClient`] wraps one [`FlagProvider`] and turns every provider failure into the
//! caller's default value, so request handling never fails because of flags.

mod context;
mod error;
mod local;
mod ofrep;
mod provider;

pub use context::EvaluationContext;
pub use error::FlagError;
pub use local::LocalProvider;
pub use ofrep::OfrepProvider;
pub use provider::{FlagProvider, FlagType, FlagValue, Reason};

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

use crate::config::{FlagsConfig, ProviderKind};

pub const CALORIE_ALGORITHM_FLAG: &str = "calorie-calculation-algorithm";
pub const STEP_ALGORITHM_FLAG: &str = "step-calculation-algorithm";
pub const GAMIFICATION_FLAG: &str = "gamification-enabled";

/// Outcome of a single resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagResolution<T> {
    pub flag_key: String,
    pub value: T,
    pub used_default: bool,
    pub reason: Reason,
    pub variant: Option<String>,
}

pub struct FlagClient {
    provider: Arc<dyn FlagProvider>,
}

impl FlagClient {
    pub fn new(provider: impl FlagProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn from_config(config: &FlagsConfig) -> Result<Self, FlagError> {
        let client = match config.provider {
            ProviderKind::Ofrep => {
                let base_url = config.ofrep_base_url();
                info!(
                    %base_url,
                    timeout_ms = config.timeout.as_millis() as u64,
                    "using flagd OFREP provider"
                );
                Self::new(OfrepProvider::new(&base_url, config.timeout)?)
            }
            ProviderKind::Local => match &config.flags_file {
                Some(path) => Self::new(LocalProvider::from_file(path)?),
                None => {
                    info!("using built-in flag definitions");
                    Self::new(LocalProvider::builtin())
                }
            },
        };

        Ok(client)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Resolve `flag_key`, falling back to `default_value` on any failure.
    ///
    /// Makes exactly one provider call. Failures are logged and reported through
    /// `used_default`, never returned.
    pub async fn resolve<T: FlagType>(
        &self,
        flag_key: &str,
        default_value: T,
        context: &EvaluationContext,
    ) -> FlagResolution<T> {
        let default_flag = default_value.clone().into_value();

        let outcome = self
            .provider
            .evaluate(flag_key, &default_flag, context)
            .await
            .and_then(|evaluation| {
                let actual = evaluation.value.type_name();
                match T::from_value(evaluation.value) {
                    Some(value) => Ok((value, evaluation.reason, evaluation.variant)),
                    None => Err(FlagError::TypeMismatch {
                        flag_key: flag_key.to_string(),
                        expected: T::TYPE_NAME,
                        actual,
                    }),
                }
            });

        match outcome {
            Ok((value, reason, variant)) => {
                debug!(flag_key, ?reason, ?variant, "flag resolved");
                FlagResolution {
                    flag_key: flag_key.to_string(),
                    value,
                    used_default: false,
                    reason,
                    variant,
                }
            }
            Err(e) => {
                warn!(
                    flag_key,
                    provider = self.provider.name(),
                    error = %e,
                    "flag resolution failed, using default"
                );
                let reason = match e {
                    FlagError::Disabled(_) => Reason::Disabled,
                    _ => Reason::Error,
                };
                FlagResolution {
                    flag_key: flag_key.to_string(),
                    value: default_value,
                    used_default: true,
                    reason,
                    variant: None,
                }
            }
        }
    }

    pub async fn shutdown(&self) {
        info!(provider = self.provider.name(), "shutting down flag provider");
        self.provider.shutdown().await;
    }
}

static CLIENT: OnceLock<Arc<FlagClient>> = OnceLock::new();

/// Install the process-wide flag client.
///
/// Call once at startup; later calls return the client installed first and ignore
/// their configuration.
pub fn setup(config: &FlagsConfig) -> Result<Arc<FlagClient>, FlagError> {
    if let Some(client) = CLIENT.get() {
        return Ok(Arc::clone(client));
    }

    let client = Arc::new(FlagClient::from_config(config)?);
    Ok(Arc::clone(CLIENT.get_or_init(|| client)))
}
