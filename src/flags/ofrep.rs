//! Client for flagd's remote evaluation endpoint (OFREP).
//!
//! One `POST /ofrep/v1/evaluate/flags/{key}` per evaluation, with the context as the
//! request body. No caching and no retries; the HTTP client's timeout bounds each call.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::context::EvaluationContext;
use super::error::FlagError;
use super::provider::{FlagProvider, FlagValue, ProviderEvaluation, Reason};

pub struct OfrepProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct EvaluationRequest<'a> {
    context: &'a EvaluationContext,
}

#[derive(Deserialize)]
struct EvaluationSuccess {
    value: FlagValue,
    #[serde(default)]
    reason: Option<Reason>,
    #[serde(default)]
    variant: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct EvaluationFailure {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_details: Option<String>,
}

impl OfrepProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FlagError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn flag_url(&self, flag_key: &str) -> String {
        format!("{}/ofrep/v1/evaluate/flags/{}", self.base_url, flag_key)
    }
}

#[async_trait]
impl FlagProvider for OfrepProvider {
    fn name(&self) -> &'static str {
        "ofrep"
    }

    async fn evaluate(
        &self,
        flag_key: &str,
        _default_value: &FlagValue,
        context: &EvaluationContext,
    ) -> Result<ProviderEvaluation, FlagError> {
        let response = self
            .client
            .post(self.flag_url(flag_key))
            .json(&EvaluationRequest { context })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FlagError::FlagNotFound(flag_key.to_string()));
        }
        if !status.is_success() {
            let failure = response.json::<EvaluationFailure>().await.unwrap_or_default();
            return Err(FlagError::Backend {
                code: failure.error_code.unwrap_or_else(|| status.to_string()),
                details: failure.error_details.unwrap_or_default(),
            });
        }

        let body: EvaluationSuccess = response.json().await?;

        Ok(ProviderEvaluation {
            value: body.value,
            reason: body.reason.unwrap_or(Reason::Unknown),
            variant: body.variant,
        })
    }
}
