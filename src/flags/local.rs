use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::evaluation::{
    evaluate_flag, validate_definition, FlagDefinition, FlagSet, FlagState, RuleOperator,
    TargetingRule,
};

use super::context::EvaluationContext;
use super::error::FlagError;
use super::provider::{FlagProvider, FlagValue, ProviderEvaluation};
use super::{CALORIE_ALGORITHM_FLAG, GAMIFICATION_FLAG, STEP_ALGORITHM_FLAG};

/// Evaluates flags in-process from a validated [`FlagSet`]
pub struct LocalProvider {
    flags: BTreeMap<String, FlagDefinition>,
}

impl LocalProvider {
    pub fn new(set: FlagSet) -> Result<Self, FlagError> {
        for (key, definition) in &set.flags {
            validate_definition(key, definition)?;
        }

        Ok(Self { flags: set.flags })
    }

    pub fn from_file(path: &Path) -> Result<Self, FlagError> {
        let raw = std::fs::read_to_string(path)?;
        let set: FlagSet = serde_json::from_str(&raw)?;
        let provider = Self::new(set)?;
        info!(path = %path.display(), flags = provider.flags.len(), "loaded flag definitions");
        Ok(provider)
    }

    /// Demo defaults: everyone gets `simple` and no gamification, beta testers get
    /// `enhanced` and gamification.
    pub fn builtin() -> Self {
        let mut flags = BTreeMap::new();
        flags.insert(CALORIE_ALGORITHM_FLAG.to_string(), algorithm_flag());
        flags.insert(STEP_ALGORITHM_FLAG.to_string(), algorithm_flag());
        flags.insert(
            GAMIFICATION_FLAG.to_string(),
            FlagDefinition {
                state: FlagState::Enabled,
                variants: BTreeMap::from([
                    ("on".to_string(), FlagValue::Bool(true)),
                    ("off".to_string(), FlagValue::Bool(false)),
                ]),
                default_variant: "off".to_string(),
                rules: vec![beta_tester_rule("on")],
                rollout: None,
            },
        );

        Self { flags }
    }
}

fn algorithm_flag() -> FlagDefinition {
    FlagDefinition {
        state: FlagState::Enabled,
        variants: ["simple", "enhanced", "ml-powered"]
            .into_iter()
            .map(|v| (v.to_string(), FlagValue::String(v.to_string())))
            .collect(),
        default_variant: "simple".to_string(),
        rules: vec![beta_tester_rule("enhanced")],
        rollout: None,
    }
}

fn beta_tester_rule(variant: &str) -> TargetingRule {
    TargetingRule {
        attribute: "role".to_string(),
        op: RuleOperator::Equals,
        values: vec!["beta-tester".to_string()],
        variant: variant.to_string(),
        enabled: true,
        priority: 10,
    }
}

#[async_trait]
impl FlagProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn evaluate(
        &self,
        flag_key: &str,
        _default_value: &FlagValue,
        context: &EvaluationContext,
    ) -> Result<ProviderEvaluation, FlagError> {
        let definition = self
            .flags
            .get(flag_key)
            .ok_or_else(|| FlagError::FlagNotFound(flag_key.to_string()))?;

        let evaluation = evaluate_flag(flag_key, definition, context)?;

        Ok(ProviderEvaluation {
            value: evaluation.value,
            reason: evaluation.reason,
            variant: Some(evaluation.variant),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Reason;

    #[test]
    fn test_builtin_definitions_are_valid() {
        let provider = LocalProvider::builtin();
        for (key, definition) in &provider.flags {
            validate_definition(key, definition).unwrap();
        }
        assert_eq!(provider.flags.len(), 3);
    }

    #[tokio::test]
    async fn test_builtin_targets_beta_testers() {
        let provider = LocalProvider::builtin();
        let default = FlagValue::String("simple".to_string());

        let beta = EvaluationContext::build(Some("u1"), Some("beta-tester"));
        let result = provider.evaluate(CALORIE_ALGORITHM_FLAG, &default, &beta).await.unwrap();
        assert_eq!(result.value, FlagValue::String("enhanced".to_string()));
        assert_eq!(result.reason, Reason::TargetingMatch);

        let regular = EvaluationContext::build(Some("u1"), None);
        let result = provider.evaluate(STEP_ALGORITHM_FLAG, &default, &regular).await.unwrap();
        assert_eq!(result.value, FlagValue::String("simple".to_string()));

        let result = provider
            .evaluate(GAMIFICATION_FLAG, &FlagValue::Bool(false), &beta)
            .await
            .unwrap();
        assert_eq!(result.value, FlagValue::Bool(true));
    }

    #[tokio::test]
    async fn test_unknown_flag() {
        let provider = LocalProvider::builtin();
        let context = EvaluationContext::build(None, None);
        let result = provider
            .evaluate("no-such-flag", &FlagValue::Bool(false), &context)
            .await;
        assert!(matches!(result, Err(FlagError::FlagNotFound(_))));
    }

    #[test]
    fn test_rejects_invalid_set() {
        let raw = r#"{ "flags": { "broken": {
            "state": "ENABLED",
            "variants": { "a": "a" },
            "defaultVariant": "b"
        } } }"#;
        let set: FlagSet = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            LocalProvider::new(set),
            Err(FlagError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let result = LocalProvider::from_file(Path::new("/definitely/not/here/flags.json"));
        assert!(matches!(result, Err(FlagError::Io(_))));
    }

    #[tokio::test]
    async fn test_bundled_flags_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("flags.json");
        let provider = LocalProvider::from_file(&path).unwrap();
        assert_eq!(provider.flags.len(), 3);

        let staff = EvaluationContext::build(Some("ana@fitflag.dev"), Some("beta-tester"));
        let result = provider
            .evaluate(CALORIE_ALGORITHM_FLAG, &FlagValue::String("simple".to_string()), &staff)
            .await
            .unwrap();
        assert_eq!(result.value, FlagValue::String("ml-powered".to_string()));

        let coach = EvaluationContext::build(Some("u2"), Some("coach"));
        let result = provider
            .evaluate(STEP_ALGORITHM_FLAG, &FlagValue::String("simple".to_string()), &coach)
            .await
            .unwrap();
        assert_eq!(result.value, FlagValue::String("enhanced".to_string()));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir()
            .join(format!("fitflag-flags-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{ "flags": { "calorie-calculation-algorithm": {
                "state": "ENABLED",
                "variants": { "simple": "simple", "ml-powered": "ml-powered" },
                "defaultVariant": "ml-powered"
            } } }"#,
        )
        .unwrap();

        let provider = LocalProvider::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(provider.flags.contains_key(CALORIE_ALGORITHM_FLAG));
    }
}
