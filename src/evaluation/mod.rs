use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::flags::{EvaluationContext, FlagError, FlagValue, Reason};

// Flag definitions as read from a flags file
#[derive(Debug, Clone, Deserialize)]
pub struct FlagSet {
    pub flags: BTreeMap<String, FlagDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlagState {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDefinition {
    pub state: FlagState,
    pub variants: BTreeMap<String, FlagValue>,
    pub default_variant: String,
    #[serde(default)]
    pub rules: Vec<TargetingRule>,
    #[serde(default)]
    pub rollout: Option<Rollout>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    Equals,
    EndsWith,
    OneOf,
}

// Rule data for evaluation
#[derive(Debug, Clone, Deserialize)]
pub struct TargetingRule {
    /// Context attribute to test; `targetingKey` reads the targeting key itself
    pub attribute: String,
    pub op: RuleOperator,
    pub values: Vec<String>,
    pub variant: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub priority: i32,
}

fn enabled_by_default() -> bool {
    true
}

/// Serve `variant` to `percentage` percent of targeting keys
#[derive(Debug, Clone, Deserialize)]
pub struct Rollout {
    pub variant: String,
    pub percentage: i32,
}

// Flag evaluation result
#[derive(Debug, Clone, PartialEq)]
pub struct FlagEvaluation {
    pub value: FlagValue,
    pub variant: String,
    pub reason: Reason,
}

/// Evaluate a flag definition for a given context
pub fn evaluate_flag(
    flag_key: &str,
    flag: &FlagDefinition,
    context: &EvaluationContext,
) -> Result<FlagEvaluation, FlagError> {
    // Step 1: Disabled flags resolve to nothing
    if flag.state == FlagState::Disabled {
        return Err(FlagError::Disabled(flag_key.to_string()));
    }

    // Step 2: Sort rules by priority (highest first) and check them
    let mut sorted_rules: Vec<&TargetingRule> = flag.rules.iter().filter(|r| r.enabled).collect();
    sorted_rules.sort_by(|a, b| b.priority.cmp(&a.priority));

    for rule in sorted_rules {
        if rule_matches(rule, context) {
            return select(flag_key, flag, &rule.variant, Reason::TargetingMatch);
        }
    }

    // Step 3: Check percentage rollout using consistent hashing
    if let Some(rollout) = &flag.rollout {
        if in_rollout(flag_key, context.targeting_key(), rollout.percentage) {
            return select(flag_key, flag, &rollout.variant, Reason::Split);
        }
    }

    // Step 4: Nothing targeted this context
    let reason = if flag.rules.is_empty() && flag.rollout.is_none() {
        Reason::Static
    } else {
        Reason::Default
    };
    select(flag_key, flag, &flag.default_variant, reason)
}

fn rule_matches(rule: &TargetingRule, context: &EvaluationContext) -> bool {
    let actual = if rule.attribute == "targetingKey" {
        context.targeting_key().to_string()
    } else {
        match context.attribute(&rule.attribute) {
            Some(value) => value.to_string(),
            None => return false,
        }
    };

    match rule.op {
        RuleOperator::Equals | RuleOperator::OneOf => rule.values.iter().any(|v| *v == actual),
        RuleOperator::EndsWith => rule.values.iter().any(|v| actual.ends_with(v.as_str())),
    }
}

fn select(
    flag_key: &str,
    flag: &FlagDefinition,
    variant: &str,
    reason: Reason,
) -> Result<FlagEvaluation, FlagError> {
    let value = flag
        .variants
        .get(variant)
        .cloned()
        .ok_or_else(|| FlagError::InvalidDefinition {
            flag_key: flag_key.to_string(),
            message: format!("unknown variant '{}'", variant),
        })?;

    Ok(FlagEvaluation {
        value,
        variant: variant.to_string(),
        reason,
    })
}

/// Consistent hashing for percentage rollout
/// Ensures the same targeting key always lands in the same bucket for a given flag
fn in_rollout(flag_key: &str, targeting_key: &str, percentage: i32) -> bool {
    if percentage <= 0 {
        return false;
    }
    if percentage >= 100 {
        return true;
    }

    rollout_bucket(flag_key, targeting_key) < percentage
}

/// Bucket in `0..100` from the first 8 bytes of SHA-256 over `flag_key:targeting_key`
fn rollout_bucket(flag_key: &str, targeting_key: &str) -> i32 {
    let digest = Sha256::digest(format!("{}:{}", flag_key, targeting_key).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);

    (u64::from_be_bytes(prefix) % 100) as i32
}

// VALIDATION

/// Validate a flag key: lowercase letters, digits, `-` and `_`, starting with a letter
pub fn validate_flag_key(key: &str) -> Result<(), String> {
    let Some(first) = key.chars().next() else {
        return Err("Flag key cannot be empty".to_string());
    };

    if key.len() > 64 {
        return Err("Flag key is too long (Max: 64 characters)".to_string());
    }

    if !first.is_ascii_alphabetic() {
        return Err("Flag key must start with a letter".to_string());
    }

    if !key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-') {
        return Err(
            "Flag key can only contain lowercase letters, numbers, underscores, and hyphens"
                .to_string(),
        );
    }

    Ok(())
}

pub fn validate_rollout_percentage(percentage: i32) -> Result<(), String> {
    if !(0..=100).contains(&percentage) {
        return Err("Rollout percentage must be between 0 and 100".to_string());
    }

    Ok(())
}

fn validate_rule(rule: &TargetingRule) -> Result<(), String> {
    if rule.attribute.trim().is_empty() {
        return Err("Rule attribute cannot be empty".to_string());
    }

    match (rule.op, rule.values.len()) {
        (_, 0) => Err(format!("Rule on '{}' has no values", rule.attribute)),
        (RuleOperator::Equals | RuleOperator::EndsWith, n) if n > 1 => Err(format!(
            "Rule on '{}' takes exactly one value, use one_of for several",
            rule.attribute
        )),
        _ => Ok(()),
    }
}

/// Check a definition is internally consistent before it is served
pub fn validate_definition(flag_key: &str, flag: &FlagDefinition) -> Result<(), FlagError> {
    let invalid = |message: String| FlagError::InvalidDefinition {
        flag_key: flag_key.to_string(),
        message,
    };

    validate_flag_key(flag_key).map_err(invalid)?;

    if flag.variants.is_empty() {
        return Err(invalid("no variants defined".to_string()));
    }

    let mut referenced = vec![flag.default_variant.as_str()];
    for rule in &flag.rules {
        validate_rule(rule).map_err(invalid)?;
        referenced.push(rule.variant.as_str());
    }
    if let Some(rollout) = &flag.rollout {
        validate_rollout_percentage(rollout.percentage).map_err(invalid)?;
        referenced.push(rollout.variant.as_str());
    }

    if let Some(missing) = referenced.into_iter().find(|v| !flag.variants.contains_key(*v)) {
        return Err(invalid(format!("unknown variant '{}'", missing)));
    }

    // every variant of a flag must share one type
    let mut types = flag.variants.values().map(FlagValue::type_name);
    if let Some(first) = types.next() {
        if types.any(|t| t != first) {
            return Err(invalid("variants mix boolean and string values".to_string()));
        }
    }

    Ok(())
}
