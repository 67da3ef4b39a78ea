//! Execution settings shared by every task tree run
//!
//! Settings are immutable after construction. They can be deserialized from
//! JSON or read from `STACKCTL_*` environment variables.

use crate::constants::{
    STACKCTL_PLAN_VAR, STACKCTL_SEQUENTIAL_POLICY_VAR, STACKCTL_TASK_TIMEOUT_VAR,
};
use crate::errors::{Error, Result};
use crate::types::SequentialPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime configuration settings that affect how task trees execute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionSettings {
    /// Deadline for a whole run, in seconds
    pub timeout_seconds: Option<u64>,

    /// Policy applied to sequential trees that don't set one explicitly
    pub sequential_policy: SequentialPolicy,

    /// Render the plan instead of executing
    pub plan_mode: bool,
}

impl ExecutionSettings {
    /// Run timeout as a `Duration`, `None` when unset or zero
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Parse settings from a JSON document
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(STACKCTL_TASK_TIMEOUT_VAR) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                Error::configuration(format!(
                    "{STACKCTL_TASK_TIMEOUT_VAR} must be a number of seconds, got '{raw}': {e}"
                ))
            })?;
            settings.timeout_seconds = (secs > 0).then_some(secs);
        }

        if let Some(raw) = lookup(STACKCTL_SEQUENTIAL_POLICY_VAR) {
            settings.sequential_policy = raw.parse()?;
        }

        if let Some(raw) = lookup(STACKCTL_PLAN_VAR) {
            settings.plan_mode = parse_flag(STACKCTL_PLAN_VAR, &raw)?;
        }

        Ok(settings)
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{name} must be a boolean, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = ExecutionSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, ExecutionSettings::default());
        assert_eq!(settings.timeout(), None);
        assert_eq!(settings.sequential_policy, SequentialPolicy::FailFast);
    }

    #[test]
    fn test_reads_all_variables() {
        let settings = ExecutionSettings::from_lookup(lookup(&[
            (STACKCTL_TASK_TIMEOUT_VAR, "90"),
            (STACKCTL_SEQUENTIAL_POLICY_VAR, "continue-on-error"),
            (STACKCTL_PLAN_VAR, "true"),
        ]))
        .unwrap();
        assert_eq!(settings.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(settings.sequential_policy, SequentialPolicy::ContinueOnError);
        assert!(settings.plan_mode);
    }

    #[test]
    fn test_zero_timeout_means_no_deadline() {
        let settings =
            ExecutionSettings::from_lookup(lookup(&[(STACKCTL_TASK_TIMEOUT_VAR, "0")])).unwrap();
        assert_eq!(settings.timeout(), None);
    }

    #[test]
    fn test_invalid_timeout_is_a_configuration_error() {
        let err = ExecutionSettings::from_lookup(lookup(&[(STACKCTL_TASK_TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains(STACKCTL_TASK_TIMEOUT_VAR));
    }

    #[test]
    fn test_invalid_plan_flag_is_rejected() {
        let err =
            ExecutionSettings::from_lookup(lookup(&[(STACKCTL_PLAN_VAR, "maybe")])).unwrap_err();
        assert!(err.to_string().contains("must be a boolean"));
    }

    #[test]
    fn test_from_json() {
        let settings = ExecutionSettings::from_json(
            r#"{"timeoutSeconds": 30, "sequentialPolicy": "continue-on-error"}"#,
        )
        .unwrap();
        assert_eq!(settings.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.sequential_policy, SequentialPolicy::ContinueOnError);
        assert!(!settings.plan_mode);

        assert!(matches!(
            ExecutionSettings::from_json("{not json"),
            Err(Error::Json { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_from_json_means_no_deadline() {
        let settings = ExecutionSettings::from_json(r#"{"timeoutSeconds": 0}"#).unwrap();
        assert_eq!(settings.timeout_seconds, Some(0));
        assert_eq!(settings.timeout(), None);
    }
}
