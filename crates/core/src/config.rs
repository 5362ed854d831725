//! Capacity limits shared by the project and task services.

use crate::error::CoreError;

/// Default ceiling on the number of projects.
pub const DEFAULT_MAX_PROJECTS: usize = 5;

/// Default ceiling on the number of tasks inside one project.
pub const DEFAULT_MAX_TASKS_PER_PROJECT: usize = 20;

/// Cardinality limits enforced by the service layer.
///
/// Built once at startup and handed to each service constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub max_projects: usize,
    pub max_tasks_per_project: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_projects: DEFAULT_MAX_PROJECTS,
            max_tasks_per_project: DEFAULT_MAX_TASKS_PER_PROJECT,
        }
    }
}

impl AppConfig {
    /// Build a config from explicit limits. Both must be positive.
    pub fn new(max_projects: usize, max_tasks_per_project: usize) -> Result<Self, CoreError> {
        if max_projects == 0 {
            return Err(CoreError::Validation(
                "MAX_NUMBER_OF_PROJECT must be positive".into(),
            ));
        }
        if max_tasks_per_project == 0 {
            return Err(CoreError::Validation(
                "MAX_NUMBER_OF_TASK must be positive".into(),
            ));
        }
        Ok(Self {
            max_projects,
            max_tasks_per_project,
        })
    }

    /// Load limits from environment variables with defaults.
    ///
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `MAX_NUMBER_OF_PROJECT` | `5`     |
    /// | `MAX_NUMBER_OF_TASK`    | `20`    |
    ///
    /// A non-numeric or non-positive value is rejected; callers treat that
    /// as a fatal startup error.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_projects = read_limit(&lookup, "MAX_NUMBER_OF_PROJECT", DEFAULT_MAX_PROJECTS)?;
        let max_tasks =
            read_limit(&lookup, "MAX_NUMBER_OF_TASK", DEFAULT_MAX_TASKS_PER_PROJECT)?;
        Self::new(max_projects, max_tasks)
    }
}

fn read_limit<F>(lookup: &F, key: &str, default: usize) -> Result<usize, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("{key} must be an integer, got '{raw}'")))?;
    if value <= 0 {
        return Err(CoreError::Validation(format!(
            "{key} must be positive, got {value}"
        )));
    }
    usize::try_from(value)
        .map_err(|_| CoreError::Validation(format!("{key} is out of range: {value}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.max_projects, 5);
        assert_eq!(config.max_tasks_per_project, 20);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MAX_NUMBER_OF_PROJECT", "2"),
            ("MAX_NUMBER_OF_TASK", " 7 "),
        ]))
        .unwrap();
        assert_eq!(config.max_projects, 2);
        assert_eq!(config.max_tasks_per_project, 7);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_matches!(
            AppConfig::from_lookup(lookup_from(&[("MAX_NUMBER_OF_PROJECT", "0")])),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            AppConfig::from_lookup(lookup_from(&[("MAX_NUMBER_OF_TASK", "-3")])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_non_numeric() {
        assert_matches!(
            AppConfig::from_lookup(lookup_from(&[("MAX_NUMBER_OF_TASK", "many")])),
            Err(CoreError::Validation(msg)) if msg.contains("MAX_NUMBER_OF_TASK")
        );
    }
}
