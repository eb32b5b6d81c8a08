use crate::error::{CoachError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for the model client, built once at startup and passed to the
/// client by value. Nothing here is written back to the process environment.
#[derive(Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(skip_serializing, default)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    /// Pinned to 0.0 by default so identical submissions get comparable feedback.
    pub temperature: f32,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl std::fmt::Debug for CoachConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CoachConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
            project: None,
            temperature: 0.0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL`,
    /// `OPENAI_ORG_ID`, `OPENAI_PROJECT_ID` and `BMC_COACH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; `from_env` uses the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = read("OPENAI_API_KEY")
            .ok_or_else(|| CoachError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let mut config = Self::new(api_key);

        if let Some(model) = read("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = read("OPENAI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        config.organization = read("OPENAI_ORG_ID");
        config.project = read("OPENAI_PROJECT_ID");

        if let Some(raw) = read("BMC_COACH_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                CoachError::Config(format!(
                    "BMC_COACH_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?;
            if secs == 0 {
                return Err(CoachError::Config(
                    "BMC_COACH_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = CoachConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, CoachError::Config(_)));
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = CoachConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("BMC_COACH_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert!(!format!("{config:?}").contains("sk-test"));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for value in ["soon", "0"] {
            let err = CoachConfig::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("BMC_COACH_TIMEOUT_SECS", value),
            ]))
            .unwrap_err();
            assert!(matches!(err, CoachError::Config(_)));
        }
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let json = serde_json::to_string(&CoachConfig::new("sk-secret")).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("\"timeout\":60"));
    }
}
