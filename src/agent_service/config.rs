use anyhow::{anyhow, Result};
use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "https://api.z.ai/api/paas/v4";
pub const DEFAULT_MODEL: &str = "glm-5";
pub const DEFAULT_PORT: u16 = 3002;

#[derive(Parser, Debug, Clone)]
#[command(name = "agent-service")]
#[command(about = "Agent service - forwards planner requests to the GLM completion API")]
pub struct Config {
    /// Completion provider API key
    #[arg(long, env = "ZAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible completion API
    #[arg(long, env = "ZAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model used by chat, task analysis and standups when the request names none
    #[arg(long, env = "AGENT_FAST_MODEL", default_value = DEFAULT_MODEL)]
    pub fast_model: String,

    /// Model used by ticket parsing when the request names none
    #[arg(long, env = "AGENT_SMART_MODEL", default_value = DEFAULT_MODEL)]
    pub smart_model: String,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Outbound HTTP timeout for a single completion call
    #[arg(long, env = "ZAI_TIMEOUT_SECS", default_value_t = 300)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "AGENT_SERVICE_LOG_DIR", default_value = "logs")]
    pub log_dir: String,
}

/// Default model identifiers, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefaults {
    pub fast: String,
    pub smart: String,
}

impl Config {
    /// Trims every value and rejects settings the service cannot start with.
    pub fn validate(mut self) -> Result<Self> {
        self.api_key = self.api_key.trim().to_string();
        if self.api_key.is_empty() {
            return Err(anyhow!("ZAI_API_KEY cannot be empty"));
        }

        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = DEFAULT_BASE_URL.to_string();
        }

        self.fast_model = self.fast_model.trim().to_string();
        self.smart_model = self.smart_model.trim().to_string();
        if self.fast_model.is_empty() || self.smart_model.is_empty() {
            return Err(anyhow!("Default model names must not be empty"));
        }

        Ok(self)
    }

    pub fn model_defaults(&self) -> ModelDefaults {
        ModelDefaults {
            fast: self.fast_model.clone(),
            smart: self.smart_model.clone(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["agent-service"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_apply_with_only_api_key() {
        let config = parse(&["--api-key", "secret"]).validate().unwrap();
        assert_eq!(config.port, 3002);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.model_defaults(),
            ModelDefaults {
                fast: "glm-5".to_string(),
                smart: "glm-5".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let result = parse(&["--api-key", "   "]).validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_model_overrides_and_trailing_slash() {
        let config = parse(&[
            "--api-key",
            "secret",
            "--base-url",
            "http://localhost:8080/v1/",
            "--fast-model",
            "glm-4.5-air",
            "--smart-model",
            " glm-5 ",
            "--port",
            "9000",
        ])
        .validate()
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.fast_model, "glm-4.5-air");
        assert_eq!(config.smart_model, "glm-5");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }
}
