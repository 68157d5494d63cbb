use std::env;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub frontend_url: String,
    pub additional_cors_origins: Vec<String>,
    pub public_url: String,
    pub openai_api_key: SecretString,
    pub openai_api_base: String,
    pub openai_model: String,
    pub history_limit: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let web_server_host =
            env::var("BACKEND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let web_server_port = env::var("BACKEND_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            additional_cors_origins: parse_origin_list(
                &env::var("ADDITIONAL_CORS_ORIGINS").unwrap_or_default(),
            ),
            // Client-facing URLs (uploads) fall back to the bind address
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://{}:{}", web_server_host, web_server_port)),
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            history_limit: env::var("HISTORY_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(20),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(20 * 1024 * 1024),
            web_server_host,
            web_server_port,
        }
    }

    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.web_server_host, self.web_server_port)
    }

    /// Allowed CORS origins: the frontend, its localhost/127.0.0.1 twin, then
    /// anything listed in `ADDITIONAL_CORS_ORIGINS`.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.clone()];

        if self.frontend_url.contains("localhost") {
            origins.push(self.frontend_url.replace("localhost", "127.0.0.1"));
        } else if self.frontend_url.contains("127.0.0.1") {
            origins.push(self.frontend_url.replace("127.0.0.1", "localhost"));
        }

        for origin in &self.additional_cors_origins {
            if !origins.contains(origin) {
                origins.push(origin.clone());
            }
        }
        origins
    }

    /// Reject configuration the server cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }
        if self.web_server_port == 0 {
            return Err(AppError::ValidationError(
                "BACKEND_PORT must be a non-zero port".to_string(),
            ));
        }
        if self.history_limit == 0 {
            return Err(AppError::ValidationError(
                "HISTORY_LIMIT must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8087,
            frontend_url: "http://localhost:5180".to_string(),
            additional_cors_origins: vec![],
            public_url: "http://127.0.0.1:8087".to_string(),
            openai_api_key: SecretString::from("test_openai_key".to_string()),
            openai_api_base: "http://127.0.0.1:9/v1".to_string(),
            openai_model: "gpt-4o".to_string(),
            history_limit: 20,
            max_upload_bytes: 1024 * 1024,
        }
    }
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.web_server_host.is_empty());
        assert!(!config.openai_model.is_empty());
        assert!(config.history_limit > 0);
        assert!(config.public_url.starts_with("http"));
    }

    #[test]
    fn test_test_config_is_valid() {
        let config = Config::test_config();

        assert!(config.validate().is_ok());
        assert_eq!(config.backend_url(), "http://127.0.0.1:8087");
    }

    #[test]
    fn test_validate_rejects_missing_api_key() {
        let mut config = Config::test_config();
        config.openai_api_key = SecretString::from(String::new());

        assert!(matches!(config.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_history_limit() {
        let mut config = Config::test_config();
        config.history_limit = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_origins_add_loopback_twin_and_extras() {
        let mut config = Config::test_config();
        config.additional_cors_origins = vec![
            "https://quiz.example.org".to_string(),
            "http://localhost:5180".to_string(),
        ];

        let origins = config.cors_origins();
        assert_eq!(
            origins,
            vec![
                "http://localhost:5180".to_string(),
                "http://127.0.0.1:5180".to_string(),
                "https://quiz.example.org".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_origin_list_skips_blanks() {
        assert_eq!(
            parse_origin_list(" https://a.test , ,https://b.test"),
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
        assert!(parse_origin_list("").is_empty());
    }
}
