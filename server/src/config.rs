use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};
use platform_completion::CompletionConfig;
use platform_db::DatabaseSettings;
use platform_mail::MailConfig;

/// Process-wide settings, read once at startup and handed to each component.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub completion: CompletionConfig,
    pub mail: MailConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let env_or = |key: &str, default: &str| env(key).unwrap_or_else(|| default.to_string());

        let database = match env("DATABASE_URL") {
            Some(url) => DatabaseSettings::new(url),
            None => DatabaseSettings::from_parts(
                &env_or("DB_HOST", "localhost"),
                &env_or("DB_USER", "postgres"),
                &env_or("DB_PASSWORD", ""),
                &env_or("DB_NAME", "hr_onboarding"),
            ),
        }
        .with_max_connections(parse_or(&env, "DB_MAX_CONNECTIONS", 10)?);

        let completion_defaults = CompletionConfig::default();
        let completion = CompletionConfig {
            api_key: env("TOGETHER_API_KEY"),
            endpoint: env("COMPLETION_URL").unwrap_or(completion_defaults.endpoint),
            model: env("COMPLETION_MODEL").unwrap_or(completion_defaults.model),
            timeout: Duration::from_secs(parse_or(&env, "COMPLETION_TIMEOUT_SECS", 20)?),
        };

        let mail_defaults = MailConfig::default();
        let mail = MailConfig {
            username: env("EMAIL_ADDRESS"),
            password: env("EMAIL_PASSWORD"),
            host: env("SMTP_HOST").unwrap_or(mail_defaults.host),
            port: parse_or(&env, "SMTP_PORT", mail_defaults.port)?,
            timeout: Duration::from_secs(parse_or(&env, "SMTP_TIMEOUT_SECS", 15)?),
        };

        let cors_allowed_origins = env("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database,
            completion,
            mail,
            cors_allowed_origins,
        })
    }
}

fn parse_or<T>(env: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_a_local_postgres() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database.url, "postgres://postgres@localhost/hr_onboarding");
        assert_eq!(config.database.max_connections, 10);
        assert!(config.completion.api_key.is_none());
        assert_eq!(config.completion.timeout, Duration::from_secs(20));
        assert_eq!(config.mail.host, "smtp.gmail.com");
        assert_eq!(config.mail.port, 587);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn database_url_wins_over_parts() {
        let config = load(&[
            ("DATABASE_URL", "postgres://hr:pw@db:5432/hr"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.database.url, "postgres://hr:pw@db:5432/hr");
    }

    #[test]
    fn blank_credentials_count_as_unset() {
        let config = load(&[("TOGETHER_API_KEY", "  "), ("EMAIL_ADDRESS", "")]).unwrap();
        assert!(config.completion.api_key.is_none());
        assert!(config.mail.username.is_none());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = load(&[(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:5173, https://hr.example.com ,",
        )])
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5173", "https://hr.example.com"]
        );
    }

    #[test]
    fn malformed_numbers_fail_loudly() {
        let err = load(&[("SMTP_PORT", "smtp")]).unwrap_err();
        assert!(err.to_string().contains("SMTP_PORT"));
    }
}
