use anyhow::{Context, Result};

/// SMTP connection settings for the match notification email.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub mistral_api_key: String,
    pub jsearch_api_key: String,
    /// Recipient seeded into the settings table on first boot.
    pub default_email: String,
    /// `None` disables notifications; runs still succeed with `email_sent = false`.
    pub smtp: Option<SmtpSettings>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let smtp = match lookup("SMTP_HOST").filter(|h| !h.trim().is_empty()) {
            Some(host) => {
                let username = lookup("SMTP_USERNAME");
                let from_address = lookup("SMTP_FROM")
                    .or_else(|| username.clone())
                    .context("SMTP_FROM or SMTP_USERNAME must be set when SMTP_HOST is set")?;
                Some(SmtpSettings {
                    host,
                    port: lookup("SMTP_PORT")
                        .unwrap_or_else(|| "587".to_string())
                        .parse::<u16>()
                        .context("SMTP_PORT must be a valid port number")?,
                    username,
                    password: lookup("SMTP_PASSWORD"),
                    from_address,
                })
            }
            None => None,
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            mistral_api_key: require("MISTRAL_API_KEY")?,
            jsearch_api_key: require("JSEARCH_API_KEY")?,
            default_email: lookup("DEFAULT_EMAIL").unwrap_or_else(|| "user@example.com".to_string()),
            smtp,
            port: lookup("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
