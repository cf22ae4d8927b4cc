use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Secret {0} not found in /run/secrets or the environment")]
    MissingSecret(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP relay that accepts `{ from, to, subject, text, html }`.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
    pub contact_inbox: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let from: String = try_load("EMAIL_USERNAME", "noreply@hikejo.local")?;
        let lifetime: String = try_load("JWT_EXPIRES_IN", "90d")?;

        Ok(Self {
            port: try_load("RUST_PORT", "3000")?,
            redis_url: optional("REDIS_URL"),
            jwt_secret: read_secret("JWT_SECRET").ok_or(ConfigError::MissingSecret("JWT_SECRET"))?,
            token_ttl: parse_lifetime(&lifetime).map_err(|reason| ConfigError::Invalid {
                key: "JWT_EXPIRES_IN",
                reason,
            })?,
            bcrypt_cost: check_cost(try_load("BCRYPT_COST", "10")?)?,
            cors_origin: try_load("CORS_ORIGIN", "http://localhost:3001")?,
            mail: MailConfig {
                endpoint: optional("MAIL_API_URL"),
                api_key: read_secret("MAIL_API_KEY"),
                contact_inbox: optional("CONTACT_INBOX").unwrap_or_else(|| from.clone()),
                from,
            },
        })
    }

    /// Defaults with no environment lookups: in-memory store, log-only mail.
    pub fn local(jwt_secret: impl Into<String>) -> Self {
        let from = "noreply@hikejo.local".to_string();

        Self {
            port: 3000,
            redis_url: None,
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::from_secs(90 * 24 * 60 * 60),
            bcrypt_cost: 10,
            cors_origin: "http://localhost:3001".to_string(),
            mail: MailConfig {
                endpoint: None,
                api_key: None,
                contact_inbox: from.clone(),
                from,
            },
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found");
    })
}

fn optional(key: &str) -> Option<String> {
    var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

/// Docker secret first, then an environment variable of the same name.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Some(secret.trim().to_string()),
        Err(e) => {
            info!("Failed to read {secret_name} from file: {e}, trying environment");

            optional(secret_name)
        }
    }
}

/// Parses lifetimes such as `3600`, `45m`, `12h` or `90d`.
pub fn parse_lifetime(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("`{raw}` does not start with a number"))?;

    let seconds = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        other => return Err(format!("unknown unit `{other}`")),
    };

    amount
        .checked_mul(seconds)
        .filter(|total| i64::try_from(*total).is_ok())
        .map(Duration::from_secs)
        .ok_or_else(|| format!("`{raw}` is too long"))
}

/// bcrypt only accepts costs from 4 to 31.
pub fn check_cost(cost: u32) -> Result<u32, ConfigError> {
    if (4..=31).contains(&cost) {
        Ok(cost)
    } else {
        Err(ConfigError::Invalid {
            key: "BCRYPT_COST",
            reason: format!("{cost} is outside 4..=31"),
        })
    }
}
