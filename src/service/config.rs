use std::{env, sync::Arc};

use crate::{config::Config, service::otp::DEFAULT_OTP_LENGTH};

const DEFAULT_PORT: u16 = 3333;
const DEFAULT_AUTH_COOKIE_MAX_AGE: u64 = 60 * 60 * 24;
const DEFAULT_OTP_TTL: u64 = 60 * 10;

pub trait ConfigService: Send + Sync {
    fn port(&self) -> u16;
    fn values(&self) -> &Config;
}

pub struct ConfigServiceImpl {
    config: Arc<Config>,
}

/// Typed reads over a key/value source, normally the process environment.
struct Source<F> {
    lookup: F,
}

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn strip_wrapping_quotes(value: &str) -> &str {
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            return &value[1..value.len() - 1];
        }
        value
    }

    fn nonempty(&self, key: &str) -> Option<String> {
        (self.lookup)(key).and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return None;
            }
            let normalized = Self::strip_wrapping_quotes(trimmed).trim();
            if normalized.is_empty() {
                None
            } else {
                Some(normalized.to_string())
            }
        })
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.nonempty(key).and_then(|value| match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(%key, "ignoring unparsable configuration value");
                None
            }
        })
    }

    fn bool(&self, key: &str, default: bool) -> bool {
        self.nonempty(key)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    }

    fn lower_nonempty(&self, key: &str) -> Option<String> {
        self.nonempty(key).map(|value| value.to_ascii_lowercase())
    }
}

impl ConfigServiceImpl {
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let source = Source { lookup };

        let config = Config {
            port: source.parsed("PORT").unwrap_or(DEFAULT_PORT),
            database_url: source.nonempty("DATABASE_URL"),
            redis_url: source.nonempty("REDIS_URL"),
            session_key_prefix: source
                .nonempty("SESSION_KEY_PREFIX")
                .unwrap_or_else(|| "msd-accounts".to_string()),
            auth_cookie_name: source
                .nonempty("AUTH_COOKIE")
                .unwrap_or_else(|| "access".to_string()),
            auth_cookie_max_age_seconds: source
                .parsed("AUTH_COOKIE_MAX_AGE")
                .unwrap_or(DEFAULT_AUTH_COOKIE_MAX_AGE),
            auth_cookie_secure: source.bool("AUTH_COOKIE_SECURE", true),
            auth_cookie_http_only: source.bool("AUTH_COOKIE_HTTP_ONLY", true),
            auth_cookie_path: source
                .nonempty("AUTH_COOKIE_PATH")
                .unwrap_or_else(|| "/".to_string()),
            auth_cookie_same_site: source
                .lower_nonempty("AUTH_COOKIE_SAMESITE")
                .unwrap_or_else(|| "none".to_string()),
            auth_cookie_domain: source.nonempty("AUTH_COOKIE_DOMAIN"),
            otp_length: source
                .parsed("OTP_LENGTH")
                .filter(|length| *length > 0)
                .unwrap_or(DEFAULT_OTP_LENGTH),
            otp_ttl_seconds: source.parsed("OTP_TTL_SECONDS").unwrap_or(DEFAULT_OTP_TTL),
            email_provider: source.lower_nonempty("EMAIL_PROVIDER"),
            email_from: source.nonempty("EMAIL_FROM"),
            resend_api_key: source.nonempty("RESEND_API_KEY"),
            smtp_host: source.nonempty("SMTP_HOST"),
            smtp_port: source.parsed("SMTP_PORT"),
            smtp_username: source.nonempty("SMTP_USERNAME"),
            smtp_password: source.nonempty("SMTP_PASSWORD"),
            smtp_starttls: source.bool("SMTP_STARTTLS", false),
            sms_webhook_url: source.nonempty("SMS_WEBHOOK_URL"),
            sms_webhook_token: source.nonempty("SMS_WEBHOOK_TOKEN"),
            bootstrap_superuser_email: source.nonempty("BOOTSTRAP_SUPERUSER_EMAIL"),
            bootstrap_superuser_password: source.nonempty("BOOTSTRAP_SUPERUSER_PASSWORD"),
        };

        Self {
            config: Arc::new(config),
        }
    }
}

impl ConfigService for ConfigServiceImpl {
    fn port(&self) -> u16 {
        self.config.port
    }

    fn values(&self) -> &Config {
        &self.config
    }
}
