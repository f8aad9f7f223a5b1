#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub session_key_prefix: String,

    // Auth cookie, mirrors the `access` cookie the frontends already expect.
    pub auth_cookie_name: String,
    pub auth_cookie_max_age_seconds: u64,
    pub auth_cookie_secure: bool,
    pub auth_cookie_http_only: bool,
    pub auth_cookie_path: String,
    pub auth_cookie_same_site: String,
    pub auth_cookie_domain: Option<String>,

    pub otp_length: usize,
    pub otp_ttl_seconds: u64,

    // Optional OTP delivery. Channels without configuration are skipped.
    pub email_provider: Option<String>,
    pub email_from: Option<String>,
    pub resend_api_key: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_starttls: bool,
    pub sms_webhook_url: Option<String>,
    pub sms_webhook_token: Option<String>,

    pub bootstrap_superuser_email: Option<String>,
    pub bootstrap_superuser_password: Option<String>,
}
