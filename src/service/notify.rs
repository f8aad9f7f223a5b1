use async_trait::async_trait;
use lettre::{
    message::{header, Mailbox, Message},
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use reqwest::StatusCode;
use serde::Serialize;
use std::{sync::Arc, time::Duration};

use crate::config::Config;

const OTP_SUBJECT: &str = "Your verification code";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a one-time code goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Email(String),
    Sms(String),
}

impl Destination {
    fn channel(&self) -> &'static str {
        match self {
            Destination::Email(_) => "email",
            Destination::Sms(_) => "sms",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification misconfigured: {0}")]
    Misconfigured(String),
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("build message failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp send failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_otp(&self, destination: &Destination, code: &str) -> Result<(), NotifyError>;
}

/// Sends the code on a background task. Failures are logged, never returned.
pub fn dispatch_in_background(notifier: Arc<dyn Notifier>, destination: Destination, code: String) {
    tokio::spawn(async move {
        match notifier.send_otp(&destination, &code).await {
            Ok(()) => tracing::debug!(channel = destination.channel(), "verification code dispatched"),
            Err(err) => tracing::warn!(
                channel = destination.channel(),
                error = %err,
                "failed to dispatch verification code"
            ),
        }
    });
}

#[derive(Serialize)]
struct ResendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Serialize)]
struct SmsWebhookRequest<'a> {
    to: &'a str,
    message: &'a str,
}

fn build_otp_email_html(code: &str) -> String {
    format!(
        concat!(
            "<div style=\"font-family:ui-sans-serif,system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial;line-height:1.5\">",
            "<h2 style=\"margin:0 0 12px\">Your verification code</h2>",
            "<p style=\"margin:0 0 12px;font-size:24px;letter-spacing:4px\"><strong>{code}</strong></p>",
            "<p style=\"margin:18px 0 0;color:#666;font-size:12px\">If you did not request this, you can ignore this email.</p>",
            "</div>"
        ),
        code = code
    )
}

fn build_otp_sms_text(code: &str) -> String {
    format!("Your verification code is {}", code)
}

/// Delivers codes through whatever the [`Config`] enables: SMTP or Resend for
/// email, an HTTP webhook for SMS.
pub struct ConfiguredNotifier {
    config: Config,
    client: reqwest::Client,
}

impl ConfiguredNotifier {
    pub fn new(config: Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    async fn send_email(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        let cfg = &self.config;
        let Some(from) = cfg.email_from.as_deref() else {
            tracing::debug!("EMAIL_FROM is not set, skipping email delivery");
            return Ok(());
        };

        let provider = cfg.email_provider.as_deref().unwrap_or("auto");
        match provider {
            "smtp" => {
                let (Some(host), Some(port)) = (cfg.smtp_host.as_deref(), cfg.smtp_port) else {
                    return Err(NotifyError::Misconfigured(
                        "EMAIL_PROVIDER=smtp but SMTP_HOST/SMTP_PORT are missing".to_string(),
                    ));
                };
                self.send_email_smtp(host, port, from, to, code).await
            }
            "resend" => {
                let Some(api_key) = cfg.resend_api_key.as_deref() else {
                    return Err(NotifyError::Misconfigured(
                        "EMAIL_PROVIDER=resend but RESEND_API_KEY is missing".to_string(),
                    ));
                };
                self.send_email_resend(api_key, from, to, code).await
            }
            "auto" => {
                if let (Some(host), Some(port)) = (cfg.smtp_host.as_deref(), cfg.smtp_port) {
                    return self.send_email_smtp(host, port, from, to, code).await;
                }
                if let Some(api_key) = cfg.resend_api_key.as_deref() {
                    return self.send_email_resend(api_key, from, to, code).await;
                }
                tracing::debug!("no email provider configured, skipping email delivery");
                Ok(())
            }
            other => Err(NotifyError::Misconfigured(format!(
                "unsupported EMAIL_PROVIDER={}, expected smtp|resend|auto",
                other
            ))),
        }
    }

    async fn send_email_resend(
        &self,
        api_key: &str,
        from: &str,
        to: &str,
        code: &str,
    ) -> Result<(), NotifyError> {
        let html = build_otp_email_html(code);
        let payload = ResendEmailRequest {
            from,
            to: vec![to],
            subject: OTP_SUBJECT,
            html: &html,
        };

        let res = self
            .client
            .post("https://api.resend.com/emails")
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if res.status() == StatusCode::OK || res.status() == StatusCode::CREATED {
            return Ok(());
        }

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(NotifyError::Rejected { status, body })
    }

    async fn send_email_smtp(
        &self,
        host: &str,
        port: u16,
        from: &str,
        to: &str,
        code: &str,
    ) -> Result<(), NotifyError> {
        let cfg = &self.config;
        let from: Mailbox = from.parse()?;
        let to: Mailbox = to.parse()?;

        let msg = Message::builder()
            .from(from)
            .to(to)
            .subject(OTP_SUBJECT)
            .header(header::ContentType::TEXT_HTML)
            .body(build_otp_email_html(code))?;

        let mut builder = if cfg.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
                .port(port)
                .timeout(Some(SEND_TIMEOUT))
        } else {
            // Plain SMTP for local relays such as Mailpit.
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(port)
                .timeout(Some(SEND_TIMEOUT))
        };

        if let (Some(username), Some(password)) =
            (cfg.smtp_username.as_deref(), cfg.smtp_password.as_deref())
        {
            builder = builder.credentials(lettre::transport::smtp::authentication::Credentials::new(
                username.to_string(),
                password.to_string(),
            ));
        }

        builder.build().send(msg).await?;
        Ok(())
    }

    async fn send_sms(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        let Some(url) = self.config.sms_webhook_url.as_deref() else {
            tracing::debug!("SMS_WEBHOOK_URL is not set, skipping sms delivery");
            return Ok(());
        };

        let message = build_otp_sms_text(code);
        let mut request = self
            .client
            .post(url)
            .json(&SmsWebhookRequest { to, message: &message });
        if let Some(token) = self.config.sms_webhook_token.as_deref() {
            request = request.bearer_auth(token);
        }

        let res = request.send().await?;
        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(NotifyError::Rejected { status, body })
    }
}

#[async_trait]
impl Notifier for ConfiguredNotifier {
    async fn send_otp(&self, destination: &Destination, code: &str) -> Result<(), NotifyError> {
        match destination {
            Destination::Email(to) => self.send_email(to, code).await,
            Destination::Sms(to) => self.send_sms(to, code).await,
        }
    }
}
