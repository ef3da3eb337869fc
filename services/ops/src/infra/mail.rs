use anyhow::Context as _;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::{EmailBackend, OpsConfig};
use crate::domain::repository::MailTransport;
use crate::domain::types::OutgoingMail;
use crate::error::MailError;

// ── Console ──────────────────────────────────────────────────────────────────

/// Writes each message to the log instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

impl MailTransport for ConsoleMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "email (console backend)"
        );
        Ok(())
    }
}

// ── SMTP ─────────────────────────────────────────────────────────────────────

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// STARTTLS relay when `use_tls`, plaintext otherwise.
    pub fn new(
        host: &str,
        port: u16,
        use_tls: bool,
        credentials: Option<(String, String)>,
    ) -> anyhow::Result<Self> {
        let mut builder = if use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .with_context(|| format!("configure SMTP relay {host}"))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        builder = builder.port(port);
        if let Some((user, password)) = credentials {
            builder = builder.credentials(Credentials::new(user, password));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_owned(),
        reason: e.to_string(),
    })
}

fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .to(parse_mailbox(&mail.to)?)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

// ── Configured ───────────────────────────────────────────────────────────────

/// The transport chosen by `EMAIL_BACKEND`.
pub enum ConfiguredMailer {
    Console(ConsoleMailer),
    Smtp(SmtpMailer),
}

impl ConfiguredMailer {
    pub fn from_config(config: &OpsConfig) -> anyhow::Result<Self> {
        match config.email_backend {
            EmailBackend::Console => Ok(Self::Console(ConsoleMailer)),
            EmailBackend::Smtp => {
                let host = config
                    .email_host
                    .as_deref()
                    .context("EMAIL_HOST is required when EMAIL_BACKEND=smtp")?;
                let credentials = config
                    .email_host_user
                    .clone()
                    .zip(config.email_host_password.clone());
                let mailer =
                    SmtpMailer::new(host, config.email_port, config.email_use_tls, credentials)?;
                Ok(Self::Smtp(mailer))
            }
        }
    }
}

impl MailTransport for ConfiguredMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        match self {
            Self::Console(mailer) => mailer.send(mail).await,
            Self::Smtp(mailer) => mailer.send(mail).await,
        }
    }
}
