use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::{Deserialize, Serialize};

use super::Notifier;
use crate::error::NotificationError;
use crate::templates::render_email;
use crate::types::UpstreamCallNotice;

/// SMTP settings for the e-mail notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Sender address; defaults to `username`
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}

fn default_smtp_port() -> u16 {
    465
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from: None,
            recipient: None,
        }
    }
}

/// Sends each notice as an e-mail with the raw payload attached as JSON.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    /// Builds the SMTP transport.
    ///
    /// Port 587 uses STARTTLS; any other port uses implicit TLS.
    pub fn new(config: &EmailConfig) -> Result<Self, NotificationError> {
        let (Some(username), Some(password), Some(recipient)) =
            (&config.username, &config.password, &config.recipient)
        else {
            return Err(NotificationError::InvalidConfig(
                "Email configuration missing. Set username, password, and recipient".into(),
            ));
        };

        // App passwords are often pasted with grouping spaces
        let password: String = password.split_whitespace().collect();

        let from_addr = config.from.as_ref().unwrap_or(username);
        let from: Mailbox = from_addr
            .parse()
            .map_err(|e| NotificationError::InvalidConfig(format!("Invalid from: {}", e)))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| NotificationError::InvalidConfig(format!("Invalid to: {}", e)))?;

        let builder = if config.smtp_port == 587 {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        }
        .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?;

        let mailer = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(username.clone(), password))
            .build();

        Ok(Self { mailer, from, to })
    }

    fn build_message(&self, notice: &UpstreamCallNotice) -> Result<Message, NotificationError> {
        let content = render_email(notice)?;

        let json_type = ContentType::parse("application/json")
            .map_err(|e| NotificationError::Internal(e.to_string()))?;

        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(content.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(content.body))
                    .singlepart(
                        Attachment::new(content.attachment_name)
                            .body(content.attachment_json.into_bytes(), json_type),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, notice: UpstreamCallNotice) -> Result<(), NotificationError> {
        let email = self.build_message(&notice)?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        tracing::info!(
            course_id = %notice.course_id,
            course_name = %notice.course_name,
            kind = notice.label(),
            "Email sent"
        );
        if let Some(left) = &notice.quota_remaining {
            tracing::info!(quota_remaining = %left, "API requests remaining");
        }
        Ok(())
    }
}
