use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::env;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Failed to build email message: {0}")]
    MessageBuild(String),
    #[error("Failed to send email: {0}")]
    SendFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[async_trait]
pub trait EmailService: Send + Sync {
    /// Delivers the raw reset token as a link. This is the only place
    /// the raw token leaves the process.
    async fn send_password_reset_email(
        &self,
        to_email: &str,
        raw_token: &str,
    ) -> Result<(), EmailError>;
}

pub struct MockEmailService {
    base_url: String,
}

impl MockEmailService {
    pub fn new() -> Self {
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        Self { base_url }
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_password_reset_email(
        &self,
        to_email: &str,
        raw_token: &str,
    ) -> Result<(), EmailError> {
        let reset_link = format!("{}/reset-password?token={}", self.base_url, raw_token);
        tracing::info!("[MOCK EMAIL] Password reset email to: {}", to_email);
        tracing::info!("   Subject: Reset Your Password");
        tracing::info!("   Reset link: {}", reset_link);
        tracing::info!("   ---");
        Ok(())
    }
}

pub struct SmtpEmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: String,
    base_url: String,
}

impl SmtpEmailService {
    pub fn new() -> Result<Self, EmailError> {
        let smtp_host = env::var("SMTP_HOST")
            .map_err(|_| EmailError::ConfigError("SMTP_HOST not set".to_string()))?;
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| EmailError::ConfigError("Invalid SMTP_PORT".to_string()))?;
        let smtp_username = env::var("SMTP_USERNAME")
            .map_err(|_| EmailError::ConfigError("SMTP_USERNAME not set".to_string()))?;
        let smtp_password = env::var("SMTP_PASSWORD")
            .map_err(|_| EmailError::ConfigError("SMTP_PASSWORD not set".to_string()))?;
        let from_email = env::var("SMTP_FROM_EMAIL")
            .map_err(|_| EmailError::ConfigError("SMTP_FROM_EMAIL not set".to_string()))?;
        let from_name =
            env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Medivia Security".to_string());
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let credentials = Credentials::new(smtp_username, smtp_password);

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_host)
            .map_err(|e| EmailError::ConfigError(format!("SMTP starttls error: {}", e)))?
            .port(smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_email,
            from_name,
            base_url,
        })
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_password_reset_email(
        &self,
        to_email: &str,
        raw_token: &str,
    ) -> Result<(), EmailError> {
        let reset_link = format!("{}/reset-password?token={}", self.base_url, raw_token);

        let html_body = format!(
            r#"
<h3>Medivia Password Reset</h3>
<p>Click below to reset your password:</p>
<a href="{}">{}</a>
<p>Expires in 1 hour.</p>
"#,
            reset_link, reset_link
        );

        let email = Message::builder()
            .from(
                format!("{} <{}>", self.from_name, self.from_email)
                    .parse()
                    .map_err(|e| {
                        EmailError::MessageBuild(format!("Invalid from address: {}", e))
                    })?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::MessageBuild(format!("Invalid to address: {}", e)))?)
            .subject("Reset Your Password")
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| EmailError::MessageBuild(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

pub fn create_email_service() -> Arc<dyn EmailService> {
    if env::var("SMTP_HOST").is_ok() {
        match SmtpEmailService::new() {
            Ok(service) => {
                tracing::info!("Using SMTP email service");
                Arc::new(service)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize SMTP email service: {}. Falling back to mock service",
                    e
                );
                Arc::new(MockEmailService::new())
            }
        }
    } else {
        tracing::info!(
            "SMTP not configured. Using mock email service (emails will be logged to console)"
        );
        Arc::new(MockEmailService::new())
    }
}
