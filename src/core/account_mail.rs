use crate::config::NotifierConfig;
use crate::domain::model::{non_blank, EmailReceipt, OutboundEmail};
use crate::domain::ports::MailTransport;
use crate::utils::error::Result;

/// Account lifecycle mail: two-factor codes, password reset and email
/// verification links, plus a plain one-off notification.
pub struct AccountMailer<M: MailTransport> {
    mail: M,
    config: NotifierConfig,
}

impl<M: MailTransport> AccountMailer<M> {
    pub fn new(mail: M, config: NotifierConfig) -> Self {
        if config.app_url.is_none() {
            tracing::warn!("APP_URL is not set, account links will be relative");
        }
        Self { mail, config }
    }

    pub async fn send_two_factor_token_email(&self, email: &str, token: &str) -> Option<EmailReceipt> {
        let email = recipient("2FA", email)?;
        tracing::debug!("Sending 2FA email to: {}", email);

        let message = OutboundEmail {
            from: self.config.account_from.clone(),
            to: vec![email.to_string()],
            subject: "2FA Code".to_string(),
            html: format!("<p>Your 2FA code: {}</p>", token),
            text: None,
        };

        self.deliver_logged("2FA", message).await
    }

    pub async fn send_password_reset_email(&self, email: &str, token: &str) -> Option<EmailReceipt> {
        let email = recipient("password reset", email)?;
        let reset_link = self.link("/new-password", token);
        tracing::debug!("Password reset link: {}", reset_link);

        let message = OutboundEmail {
            from: self.config.account_from.clone(),
            to: vec![email.to_string()],
            subject: "Reset your password".to_string(),
            html: format!(
                "<p>Click <a href=\"{}\">here</a> to reset password.</p>",
                reset_link
            ),
            text: None,
        };

        self.deliver_logged("password reset", message).await
    }

    pub async fn send_verification_email(&self, email: &str, token: &str) -> Option<EmailReceipt> {
        let email = recipient("verification", email)?;
        let confirm_link = self.link("/new-verification", token);
        tracing::debug!("Email confirmation link: {}", confirm_link);

        let message = OutboundEmail {
            from: self.config.support_from.clone(),
            to: vec![email.to_string()],
            subject: "Confirm your email".to_string(),
            html: format!(
                "<p>Click <a href=\"{}\">here</a> to confirm email.</p>",
                confirm_link
            ),
            text: Some(format!(
                "Click the following link to confirm your email: {}",
                confirm_link
            )),
        };

        self.deliver_logged("verification", message).await
    }

    /// Unlike the token emails, provider errors are returned to the caller.
    pub async fn send_email_notification(
        &self,
        to_email: &str,
        subject: &str,
        content: &str,
    ) -> Result<Option<EmailReceipt>> {
        let Some(to_email) = recipient("notification", to_email) else {
            return Ok(None);
        };

        let message = OutboundEmail {
            from: self.config.account_from.clone(),
            to: vec![to_email.to_string()],
            subject: subject.to_string(),
            html: format!("<p>{}</p>", content),
            text: None,
        };

        match self.deliver(&message).await {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                tracing::error!("An error occurred while sending email notification: {}", e);
                Err(e)
            }
        }
    }

    fn link(&self, path: &str, token: &str) -> String {
        let base = self
            .config
            .app_url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/');
        format!("{}{}?token={}", base, path, urlencoding::encode(token))
    }

    async fn deliver_logged(&self, kind: &str, message: OutboundEmail) -> Option<EmailReceipt> {
        match self.deliver(&message).await {
            Ok(Some(receipt)) => {
                tracing::info!("✅ {} email sent successfully to {}", kind, message.to.join(", "));
                Some(receipt)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!("❌ Error sending {} email: {}", kind, e);
                None
            }
        }
    }

    async fn deliver(&self, message: &OutboundEmail) -> Result<Option<EmailReceipt>> {
        if !self.config.environment.is_production() {
            tracing::info!("📧 Email would be sent:");
            tracing::info!("To: {:?}", message.to);
            tracing::info!("Subject: {}", message.subject);
            tracing::info!("Content: {}", message.html);
            return Ok(None);
        }

        self.mail.send(message).await.map(Some)
    }
}

fn recipient<'a>(kind: &str, email: &'a str) -> Option<&'a str> {
    let email = non_blank(Some(email));
    if email.is_none() {
        tracing::debug!("No recipient address, skipping {} email", kind);
    }
    email
}
