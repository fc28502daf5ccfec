use crate::config::{NotifierConfig, DEFAULT_RESEND_BASE_URL};
use crate::domain::model::{EmailReceipt, OutboundEmail};
use crate::domain::ports::MailTransport;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    name: Option<String>,
}

/// Resend `POST /emails` client.
#[derive(Debug, Clone)]
pub struct ResendClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ResendClient {
    /// 缺少 API key 不會在建構時失敗，等到實際寄送時才回報
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_RESEND_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &NotifierConfig) -> Self {
        Self::with_base_url(config.resend_api_key.clone(), config.resend_base_url.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl MailTransport for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<EmailReceipt> {
        let api_key = validate_required_field("RESEND_API_KEY", &self.api_key)?;

        tracing::debug!(
            "Sending email via Resend: {} recipient(s), subject {:?}",
            email.to.len(),
            email.subject
        );
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Resend response status: {}", status);

        if status.is_success() {
            let body: SendEmailResponse = response.json().await?;
            return Ok(EmailReceipt {
                id: body.id,
                sent_at: chrono::Utc::now(),
            });
        }

        let raw = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                message: Some(message),
                name,
            }) => match name {
                Some(name) => format!("{}: {}", name, message),
                None => message,
            },
            _ => raw,
        };

        Err(PortalError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}
