use crate::domain::model::{EmailReceipt, OutboundEmail, TextChannel, TextDelivery, TextMessage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Outbound transactional email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<EmailReceipt>;
}

/// SMS / WhatsApp delivery.
#[async_trait]
pub trait TextMessageSender: Send + Sync {
    fn channel(&self) -> TextChannel;

    async fn send(&self, message: &TextMessage) -> Result<TextDelivery>;
}
