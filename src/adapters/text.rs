use crate::config::Environment;
use crate::domain::model::{TextChannel, TextDelivery, TextMessage};
use crate::domain::ports::TextMessageSender;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Stand-in for an SMS / WhatsApp provider. It never contacts anything and
/// always reports success; a real provider replaces it through
/// `TextMessageSender`.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderTextSender {
    channel: TextChannel,
    environment: Environment,
}

impl PlaceholderTextSender {
    pub fn new(channel: TextChannel, environment: Environment) -> Self {
        Self {
            channel,
            environment,
        }
    }

    pub fn sms(environment: Environment) -> Self {
        Self::new(TextChannel::Sms, environment)
    }

    pub fn whatsapp(environment: Environment) -> Self {
        Self::new(TextChannel::WhatsApp, environment)
    }
}

#[async_trait]
impl TextMessageSender for PlaceholderTextSender {
    fn channel(&self) -> TextChannel {
        self.channel
    }

    async fn send(&self, message: &TextMessage) -> Result<TextDelivery> {
        let icon = match self.channel {
            TextChannel::Sms => "📱",
            TextChannel::WhatsApp => "💬",
        };

        if !self.environment.is_production() {
            tracing::info!(
                "{} {} notification (not sent outside production) to {}: {}",
                icon,
                self.channel,
                message.to,
                message.body
            );
            return Ok(TextDelivery::Logged);
        }

        tracing::warn!(
            "{} {} provider not configured, reporting {} as sent",
            icon,
            self.channel,
            message.to
        );
        Ok(TextDelivery::Delivered { id: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_reports_what_it_did() {
        let message = TextMessage {
            channel: TextChannel::Sms,
            to: "+249900000000".to_string(),
            body: "hello".to_string(),
        };

        let sender = PlaceholderTextSender::sms(Environment::Development);
        let result = tokio_test::block_on(sender.send(&message));
        assert!(matches!(result, Ok(TextDelivery::Logged)));

        let sender = PlaceholderTextSender::sms(Environment::Production);
        let result = tokio_test::block_on(sender.send(&message));
        assert!(matches!(result, Ok(TextDelivery::Delivered { id: None })));
    }

    #[test]
    fn test_channel_is_reported() {
        let sender = PlaceholderTextSender::whatsapp(Environment::Test);
        assert_eq!(sender.channel(), TextChannel::WhatsApp);
    }
}
