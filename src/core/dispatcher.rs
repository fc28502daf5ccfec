use crate::adapters::text::PlaceholderTextSender;
use crate::config::NotifierConfig;
use crate::core::templates::{MessageTemplates, RenderedEmail};
use crate::domain::model::{
    non_blank, Applicant, DeliveryOutcome, DispatchReport, EmailReceipt, OutboundEmail,
    TextDelivery, TextMessage,
};
use crate::domain::ports::{MailTransport, TextMessageSender};
use crate::utils::error::Result;

/// Sends the membership-application notifications.
///
/// The three `notify_*` entry points never fail: problems are logged and
/// show up in the returned [`DispatchReport`]. [`send_notification`] is the
/// shared email routine and does propagate provider errors.
///
/// [`send_notification`]: NotificationDispatcher::send_notification
pub struct NotificationDispatcher<M: MailTransport> {
    mail: M,
    sms: Box<dyn TextMessageSender>,
    whatsapp: Box<dyn TextMessageSender>,
    templates: MessageTemplates,
    config: NotifierConfig,
}

impl<M: MailTransport> NotificationDispatcher<M> {
    pub fn new(mail: M, config: NotifierConfig) -> Result<Self> {
        Ok(Self {
            mail,
            sms: Box::new(PlaceholderTextSender::sms(config.environment)),
            whatsapp: Box::new(PlaceholderTextSender::whatsapp(config.environment)),
            templates: MessageTemplates::new()?,
            config,
        })
    }

    pub fn with_text_senders(
        mut self,
        sms: Box<dyn TextMessageSender>,
        whatsapp: Box<dyn TextMessageSender>,
    ) -> Self {
        self.sms = sms;
        self.whatsapp = whatsapp;
        self
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Alerts the membership secretaries about a new application.
    pub async fn notify_new_application(
        &self,
        notification_emails: &[String],
        applicant: &Applicant,
    ) -> DispatchReport {
        let recipients: Vec<String> = notification_emails
            .iter()
            .filter(|e| !e.trim().is_empty())
            .cloned()
            .collect();
        if recipients.is_empty() {
            tracing::debug!("No notification recipients configured, skipping new application alert");
            return DispatchReport::skipped();
        }

        let email = self
            .email_outcome(
                "new application",
                &recipients,
                self.templates.new_application_email(applicant),
            )
            .await;
        if email.is_failure() {
            return failed_email(email);
        }

        let sms = self
            .text_outcome(
                self.sms.as_ref(),
                self.config.sms_enabled,
                self.config.secretary_phone.as_deref(),
                || self.templates.new_application_text(applicant),
            )
            .await;
        let whatsapp = self
            .text_outcome(
                self.whatsapp.as_ref(),
                self.config.whatsapp_enabled,
                self.config.secretary_whatsapp.as_deref(),
                || self.templates.new_application_text(applicant),
            )
            .await;

        DispatchReport {
            email,
            sms,
            whatsapp,
        }
    }

    /// Tells the applicant their application was approved.
    pub async fn notify_application_approved(
        &self,
        applicant: &Applicant,
        review_notes: Option<&str>,
    ) -> DispatchReport {
        let Some(address) = applicant.email_address() else {
            tracing::debug!("Applicant has no email, skipping approval notification");
            return DispatchReport::skipped();
        };

        let email = self
            .email_outcome(
                "application approved",
                &[address.to_string()],
                self.templates.approved_email(applicant, review_notes),
            )
            .await;
        if email.is_failure() {
            return failed_email(email);
        }

        let sms = self
            .text_outcome(
                self.sms.as_ref(),
                self.config.sms_enabled,
                applicant.phone_number(),
                || self.templates.approved_text(applicant),
            )
            .await;
        let whatsapp = self
            .text_outcome(
                self.whatsapp.as_ref(),
                self.config.whatsapp_enabled,
                applicant.whatsapp_number(),
                || self.templates.approved_text(applicant),
            )
            .await;

        DispatchReport {
            email,
            sms,
            whatsapp,
        }
    }

    /// Tells the applicant their application was rejected; `review_notes` is the reason.
    pub async fn notify_application_rejected(
        &self,
        applicant: &Applicant,
        review_notes: Option<&str>,
    ) -> DispatchReport {
        let Some(address) = applicant.email_address() else {
            tracing::debug!("Applicant has no email, skipping rejection notification");
            return DispatchReport::skipped();
        };

        let email = self
            .email_outcome(
                "application rejected",
                &[address.to_string()],
                self.templates.rejected_email(applicant, review_notes),
            )
            .await;
        if email.is_failure() {
            return failed_email(email);
        }

        let sms = self
            .text_outcome(
                self.sms.as_ref(),
                self.config.sms_enabled,
                applicant.phone_number(),
                || self.templates.rejected_text(applicant, review_notes),
            )
            .await;
        let whatsapp = self
            .text_outcome(
                self.whatsapp.as_ref(),
                self.config.whatsapp_enabled,
                applicant.whatsapp_number(),
                || self.templates.rejected_text(applicant, review_notes),
            )
            .await;

        DispatchReport {
            email,
            sms,
            whatsapp,
        }
    }

    /// Sends one HTML email from the configured notification sender.
    ///
    /// Outside production nothing leaves the process: the message is logged
    /// and `Ok(None)` is returned.
    pub async fn send_notification(
        &self,
        to: &[String],
        subject: &str,
        html: &str,
    ) -> Result<Option<EmailReceipt>> {
        if to.is_empty() {
            tracing::warn!("send_notification called without recipients: {:?}", subject);
            return Ok(None);
        }

        if !self.config.environment.is_production() {
            tracing::info!("📧 Email would be sent:");
            tracing::info!("To: {:?}", to);
            tracing::info!("Subject: {}", subject);
            tracing::info!("Content: {}", html);
            return Ok(None);
        }

        let email = OutboundEmail {
            from: self.config.notification_sender(),
            to: to.to_vec(),
            subject: subject.to_string(),
            html: html.to_string(),
            text: None,
        };

        match self.mail.send(&email).await {
            Ok(receipt) => {
                tracing::info!("✅ Notification sent to {} recipient(s)", to.len());
                Ok(Some(receipt))
            }
            Err(e) => {
                tracing::error!("❌ Failed to send notification: {}", e);
                Err(e)
            }
        }
    }

    async fn email_outcome(
        &self,
        event: &str,
        to: &[String],
        rendered: Result<RenderedEmail>,
    ) -> DeliveryOutcome {
        let result = match rendered {
            Ok(rendered) => {
                self.send_notification(to, &rendered.subject, &rendered.html)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(Some(receipt)) => DeliveryOutcome::Sent { id: receipt.id },
            Ok(None) => DeliveryOutcome::Logged,
            Err(e) => {
                tracing::error!("Error sending {} notification: {}", event, e);
                DeliveryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn text_outcome<F>(
        &self,
        sender: &dyn TextMessageSender,
        enabled: bool,
        to: Option<&str>,
        body: F,
    ) -> DeliveryOutcome
    where
        F: FnOnce() -> Result<String>,
    {
        let Some(to) = non_blank(to).filter(|_| enabled) else {
            return DeliveryOutcome::Skipped;
        };

        let message = match body() {
            Ok(body) => TextMessage {
                channel: sender.channel(),
                to: to.to_string(),
                body,
            },
            Err(e) => {
                tracing::error!("Error rendering {} message: {}", sender.channel(), e);
                return DeliveryOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match sender.send(&message).await {
            Ok(TextDelivery::Delivered { id }) => DeliveryOutcome::Sent { id },
            Ok(TextDelivery::Logged) => DeliveryOutcome::Logged,
            Err(e) => {
                tracing::error!("Error sending {} message to {}: {}", sender.channel(), to, e);
                DeliveryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// 郵件失敗時，後續的簡訊與 WhatsApp 不再嘗試
fn failed_email(email: DeliveryOutcome) -> DispatchReport {
    DispatchReport {
        email,
        ..DispatchReport::skipped()
    }
}
