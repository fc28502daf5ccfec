use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which of the four route sets a path falls into. The sets overlap freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteClassification {
    pub api_auth: bool,
    pub public: bool,
    pub auth_only: bool,
    pub platform: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Continue,
    Redirect { location: String },
}

impl GateDecision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, GateDecision::Redirect { .. })
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            GateDecision::Redirect { location } => Some(location),
            GateDecision::Continue => None,
        }
    }
}

/// 申請人聯絡資料，除姓名外皆可能缺漏
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

impl Applicant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_whatsapp(mut self, whatsapp: impl Into<String>) -> Self {
        self.whatsapp = Some(whatsapp.into());
        self
    }

    /// Email with blank values treated as absent.
    pub fn email_address(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    pub fn phone_number(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    pub fn whatsapp_number(&self) -> Option<&str> {
        non_blank(self.whatsapp.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub id: Option<String>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextChannel {
    Sms,
    WhatsApp,
}

impl std::fmt::Display for TextChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextChannel::Sms => write!(f, "sms"),
            TextChannel::WhatsApp => write!(f, "whatsapp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage {
    pub channel: TextChannel,
    pub to: String,
    pub body: String,
}

/// What a text sender actually did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDelivery {
    /// Handed to a provider; `id` when it returned one.
    Delivered { id: Option<String> },
    /// 只寫入日誌
    Logged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Handed to a provider (or a placeholder that claims it was).
    Sent { id: Option<String> },
    /// 非正式環境：只寫入日誌，未對外發送
    Logged,
    /// Not attempted: channel disabled, no recipient, or an earlier step failed.
    Skipped,
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DeliveryOutcome::Failed { .. })
    }
}

/// Per-channel result of one notification event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub email: DeliveryOutcome,
    pub sms: DeliveryOutcome,
    pub whatsapp: DeliveryOutcome,
}

impl DispatchReport {
    pub fn skipped() -> Self {
        Self {
            email: DeliveryOutcome::Skipped,
            sms: DeliveryOutcome::Skipped,
            whatsapp: DeliveryOutcome::Skipped,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.email.is_failure() || self.sms.is_failure() || self.whatsapp.is_failure()
    }

    pub fn to_json_pretty(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
