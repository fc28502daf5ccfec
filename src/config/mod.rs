#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::PortalToml;

use crate::utils::error::Result;
use crate::utils::validation::{validate_email_address, validate_url, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_EMAIL_FROM: &str = "noreply@nmbdsd.org";
pub const DEFAULT_SENDER_NAME: &str = "الحركة الوطنية للبناء والتنمية";
pub const DEFAULT_ACCOUNT_FROM: &str = "no-reply@databayt.org";
pub const DEFAULT_SUPPORT_FROM: &str = "support@databayt.org";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// 只有明確設定為 production 才會真的寄信，其他值一律視為開發環境
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Settings for the notification and account-mail senders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub environment: Environment,
    #[serde(skip_serializing)]
    pub resend_api_key: Option<String>,
    pub resend_base_url: String,
    pub email_from: String,
    pub sender_name: String,
    pub account_from: String,
    pub support_from: String,
    pub sms_enabled: bool,
    pub whatsapp_enabled: bool,
    pub secretary_phone: Option<String>,
    pub secretary_whatsapp: Option<String>,
    pub app_url: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            resend_api_key: None,
            resend_base_url: DEFAULT_RESEND_BASE_URL.to_string(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            sender_name: DEFAULT_SENDER_NAME.to_string(),
            account_from: DEFAULT_ACCOUNT_FROM.to_string(),
            support_from: DEFAULT_SUPPORT_FROM.to_string(),
            sms_enabled: false,
            whatsapp_enabled: false,
            secretary_phone: None,
            secretary_whatsapp: None,
            app_url: None,
        }
    }
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        // 只有字串 "true" 才算開啟
        let flag = |key: &str| lookup(key).as_deref() == Some("true");

        Self {
            environment: get("APP_ENV")
                .or_else(|| get("NODE_ENV"))
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            resend_api_key: get("RESEND_API_KEY"),
            resend_base_url: get("RESEND_BASE_URL").unwrap_or(defaults.resend_base_url),
            email_from: get("EMAIL_FROM").unwrap_or(defaults.email_from),
            sender_name: get("EMAIL_SENDER_NAME").unwrap_or(defaults.sender_name),
            account_from: get("ACCOUNT_EMAIL_FROM").unwrap_or(defaults.account_from),
            support_from: get("SUPPORT_EMAIL_FROM").unwrap_or(defaults.support_from),
            sms_enabled: flag("SMS_NOTIFICATIONS_ENABLED"),
            whatsapp_enabled: flag("WHATSAPP_NOTIFICATIONS_ENABLED"),
            secretary_phone: get("MEMBERSHIP_SECRETARY_PHONE"),
            secretary_whatsapp: get("MEMBERSHIP_SECRETARY_WHATSAPP"),
            app_url: get("APP_URL"),
        }
    }

    /// `"Name <address>"` used as the sender of membership notifications.
    pub fn notification_sender(&self) -> String {
        format!("{} <{}>", self.sender_name, self.email_from)
    }
}

impl Validate for NotifierConfig {
    fn validate(&self) -> Result<()> {
        validate_url("resend_base_url", &self.resend_base_url)?;
        validate_email_address("email_from", &self.email_from)?;
        validate_email_address("account_from", &self.account_from)?;
        validate_email_address("support_from", &self.support_from)?;

        if let Some(app_url) = &self.app_url {
            validate_url("app_url", app_url)?;
        }

        if self.environment.is_production() {
            crate::utils::validation::validate_required_field(
                "RESEND_API_KEY",
                &self.resend_api_key,
            )?;
        }

        tracing::debug!("✅ Notifier configuration validation passed");
        Ok(())
    }
}
