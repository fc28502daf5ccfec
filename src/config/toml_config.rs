use crate::config::{Environment, NotifierConfig};
use crate::core::route_gate::RouteTable;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional file-based configuration. Every section and field may be left out;
/// missing routes fall back to the built-in table and missing notifier fields
/// keep whatever the environment provided.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalToml {
    pub routes: Option<RouteTable>,
    pub notifications: Option<NotificationsSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsSection {
    pub environment: Option<Environment>,
    pub resend_api_key: Option<String>,
    pub resend_base_url: Option<String>,
    pub email_from: Option<String>,
    pub sender_name: Option<String>,
    pub account_from: Option<String>,
    pub support_from: Option<String>,
    pub sms_enabled: Option<bool>,
    pub whatsapp_enabled: Option<bool>,
    pub secretary_phone: Option<String>,
    pub secretary_whatsapp: Option<String>,
    pub app_url: Option<String>,
    /// Addresses that receive new-application alerts.
    pub notification_emails: Option<Vec<String>>,
}

impl PortalToml {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RESEND_API_KEY})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortalError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn route_table(&self) -> RouteTable {
        self.routes.clone().unwrap_or_default()
    }

    pub fn notification_emails(&self) -> Vec<String> {
        self.notifications
            .as_ref()
            .and_then(|n| n.notification_emails.clone())
            .unwrap_or_default()
    }

    /// Overlays the `[notifications]` section onto `base`.
    pub fn apply_to(&self, mut base: NotifierConfig) -> NotifierConfig {
        let Some(section) = &self.notifications else {
            return base;
        };

        if let Some(environment) = section.environment {
            base.environment = environment;
        }
        if let Some(key) = resolved("resend_api_key", &section.resend_api_key) {
            base.resend_api_key = Some(key);
        }
        if let Some(url) = resolved("resend_base_url", &section.resend_base_url) {
            base.resend_base_url = url;
        }
        if let Some(from) = resolved("email_from", &section.email_from) {
            base.email_from = from;
        }
        if let Some(name) = resolved("sender_name", &section.sender_name) {
            base.sender_name = name;
        }
        if let Some(from) = resolved("account_from", &section.account_from) {
            base.account_from = from;
        }
        if let Some(from) = resolved("support_from", &section.support_from) {
            base.support_from = from;
        }
        if let Some(enabled) = section.sms_enabled {
            base.sms_enabled = enabled;
        }
        if let Some(enabled) = section.whatsapp_enabled {
            base.whatsapp_enabled = enabled;
        }
        if let Some(phone) = resolved("secretary_phone", &section.secretary_phone) {
            base.secretary_phone = Some(phone);
        }
        if let Some(number) = resolved("secretary_whatsapp", &section.secretary_whatsapp) {
            base.secretary_whatsapp = Some(number);
        }
        if let Some(url) = resolved("app_url", &section.app_url) {
            base.app_url = Some(url);
        }

        base
    }
}

/// Drops empty values and `${VAR}` placeholders whose variable was not set.
fn resolved(field: &str, value: &Option<String>) -> Option<String> {
    let value = value.as_ref()?.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with("${") && value.ends_with('}') {
        tracing::warn!("notifications.{} references an unset variable {}", field, value);
        return None;
    }
    Some(value.to_string())
}

impl Validate for PortalToml {
    fn validate(&self) -> Result<()> {
        if let Some(routes) = &self.routes {
            routes.validate()?;
        }
        for address in self.notification_emails() {
            crate::utils::validation::validate_email_address(
                "notifications.notification_emails",
                &address,
            )?;
        }
        Ok(())
    }
}
