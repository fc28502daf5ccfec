use crate::utils::error::{PortalError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PortalError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 路由設定必須是以 `/` 開頭的絕對路徑
pub fn validate_route_path(field_name: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route must start with '/'".to_string(),
        });
    }

    if path.contains('?') || path.contains('#') {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route must not carry a query or fragment".to_string(),
        });
    }

    Ok(())
}

/// Only a shape check; the mail provider does the real verification.
pub fn validate_email_address(field_name: &str, address: &str) -> Result<()> {
    let invalid = |reason: &str| PortalError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: address.to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = address
        .split_once('@')
        .ok_or_else(|| invalid("Address must contain '@'"))?;

    if local.is_empty() || domain.is_empty() {
        return Err(invalid("Address must have a local part and a domain"));
    }

    if address.chars().any(char::is_whitespace) {
        return Err(invalid("Address must not contain whitespace"));
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PortalError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
