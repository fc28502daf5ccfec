use httpmock::prelude::*;
use membership_portal::{AccountMailer, Environment, NotifierConfig, PortalError, ResendClient};

fn mailer(server: &MockServer) -> AccountMailer<ResendClient> {
    let config = NotifierConfig {
        environment: Environment::Production,
        resend_api_key: Some("re_account".to_string()),
        resend_base_url: server.base_url(),
        app_url: Some("https://portal.example.org".to_string()),
        ..NotifierConfig::default()
    };
    AccountMailer::new(ResendClient::from_config(&config), config)
}

#[tokio::test]
async fn test_verification_email_carries_link_and_text_body() {
    let server = MockServer::start_async().await;

    let resend_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/emails").json_body_partial(
                r#"{
                    "from": "support@databayt.org",
                    "to": ["new.member@example.org"],
                    "subject": "Confirm your email",
                    "text": "Click the following link to confirm your email: https://portal.example.org/new-verification?token=tok-123"
                }"#,
            );
            then.status(200)
                .json_body(serde_json::json!({ "id": "verify_1" }));
        })
        .await;

    let receipt = mailer(&server)
        .send_verification_email("new.member@example.org", "tok-123")
        .await
        .expect("receipt");

    resend_mock.assert_async().await;
    assert_eq!(receipt.id.as_deref(), Some("verify_1"));
}

#[tokio::test]
async fn test_two_factor_and_reset_emails() {
    let server = MockServer::start_async().await;

    let two_factor_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/emails").json_body_partial(
                r#"{
                    "from": "no-reply@databayt.org",
                    "subject": "2FA Code",
                    "html": "<p>Your 2FA code: 482913</p>"
                }"#,
            );
            then.status(200).json_body(serde_json::json!({ "id": "2fa_1" }));
        })
        .await;

    let reset_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .json_body_partial(r#"{ "subject": "Reset your password" }"#)
                .body_contains("https://portal.example.org/new-password?token=reset-9");
            then.status(200).json_body(serde_json::json!({ "id": "reset_1" }));
        })
        .await;

    let mailer = mailer(&server);

    let receipt = mailer.send_two_factor_token_email("a@example.org", "482913").await;
    assert_eq!(receipt.and_then(|r| r.id).as_deref(), Some("2fa_1"));

    let receipt = mailer.send_password_reset_email("a@example.org", "reset-9").await;
    assert_eq!(receipt.and_then(|r| r.id).as_deref(), Some("reset_1"));

    two_factor_mock.assert_async().await;
    reset_mock.assert_async().await;
}

#[tokio::test]
async fn test_token_emails_swallow_provider_errors() {
    let server = MockServer::start_async().await;

    let resend_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(401).json_body(serde_json::json!({
                "statusCode": 401,
                "name": "missing_api_key",
                "message": "Missing API key in the authorization header"
            }));
        })
        .await;

    let mailer = mailer(&server);

    assert!(mailer.send_two_factor_token_email("a@example.org", "1").await.is_none());
    assert!(mailer.send_password_reset_email("a@example.org", "2").await.is_none());
    assert!(mailer.send_verification_email("a@example.org", "3").await.is_none());

    resend_mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_email_notification_propagates_provider_errors() {
    let server = MockServer::start_async().await;

    let _resend_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .json_body_partial(r#"{ "html": "<p>Your dues are recorded</p>" }"#);
            then.status(429).json_body(serde_json::json!({
                "statusCode": 429,
                "name": "rate_limit_exceeded",
                "message": "Too many requests"
            }));
        })
        .await;

    let err = mailer(&server)
        .send_email_notification("a@example.org", "Dues", "Your dues are recorded")
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::Provider { status: 429, .. }));
}

#[tokio::test]
async fn test_blank_recipient_never_reaches_provider() {
    let server = MockServer::start_async().await;

    let resend_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(422).json_body(serde_json::json!({
                "statusCode": 422,
                "name": "validation_error",
                "message": "Invalid `to` field."
            }));
        })
        .await;

    let mailer = mailer(&server);

    let receipt = mailer.send_email_notification("", "Dues", "Your dues are recorded").await;
    assert!(matches!(receipt, Ok(None)));
    assert!(mailer.send_two_factor_token_email("", "1").await.is_none());
    assert!(mailer.send_password_reset_email(" ", "2").await.is_none());
    assert!(mailer.send_verification_email("", "3").await.is_none());

    resend_mock.assert_hits_async(0).await;
}
