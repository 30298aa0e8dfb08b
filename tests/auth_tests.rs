// tests/auth_tests.rs
use mockito::Matcher;
use url::Url;

use rust_load_generator::auth::{AuthError, Authenticator};
use rust_load_generator::config::Credentials;

fn credentials() -> Credentials {
    Credentials {
        email: "john@example.com".to_string(),
        password: "pwd".to_string(),
        account: "onward".to_string(),
    }
}

fn authenticator(base_url: &str) -> Authenticator {
    Authenticator::new(Url::parse(base_url).unwrap(), false).unwrap()
}

#[tokio::test]
async fn login_posts_credentials_and_returns_the_token() {
    let mut server = mockito::Server::new_async().await;

    let login = server
        .mock("POST", "/api/login")
        .match_body(Matcher::Json(serde_json::json!({
            "email": "john@example.com",
            "password": "pwd",
            "account": "onward",
        })))
        .with_status(200)
        .with_body(r#"{"token":"tok-abc"}"#)
        .create_async()
        .await;

    let token = authenticator(&server.url())
        .login(&credentials())
        .await
        .unwrap();

    assert_eq!(token.as_str(), "tok-abc");
    login.assert_async().await;
}

#[tokio::test]
async fn empty_token_is_rejected() {
    let mut server = mockito::Server::new_async().await;

    let _login = server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body(r#"{"token":""}"#)
        .create_async()
        .await;

    let result = authenticator(&server.url()).login(&credentials()).await;

    assert!(matches!(result, Err(AuthError::MissingToken)));
}

#[tokio::test]
async fn missing_token_field_is_rejected() {
    let mut server = mockito::Server::new_async().await;

    let _login = server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let result = authenticator(&server.url()).login(&credentials()).await;

    assert!(matches!(result, Err(AuthError::MissingToken)));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let mut server = mockito::Server::new_async().await;

    let _login = server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body("<html>definitely not json</html>")
        .create_async()
        .await;

    let result = authenticator(&server.url()).login(&credentials()).await;

    assert!(matches!(result, Err(AuthError::Decode(_))));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Discard port: connection refused.
    let result = authenticator("http://127.0.0.1:9")
        .login(&credentials())
        .await;

    assert!(matches!(result, Err(AuthError::Transport(_))));
}

#[tokio::test]
async fn failed_login_never_reaches_the_api_endpoints() {
    let mut server = mockito::Server::new_async().await;

    let _login = server
        .mock("POST", "/api/login")
        .with_status(200)
        .with_body(r#"{"token":""}"#)
        .create_async()
        .await;

    // Neither operation endpoint may see traffic when login fails.
    let restart = server
        .mock("POST", "/api/computers/5/restart")
        .expect(0)
        .create_async()
        .await;

    let remove = server
        .mock("GET", "/api")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = authenticator(&server.url()).login(&credentials()).await;
    assert!(result.is_err());

    restart.assert_async().await;
    remove.assert_async().await;
}
