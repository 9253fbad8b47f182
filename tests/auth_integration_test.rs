use std::env;
use std::fs;
use std::time::Duration;

use futures::StreamExt;
use serial_test::serial;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

use speechlink::auth::{Authentication, IssueTokenAuthentication};
use speechlink::config::{ClientConfig, keys};
use speechlink::core::connection::{RecognitionMode, RecognizerConfig, SpeechConnectionFactory};
use speechlink::errors::AuthError;

const ISSUE_TOKEN_PATH: &str = "/sts/v1.0/issueToken";

fn cleanup_env_vars() {
    unsafe {
        for key in keys::ALL {
            env::remove_var(key);
        }
    }
}

fn record_headers(
    tx: oneshot::Sender<Vec<(String, String)>>,
) -> impl FnOnce(&Request, Response) -> Result<Response, ErrorResponse> {
    move |request: &Request, response: Response| {
        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let _ = tx.send(headers);
        Ok(response)
    }
}

fn has_header(headers: &[(String, String)], name: &str, value: &str) -> bool {
    headers.iter().any(|(n, v)| n == name && v == value)
}

/// Accept one WebSocket upgrade, report its headers, then close.
async fn spawn_upgrade_recorder() -> (u16, oneshot::Receiver<Vec<(String, String)>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_hdr_async(stream, record_headers(tx)).await.unwrap();
        ws.close(None).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    (port, rx)
}

#[tokio::test]
async fn test_issued_token_used_for_upgrade() {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ISSUE_TOKEN_PATH))
        .and(header("Ocp-Apim-Subscription-Key", "sub-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("issued-jwt"))
        .expect(1)
        .mount(&token_server)
        .await;

    let auth = IssueTokenAuthentication::new(
        format!("{}{}", token_server.uri(), ISSUE_TOKEN_PATH),
        "sub-key",
        Duration::from_secs(5),
    )
    .unwrap();

    let (port, headers) = spawn_upgrade_recorder().await;
    let config = ClientConfig {
        host: Some(format!("127.0.0.1:{port}")),
        scheme: "ws".to_string(),
        subscription_key: Some("sub-key".to_string()),
        ..Default::default()
    };

    let factory = config.connection_factory().unwrap();
    let mut socket = factory
        .connect(&config.recognizer_config(), &auth, Some("cid-auth"))
        .await
        .unwrap();
    assert!(socket.read().await.unwrap().is_none());
    socket.close().await.unwrap();

    let headers = headers.await.unwrap();
    assert!(has_header(&headers, "authorization", "Bearer issued-jwt"));
    assert!(has_header(&headers, "x-connectionid", "cid-auth"));
}

#[tokio::test]
async fn test_fetch_on_expiry_returns_new_token() {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first"))
        .up_to_n_times(1)
        .mount(&token_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("second"))
        .mount(&token_server)
        .await;

    let auth = IssueTokenAuthentication::new(
        format!("{}{}", token_server.uri(), ISSUE_TOKEN_PATH),
        "sub-key",
        Duration::from_secs(5),
    )
    .unwrap();

    assert_eq!(auth.fetch("evt-1").await.unwrap().token, "Bearer first");
    assert_eq!(auth.fetch("evt-2").await.unwrap().token, "Bearer first");
    assert_eq!(
        auth.fetch_on_expiry("evt-3").await.unwrap().token,
        "Bearer second"
    );
    assert_eq!(auth.fetch("evt-4").await.unwrap().token, "Bearer second");
}

#[tokio::test]
async fn test_rejected_key_surfaces_before_connecting() {
    let token_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
        .mount(&token_server)
        .await;

    let auth = IssueTokenAuthentication::new(
        format!("{}{}", token_server.uri(), ISSUE_TOKEN_PATH),
        "wrong-key",
        Duration::from_secs(5),
    )
    .unwrap();

    let factory = SpeechConnectionFactory::default();
    let config = RecognizerConfig {
        mode: RecognitionMode::Conversation,
        ..Default::default()
    };

    let err = factory.connect(&config, &auth, None).await.unwrap_err();
    assert!(matches!(
        err,
        speechlink::ConnectionError::Auth(AuthError::Unauthorized(_))
    ));
}

#[tokio::test]
#[serial]
async fn test_yaml_config_drives_connection() {
    cleanup_env_vars();

    let (port, headers) = spawn_upgrade_recorder().await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("speech.yaml");
    fs::write(
        &config_path,
        format!(
            r#"
endpoint:
  host: "127.0.0.1:{port}"
  scheme: "ws"
  test_hooks: true

auth:
  subscription_key: "yaml-key"

recognition:
  language: "en-GB"
  mode: "interactive"
"#
        ),
    )
    .unwrap();

    let config = ClientConfig::from_file(&config_path).unwrap();
    let auth = config.authentication().unwrap();
    let factory = config.connection_factory().unwrap();

    let mut socket = factory
        .connect(&config.recognizer_config(), auth.as_ref(), None)
        .await
        .unwrap();
    assert!(socket.read().await.unwrap().is_none());
    socket.close().await.unwrap();

    let headers = headers.await.unwrap();
    assert!(has_header(&headers, "ocp-apim-subscription-key", "yaml-key"));

    cleanup_env_vars();
}

#[tokio::test]
#[serial]
async fn test_env_token_overrides_yaml_key() {
    cleanup_env_vars();

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("speech.yaml");
    fs::write(
        &config_path,
        "endpoint:\n  region: \"westus\"\nauth:\n  subscription_key: \"yaml-key\"\n",
    )
    .unwrap();

    unsafe {
        env::set_var(keys::AUTH_TOKEN, "env-token");
    }

    let config = ClientConfig::from_file(&config_path).unwrap();
    let info = config.authentication().unwrap().fetch("evt").await.unwrap();
    assert_eq!(info.header_name, "Authorization");
    assert_eq!(info.token, "Bearer env-token");

    cleanup_env_vars();
}
