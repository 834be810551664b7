//! HTTP layer tests: status checking, error body hygiene, and full
//! provider round-trips against a one-shot stub server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use maricabot::providers::gemini::GeminiProvider;
use maricabot::providers::{check_http_response, Completion, CompletionProvider, GatewayError};

/// Serve exactly one HTTP exchange, reading the whole request before
/// answering, and return the server's base URL.
async fn serve_once(status_line: &str, body: &str) -> String {
    let listener_result = TcpListener::bind("127.0.0.1:0").await;
    assert!(listener_result.is_ok());
    let listener = match listener_result {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };

    let addr_result = listener.local_addr();
    assert!(addr_result.is_ok());
    let addr = match addr_result {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    let status_line_owned = status_line.to_owned();
    let body_owned = body.to_owned();
    tokio::spawn(async move {
        let accepted = listener.accept().await;
        if let Ok((mut socket, _)) = accepted {
            let mut request = Vec::new();
            let mut chunk = [0_u8; 1024];
            loop {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        request.extend_from_slice(&chunk[..n]);
                        if request_complete(&request) {
                            break;
                        }
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line_owned}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
                body_owned.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{addr}")
}

/// Whether `raw` holds a full HTTP request: complete headers plus as many
/// body bytes as Content-Length announces.
fn request_complete(raw: &[u8]) -> bool {
    let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&raw[..header_end]);
    let content_length = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= header_end.saturating_add(4).saturating_add(content_length)
}

fn test_provider(base_url: String) -> GeminiProvider {
    let mut provider = GeminiProvider::new(
        "test-key".to_owned(),
        "gemini-2.5-flash".to_owned(),
        "persona de teste".to_owned(),
    );
    provider.base_url = base_url;
    provider
}

#[tokio::test]
async fn check_http_response_returns_body_on_success() {
    let url = serve_once("200 OK", r#"{"ok": true}"#).await;

    let response_result = reqwest::get(format!("{url}/")).await;
    assert!(response_result.is_ok());
    let response = match response_result {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };

    let body = check_http_response(response).await;
    assert!(body.is_ok());
    match body {
        Ok(text) => assert_eq!(text, r#"{"ok": true}"#),
        Err(err) => panic!("success status should yield body: {err}"),
    }
}

#[tokio::test]
async fn check_http_response_redacts_key_like_values() {
    let raw_key = "AIzaSyAbcdefghijklmnopqrstuvwxyz123456";
    let body = format!("error key={raw_key}");
    let url = serve_once("500 Internal Server Error", &body).await;

    let response_result = reqwest::get(format!("{url}/")).await;
    assert!(response_result.is_ok());
    let response = match response_result {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };

    let checked = check_http_response(response).await;
    assert!(checked.is_err());

    let err = match checked {
        Ok(_) => panic!("response should fail on non-success status"),
        Err(err) => err,
    };

    match err {
        GatewayError::HttpStatus { body, .. } => {
            assert!(!body.contains(raw_key));
            assert!(body.contains("[REDACTED]"));
        }
        other => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn check_http_response_truncates_long_error_body() {
    let body = "x".repeat(400);
    let url = serve_once("500 Internal Server Error", &body).await;

    let response_result = reqwest::get(format!("{url}/")).await;
    assert!(response_result.is_ok());
    let response = match response_result {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };

    let checked = check_http_response(response).await;
    assert!(checked.is_err());

    let err = match checked {
        Ok(_) => panic!("response should fail on non-success status"),
        Err(err) => err,
    };

    match err {
        GatewayError::HttpStatus { body, .. } => {
            assert!(body.ends_with("...[truncated]"));
        }
        other => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn provider_round_trip_returns_answer() {
    let body = r#"{"candidates": [{"content": {"parts": [{"text": "Maricá tem lagoas e praias."}]}, "finishReason": "STOP"}]}"#;
    let url = serve_once("200 OK", body).await;

    let provider = test_provider(url);
    let completion = provider.complete("o que visitar?").await;
    assert!(completion.is_ok());
    match completion {
        Ok(outcome) => assert_eq!(
            outcome,
            Completion::Answer("Maricá tem lagoas e praias.".to_owned())
        ),
        Err(err) => panic!("round trip should succeed: {err}"),
    }
}

#[tokio::test]
async fn provider_maps_non_success_status_to_http_error() {
    let url = serve_once("429 Too Many Requests", r#"{"error": {"message": "quota"}}"#).await;

    let provider = test_provider(url);
    let completion = provider.complete("pergunta").await;
    assert!(completion.is_err());
    match completion {
        Ok(outcome) => panic!("quota status should fail, got: {outcome:?}"),
        Err(GatewayError::HttpStatus { status, .. }) => assert_eq!(status, 429),
        Err(other) => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn provider_surfaces_transport_failure() {
    // Bind then drop so the port is almost certainly unused.
    let listener_result = TcpListener::bind("127.0.0.1:0").await;
    assert!(listener_result.is_ok());
    let addr = match listener_result {
        Ok(listener) => match listener.local_addr() {
            Ok(addr) => addr,
            Err(err) => panic!("listener should expose local addr: {err}"),
        },
        Err(err) => panic!("listener should bind: {err}"),
    };

    let provider = test_provider(format!("http://{addr}"));
    let completion = provider.complete("pergunta").await;
    assert!(completion.is_err());
    assert!(matches!(completion, Err(GatewayError::Request(_))));
}
