//! Hosted identity sessions across page loads
//!
//! A local HTTP listener plays the identity provider and document database.
//! Every `Marketplace` built over the shared store is a fresh page load.

use marketplace::*;
use std::rc::Rc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const ACCOUNT: &str = r#"{"localId":"uid1","email":"ana@example.com","idToken":"token-1"}"#;

/// Serve canned provider responses until the test ends
async fn start_provider() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            respond(stream).await;
        }
    });

    format!("http://{}", addr)
}

async fn respond(mut stream: TcpStream) {
    let request = read_request(&mut stream).await;
    let body = if request.starts_with("PATCH") { "{}" } else { ACCOUNT };

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

/// Read headers and a `Content-Length` body
async fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&raw).into_owned()
}

fn provider_config(base_url: &str) -> IdentityConfig {
    IdentityConfig {
        api_key: "key-123".to_string(),
        project_id: "market".to_string(),
        auth_base_url: base_url.to_string(),
        document_base_url: base_url.to_string(),
        ..Default::default()
    }
}

fn load_page(store: &SharedStore, config: &IdentityConfig) -> Marketplace {
    Marketplace::new(Rc::clone(store), BackendKind::Auto, config)
}

#[tokio::test]
async fn test_sign_in_survives_redirect() {
    let config = provider_config(&start_provider().await);
    let store: SharedStore = MemoryStore::shared();

    let login_page = load_page(&store, &config);
    assert_eq!(login_page.backend().name(), "identity");
    login_page
        .backend()
        .sign_in("ana@example.com", "secret1")
        .await
        .unwrap();

    let index_page = load_page(&store, &config);
    let session = index_page.backend().current_session().unwrap().unwrap();
    assert_eq!(session.email, "ana@example.com");
    assert_eq!(session.user_id.as_deref(), Some("uid1"));

    index_page.backend().sign_out().await.unwrap();
    let after_logout = load_page(&store, &config);
    assert!(after_logout.backend().current_session().unwrap().is_none());
}

#[tokio::test]
async fn test_sign_up_writes_profile_and_keeps_session() {
    let config = provider_config(&start_provider().await);
    let store: SharedStore = MemoryStore::shared();

    let signup_page = load_page(&store, &config);
    signup_page
        .backend()
        .sign_up("ana@example.com", "secret1", "secret1")
        .await
        .unwrap();

    let next_page = load_page(&store, &config);
    let session = next_page.backend().current_session().unwrap().unwrap();
    assert_eq!(session.email, "ana@example.com");
}
