//! End-to-end tests of the authenticating service.
//!
//! The tests drive [`AuthHttpService`] in process: each request is built the
//! way the TLS transport would hand it over, with a [`SecureChannel`]
//! extension whose binding stands in for one connection. No network is
//! involved, so they run with a plain `cargo test`.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use chanauth_auth::{KeyLookup, KeyType, PrivateKey, RequestSigner, StaticKeyLookup};
use chanauth_core::{AuthConfig, Authenticator, SecureChannel, Session};
use bytes::Bytes;
use chanauth_http::{AuthHandler, AuthHttpService};
use http_body_util::{BodyExt, Full};
use hyper::service::Service;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

pub const ANN: &str = "ann@example.com";
pub const BOB: &str = "bob@example.com";
pub const CAT: &str = "cat@example.com";

/// Deterministic private key for a test user.
#[must_use]
pub fn user_key(user: &str) -> PrivateKey {
    match user {
        ANN => PrivateKey::from_bytes(KeyType::P256, &[1u8; 32]),
        BOB => PrivateKey::from_bytes(KeyType::P256, &[2u8; 32]),
        CAT => PrivateKey::from_bytes(KeyType::P384, &[3u8; 48]),
        _ => PrivateKey::from_bytes(KeyType::P256, &[9u8; 32]),
    }
    .expect("test scalars are valid")
}

/// Key directory that counts how often it is consulted.
#[derive(Debug)]
pub struct CountingDirectory {
    inner: StaticKeyLookup,
    calls: AtomicUsize,
}

impl CountingDirectory {
    /// Directory holding the public key of every test user.
    #[must_use]
    pub fn with_test_users() -> Self {
        Self::new(StaticKeyLookup::new(
            [ANN, BOB, CAT].map(|user| (user.to_owned(), vec![user_key(user).public_key().to_text()])),
        ))
    }

    /// Count lookups against `inner`.
    #[must_use]
    pub fn new(inner: StaticKeyLookup) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyLookup for CountingDirectory {
    fn lookup(&self, user: &str) -> anyhow::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(user)
    }
}

/// Handler that greets authenticated callers and records every session.
#[derive(Debug, Default)]
pub struct Greeter {
    sessions: Mutex<Vec<Session>>,
}

impl Greeter {
    /// Sessions the handler has been called with, in order.
    #[must_use]
    pub fn sessions(&self) -> Vec<Session> {
        self.sessions.lock().expect("not poisoned").clone()
    }

    /// Number of times the handler ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.sessions.lock().expect("not poisoned").len()
    }
}

impl AuthHandler<String> for Greeter {
    fn handle(
        &self,
        session: Session,
        _req: http::Request<String>,
    ) -> Pin<Box<dyn Future<Output = http::Response<Full<Bytes>>> + Send>> {
        let (status, text) = if session.is_authenticated() {
            (http::StatusCode::OK, format!("Hello, {}", session.user()))
        } else {
            let code = session.error().map_or("Unknown", |e| e.code());
            (http::StatusCode::FORBIDDEN, code.to_owned())
        };
        self.sessions.lock().expect("not poisoned").push(session);
        Box::pin(async move {
            http::Response::builder()
                .status(status)
                .body(Full::new(Bytes::from(text)))
                .expect("valid response")
        })
    }
}

/// Response reduced to what the tests look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Response status.
    pub status: http::StatusCode,
    /// Response body as text.
    pub body: String,
}

impl Reply {
    /// The `error` code of a rejection body.
    #[must_use]
    pub fn error_code(&self) -> String {
        let json: serde_json::Value = serde_json::from_str(&self.body).expect("JSON error body");
        json["error"].as_str().unwrap_or_default().to_owned()
    }
}

/// The service under test with its collaborators exposed.
#[derive(Debug, Clone)]
pub struct TestServer {
    pub service: AuthHttpService<Greeter>,
    pub directory: Arc<CountingDirectory>,
    pub greeter: Arc<Greeter>,
}

impl TestServer {
    /// A server whose directory knows every test user.
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self::with_directory(config, CountingDirectory::with_test_users())
    }

    /// A server backed by `directory`.
    #[must_use]
    pub fn with_directory(config: AuthConfig, directory: CountingDirectory) -> Self {
        init_tracing();
        let directory = Arc::new(directory);
        let greeter = Arc::new(Greeter::default());
        let authenticator = Authenticator::new(
            config,
            Some(Arc::clone(&directory) as Arc<dyn KeyLookup>),
        );
        Self {
            service: AuthHttpService::from_shared(authenticator, Arc::clone(&greeter)),
            directory,
            greeter,
        }
    }

    /// Send one request through the service.
    pub async fn send(&self, req: http::Request<String>) -> Reply {
        let response = self.service.call(req).await.expect("infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("buffered body")
            .to_bytes();
        Reply {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A simulated TLS connection.
#[must_use]
pub fn connection(id: &str) -> SecureChannel {
    SecureChannel::new(format!("tls-exporter:{id}").into_bytes())
}

/// Build a request on `channel` (or a plaintext one when `None`).
#[must_use]
pub fn request(path: &str, channel: Option<&SecureChannel>) -> http::request::Parts {
    let (mut parts, ()) = http::Request::builder()
        .method("GET")
        .uri(path)
        .body(())
        .expect("valid request")
        .into_parts();
    if let Some(channel) = channel {
        parts.extensions.insert(channel.clone());
    }
    parts
}

/// Finish `parts` into a request with an empty body.
#[must_use]
pub fn finish(parts: http::request::Parts) -> http::Request<String> {
    http::Request::from_parts(parts, String::new())
}

/// A request signed by `user` with their own key.
#[must_use]
pub fn signed(user: &str, channel: &SecureChannel) -> http::Request<String> {
    signed_with(&RequestSigner::new(user, user_key(user)), channel)
}

/// A request signed by `signer`.
#[must_use]
pub fn signed_with(signer: &RequestSigner, channel: &SecureChannel) -> http::Request<String> {
    let mut parts = request("/hello?lang=en", Some(channel));
    signer
        .sign(&mut parts, channel.binding())
        .expect("signing succeeds");
    finish(parts)
}

/// A request that only names `user`.
#[must_use]
pub fn identified(user: &str, channel: &SecureChannel) -> http::Request<String> {
    let mut parts = request("/hello?lang=en", Some(channel));
    RequestSigner::new(user, user_key(user))
        .identify(&mut parts)
        .expect("valid user header");
    finish(parts)
}

mod test_fast_path;
mod test_keys;
mod test_user_switch;
