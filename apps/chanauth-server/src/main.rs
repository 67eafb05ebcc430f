//! Chanauth demo server - greets callers authenticated by channel-bound
//! signatures.
//!
//! Every TLS connection gets a channel-binding token derived from its
//! handshake. A client signs the first request on a connection; later
//! requests on it only name the user and are accepted from the session cache.
//!
//! # Usage
//!
//! ```text
//! TLS_CERT_PATH=cert.pem TLS_KEY_PATH=key.pem KEYS_FILE=keys.json chanauth-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8443` | Bind address |
//! | `TLS_CERT_PATH` | *(required)* | PEM certificate chain |
//! | `TLS_KEY_PATH` | *(required)* | PEM private key |
//! | `KEYS_FILE` | *(unset)* | JSON map of user to public keys |
//! | `AUTH_ALLOW_UNAUTHENTICATED` | `false` | Pass failed authentications to the handler |
//! | `AUTH_SESSION_CAPACITY` | `1000` | Channel bindings remembered |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;
mod handler;
mod tls;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chanauth_auth::{KeyLookup, StaticKeyLookup};
use chanauth_core::Authenticator;
use chanauth_http::{AuthHandler, AuthHttpService, handler_fn};
use hyper::body::Incoming;
use hyper::service::{Service, service_fn};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Load the key directory named by `KEYS_FILE`, if any.
fn build_key_lookup(config: &ServerConfig) -> Result<Option<Arc<dyn KeyLookup>>> {
    let Some(path) = config.keys_file.as_deref() else {
        warn!("KEYS_FILE not set, no caller can be verified");
        return Ok(None);
    };

    let directory = StaticKeyLookup::from_json_file(path)?;
    info!(path, users = directory.len(), "loaded key directory");
    Ok(Some(Arc::new(directory)))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: AuthHandler<Incoming>>(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    service: AuthHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let acceptor = acceptor.clone();
                let service = service.clone();
                let http = http.clone();
                let watcher = graceful.watcher();

                tokio::spawn(async move {
                    let stream = match acceptor.accept(stream).await {
                        Ok(stream) => stream,
                        Err(e) => {
                            warn!(peer_addr = %peer_addr, error = %e, "TLS handshake failed");
                            return;
                        }
                    };

                    let channel = tls::secure_channel(stream.get_ref().1);
                    let svc = service_fn(move |mut req: http::Request<Incoming>| {
                        req.extensions_mut().insert(channel.clone());
                        service.call(req)
                    });

                    let conn = http.serve_connection(TokioIo::new(stream), svc);
                    if let Err(e) = watcher.watch(conn.into_owned()).await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        allow_unauthenticated = config.auth.allow_unauthenticated,
        session_capacity = config.auth.session_capacity,
        version = VERSION,
        "starting chanauth server",
    );

    let cert_path = config
        .tls_cert_path
        .as_deref()
        .context("TLS_CERT_PATH must be set")?;
    let key_path = config
        .tls_key_path
        .as_deref()
        .context("TLS_KEY_PATH must be set")?;
    let acceptor = tls::build_acceptor(Path::new(cert_path), Path::new(key_path))?;

    let key_lookup = build_key_lookup(&config)?;
    let authenticator = Authenticator::new(config.auth.clone(), key_lookup);
    let service = AuthHttpService::wrap(authenticator, handler_fn(handler::hello::<Incoming>));

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for TLS connections");

    serve(listener, acceptor, service).await
}
