//! TLS termination and channel binding.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chanauth_core::{SecureChannel, fingerprint};
use rustls::ServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls_pemfile::{certs, private_key};
use tokio_rustls::TlsAcceptor;
use tracing::{debug, warn};

/// Exporter label for the `tls-exporter` channel binding (RFC 9266).
const CHANNEL_BINDING_LABEL: &[u8] = b"EXPORTER-Channel-Binding";

/// Length of the exported channel-binding token.
const CHANNEL_BINDING_LEN: usize = 32;

fn load_cert_chain(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::BufReader::new(
        std::fs::File::open(path)
            .with_context(|| format!("cannot open certificate file {}", path.display()))?,
    );
    let cert_chain = certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("cannot parse certificates in {}", path.display()))?;
    if cert_chain.is_empty() {
        anyhow::bail!("no certificates found in {}", path.display());
    }
    Ok(cert_chain)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let mut reader = std::io::BufReader::new(
        std::fs::File::open(path)
            .with_context(|| format!("cannot open private key file {}", path.display()))?,
    );
    private_key(&mut reader)
        .with_context(|| format!("cannot parse private key in {}", path.display()))?
        .with_context(|| format!("no private key found in {}", path.display()))
}

/// Build a TLS acceptor from PEM certificate chain and key files.
pub fn build_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor> {
    let cert_chain = load_cert_chain(cert_path)?;
    let key = load_private_key(key_path)?;

    let mut server_config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .context("invalid TLS certificate or key")?;
    server_config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

/// Derive the channel for an established TLS connection.
///
/// The binding token is the connection's `tls-exporter` value. If it cannot
/// be exported the channel is still secure but unbound, so every request on
/// it has to be signed.
pub fn secure_channel(conn: &rustls::ServerConnection) -> SecureChannel {
    match conn.export_keying_material([0u8; CHANNEL_BINDING_LEN], CHANNEL_BINDING_LABEL, None) {
        Ok(token) => {
            debug!(channel = %fingerprint(&token), "derived channel binding");
            SecureChannel::new(token.to_vec())
        }
        Err(e) => {
            warn!(error = %e, "cannot export channel binding, connection is unbound");
            SecureChannel::unbound()
        }
    }
}
