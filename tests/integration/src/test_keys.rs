//! Key types, directory contents and header configuration.

#[cfg(test)]
mod tests {
    use chanauth_auth::{HeaderNames, KeyType, PrivateKey, RequestSigner, StaticKeyLookup};
    use chanauth_core::AuthConfig;

    use crate::{
        ANN, CAT, CountingDirectory, TestServer, connection, identified, signed, signed_with,
        user_key,
    };

    #[tokio::test]
    async fn test_should_authenticate_p384_user() {
        let server = TestServer::new(AuthConfig::default());
        let conn = connection("cat");

        let reply = server.send(signed(CAT, &conn)).await;
        assert_eq!(reply.status, http::StatusCode::OK);
        assert_eq!(server.send(identified(CAT, &conn)).await.status, http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_accept_any_matching_key_among_many() {
        let old = PrivateKey::from_bytes(KeyType::P256, &[40u8; 32]).unwrap();
        let laptop = PrivateKey::from_bytes(KeyType::P384, &[41u8; 48]).unwrap();
        let phone = PrivateKey::from_bytes(KeyType::P256, &[42u8; 32]).unwrap();
        let directory = StaticKeyLookup::new([(
            ANN.to_owned(),
            vec![
                String::from("garbage"),
                old.public_key().to_text(),
                laptop.public_key().to_text(),
                phone.public_key().to_text(),
            ],
        )]);
        let server = TestServer::with_directory(AuthConfig::default(), CountingDirectory::new(directory));

        for (i, key) in [laptop, phone].into_iter().enumerate() {
            let signer = RequestSigner::new(ANN, key);
            let reply = server.send(signed_with(&signer, &connection(&format!("k{i}")))).await;
            assert_eq!(reply.status, http::StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_should_report_no_matching_keys_for_unlisted_key() {
        let server = TestServer::new(AuthConfig::default());
        let signer = RequestSigner::new(ANN, PrivateKey::from_bytes(KeyType::P384, &[7u8; 48]).unwrap());

        let reply = server.send(signed_with(&signer, &connection("c"))).await;
        assert_eq!(reply.status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(reply.error_code(), "NoMatchingKeys");
    }

    #[tokio::test]
    async fn test_should_honor_configured_header_names() {
        let config = AuthConfig::builder()
            .user_header("x-user".into())
            .signature_header("x-sig".into())
            .signature_type_header("x-sig-type".into())
            .build();
        let server = TestServer::new(config.clone());
        let conn = connection("custom");

        // Default header names are not recognized.
        let reply = server.send(signed(ANN, &conn)).await;
        assert_eq!(reply.error_code(), "MissingUsername");

        let signer = RequestSigner::new(ANN, user_key(ANN)).with_headers(HeaderNames {
            user: config.user_header,
            signature: config.signature_header,
            signature_type: config.signature_type_header,
        });
        let reply = server.send(signed_with(&signer, &conn)).await;
        assert_eq!(reply.status, http::StatusCode::OK);
    }
}
