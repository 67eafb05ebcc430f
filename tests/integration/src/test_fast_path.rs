//! Fast-path integration tests: one signature per connection.

#[cfg(test)]
mod tests {
    use chanauth_core::AuthConfig;

    use crate::{ANN, BOB, TestServer, connection, identified, signed};

    #[tokio::test]
    async fn test_should_accept_unsigned_follow_ups_without_lookup() {
        let server = TestServer::new(AuthConfig::default());
        let conn = connection("ann-1");

        let first = server.send(signed(ANN, &conn)).await;
        assert_eq!(first.status, http::StatusCode::OK);
        assert_eq!(first.body, format!("Hello, {ANN}"));
        assert_eq!(server.directory.calls(), 1);

        for _ in 0..5 {
            let reply = server.send(identified(ANN, &conn)).await;
            assert_eq!(reply.status, http::StatusCode::OK);
        }
        assert_eq!(server.directory.calls(), 1);
        assert_eq!(server.greeter.calls(), 6);
    }

    #[tokio::test]
    async fn test_should_require_signature_on_each_new_connection() {
        let server = TestServer::new(AuthConfig::default());
        server.send(signed(ANN, &connection("ann-1"))).await;

        let reply = server.send(identified(ANN, &connection("ann-2"))).await;
        assert_eq!(reply.status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(reply.error_code(), "MissingSignature");
    }

    #[tokio::test]
    async fn test_should_reject_signature_replayed_on_another_connection() {
        let server = TestServer::new(AuthConfig::default());
        let original = connection("ann-1");
        assert_eq!(
            server.send(signed(ANN, &original)).await.status,
            http::StatusCode::OK
        );

        // The same signed headers, captured and resent over a new connection.
        let mut replayed = signed(ANN, &original);
        replayed.extensions_mut().insert(connection("mallory-1"));
        let reply = server.send(replayed).await;

        assert_eq!(reply.status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(reply.error_code(), "VerificationFailed");
        assert_eq!(server.greeter.calls(), 1);
    }

    #[tokio::test]
    async fn test_should_accept_signing_every_request() {
        let server = TestServer::new(AuthConfig::default());
        let conn = connection("bob-1");

        for _ in 0..3 {
            let reply = server.send(signed(BOB, &conn)).await;
            assert_eq!(reply.status, http::StatusCode::OK);
        }
        // A cached binding for the same user short-circuits verification.
        assert_eq!(server.directory.calls(), 1);
    }

    #[tokio::test]
    async fn test_should_keep_connections_independent() {
        let server = TestServer::new(AuthConfig::default());
        let ann = connection("ann-1");
        let bob = connection("bob-1");

        server.send(signed(ANN, &ann)).await;
        server.send(signed(BOB, &bob)).await;

        assert_eq!(server.send(identified(ANN, &ann)).await.status, http::StatusCode::OK);
        assert_eq!(server.send(identified(BOB, &bob)).await.status, http::StatusCode::OK);
        assert_eq!(server.directory.calls(), 2);
    }
}
