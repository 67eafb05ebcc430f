//! A connection bound to one user never vouches for another.

#[cfg(test)]
mod tests {
    use chanauth_auth::RequestSigner;
    use chanauth_core::AuthConfig;

    use crate::{ANN, BOB, TestServer, connection, identified, signed, signed_with, user_key};

    #[tokio::test]
    async fn test_should_reverify_when_claimed_user_changes() {
        let server = TestServer::new(AuthConfig::default());
        let conn = connection("shared");
        server.send(signed(ANN, &conn)).await;

        let reply = server.send(identified(BOB, &conn)).await;
        assert_eq!(reply.status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(reply.error_code(), "MissingSignature");
        assert_eq!(server.directory.calls(), 2);
        assert_eq!(server.greeter.calls(), 1);
    }

    #[tokio::test]
    async fn test_should_not_accept_another_users_key() {
        let server = TestServer::new(AuthConfig::default());
        let conn = connection("shared");
        server.send(signed(ANN, &conn)).await;

        let impostor = RequestSigner::new(BOB, user_key(ANN));
        let reply = server.send(signed_with(&impostor, &conn)).await;
        assert_eq!(reply.status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(reply.error_code(), "VerificationFailed");

        // Ann's binding survives the failed attempt.
        assert_eq!(server.send(identified(ANN, &conn)).await.status, http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_rebind_connection_to_newly_verified_user() {
        let server = TestServer::new(AuthConfig::default());
        let conn = connection("shared");
        server.send(signed(ANN, &conn)).await;

        let reply = server.send(signed(BOB, &conn)).await;
        assert_eq!(reply.status, http::StatusCode::OK);
        assert_eq!(reply.body, format!("Hello, {BOB}"));

        assert_eq!(server.send(identified(BOB, &conn)).await.status, http::StatusCode::OK);
        let reply = server.send(identified(ANN, &conn)).await;
        assert_eq!(reply.status, http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_should_compare_user_names_exactly() {
        let server = TestServer::new(AuthConfig::default());
        let conn = connection("shared");
        server.send(signed(ANN, &conn)).await;

        let reply = server.send(identified(&ANN.to_uppercase(), &conn)).await;
        assert_eq!(reply.status, http::StatusCode::UNAUTHORIZED);
    }
}
