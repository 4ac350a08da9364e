//! Unit tests for authentication middleware
//!
//! Tests cover:
//! - Bearer token extraction from request headers
//! - Supabase token verification (valid, rejected, malformed)

#[cfg(test)]
mod tests {
    use super::super::middleware::*;
    use axum::http::{HeaderMap, HeaderValue};
    use uuid::Uuid;

    fn auth_state_for(server_url: &str) -> AuthState {
        AuthState {
            supabase_url: server_url.to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(extract_bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn rejects_missing_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn rejects_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn verifies_token_against_supabase() {
        let mut server = mockito::Server::new_async().await;
        let user_id = Uuid::new_v4();
        let mock = server
            .mock("GET", "/auth/v1/user")
            .match_header("apikey", "test-anon-key")
            .match_header("authorization", "Bearer good-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"id":"{user_id}","email":"owner@getlead.store"}}"#
            ))
            .create_async()
            .await;

        let state = auth_state_for(&server.url());
        let user = verify_supabase_token(&state, "good-token").await.unwrap();

        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email.as_deref(), Some("owner@getlead.store"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_token_maps_to_invalid() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/user")
            .with_status(401)
            .with_body(r#"{"message":"invalid JWT"}"#)
            .create_async()
            .await;

        let state = auth_state_for(&server.url());
        let err = verify_supabase_token(&state, "bad-token")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn malformed_response_maps_to_verification_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/user")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let state = auth_state_for(&server.url());
        let err = verify_supabase_token(&state, "token").await.unwrap_err();

        assert!(matches!(err, AuthError::VerificationFailed));
    }

    #[tokio::test]
    async fn non_uuid_user_id_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/auth/v1/user")
            .with_status(200)
            .with_body(r#"{"id":"not-a-uuid","email":null}"#)
            .create_async()
            .await;

        let state = auth_state_for(&server.url());
        let err = verify_supabase_token(&state, "token").await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidToken));
    }
}
