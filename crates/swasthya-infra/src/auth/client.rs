//! HttpAuthClient -- [`AuthBackend`] over the gateway's `/api/v1/auth/*`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use swasthya_core::auth::flow::AuthBackend;
use swasthya_types::auth::{
    AuthError, AuthErrorBody, AuthResponse, Credentials, DemoLoginRequest, UserType,
};

pub struct HttpAuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/auth{path}", self.base_url)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback_error: &str,
    ) -> Result<T, AuthError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        decode(response, fallback_error).await
    }
}

/// Decode a success body, or surface the server's `error` string.
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback_error: &str,
) -> Result<T, AuthError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<AuthErrorBody>()
            .await
            .map(|b| b.error)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback_error.to_string());
        return Err(AuthError::Rejected(message));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| AuthError::Deserialization(e.to_string()))
}

impl AuthBackend for HttpAuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        self.post_json("/login", credentials, "Login failed").await
    }

    async fn demo_login(&self, user_type: UserType) -> Result<AuthResponse, AuthError> {
        self.post_json("/demo-login", &DemoLoginRequest { user_type }, "Demo login failed")
            .await
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/logout"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        decode::<serde_json::Value>(response, "Logout failed").await?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn user(user_type: &str) -> serde_json::Value {
        json!({
            "id": "1",
            "email": format!("{user_type}@demo.com"),
            "user_type": user_type,
            "full_name": "Priya Patel",
        })
    }

    async fn auth_server() -> String {
        let router = Router::new()
            .route(
                "/api/v1/auth/login",
                post(|Json(creds): Json<Credentials>| async move {
                    if creds.password == "demo123" {
                        (
                            StatusCode::OK,
                            Json(json!({
                                "message": "Login successful",
                                "user": user("asha"),
                                "access_token": "swt_1",
                                "refresh_token": "swr_1",
                            })),
                        )
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"})))
                    }
                }),
            )
            .route(
                "/api/v1/auth/demo-login",
                post(|Json(req): Json<DemoLoginRequest>| async move {
                    Json(json!({
                        "message": "Demo login successful",
                        "user": user(&req.user_type.to_string()),
                        "access_token": "swt_demo",
                        "demo_credentials": {"email": "x@demo.com", "password": "demo123"},
                    }))
                }),
            )
            .route(
                "/api/v1/auth/logout",
                post(|headers: HeaderMap| async move {
                    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                        Some("Bearer swt_1") => {
                            (StatusCode::OK, Json(json!({"message": "Logout successful"})))
                        }
                        _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
                    }
                }),
            );
        serve(router).await
    }

    fn creds(password: &str) -> Credentials {
        Credentials {
            email: "asha@demo.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_parses_session() {
        let client = HttpAuthClient::new(&auth_server().await, Duration::from_secs(5)).unwrap();
        let response = client.login(&creds("demo123")).await.unwrap();
        assert_eq!(response.access_token, "swt_1");
        assert_eq!(response.refresh_token.as_deref(), Some("swr_1"));
        assert_eq!(response.user.user_type, UserType::Asha);
    }

    #[tokio::test]
    async fn rejected_login_surfaces_server_error_verbatim() {
        let client = HttpAuthClient::new(&auth_server().await, Duration::from_secs(5)).unwrap();
        let err = client.login(&creds("nope")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn demo_login_sends_user_type() {
        let client = HttpAuthClient::new(&auth_server().await, Duration::from_secs(5)).unwrap();
        let response = client.demo_login(UserType::Citizen).await.unwrap();
        assert_eq!(response.user.user_type, UserType::Citizen);
        assert!(response.demo_credentials.is_some());
    }

    #[tokio::test]
    async fn logout_without_error_body_uses_fallback_message() {
        let client = HttpAuthClient::new(&auth_server().await, Duration::from_secs(5)).unwrap();
        client.logout("swt_1").await.unwrap();
        let err = client.logout("swt_other").await.unwrap_err();
        assert_eq!(err.to_string(), "Logout failed");
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let client = HttpAuthClient::new("http://127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let err = client.login(&creds("demo123")).await.unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));
        assert_eq!(err.to_string(), "Network error. Please try again.");
    }
}
