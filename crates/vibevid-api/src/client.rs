//! Backend HTTP client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;
use uuid::Uuid;

use vibevid_models::{ContactIdentity, Session, VideoId, VideoRecord};

use crate::error::{ApiError, ApiResult, Operation};
use crate::types::{ErrorBody, LoginRequest, SignupReceipt, SignupRequest, VerifyRequest, VideoListResponse};

/// Request correlation header, echoed into backend logs.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VIBEVID_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("VIBEVID_API_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Client for the Vibe Videos backend.
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(mut config: ApiConfig) -> ApiResult<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(ApiConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Register a new account. Success hands back the OTP hint for the
    /// verification step; no session is created.
    pub async fn signup(
        &self,
        identity: &ContactIdentity,
        password: &str,
    ) -> ApiResult<SignupReceipt> {
        let url = format!("{}/auth/signup", self.config.base_url);
        debug!(handle = %identity, "Sending signup request");

        let response = self
            .http
            .post(&url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .json(&SignupRequest { identity, password })
            .send()
            .await?;

        let response = Self::accept(Operation::Signup, response).await?;
        let receipt: SignupReceipt = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(receipt)
    }

    /// Prove ownership of the contact handle with a one-time code.
    /// Verification does not log the user in.
    pub async fn verify(&self, identity: &ContactIdentity, code: &str) -> ApiResult<()> {
        let url = format!("{}/auth/verify", self.config.base_url);
        debug!(handle = %identity, "Sending verification request");

        let response = self
            .http
            .post(&url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .json(&VerifyRequest { identity, code })
            .send()
            .await?;

        Self::accept(Operation::Verify, response).await?;
        Ok(())
    }

    /// Exchange credentials for a session.
    pub async fn login(&self, identity: &ContactIdentity, password: &str) -> ApiResult<Session> {
        let url = format!("{}/auth/login", self.config.base_url);
        debug!(handle = %identity, "Sending login request");

        let response = self
            .http
            .post(&url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .json(&LoginRequest { identity, password })
            .send()
            .await?;

        let response = Self::accept(Operation::Login, response).await?;
        let session: Session = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(session)
    }

    /// Fetch the authenticated user's video catalog, in server order.
    pub async fn list_videos(&self, session: &Session) -> ApiResult<Vec<VideoRecord>> {
        let url = format!("{}/videos/list", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(session.bearer())
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .send()
            .await?;

        let response = Self::accept(Operation::List, response).await?;
        let list: VideoListResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        debug!(count = list.videos.len(), "Fetched video catalog");
        Ok(list.videos)
    }

    /// Upload one video file under the current session.
    pub async fn upload(
        &self,
        session: &Session,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<()> {
        let url = format!("{}/videos/upload", self.config.base_url);
        debug!(file = file_name, size = bytes.len(), "Uploading video");

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .bearer_auth(session.bearer())
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .multipart(form)
            .send()
            .await?;

        Self::accept(Operation::Upload, response).await?;
        Ok(())
    }

    /// URL the media engine streams a video from. Pure construction; the
    /// bearer token travels with the engine's own request.
    pub fn stream_url(&self, id: &VideoId) -> String {
        format!("{}/videos/stream/{}", self.config.base_url, id)
    }

    /// Pass a 2xx response through; map anything else to the taxonomy
    /// using the server's `detail` message.
    async fn accept(op: Operation, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        debug!(op = op.as_str(), %status, detail = %detail, "API request rejected");
        Err(ApiError::from_rejection(op, status, detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn email_identity() -> ContactIdentity {
        ContactIdentity::resolve("a@x.com", "").unwrap()
    }

    #[tokio::test]
    async fn signup_returns_otp_hint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .and(body_json(json!({"email": "a@x.com", "password": "pw"})))
            .and(header_exists("x-request-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"otp": "000111"})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let receipt = client.signup(&email_identity(), "pw").await.unwrap();
        assert_eq!(receipt.otp_hint, "000111");
    }

    #[tokio::test]
    async fn signup_conflict_surfaces_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"detail": "Already registered"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.signup(&email_identity(), "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.detail(), "Already registered");
    }

    #[tokio::test]
    async fn verify_sends_code_for_phone_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/verify"))
            .and(body_json(json!({"phone": "+15550100", "code": "000111"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let identity = ContactIdentity::resolve("", "+15550100").unwrap();
        client.verify(&identity, "000111").await.unwrap();
    }

    #[tokio::test]
    async fn login_produces_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "T", "user_id": "u1"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let session = client.login(&email_identity(), "pw").await.unwrap();
        assert_eq!(session.bearer(), "T");
        assert_eq!(session.user_id, "u1");
    }

    #[tokio::test]
    async fn list_preserves_server_order_and_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/list"))
            .and(header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "videos": [
                    {"_id": "v2", "original_name": "b.mp4", "content_type": "video/mp4"},
                    {"_id": "v1", "original_name": "a.mp4", "content_type": "video/mp4"},
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let session = Session::new("T", "u1");
        let videos = client.list_videos(&session).await.unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].id.as_str(), "v2");
        assert_eq!(videos[1].id.as_str(), "v1");
    }

    #[tokio::test]
    async fn list_with_rejected_token_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/videos/upload"))
            .respond_with(
                ResponseTemplate::new(413).set_body_json(json!({"detail": "File too large"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos/list"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let session = Session::new("stale", "u1");

        let err = client.list_videos(&session).await.unwrap_err();
        assert!(err.is_unauthorized());

        let err = client
            .upload(&session, "a.mp4", vec![0u8; 4], "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Payload(_)));
    }

    #[tokio::test]
    async fn stream_url_embeds_video_id() {
        let client = ApiClient::new(ApiConfig {
            base_url: "http://media.local/".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let id = VideoId::from_string("v42");
        assert_eq!(client.stream_url(&id), "http://media.local/videos/stream/v42");
    }
}
