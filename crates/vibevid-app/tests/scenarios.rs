//! End-to-end client scenarios against a mock backend.

use std::time::Duration;

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vibevid_api::{ApiClient, ApiConfig};
use vibevid_auth::{AuthFlow, AuthStage};
use vibevid_library::{FileSelection, LibraryClient, LibraryState, UploadPipeline};
use vibevid_session::{SessionStore, StoreConfig};

async fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn store_at(dir: &tempfile::TempDir) -> SessionStore {
    SessionStore::new(StoreConfig {
        path: dir.path().join("session.json"),
    })
}

/// Full first-run journey: register, verify with the hinted code, log in,
/// and end with a populated library and a persisted session.
#[tokio::test]
async fn first_run_journey_ends_authenticated_with_library() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"otp": "000111"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "T", "user_id": "u1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "videos": [{"_id": "v1", "original_name": "intro.mp4", "content_type": "video/mp4"}]
        })))
        .mount(&server)
        .await;

    let api = api_for(&server).await;
    let dir = tempdir().unwrap();
    let store = store_at(&dir);
    let flow = AuthFlow::new();
    let library = LibraryClient::new();

    flow.submit_signup(&api, "a@x.com", "", "pw").await.unwrap();
    assert_eq!(flow.stage().await, AuthStage::Verify);

    // The surface relays the hinted code back.
    let hint = flow.message().await.unwrap();
    assert!(hint.contains("000111"));

    flow.submit_verify(&api, "a@x.com", "", "000111")
        .await
        .unwrap();
    assert_eq!(flow.stage().await, AuthStage::Login);

    let session = flow
        .submit_login(&api, &store, "a@x.com", "", "pw")
        .await
        .unwrap();

    library.refresh(&api, &session, &store).await;
    assert!(matches!(library.state().await, LibraryState::Populated(_)));

    // Restart: the persisted session comes back without credentials.
    let restarted = store_at(&dir);
    let restored = restarted.initialize().await.unwrap().unwrap();
    assert_eq!(restored.bearer(), "T");
}

/// A stored token the backend no longer accepts: the first authorized call
/// tears the session down and the auth flow returns to Signup.
#[tokio::test]
async fn stale_restored_session_falls_back_to_signup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token"})))
        .mount(&server)
        .await;

    let api = api_for(&server).await;
    let dir = tempdir().unwrap();

    // A previous run left a session behind.
    store_at(&dir)
        .activate(vibevid_models::Session::new("stale", "u1"))
        .await
        .unwrap();

    let store = store_at(&dir);
    let session = store.initialize().await.unwrap().unwrap();

    let flow = AuthFlow::new();
    flow.switch_to(AuthStage::Login).await.unwrap();
    let library = LibraryClient::new();

    let state = library.refresh(&api, &session, &store).await;
    assert!(matches!(state, LibraryState::Error(_)));
    assert!(!store.is_active().await);

    // Shell reaction to the teardown.
    flow.reset().await;
    assert_eq!(flow.stage().await, AuthStage::Signup);

    // The durable record is gone too: a restart stays logged out.
    assert!(store_at(&dir).initialize().await.unwrap().is_none());
}

/// Upload success refreshes the catalog; the selection is consumed either way.
#[tokio::test]
async fn upload_refreshes_catalog_and_consumes_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/videos/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "videos": [{"_id": "v1", "original_name": "cat.mp4", "content_type": "video/mp4"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server).await;
    let dir = tempdir().unwrap();
    let store = store_at(&dir);
    let session = vibevid_models::Session::new("T", "u1");
    store.activate(session.clone()).await.unwrap();

    let library = LibraryClient::new();
    let uploader = UploadPipeline::new();

    uploader
        .select(FileSelection::new("cat.mp4", vec![0u8; 8], "video/mp4"))
        .await
        .unwrap();
    uploader
        .upload(&api, &session, &store, &library)
        .await
        .unwrap();

    let state = library.state().await;
    let videos = state.videos().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].display_name, "cat.mp4");
    assert!(uploader.pending().await.is_none());
}
