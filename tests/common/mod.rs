//! Test utilities and common setup.

use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use campus_connect::api::{self, AppState};
use campus_connect::auth::{AuthConfig, AuthState};
use campus_connect::db::Database;
use campus_connect::storage::LocalStorage;

/// Create a test AuthConfig with a JWT secret for testing.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Some("test-secret-for-integration-tests-minimum-32-chars".to_string()),
        ..AuthConfig::default()
    }
}

/// Create a test application with all services over an in-memory database.
///
/// The returned TempDir backs the media directory and must be kept alive
/// for the duration of the test.
pub async fn test_app() -> (Router, AuthState, TempDir) {
    let db = Database::in_memory().await.unwrap();

    let auth_state = AuthState::new(test_auth_config());

    let media = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(media.path()));

    let state = AppState::new(
        &db,
        auth_state.clone(),
        storage,
        media.path().to_path_buf(),
    );
    (api::create_router(state), auth_state, media)
}

/// Create a test application and a valid token for a test user.
#[allow(dead_code)]
pub async fn test_app_with_token() -> (Router, String, TempDir) {
    let (app, auth, media) = test_app().await;
    let token = auth
        .issue_token("usr_test", "Test User", "test@campus.edu")
        .unwrap();
    (app, token, media)
}
