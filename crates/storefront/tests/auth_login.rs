//! Authentication session integration tests using wiremock.
//!
//! Drives the full login flow through `AppState`: the session container,
//! the catalog client, and the durable token slot together.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vetrina_storefront::api::LoginRequest;
use vetrina_storefront::config::StorefrontConfig;
use vetrina_storefront::state::AppState;
use vetrina_storefront::storage::{Storage, keys};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn state_for(server: &MockServer, storage: Storage) -> AppState {
    let config = StorefrontConfig {
        api_base_url: server.uri(),
        ..StorefrontConfig::default()
    };
    AppState::with_storage(config, storage).expect("state must build against the mock server")
}

fn credentials(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Login success
// ---------------------------------------------------------------------------

/// A successful login stores the token, persists it, and closes the modal.
#[tokio::test]
async fn test_login_success_stores_and_persists_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "username": "mor_2314", "password": "83r5^_" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt-token" })))
        .mount(&server)
        .await;

    let storage = Storage::in_memory();
    let mut state = state_for(&server, storage.clone());
    state.auth_mut().open_login_modal();

    let ok = state
        .auth_mut()
        .login(&credentials("mor_2314", "83r5^_"))
        .await;

    assert!(ok, "login must report success");
    let auth = state.auth();
    assert!(auth.is_authenticated());
    assert_eq!(auth.token(), Some("jwt-token"));
    assert!(!auth.is_loading());
    assert!(auth.error().is_none());
    assert!(!auth.is_login_modal_open(), "modal must close on success");

    // Token slot is durable; a fresh session rehydrates it
    let slot: Option<String> = storage.load(keys::AUTH_TOKEN, None);
    assert_eq!(slot.as_deref(), Some("jwt-token"));

    let rehydrated = state_for(&server, storage);
    assert!(rehydrated.auth().is_authenticated());
}

// ---------------------------------------------------------------------------
// Login failure
// ---------------------------------------------------------------------------

/// A rejected login surfaces an error, leaves the token untouched, and
/// clears the loading flag.
#[tokio::test]
async fn test_login_failure_surfaces_error_and_keeps_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!("username or password is incorrect")),
        )
        .mount(&server)
        .await;

    let storage = Storage::in_memory();
    storage.save(keys::AUTH_TOKEN, &"existing-token".to_string());

    let mut state = state_for(&server, storage.clone());
    assert!(state.auth().is_authenticated());

    let ok = state.auth_mut().login(&credentials("x", "bad")).await;

    assert!(!ok, "login must report failure");
    let auth = state.auth();
    assert_eq!(auth.error(), Some("username or password is incorrect"));
    assert!(!auth.is_loading());
    assert_eq!(auth.token(), Some("existing-token"), "token must be unchanged");

    let slot: Option<String> = storage.load(keys::AUTH_TOKEN, None);
    assert_eq!(slot.as_deref(), Some("existing-token"));
}

/// A failed attempt clears the previous error on the next attempt.
#[tokio::test]
async fn test_new_attempt_clears_previous_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!("nope")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt-token" })))
        .mount(&server)
        .await;

    let mut state = state_for(&server, Storage::in_memory());

    assert!(!state.auth_mut().login(&credentials("x", "bad")).await);
    assert!(state.auth().error().is_some());

    assert!(state.auth_mut().login(&credentials("x", "good")).await);
    assert!(state.auth().error().is_none());
    assert!(state.auth().is_authenticated());
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout clears the token and its durable slot.
#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;

    let storage = Storage::in_memory();
    storage.save(keys::AUTH_TOKEN, &"existing-token".to_string());

    let mut state = state_for(&server, storage.clone());
    state.auth_mut().logout();

    assert!(!state.auth().is_authenticated());
    let slot: Option<String> = storage.load(keys::AUTH_TOKEN, None);
    assert!(slot.is_none());

    // Protected navigation now falls back
    let route = state.router().navigate("/account", state.auth());
    assert_eq!(route.name, "home");
}
