//! Authentication session container.
//!
//! Holds the session token plus the ephemeral login UI state (loading flag,
//! last error, login modal visibility). Only the token is durable; the
//! ephemeral fields reset to defaults on every application start.

use tracing::{debug, warn};

use crate::api::{ApiClient, LoginRequest};
use crate::storage::{Storage, keys};

/// Authentication session state.
///
/// `is_authenticated` is derived from the token on every access; there is no
/// separate flag that could drift out of sync.
pub struct AuthStore {
    token: Option<String>,
    is_loading: bool,
    error: Option<String>,
    login_modal_open: bool,
    api: ApiClient,
    storage: Storage,
}

impl AuthStore {
    /// Create a session, rehydrating a persisted token if one exists.
    #[must_use]
    pub fn new(api: ApiClient, storage: Storage) -> Self {
        let token = storage.load(keys::AUTH_TOKEN, None);
        Self {
            token,
            is_loading: false,
            error: None,
            login_modal_open: false,
            api,
            storage,
        }
    }

    /// The current session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a login attempt is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last failed login, cleared on the next attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the login modal is visible.
    #[must_use]
    pub const fn is_login_modal_open(&self) -> bool {
        self.login_modal_open
    }

    /// Whether a session token is present and non-empty.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Attempt a login with the given credentials.
    ///
    /// On success the returned token is stored (in memory and in the durable
    /// slot), the login modal closes, and `true` is returned. On failure a
    /// human-readable message lands in [`error`](Self::error), the token is
    /// left untouched, and `false` is returned. The loading flag is cleared
    /// on both paths.
    ///
    /// A second login cannot start while one is in flight: this method holds
    /// the container exclusively for the duration of the call.
    pub async fn login(&mut self, credentials: &LoginRequest) -> bool {
        self.is_loading = true;
        self.error = None;

        let result = self.api.login(credentials).await;
        self.is_loading = false;

        match result {
            Ok(response) => {
                debug!("Login succeeded");
                self.set_token(Some(response.token));
                self.login_modal_open = false;
                true
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Drop the session: clears the token, its durable slot, and any error.
    pub fn logout(&mut self) {
        debug!("Logging out");
        self.set_token(None);
        self.error = None;
    }

    /// Show the login modal, clearing any stale error.
    pub fn open_login_modal(&mut self) {
        self.login_modal_open = true;
        self.error = None;
    }

    /// Hide the login modal.
    pub fn close_login_modal(&mut self) {
        self.login_modal_open = false;
    }

    fn set_token(&mut self, token: Option<String>) {
        match &token {
            Some(token) => self.storage.save(keys::AUTH_TOKEN, token),
            None => self.storage.remove(keys::AUTH_TOKEN),
        }
        self.token = token;
    }
}
