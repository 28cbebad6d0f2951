//! Session gate
//!
//! Holds the process-wide admin session state and gates the admin routes.
//! The state starts `Unknown`, is resolved once at startup from the store's
//! current-session accessor, and from then on only `login`/`logout` move it.

use crate::config::{ADMIN_LOGIN_PATH, ADMIN_PATH_PREFIX};
use crate::error::{AppError, Result};
use crate::store::{DataStore, Session};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lifecycle of the admin session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Session status not yet resolved; treated as unauthenticated by the guard
    Unknown,
    Authenticated(Session),
    Unauthenticated,
}

/// Route guard verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Granted,
    RedirectToLogin,
}

/// Service holding the session state machine
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn DataStore>,
    state: Arc<RwLock<SessionState>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(SessionState::Unknown)),
        }
    }

    /// Resolve the initial `Unknown` state from the store. Called once at
    /// startup; later calls on a resolved state do nothing.
    pub async fn resolve_session(&self) {
        let mut state = self.state.write().await;
        if *state != SessionState::Unknown {
            return;
        }

        *state = match self.store.current_session().await {
            Ok(Some(session)) => {
                tracing::info!("Restored session for {:?}", session.user.email);
                SessionState::Authenticated(session)
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                tracing::warn!("Session lookup failed, treating as signed out: {}", err);
                SessionState::Unauthenticated
            }
        };
    }

    /// Exchange credentials for a session. On failure the state is left
    /// unauthenticated and the error is surfaced for the login form.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_string(),
            ));
        }

        match self.store.sign_in(email, password).await {
            Ok(session) => {
                *self.state.write().await = SessionState::Authenticated(session.clone());
                tracing::info!("Admin login: {}", email);
                Ok(session)
            }
            Err(err) => {
                // A failed attempt resolves Unknown to Unauthenticated but
                // never tears down a session that already exists.
                let mut state = self.state.write().await;
                if !matches!(*state, SessionState::Authenticated(_)) {
                    *state = SessionState::Unauthenticated;
                }
                Err(err)
            }
        }
    }

    /// End the session. Local state is cleared even when the remote
    /// sign-out fails, so the UI can never be stranded looking signed in.
    pub async fn logout(&self) {
        if let Err(err) = self.store.sign_out().await {
            tracing::warn!("Remote sign-out failed, clearing session anyway: {}", err);
        }
        *self.state.write().await = SessionState::Unauthenticated;
        tracing::info!("Admin logout");
    }

    /// True only for a resolved, authenticated session.
    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.read().await, SessionState::Authenticated(_))
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Route guard: admin paths need an authenticated session, except the
    /// login page itself; everything else is public. `Unknown` is denied
    /// the same as `Unauthenticated`.
    pub async fn check_route(&self, path: &str) -> RouteAccess {
        if !is_admin_path(path) || path == ADMIN_LOGIN_PATH {
            return RouteAccess::Granted;
        }

        if self.is_authenticated().await {
            RouteAccess::Granted
        } else {
            RouteAccess::RedirectToLogin
        }
    }
}

fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PATH_PREFIX
        || path
            .strip_prefix(ADMIN_PATH_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}
