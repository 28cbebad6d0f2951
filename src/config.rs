//! Application configuration
//!
//! Backend connection settings read from the environment, plus the
//! constants and validation boundaries used throughout the crate.

use crate::error::{AppError, Result};

// ===== Route Guard =====

/// Path prefix that requires an authenticated admin session
pub const ADMIN_PATH_PREFIX: &str = "/admin";

/// Login page; reachable without a session so the guard cannot lock users out
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

// ===== Ordering Limits =====

/// Minimum value for module/lesson `order_index`.
/// Ordering positions are admin-assigned starting at 1; zero and negative
/// positions are rejected before any remote call.
pub const MIN_ORDER_INDEX: i32 = 1;

// ===== Backend Connection =====

/// Environment variable holding the backend project URL
pub const ENV_BACKEND_URL: &str = "SUPABASE_URL";

/// Environment variable holding the backend anonymous API key
pub const ENV_BACKEND_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project base URL, e.g. `https://xyzcompany.supabase.co`
    pub backend_url: String,
    /// Anonymous API key sent with every request
    pub anon_key: String,
}

impl Config {
    /// Load settings from the environment, honoring a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        // Missing .env is fine; real environments set the variables directly.
        dotenvy::dotenv().ok();

        let backend_url = std::env::var(ENV_BACKEND_URL)
            .map_err(|_| AppError::Validation(format!("{} is not set", ENV_BACKEND_URL)))?;
        let anon_key = std::env::var(ENV_BACKEND_ANON_KEY)
            .map_err(|_| AppError::Validation(format!("{} is not set", ENV_BACKEND_ANON_KEY)))?;

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    pub fn new(backend_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url: String = backend_url.into();
        Self {
            backend_url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }
}
