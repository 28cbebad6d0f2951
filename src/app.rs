//! Application state and initialization
//!
//! All services are initialized here and made available through AppState;
//! the embedding view layer constructs one AppState at startup and hands
//! clones to its pages.

use crate::config::Config;
use crate::services::{
    AuthService, CatalogService, CategoriesService, CoursesService, LessonsService,
    MaterialsService, ModulesService,
};
use crate::store::{DataStore, RemoteStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub categories: CategoriesService,
    pub courses: CoursesService,
    pub modules: ModulesService,
    pub lessons: LessonsService,
    pub materials: MaterialsService,
    pub catalog: CatalogService,
    pub auth: AuthService,
}

impl AppState {
    /// Build the service set over any store implementation.
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            categories: CategoriesService::new(store.clone()),
            courses: CoursesService::new(store.clone()),
            modules: ModulesService::new(store.clone()),
            lessons: LessonsService::new(store.clone()),
            materials: MaterialsService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            auth: AuthService::new(store),
        }
    }

    /// Connect to the hosted backend described by `config`.
    pub fn connect(config: Config) -> Self {
        Self::new(Arc::new(RemoteStore::new(config)))
    }

    /// Application setup, called once on startup: resolves the initial
    /// session state so the route guard has something to decide on.
    pub async fn setup(&self) {
        tracing::info!("Initializing application");
        self.auth.resolve_session().await;
        tracing::info!("Application initialized successfully");
    }
}

/// Initialize logging; honors `RUST_LOG` and defaults to debug for this
/// crate, info elsewhere.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "academia_catalog=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SessionState;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn setup_resolves_the_session_state() {
        let state = AppState::new(Arc::new(MemoryStore::new()));

        state.setup().await;

        assert_eq!(state.auth.state().await, SessionState::Unauthenticated);
    }
}
