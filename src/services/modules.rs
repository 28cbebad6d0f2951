//! Modules service
//!
//! CRUD for course modules. Display position is the admin-assigned
//! `order_index`; the service only checks it is a positive position,
//! uniqueness is not enforced.

use super::{decode_row, decode_rows};
use crate::config::MIN_ORDER_INDEX;
use crate::error::{AppError, Result};
use crate::store::{self, DataStore, Filter, Module, ModulePatch, NewModule, Order, SelectQuery};
use std::sync::Arc;

/// Service for managing modules
#[derive(Clone)]
pub struct ModulesService {
    store: Arc<dyn DataStore>,
}

impl ModulesService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// List a course's modules, position ascending.
    pub async fn list_by_course(&self, course_id: &str) -> Result<Vec<Module>> {
        let rows = self
            .store
            .select(
                store::MODULES,
                SelectQuery::new()
                    .filter(Filter::Eq("course_id", course_id.to_string()))
                    .order(Order::asc("order_index")),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn create(&self, req: NewModule) -> Result<Module> {
        if req.title.trim().is_empty() {
            return Err(AppError::Validation("module title is required".to_string()));
        }
        if req.course_id.is_empty() {
            return Err(AppError::Validation("module course is required".to_string()));
        }
        if req.order_index < MIN_ORDER_INDEX {
            return Err(AppError::Validation(
                "module position must be at least 1".to_string(),
            ));
        }

        tracing::info!("Creating module: {}", req.title);

        let created = self
            .store
            .insert(store::MODULES, serde_json::to_value(&req)?)
            .await?;
        decode_row(created)
    }

    pub async fn update(&self, id: &str, patch: ModulePatch) -> Result<Module> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("module title is required".to_string()));
            }
        }
        if let Some(order_index) = patch.order_index {
            if order_index < MIN_ORDER_INDEX {
                return Err(AppError::Validation(
                    "module position must be at least 1".to_string(),
                ));
            }
        }

        let updated = self
            .store
            .update(store::MODULES, id, serde_json::to_value(&patch)?)
            .await?;
        decode_row(updated)
    }

    /// Delete a module. Its lessons are left behind; nothing cascades.
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting module: {}", id);
        self.store.delete(store::MODULES, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn new_module(course_id: &str, title: &str, order_index: i32) -> NewModule {
        NewModule {
            course_id: course_id.to_string(),
            title: title.to_string(),
            order_index,
        }
    }

    #[tokio::test]
    async fn list_sorts_by_position() {
        let store = Arc::new(MemoryStore::new());
        let service = ModulesService::new(store);

        service.create(new_module("c1", "Avançado", 2)).await.unwrap();
        service.create(new_module("c1", "Intro", 1)).await.unwrap();
        service.create(new_module("c2", "Outro curso", 1)).await.unwrap();

        let modules = service.list_by_course("c1").await.unwrap();

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].title, "Intro");
        assert_eq!(modules[1].title, "Avançado");
    }

    #[tokio::test]
    async fn position_ties_keep_arrival_order() {
        let store = Arc::new(MemoryStore::new());
        let service = ModulesService::new(store);

        service.create(new_module("c1", "Primeiro", 1)).await.unwrap();
        service.create(new_module("c1", "Segundo", 1)).await.unwrap();

        let modules = service.list_by_course("c1").await.unwrap();

        assert_eq!(modules[0].title, "Primeiro");
        assert_eq!(modules[1].title, "Segundo");
    }

    #[tokio::test]
    async fn create_rejects_non_positive_position() {
        let store = Arc::new(MemoryStore::new());
        let service = ModulesService::new(store);

        let err = service.create(new_module("c1", "Intro", 0)).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
