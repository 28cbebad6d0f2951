//! Categories service
//!
//! CRUD for course categories. Slugs are derived here from the category
//! name, so the store only ever sees fully-formed rows.

use super::{decode_row, decode_rows};
use crate::error::{AppError, Result};
use crate::slug::slugify;
use crate::store::{self, Category, CategoryPatch, DataStore, Order, SelectQuery};
use serde_json::json;
use std::sync::Arc;

/// Service for managing categories
#[derive(Clone)]
pub struct CategoriesService {
    store: Arc<dyn DataStore>,
}

impl CategoriesService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// List all categories, name ascending.
    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = self
            .store
            .select(store::CATEGORIES, SelectQuery::new().order(Order::asc("name")))
            .await?;
        decode_rows(rows)
    }

    /// Create a category; the slug is derived from the name.
    pub async fn create(&self, name: &str, description: Option<String>) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("category name is required".to_string()));
        }

        tracing::info!("Creating category: {}", name);

        let row = json!({
            "name": name,
            "slug": slugify(name),
            "description": description,
        });
        let created = self.store.insert(store::CATEGORIES, row).await?;

        decode_row(created)
    }

    /// Update a category; a renamed category gets a freshly derived slug.
    pub async fn update(&self, id: &str, patch: CategoryPatch) -> Result<Category> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("category name is required".to_string()));
            }
        }

        let mut body = serde_json::to_value(&patch)?;
        if let Some(name) = &patch.name {
            body["slug"] = json!(slugify(name));
        }

        let updated = self.store.update(store::CATEGORIES, id, body).await?;
        decode_row(updated)
    }

    /// Delete a category. Courses referencing it are left untouched.
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting category: {}", id);
        self.store.delete(store::CATEGORIES, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (CategoriesService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CategoriesService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn create_derives_slug_from_name() {
        let (service, _) = service();

        let category = service.create("Design", None).await.unwrap();

        assert_eq!(category.name, "Design");
        assert_eq!(category.slug, "design");
        assert!(!category.id.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_name_before_any_round_trip() {
        let (service, store) = service();
        store.fail_requests(true);

        let err = service.create("   ", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let (service, _) = service();
        service.create("Programação", None).await.unwrap();
        service.create("Design", None).await.unwrap();

        let categories = service.list().await.unwrap();

        assert_eq!(categories[0].name, "Design");
        assert_eq!(categories[1].name, "Programação");
    }

    #[tokio::test]
    async fn rename_refreshes_the_slug() {
        let (service, _) = service();
        let category = service.create("Design", None).await.unwrap();

        let patch = CategoryPatch {
            name: Some("Design Gráfico".to_string()),
            ..Default::default()
        };
        let updated = service.update(&category.id, patch).await.unwrap();

        assert_eq!(updated.slug, "design-grafico");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (service, _) = service();

        let patch = CategoryPatch {
            description: Some("x".to_string()),
            ..Default::default()
        };
        let err = service.update("missing", patch).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
