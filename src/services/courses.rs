//! Courses service
//!
//! CRUD and slug lookup for courses. Reads embed the referenced category;
//! writes derive the slug from the title before the row reaches the store.

use super::{decode_row, decode_rows};
use crate::error::{AppError, Result};
use crate::slug::slugify;
use crate::store::{
    self, Course, CoursePatch, DataStore, Filter, NewCourse, Order, SelectQuery,
};
use serde_json::json;
use std::sync::Arc;

/// Service for managing courses
#[derive(Clone)]
pub struct CoursesService {
    store: Arc<dyn DataStore>,
}

impl CoursesService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// List all courses, newest first, with the category embedded.
    pub async fn list(&self) -> Result<Vec<Course>> {
        let rows = self
            .store
            .select(
                store::COURSES,
                SelectQuery::new()
                    .columns(store::COURSE_COLUMNS)
                    .order(Order::desc("created_at")),
            )
            .await?;
        decode_rows(rows)
    }

    /// Fetch a single course by slug, with the category embedded.
    ///
    /// Zero matches is `NotFound`; this never falls back to a defaulted
    /// course object.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Course> {
        let row = self
            .store
            .select_one(
                store::COURSES,
                SelectQuery::new()
                    .columns(store::COURSE_COLUMNS)
                    .filter(Filter::Eq("slug", slug.to_string())),
            )
            .await?;
        decode_row(row)
    }

    /// Create a course; the slug is derived from the title.
    pub async fn create(&self, req: NewCourse) -> Result<Course> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("course title is required".to_string()));
        }
        if req.category_id.is_empty() {
            return Err(AppError::Validation("course category is required".to_string()));
        }

        tracing::info!("Creating course: {}", title);

        let mut row = serde_json::to_value(&req)?;
        row["title"] = json!(title);
        row["slug"] = json!(slugify(title));
        let created = self.store.insert(store::COURSES, row).await?;

        decode_row(created)
    }

    /// Update a course; a retitled course gets a freshly derived slug.
    pub async fn update(&self, id: &str, patch: CoursePatch) -> Result<Course> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("course title is required".to_string()));
            }
        }

        let mut body = serde_json::to_value(&patch)?;
        if let Some(title) = &patch.title {
            body["slug"] = json!(slugify(title));
        }

        let updated = self.store.update(store::COURSES, id, body).await?;
        decode_row(updated)
    }

    /// Delete a course. Its modules are left behind; nothing cascades.
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting course: {}", id);
        self.store.delete(store::COURSES, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CategoriesService;
    use crate::store::MemoryStore;

    fn new_course(title: &str, category_id: &str) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            description: None,
            category_id: category_id.to_string(),
            instructor_name: None,
            instructor_bio: None,
            thumbnail_url: None,
        }
    }

    async fn service_with_category() -> (CoursesService, Arc<MemoryStore>, String) {
        let store = Arc::new(MemoryStore::new());
        let category = CategoriesService::new(store.clone())
            .create("Design", None)
            .await
            .unwrap();
        (CoursesService::new(store.clone()), store, category.id)
    }

    #[tokio::test]
    async fn create_derives_slug_from_title() {
        let (service, _, category_id) = service_with_category().await;

        let course = service
            .create(new_course("UI Básico", &category_id))
            .await
            .unwrap();

        assert_eq!(course.slug, "ui-basico");
    }

    #[tokio::test]
    async fn create_requires_title_and_category() {
        let (service, _, category_id) = service_with_category().await;

        let err = service
            .create(new_course("  ", &category_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service.create(new_course("UI Básico", "")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn get_by_slug_embeds_the_category() {
        let (service, _, category_id) = service_with_category().await;
        service
            .create(new_course("UI Básico", &category_id))
            .await
            .unwrap();

        let course = service.get_by_slug("ui-basico").await.unwrap();

        let category = course.category.expect("category embed");
        assert_eq!(category.slug, "design");
    }

    #[tokio::test]
    async fn get_by_slug_unknown_is_not_found() {
        let (service, _, _) = service_with_category().await;

        let err = service.get_by_slug("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_the_category_leaves_the_course_listable() {
        let (service, store, category_id) = service_with_category().await;
        service
            .create(new_course("UI Básico", &category_id))
            .await
            .unwrap();

        CategoriesService::new(store.clone())
            .delete(&category_id)
            .await
            .unwrap();

        // No cascade: the course survives with a dangling reference.
        let courses = service.list().await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].category_id, category_id);
        assert!(courses[0].category.is_none());
    }

    #[tokio::test]
    async fn retitle_refreshes_the_slug() {
        let (service, _, category_id) = service_with_category().await;
        let course = service
            .create(new_course("UI Básico", &category_id))
            .await
            .unwrap();

        let patch = CoursePatch {
            title: Some("UI Avançado".to_string()),
            ..Default::default()
        };
        let updated = service.update(&course.id, patch).await.unwrap();

        assert_eq!(updated.slug, "ui-avancado");
    }
}
