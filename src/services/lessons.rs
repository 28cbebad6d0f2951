//! Lessons service
//!
//! CRUD for lessons within a module. Video links are stored as pasted by
//! the admin; `crate::video::youtube_embed_url` normalizes them at display
//! time.

use super::{decode_row, decode_rows};
use crate::config::MIN_ORDER_INDEX;
use crate::error::{AppError, Result};
use crate::store::{self, DataStore, Filter, Lesson, LessonPatch, NewLesson, Order, SelectQuery};
use std::sync::Arc;

/// Service for managing lessons
#[derive(Clone)]
pub struct LessonsService {
    store: Arc<dyn DataStore>,
}

impl LessonsService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// List a module's lessons, position ascending.
    pub async fn list_by_module(&self, module_id: &str) -> Result<Vec<Lesson>> {
        let rows = self
            .store
            .select(
                store::LESSONS,
                SelectQuery::new()
                    .filter(Filter::Eq("module_id", module_id.to_string()))
                    .order(Order::asc("order_index")),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn create(&self, req: NewLesson) -> Result<Lesson> {
        if req.title.trim().is_empty() {
            return Err(AppError::Validation("lesson title is required".to_string()));
        }
        if req.module_id.is_empty() {
            return Err(AppError::Validation("lesson module is required".to_string()));
        }
        if req.order_index < MIN_ORDER_INDEX {
            return Err(AppError::Validation(
                "lesson position must be at least 1".to_string(),
            ));
        }

        tracing::info!("Creating lesson: {}", req.title);

        let created = self
            .store
            .insert(store::LESSONS, serde_json::to_value(&req)?)
            .await?;
        decode_row(created)
    }

    pub async fn update(&self, id: &str, patch: LessonPatch) -> Result<Lesson> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("lesson title is required".to_string()));
            }
        }
        if let Some(order_index) = patch.order_index {
            if order_index < MIN_ORDER_INDEX {
                return Err(AppError::Validation(
                    "lesson position must be at least 1".to_string(),
                ));
            }
        }

        let updated = self
            .store
            .update(store::LESSONS, id, serde_json::to_value(&patch)?)
            .await?;
        decode_row(updated)
    }

    /// Delete a lesson. Its materials are left behind; nothing cascades.
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting lesson: {}", id);
        self.store.delete(store::LESSONS, id).await
    }
}
