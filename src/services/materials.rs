//! Materials service
//!
//! CRUD for downloadable materials attached to lessons. Materials have no
//! admin-assigned position; listings keep creation order.

use super::{decode_row, decode_rows};
use crate::error::{AppError, Result};
use crate::store::{
    self, DataStore, Filter, Material, MaterialPatch, NewMaterial, Order, SelectQuery,
};
use std::sync::Arc;

/// Service for managing materials
#[derive(Clone)]
pub struct MaterialsService {
    store: Arc<dyn DataStore>,
}

impl MaterialsService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// List a lesson's materials, oldest first.
    pub async fn list_by_lesson(&self, lesson_id: &str) -> Result<Vec<Material>> {
        let rows = self
            .store
            .select(
                store::MATERIALS,
                SelectQuery::new()
                    .filter(Filter::Eq("lesson_id", lesson_id.to_string()))
                    .order(Order::asc("created_at")),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn create(&self, req: NewMaterial) -> Result<Material> {
        if req.title.trim().is_empty() {
            return Err(AppError::Validation("material title is required".to_string()));
        }
        if req.dropbox_url.trim().is_empty() {
            return Err(AppError::Validation("material link is required".to_string()));
        }
        if req.lesson_id.is_empty() {
            return Err(AppError::Validation("material lesson is required".to_string()));
        }

        tracing::info!("Creating material: {}", req.title);

        let created = self
            .store
            .insert(store::MATERIALS, serde_json::to_value(&req)?)
            .await?;
        decode_row(created)
    }

    pub async fn update(&self, id: &str, patch: MaterialPatch) -> Result<Material> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("material title is required".to_string()));
            }
        }

        let updated = self
            .store
            .update(store::MATERIALS, id, serde_json::to_value(&patch)?)
            .await?;
        decode_row(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting material: {}", id);
        self.store.delete(store::MATERIALS, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MaterialKind, MemoryStore};

    fn new_material(lesson_id: &str, title: &str, kind: MaterialKind) -> NewMaterial {
        NewMaterial {
            lesson_id: lesson_id.to_string(),
            title: title.to_string(),
            dropbox_url: format!("https://www.dropbox.com/s/{}", title.to_lowercase()),
            kind,
        }
    }

    #[tokio::test]
    async fn kind_tag_round_trips_on_the_wire() {
        let store = Arc::new(MemoryStore::new());
        let service = MaterialsService::new(store);

        let material = service
            .create(new_material("l1", "Slides", MaterialKind::Pdf))
            .await
            .unwrap();

        assert_eq!(material.kind, MaterialKind::Pdf);

        let listed = service.list_by_lesson("l1").await.unwrap();
        assert_eq!(listed[0].kind, MaterialKind::Pdf);
    }

    #[test]
    fn kind_wire_tags_round_trip_and_fold_unknowns() {
        assert_eq!(serde_json::to_value(MaterialKind::Other).unwrap(), "Outro");
        assert_eq!(
            serde_json::from_value::<MaterialKind>(serde_json::json!("Outro")).unwrap(),
            MaterialKind::Other
        );

        // A tag this crate does not know folds to Other instead of failing
        // the whole row decode.
        assert_eq!(
            serde_json::from_value::<MaterialKind>(serde_json::json!("Apostila")).unwrap(),
            MaterialKind::Other
        );
    }

    #[tokio::test]
    async fn list_keeps_creation_order() {
        let store = Arc::new(MemoryStore::new());
        let service = MaterialsService::new(store);

        for title in ["Slides", "Apostila", "Gabarito"] {
            service
                .create(new_material("l1", title, MaterialKind::Document))
                .await
                .unwrap();
        }

        let titles: Vec<String> = service
            .list_by_lesson("l1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();

        assert_eq!(titles, ["Slides", "Apostila", "Gabarito"]);
    }

    #[tokio::test]
    async fn create_requires_a_link() {
        let store = Arc::new(MemoryStore::new());
        let service = MaterialsService::new(store);

        let mut req = new_material("l1", "Slides", MaterialKind::Pdf);
        req.dropbox_url = String::new();

        let err = service.create(req).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
