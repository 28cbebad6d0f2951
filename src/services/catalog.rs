//! Catalog service
//!
//! Assembles the nested module → lesson → material tree for a course
//! detail page, and the summary counts for the admin dashboard.

use super::decode_rows;
use crate::error::Result;
use crate::store::{
    self, DataStore, Filter, Lesson, Material, Module, Order, SelectQuery,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A module with its lessons attached, in display order
#[derive(Debug, Clone, Serialize)]
pub struct ModuleTree {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<LessonTree>,
}

/// A lesson with its materials attached
#[derive(Debug, Clone, Serialize)]
pub struct LessonTree {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub materials: Vec<Material>,
}

/// Summary counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardStats {
    pub courses: usize,
    pub categories: usize,
}

/// Service assembling catalog views that span collections
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DataStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Build the full content tree for one course.
    ///
    /// At most three round trips, each depending on the ids collected by
    /// the previous one: the course's modules, then every lesson of those
    /// modules in one batched query, then every material of those lessons
    /// in one batched query. A course without modules yields an empty tree,
    /// not an error. Any failed round trip aborts the whole assembly; no
    /// partial tree is returned.
    pub async fn course_structure(&self, course_id: &str) -> Result<Vec<ModuleTree>> {
        let modules: Vec<Module> = decode_rows(
            self.store
                .select(
                    store::MODULES,
                    SelectQuery::new()
                        .filter(Filter::Eq("course_id", course_id.to_string()))
                        .order(Order::asc("order_index")),
                )
                .await?,
        )?;

        if modules.is_empty() {
            return Ok(Vec::new());
        }

        let module_ids: Vec<String> = modules.iter().map(|m| m.id.clone()).collect();
        let lessons: Vec<Lesson> = decode_rows(
            self.store
                .select(
                    store::LESSONS,
                    SelectQuery::new()
                        .filter(Filter::In("module_id", module_ids))
                        .order(Order::asc("order_index")),
                )
                .await?,
        )?;

        // A membership filter over an empty id set is a degenerate query
        // the backend handles badly; skip the round trip instead.
        let lesson_ids: Vec<String> = lessons.iter().map(|l| l.id.clone()).collect();
        let materials: Vec<Material> = if lesson_ids.is_empty() {
            Vec::new()
        } else {
            decode_rows(
                self.store
                    .select(
                        store::MATERIALS,
                        SelectQuery::new().filter(Filter::In("lesson_id", lesson_ids)),
                    )
                    .await?,
            )?
        };

        Ok(assemble(modules, lessons, materials))
    }

    /// Fetch the dashboard counts; the two lists are independent, so the
    /// round trips run concurrently.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let courses = self.store.select(
            store::COURSES,
            SelectQuery::new().columns(store::COURSE_COLUMNS),
        );
        let categories = self
            .store
            .select(store::CATEGORIES, SelectQuery::new());

        let (courses, categories) = tokio::try_join!(courses, categories)?;

        Ok(DashboardStats {
            courses: courses.len(),
            categories: categories.len(),
        })
    }
}

/// Group materials under their lesson and lessons under their module,
/// preserving the order the queries established.
fn assemble(
    modules: Vec<Module>,
    lessons: Vec<Lesson>,
    materials: Vec<Material>,
) -> Vec<ModuleTree> {
    let mut materials_by_lesson: HashMap<String, Vec<Material>> = HashMap::new();
    for material in materials {
        materials_by_lesson
            .entry(material.lesson_id.clone())
            .or_default()
            .push(material);
    }

    let mut lessons_by_module: HashMap<String, Vec<LessonTree>> = HashMap::new();
    for lesson in lessons {
        let materials = materials_by_lesson.remove(&lesson.id).unwrap_or_default();
        lessons_by_module
            .entry(lesson.module_id.clone())
            .or_default()
            .push(LessonTree { lesson, materials });
    }

    modules
        .into_iter()
        .map(|module| {
            let lessons = lessons_by_module.remove(&module.id).unwrap_or_default();
            ModuleTree { module, lessons }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::{LessonsService, MaterialsService, ModulesService};
    use crate::store::{MaterialKind, MemoryStore, NewLesson, NewMaterial, NewModule};

    struct Fixture {
        store: Arc<MemoryStore>,
        catalog: CatalogService,
        modules: ModulesService,
        lessons: LessonsService,
        materials: MaterialsService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            catalog: CatalogService::new(store.clone()),
            modules: ModulesService::new(store.clone()),
            lessons: LessonsService::new(store.clone()),
            materials: MaterialsService::new(store.clone()),
            store,
        }
    }

    async fn add_module(f: &Fixture, course_id: &str, title: &str, order_index: i32) -> String {
        f.modules
            .create(NewModule {
                course_id: course_id.to_string(),
                title: title.to_string(),
                order_index,
            })
            .await
            .unwrap()
            .id
    }

    async fn add_lesson(f: &Fixture, module_id: &str, title: &str, order_index: i32) -> String {
        f.lessons
            .create(NewLesson {
                module_id: module_id.to_string(),
                title: title.to_string(),
                order_index,
                video_url: None,
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn modules_come_back_in_position_order() {
        let f = fixture();
        // Inserted out of order on purpose.
        add_module(&f, "c1", "Segundo", 2).await;
        add_module(&f, "c1", "Primeiro", 1).await;

        let tree = f.catalog.course_structure("c1").await.unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].module.order_index, 1);
        assert_eq!(tree[1].module.order_index, 2);
    }

    #[tokio::test]
    async fn course_without_modules_yields_an_empty_tree() {
        let f = fixture();

        let tree = f.catalog.course_structure("c1").await.unwrap();

        assert!(tree.is_empty());
        // No follow-up queries were issued for the empty course.
        assert_eq!(f.store.select_count(crate::store::LESSONS), 0);
        assert_eq!(f.store.select_count(crate::store::MATERIALS), 0);
    }

    #[tokio::test]
    async fn lesson_fetch_is_one_batched_query() {
        let f = fixture();
        let m1 = add_module(&f, "c1", "Módulo 1", 1).await;
        let m2 = add_module(&f, "c1", "Módulo 2", 2).await;
        add_lesson(&f, &m1, "Aula 1", 1).await;
        add_lesson(&f, &m2, "Aula 2", 1).await;

        f.catalog.course_structure("c1").await.unwrap();

        assert_eq!(f.store.select_count(crate::store::LESSONS), 1);
    }

    #[tokio::test]
    async fn material_fetch_is_skipped_when_there_are_no_lessons() {
        let f = fixture();
        add_module(&f, "c1", "Módulo 1", 1).await;

        let tree = f.catalog.course_structure("c1").await.unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree[0].lessons.is_empty());
        assert_eq!(f.store.select_count(crate::store::MATERIALS), 0);
    }

    #[tokio::test]
    async fn materials_land_under_their_lesson() {
        let f = fixture();
        let m1 = add_module(&f, "c1", "Módulo 1", 1).await;
        let l1 = add_lesson(&f, &m1, "Aula 1", 1).await;
        let l2 = add_lesson(&f, &m1, "Aula 2", 2).await;

        f.materials
            .create(NewMaterial {
                lesson_id: l2.clone(),
                title: "Gabarito".to_string(),
                dropbox_url: "https://www.dropbox.com/s/gabarito".to_string(),
                kind: MaterialKind::Document,
            })
            .await
            .unwrap();
        f.materials
            .create(NewMaterial {
                lesson_id: l1.clone(),
                title: "Slides".to_string(),
                dropbox_url: "https://www.dropbox.com/s/slides".to_string(),
                kind: MaterialKind::Pdf,
            })
            .await
            .unwrap();

        let tree = f.catalog.course_structure("c1").await.unwrap();

        let lessons = &tree[0].lessons;
        assert_eq!(lessons[0].materials.len(), 1);
        assert_eq!(lessons[0].materials[0].title, "Slides");
        assert_eq!(lessons[1].materials.len(), 1);
        assert_eq!(lessons[1].materials[0].title, "Gabarito");
    }

    #[tokio::test]
    async fn a_failed_round_trip_aborts_the_assembly() {
        let f = fixture();
        add_module(&f, "c1", "Módulo 1", 1).await;
        f.store.fail_requests(true);

        let err = f.catalog.course_structure("c1").await.unwrap_err();

        assert!(matches!(err, AppError::Remote(_)));
    }

    #[tokio::test]
    async fn dashboard_counts_both_collections() {
        let f = fixture();
        crate::services::CategoriesService::new(f.store.clone())
            .create("Design", None)
            .await
            .unwrap();

        let stats = f.catalog.dashboard_stats().await.unwrap();

        assert_eq!(stats.categories, 1);
        assert_eq!(stats.courses, 0);
    }
}
