//! Services module
//!
//! The data-access layer: one service per collection, each method one
//! round trip against the store, plus the catalog tree assembler and the
//! session gate. Services validate required fields and derive slugs before
//! anything reaches the store; they never catch-and-hide a store failure.

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod courses;
pub mod lessons;
pub mod materials;
pub mod modules;

pub use auth::{AuthService, RouteAccess, SessionState};
pub use catalog::{CatalogService, DashboardStats, LessonTree, ModuleTree};
pub use categories::CategoriesService;
pub use courses::CoursesService;
pub use lessons::LessonsService;
pub use materials::MaterialsService;
pub use modules::ModulesService;

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode one store row into a model.
pub(crate) fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T> {
    Ok(serde_json::from_value(row)?)
}

/// Decode a whole result set into models.
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}
