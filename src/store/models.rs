//! Catalog entities
//!
//! Rust structs mirroring the backend collections. Field names follow the
//! backend schema so rows serialize straight onto the wire; all models use
//! serde for delivery to the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A course category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// URL-safe identifier derived from `name`
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The slice of a category embedded in course reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// A course, with its category embedded when fetched through the course
/// read paths. The embed rides on the wire under the collection name
/// `categories`, which is how the backend shapes nested selects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: String,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub instructor_bio: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "categories", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

/// A module within a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub course_id: String,
    pub title: String,
    /// Display position, admin-assigned, ties allowed
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// A lesson within a module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub order_index: i32,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Kind tag for a material; wire values are the labels the admin form uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "Vídeo")]
    Video,
    #[serde(rename = "Documento")]
    Document,
    #[serde(rename = "Outro", other)]
    Other,
}

/// A downloadable material attached to a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    /// External document location
    pub dropbox_url: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub created_at: DateTime<Utc>,
}

// ===== Create / patch request types =====
//
// Create requests carry the full field set minus server-assigned id and
// timestamps; slugs are added by the service layer before the row reaches
// the store. Patch requests serialize only the fields that are set so a
// merge-patch never clobbers untouched columns.

/// Create course request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: String,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub instructor_bio: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Update course request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Update category request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Create module request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewModule {
    pub course_id: String,
    pub title: String,
    pub order_index: i32,
}

/// Update module request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

/// Create lesson request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLesson {
    pub module_id: String,
    pub title: String,
    pub order_index: i32,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Update lesson request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Create material request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaterial {
    pub lesson_id: String,
    pub title: String,
    pub dropbox_url: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
}

/// Update material request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropbox_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MaterialKind>,
}

// ===== Session =====

/// Backend-issued proof of an authenticated admin principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: SessionUser,
}

/// The principal attached to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}
