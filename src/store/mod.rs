//! Store module
//!
//! This module provides everything that touches the hosted backend:
//! - Model definitions for the catalog collections
//! - The `DataStore` contract (row-level CRUD plus the session API)
//! - `RemoteStore`, the HTTP implementation
//! - `MemoryStore`, the in-memory implementation used by tests

pub mod memory;
pub mod models;
pub mod remote;

pub use memory::MemoryStore;
pub use models::*;
pub use remote::RemoteStore;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

// Collection names in the hosted backend
pub const CATEGORIES: &str = "categories";
pub const COURSES: &str = "courses";
pub const MODULES: &str = "modules";
pub const LESSONS: &str = "lessons";
pub const MATERIALS: &str = "materials";

/// Column expression for course reads: the referenced category rides along
/// as a nested object.
pub const COURSE_COLUMNS: &str = "*, categories(id,name,slug)";

/// Row filter for a select
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// column equals value
    Eq(&'static str, String),
    /// column is a member of the value set
    In(&'static str, Vec<String>),
}

/// Sort directive for a select
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// Shape of one select round trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    /// Column expression; `None` means every column
    pub columns: Option<&'static str>,
    pub filter: Option<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &'static str) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }
}

/// Row-level contract of the hosted backend.
///
/// Every method is a single round trip. Implementations never retry and
/// never cache; failures surface as `AppError::Remote` (or `NotFound` /
/// `Auth` where the contract says so) and are left to the caller.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetch rows from a collection.
    async fn select(&self, collection: &str, query: SelectQuery) -> Result<Vec<Value>>;

    /// Fetch exactly one row; zero matches is `NotFound`.
    async fn select_one(&self, collection: &str, query: SelectQuery) -> Result<Value>;

    /// Insert a row and return it with server-assigned id and timestamps.
    async fn insert(&self, collection: &str, row: Value) -> Result<Value>;

    /// Merge-patch a row by id and return the row after the merge;
    /// an unknown id is `NotFound`.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value>;

    /// Delete a row by id. Nothing cascades; dependent rows are left alone.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// The session currently held by this client, if any.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Exchange email/password credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Invalidate the current session on the backend and forget it locally.
    async fn sign_out(&self) -> Result<()>;
}
