//! In-memory store
//!
//! `DataStore` implementation backed by plain maps, used by unit and
//! integration tests in place of the hosted backend. It mirrors the remote
//! semantics the services rely on (filtering, ordering, embeds, session
//! flow) and adds test instrumentation: per-collection select counters and
//! failure injection.

use super::{DataStore, Filter, SelectQuery, Session, SessionUser};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    select_calls: Mutex<HashMap<String, usize>>,
    admins: Mutex<HashMap<String, String>>,
    session: Mutex<Option<Session>>,
    fail_requests: AtomicBool,
    fail_sign_out: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register credentials that `sign_in` will accept.
    pub fn register_admin(&self, email: &str, password: &str) {
        self.admins
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
    }

    /// Pre-seed the client-held session, as if sign-in happened earlier.
    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }

    /// How many selects have hit a collection; used to assert batching.
    pub fn select_count(&self, collection: &str) -> usize {
        self.select_calls
            .lock()
            .unwrap()
            .get(collection)
            .copied()
            .unwrap_or(0)
    }

    /// Make every data operation fail with a remote error.
    pub fn fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, AtomicOrdering::SeqCst);
    }

    /// Make the remote half of sign-out fail.
    pub fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, AtomicOrdering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.fail_requests.load(AtomicOrdering::SeqCst) {
            return Err(AppError::Remote("injected backend failure".to_string()));
        }
        Ok(())
    }

    fn filtered_rows(&self, collection: &str, query: &SelectQuery) -> Vec<Value> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filter(query.filter.as_ref(), row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            // Stable sort: rows with equal keys keep arrival order.
            rows.sort_by(|a, b| {
                let cmp = compare_values(a.get(order.column), b.get(order.column));
                if order.ascending {
                    cmp
                } else {
                    cmp.reverse()
                }
            });
        }

        // Course reads may ask for the category embed.
        if query.columns.is_some_and(|c| c.contains("categories(")) {
            for row in &mut rows {
                self.embed_category(row);
            }
        }

        rows
    }

    /// Attach the referenced category the way the backend shapes nested
    /// selects. A dangling reference embeds as null, it does not drop the row.
    fn embed_category(&self, row: &mut Value) {
        let category_id = row
            .get("category_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let embed = category_id.and_then(|id| {
            let tables = self.tables.lock().unwrap();
            tables.get(super::CATEGORIES).and_then(|categories| {
                categories
                    .iter()
                    .find(|c| c.get("id").and_then(Value::as_str) == Some(id.as_str()))
                    .map(|c| {
                        json!({
                            "id": c.get("id"),
                            "name": c.get("name"),
                            "slug": c.get("slug"),
                        })
                    })
            })
        });

        row["categories"] = embed.unwrap_or(Value::Null);
    }
}

fn matches_filter(filter: Option<&Filter>, row: &Value) -> bool {
    match filter {
        None => true,
        Some(Filter::Eq(column, value)) => {
            row.get(*column).and_then(Value::as_str) == Some(value.as_str())
        }
        Some(Filter::In(column, values)) => row
            .get(*column)
            .and_then(Value::as_str)
            .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
    }
}

/// Compare two column values for sorting. String columns holding RFC 3339
/// timestamps are compared as instants, because the textual form carries a
/// variable number of fractional-second digits and does not order
/// lexicographically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, collection: &str, query: SelectQuery) -> Result<Vec<Value>> {
        *self
            .select_calls
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_insert(0) += 1;
        self.check_available()?;

        Ok(self.filtered_rows(collection, &query))
    }

    async fn select_one(&self, collection: &str, query: SelectQuery) -> Result<Value> {
        self.check_available()?;

        self.filtered_rows(collection, &query)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("no {} row matched the query", collection)))
    }

    async fn insert(&self, collection: &str, mut row: Value) -> Result<Value> {
        self.check_available()?;

        let fields = row
            .as_object_mut()
            .ok_or_else(|| AppError::Remote("insert body must be an object".to_string()))?;
        fields
            .entry("id")
            .or_insert_with(|| json!(Uuid::new_v4().to_string()));
        fields.entry("created_at").or_insert_with(|| json!(Utc::now()));

        self.tables
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(row.clone());

        Ok(row)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value> {
        self.check_available()?;

        let patch_fields = patch
            .as_object()
            .ok_or_else(|| AppError::Remote("patch body must be an object".to_string()))?;

        let mut tables = self.tables.lock().unwrap();
        let rows = tables
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("{} id {}", collection, id)))?;
        let row = rows
            .iter_mut()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("{} id {}", collection, id)))?;

        if let Some(fields) = row.as_object_mut() {
            for (key, value) in patch_fields {
                fields.insert(key.clone(), value.clone());
            }
        }

        Ok(row.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.check_available()?;

        // Deleting an absent row is a no-op, matching the remote semantics;
        // nothing cascades to dependent collections.
        if let Some(rows) = self.tables.lock().unwrap().get_mut(collection) {
            rows.retain(|row| row.get("id").and_then(Value::as_str) != Some(id));
        }

        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        self.check_available()?;
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let stored = self.admins.lock().unwrap().get(email).cloned();
        if stored.as_deref() != Some(password) {
            return Err(AppError::Auth("invalid login credentials".to_string()));
        }

        let session = Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: None,
            user: SessionUser {
                id: Uuid::new_v4().to_string(),
                email: Some(email.to_string()),
            },
        };
        *self.session.lock().unwrap() = Some(session.clone());

        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.session.lock().unwrap().take();

        if self.fail_sign_out.load(AtomicOrdering::SeqCst) {
            return Err(AppError::Remote("sign-out rejected".to_string()));
        }
        Ok(())
    }
}
