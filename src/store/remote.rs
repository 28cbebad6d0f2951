//! Remote store
//!
//! `DataStore` implementation over the hosted backend's HTTP surface:
//! row CRUD against the `/rest/v1` query endpoints and the email/password
//! session flow against `/auth/v1`. One request per operation, no retries,
//! no caching; the backend's own timeout behavior governs.

use super::{DataStore, Filter, SelectQuery, Session};
use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;

/// Media type that makes the backend return a bare object and reject
/// responses that are not exactly one row.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

pub struct RemoteStore {
    http: reqwest::Client,
    config: Config,
    /// Session held for the lifetime of this client; the access token
    /// replaces the anon key as bearer once signed in.
    session: RwLock<Option<Session>>,
}

impl RemoteStore {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session: RwLock::new(None),
        }
    }

    fn rest_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.config.backend_url, collection)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.backend_url, path)
    }

    /// Attach the api key and bearer token every request carries.
    async fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.config.anon_key.clone(),
        };

        req.header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    /// Pull the backend's error message out of a failed response.
    async fn error_message(resp: Response) -> String {
        let status = resp.status();
        match resp.json::<Value>().await {
            Ok(body) => body
                .get("message")
                .or_else(|| body.get("error_description"))
                .or_else(|| body.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        }
    }

    async fn remote_error(resp: Response) -> AppError {
        AppError::Remote(Self::error_message(resp).await)
    }
}

/// Translate a select into the backend's query-string dialect.
fn query_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![(
        "select".to_string(),
        query.columns.unwrap_or("*").to_string(),
    )];

    match &query.filter {
        Some(Filter::Eq(column, value)) => {
            params.push((column.to_string(), format!("eq.{}", value)));
        }
        Some(Filter::In(column, values)) => {
            params.push((column.to_string(), format!("in.({})", values.join(","))));
        }
        None => {}
    }

    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }

    params
}

#[async_trait]
impl DataStore for RemoteStore {
    async fn select(&self, collection: &str, query: SelectQuery) -> Result<Vec<Value>> {
        let req = self
            .http
            .get(self.rest_url(collection))
            .query(&query_params(&query));
        let resp = self.authorize(req).await.send().await?;

        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }

        Ok(resp.json().await?)
    }

    async fn select_one(&self, collection: &str, query: SelectQuery) -> Result<Value> {
        let req = self
            .http
            .get(self.rest_url(collection))
            .query(&query_params(&query))
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT);
        let resp = self.authorize(req).await.send().await?;

        // The single-object media type turns a zero-row result into 406.
        if resp.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(AppError::NotFound(format!(
                "no {} row matched the query",
                collection
            )));
        }
        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }

        Ok(resp.json().await?)
    }

    async fn insert(&self, collection: &str, row: Value) -> Result<Value> {
        let req = self
            .http
            .post(self.rest_url(collection))
            .header("Prefer", "return=representation")
            .json(&[row]);
        let resp = self.authorize(req).await.send().await?;

        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }

        let mut rows: Vec<Value> = resp.json().await?;
        if rows.is_empty() {
            return Err(AppError::Remote(format!(
                "{} insert returned no representation",
                collection
            )));
        }
        Ok(rows.remove(0))
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value> {
        let req = self
            .http
            .patch(self.rest_url(collection))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch);
        let resp = self.authorize(req).await.send().await?;

        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }

        // A patch that matched no row succeeds with an empty representation.
        let mut rows: Vec<Value> = resp.json().await?;
        if rows.is_empty() {
            return Err(AppError::NotFound(format!("{} id {}", collection, id)));
        }
        Ok(rows.remove(0))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let req = self
            .http
            .delete(self.rest_url(collection))
            .query(&[("id", format!("eq.{}", id))]);
        let resp = self.authorize(req).await.send().await?;

        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }

        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let body = serde_json::json!({ "email": email, "password": password });
        let req = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&body);
        let resp = self
            .authorize(req)
            .await
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AppError::Auth(Self::error_message(resp).await));
        }

        let session: Session = resp
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        *self.session.write().await = Some(session.clone());
        tracing::info!("Signed in as {:?}", session.user.email);

        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        // Forget the session first; a failed remote revocation must not
        // leave this client authenticated.
        let session = self.session.write().await.take();

        let Some(session) = session else {
            return Ok(());
        };

        let resp = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::remote_error(resp).await);
        }

        tracing::info!("Signed out");
        Ok(())
    }
}
