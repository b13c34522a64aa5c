// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgREST (Supabase) row store client.
//!
//! Translates [`Query`] values into PostgREST query parameters:
//! - filters: `col=eq.value`, `col=gte.value`, `col=lte.value`, `col=ilike.*text*`
//! - ordering: `order=date.desc,created_at.desc`
//! - limit: `limit=1`

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::db::{Filter, Query, Row, RowStore, StoreError};

/// HTTP row store speaking the PostgREST dialect.
#[derive(Clone)]
pub struct PostgrestStore {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl PostgrestStore {
    /// Create a client for the project at `config.supabase_url`.
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(url = %config.supabase_url, "Configured PostgREST row store");

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Check response status and return error if not successful.
    async fn check_response(
        &self,
        response: reqwest::Response,
        table: &str,
    ) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(table, status, body))
    }
}

#[async_trait]
impl RowStore for PostgrestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let mut params = filter_params(&query.filters);
        params.insert(0, ("select".to_string(), "*".to_string()));
        params.extend(order_params(query));

        let response = self
            .request(reqwest::Method::GET, &query.table)
            .query(&params)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        self.check_response(response, &query.table)
            .await?
            .json::<Vec<Row>>()
            .await
            .map_err(|e| StoreError::Transport(format!("Invalid response body: {}", e)))
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        self.check_response(response, table).await?;
        Ok(())
    }

    async fn update(&self, query: &Query, patch: Row) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::PATCH, &query.table)
            .header("Prefer", "return=minimal")
            .query(&filter_params(&query.filters))
            .json(&patch)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        self.check_response(response, &query.table).await?;
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Row, on_conflict: &[&str]) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .query(&[("on_conflict", on_conflict.join(","))])
            .json(&row)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        self.check_response(response, table).await?;
        Ok(())
    }

    async fn delete(&self, query: &Query) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, &query.table)
            .query(&filter_params(&query.filters))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        self.check_response(response, &query.table).await?;
        Ok(())
    }
}

/// Map a non-2xx response to a store error for `table`.
fn status_error(table: &str, status: u16, body: String) -> StoreError {
    // 23505: unique_violation
    if status == 409 && body.contains("23505") {
        return StoreError::Conflict {
            table: table.to_string(),
            detail: body,
        };
    }

    tracing::warn!(table, status, body = %body, "PostgREST request failed");
    StoreError::Status { status, body }
}

/// Render filters as PostgREST query parameters.
fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| match filter {
            Filter::Eq(col, v) => (col.clone(), format!("eq.{}", render_value(v))),
            Filter::Gte(col, v) => (col.clone(), format!("gte.{}", render_value(v))),
            Filter::Lte(col, v) => (col.clone(), format!("lte.{}", render_value(v))),
            // PostgREST accepts `*` as the wildcard in URLs
            Filter::ILike(col, pattern) => (col.clone(), format!("ilike.{}", pattern.replace('%', "*"))),
        })
        .collect()
}

fn order_params(query: &Query) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("order".to_string(), order));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// Filter operands are sent bare (`eq.2024-01-01`, not `eq."2024-01-01"`).
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
