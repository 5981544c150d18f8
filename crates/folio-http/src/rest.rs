//! PostgREST table access (`/rest/v1`).

use crate::client::BackendClient;
use crate::error::{BackendError, Result};
use crate::traits::RowStore;
use crate::types::{ApiRequest, RowQuery};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Clone)]
pub struct RestApi {
    client: BackendClient,
}

impl RestApi {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    fn table_path(table: &str) -> String {
        format!("rest/v1/{}", table)
    }

    fn rows_of(value: Value) -> Result<Vec<Value>> {
        match value {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Err(BackendError::Protocol(format!(
                "expected a row array, got {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl RowStore for RestApi {
    async fn select(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>> {
        let request = ApiRequest::get().with_query_pairs(query.to_select_params());
        let response = self.client.send(&Self::table_path(table), request).await?;
        Self::rows_of(response.json()?)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        let request = ApiRequest::post()
            .prefer("return=representation")
            .with_json(&Value::Array(vec![row]))?;
        let response = self.client.send(&Self::table_path(table), request).await?;
        Self::rows_of(response.json()?)?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Protocol("insert returned no row".to_string()))
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<()> {
        let request = ApiRequest::post()
            .with_query("on_conflict", on_conflict)
            .prefer("resolution=merge-duplicates,return=minimal")
            .with_json(&Value::Array(vec![row]))?;
        self.client.send(&Self::table_path(table), request).await?;
        Ok(())
    }

    async fn update(&self, table: &str, query: &RowQuery, patch: Value) -> Result<Vec<Value>> {
        let request = ApiRequest::patch()
            .with_query_pairs(query.to_filter_params())
            .prefer("return=representation")
            .with_json(&patch)?;
        let response = self.client.send(&Self::table_path(table), request).await?;
        Self::rows_of(response.json()?)
    }

    async fn delete(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>> {
        let request = ApiRequest::delete()
            .with_query_pairs(query.to_filter_params())
            .prefer("return=representation");
        let response = self.client.send(&Self::table_path(table), request).await?;
        Self::rows_of(response.json()?)
    }
}
