use reqwest::header::HeaderValue;
use serde_json::Value;

use crate::filter::{FilterError, QueryFilters, SortDirection};

use super::client::{DataClient, DataServiceError};

/// Builder for a single bounded request against one table. Predicates are
/// additive AND conditions; writes ask the service to return the resulting
/// representation so handlers can echo the affected row.
#[derive(Debug, Clone)]
pub struct TableQuery {
    client: DataClient,
    table: String,
    filters: QueryFilters,
}

impl TableQuery {
    pub(super) fn new(client: DataClient, table: String) -> Self {
        Self { client, table, filters: QueryFilters::new() }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Result<Self, FilterError> {
        self.filters = self.filters.eq(column, value)?;
        Ok(self)
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Result<Self, FilterError> {
        self.filters = self.filters.gte(column, value)?;
        Ok(self)
    }

    pub fn lte(mut self, column: &str, value: impl ToString) -> Result<Self, FilterError> {
        self.filters = self.filters.lte(column, value)?;
        Ok(self)
    }

    pub fn order(mut self, column: &str, direction: SortDirection) -> Result<Self, FilterError> {
        self.filters = self.filters.order(column, direction)?;
        Ok(self)
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.filters = self.filters.limit(limit);
        self
    }

    /// Merge predicates and ordering already accumulated elsewhere (the
    /// handlers build them from request parameters).
    pub fn with_filters(mut self, filters: QueryFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Fetch all visible rows matching the predicates.
    pub async fn select(self) -> Result<Vec<Value>, DataServiceError> {
        let url = self.client.table_url(&self.table)?;
        let request = self
            .client
            .http()
            .get(url)
            .query(&self.filters.to_query_pairs());

        let body = self.execute(request).await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(DataServiceError::InvalidResponse(format!(
                "expected array of rows, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Insert a single record and return the inserted row.
    pub async fn insert(self, record: Value) -> Result<Value, DataServiceError> {
        self.write_returning(record, "return=representation").await
    }

    /// Insert-or-merge on the table's conflict target, returning the row.
    /// Used by stock tables where one row per item is kept current.
    pub async fn upsert(self, record: Value) -> Result<Value, DataServiceError> {
        self.write_returning(record, "return=representation,resolution=merge-duplicates")
            .await
    }

    /// Apply a partial update to every row matching the predicates and
    /// return the first updated row. Refuses to run without predicates.
    pub async fn update(self, patch: Value) -> Result<Value, DataServiceError> {
        if self.filters.predicates().is_empty() {
            return Err(DataServiceError::Unfiltered("update"));
        }

        let url = self.client.table_url(&self.table)?;
        let request = self
            .client
            .http()
            .patch(url)
            .query(&self.filters.to_query_pairs())
            .header("Prefer", HeaderValue::from_static("return=representation"))
            .json(&patch);

        let body = self.execute(request).await?;
        first_row(body)
    }

    /// Delete every row matching the predicates. Refuses to run without
    /// predicates.
    pub async fn delete(self) -> Result<(), DataServiceError> {
        if self.filters.predicates().is_empty() {
            return Err(DataServiceError::Unfiltered("delete"));
        }

        let url = self.client.table_url(&self.table)?;
        let request = self
            .client
            .http()
            .delete(url)
            .query(&self.filters.to_query_pairs());

        let response = self.send(request).await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DataServiceError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn write_returning(
        self,
        record: Value,
        prefer: &'static str,
    ) -> Result<Value, DataServiceError> {
        let url = self.client.table_url(&self.table)?;
        let request = self
            .client
            .http()
            .post(url)
            .header("Prefer", HeaderValue::from_static(prefer))
            .json(&record);

        let body = self.execute(request).await?;
        first_row(body)
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, DataServiceError> {
        let response = self.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataServiceError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json::<Value>().await?)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, DataServiceError> {
        Ok(request
            .header("apikey", self.client.api_key())
            .bearer_auth(self.client.bearer())
            .send()
            .await?)
    }
}

/// Writes with `return=representation` come back as a one-element array.
fn first_row(body: Value) -> Result<Value, DataServiceError> {
    match body {
        Value::Array(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
        Value::Array(_) => Err(DataServiceError::InvalidResponse(
            "write returned no rows".to_string(),
        )),
        other => Err(DataServiceError::InvalidResponse(format!(
            "expected row array from write, got {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
