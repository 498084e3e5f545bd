//! Workspace-database API client
//!
//! Thin authenticated wrapper over the workspace HTTP API. Queries paginate
//! with a sequential cursor loop and only ever return active (non-archived)
//! records; records are removed by archiving, never hard-deleted.

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

use crate::error::{Result, SyncError};
use crate::store::page::{Icon, StoredRecord};

/// API version header sent with every request
const VERSION_HEADER: &str = "Notion-Version";

/// Workspace-database API client
pub struct WorkspaceStore {
    client: Client,
    base_url: String,
    token: String,
    version: String,
    page_size: u32,
}

impl WorkspaceStore {
    /// Create a new store client for the given endpoint
    pub fn new(base_url: &str, token: &str, version: &str, page_size: u32) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            version: version.to_string(),
            page_size,
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| SyncError::config("store token contains invalid characters"))?,
        );
        headers.insert(
            VERSION_HEADER,
            HeaderValue::from_str(&self.version)
                .map_err(|_| SyncError::config("invalid store API version"))?,
        );
        Ok(headers)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(self.build_url(path))
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await
            .map_err(SyncError::Http)?;
        let response = handle_response_status(response).await?;
        response.json().await.map_err(|e| {
            SyncError::invalid_response(format!("Failed to parse store response: {}", e))
        })
    }

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .patch(self.build_url(path))
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await
            .map_err(SyncError::Http)?;
        let response = handle_response_status(response).await?;
        response.json().await.map_err(|e| {
            SyncError::invalid_response(format!("Failed to parse store response: {}", e))
        })
    }

    /// Query active records whose date property equals the given calendar
    /// date.
    pub async fn query_by_date(
        &self,
        database_id: &str,
        property: &str,
        date: NaiveDate,
    ) -> Result<Vec<StoredRecord>> {
        let filter = json!({
            "property": property,
            "date": {"equals": date.to_string()}
        });
        self.run_query(database_id, Some(filter)).await
    }

    /// Scan the full collection of active records
    pub async fn query_all(&self, database_id: &str) -> Result<Vec<StoredRecord>> {
        self.run_query(database_id, None).await
    }

    async fn run_query(
        &self,
        database_id: &str,
        filter: Option<Value>,
    ) -> Result<Vec<StoredRecord>> {
        let path = format!("/v1/databases/{}/query", database_id);
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({"page_size": self.page_size});
            if let Some(filter) = &filter {
                body["filter"] = filter.clone();
            }
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let response = self.post_json(&path, &body).await?;
            let results = response
                .get("results")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            records.extend(results.iter().filter_map(StoredRecord::from_page));

            let has_more = response
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if !has_more {
                break;
            }
            cursor = response
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string);
            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!(database_id, count = records.len(), "store query");
        Ok(records)
    }

    /// Create a new record in a database
    pub async fn create_record(
        &self,
        database_id: &str,
        properties: Value,
        icon: Option<&Icon>,
    ) -> Result<StoredRecord> {
        let mut body = json!({
            "parent": {"database_id": database_id},
            "properties": properties,
        });
        if let Some(icon) = icon {
            body["icon"] = icon.to_value();
        }

        let page = self.post_json("/v1/pages", &body).await?;
        StoredRecord::from_page(&page)
            .ok_or_else(|| SyncError::invalid_response("create returned no usable page"))
    }

    /// Overwrite a record's properties in place
    pub async fn update_record(
        &self,
        record_id: &str,
        properties: Value,
        icon: Option<&Icon>,
    ) -> Result<()> {
        let mut body = json!({"properties": properties});
        if let Some(icon) = icon {
            body["icon"] = icon.to_value();
        }

        self.patch_json(&format!("/v1/pages/{}", record_id), &body)
            .await?;
        Ok(())
    }

    /// Soft-delete a record. It remains queryable as inactive but is
    /// excluded from future matching.
    pub async fn archive_record(&self, record_id: &str) -> Result<()> {
        self.patch_json(
            &format!("/v1/pages/{}", record_id),
            &json!({"archived": true}),
        )
        .await?;
        Ok(())
    }
}

/// Handle response status codes and convert to errors
async fn handle_response_status(response: Response) -> Result<Response> {
    let status = response.status();

    match status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
            Ok(response)
        }
        StatusCode::UNAUTHORIZED => Err(SyncError::NotAuthenticated),
        StatusCode::TOO_MANY_REQUESTS => Err(SyncError::RateLimited),
        StatusCode::NOT_FOUND => Err(SyncError::NotFound("store resource".to_string())),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(SyncError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}
