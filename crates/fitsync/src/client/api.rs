//! Fitness-platform API client for authenticated requests
//!
//! Authentication itself is an external concern: the client receives a
//! ready-to-use bearer token and only performs read operations.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use chrono::NaiveDate;

use crate::error::{Result, SyncError};
use crate::models::{Activity, SleepSession};

/// User agent for platform API requests
const API_USER_AGENT: &str = "fitsync/0.1";

/// Fitness-platform API client
pub struct FitnessClient {
    client: Client,
    base_url: String,
    token: String,
    user: String,
}

impl FitnessClient {
    /// Create a new API client for the given endpoint and account
    pub fn new(base_url: &str, token: &str, user: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            user: user.to_string(),
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| SyncError::config("source token contains invalid characters"))?,
        );
        Ok(headers)
    }

    /// Make an authenticated GET request and deserialize the JSON response
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.build_url(path))
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(SyncError::Http)?;

        let response = handle_response_status(response).await?;
        response.json().await.map_err(|e| {
            SyncError::invalid_response(format!("Failed to parse JSON response: {}", e))
        })
    }

    /// List activities, newest first
    pub async fn list_activities(&self, start: u32, limit: u32) -> Result<Vec<Activity>> {
        let path = format!(
            "/activitylist-service/activities/search/activities?limit={}&start={}",
            limit, start
        );
        self.get_json(&path).await
    }

    /// Fetch the sleep session recorded for a calendar date.
    ///
    /// Days without recorded sleep come back empty or not at all; both map
    /// to `None`.
    pub async fn sleep_session(&self, date: NaiveDate) -> Result<Option<SleepSession>> {
        let path = format!(
            "/wellness-service/wellness/dailySleepData/{}?date={}&nonSleepBufferMinutes=60",
            self.user, date
        );
        match self.get_json::<SleepSession>(&path).await {
            Ok(session) => {
                let has_data = session
                    .daily_sleep
                    .as_ref()
                    .and_then(|daily| daily.calendar_date.as_ref())
                    .is_some();
                Ok(has_data.then_some(session))
            }
            Err(SyncError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
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
        StatusCode::NOT_FOUND => Err(SyncError::NotFound("platform resource".to_string())),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(SyncError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}
