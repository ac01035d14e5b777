//! Movie recommendation backend provider
//!
//! Talks to the embedding-based recommendation endpoint, which scores upcoming
//! screenings against the user's preference and returns movie-level cards with their
//! showtimes grouped by cinema.

use crate::{
    error::{AppError, AppResult},
    models::ItemRecord,
    services::providers::RecommendationSource,
};
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;

const RECOMMEND_PATH: &str = "/api/recommend_movies";

#[derive(Debug, Serialize)]
struct RecommendBody<'a> {
    preference: &'a str,
}

#[derive(Clone)]
pub struct MovieApiSource {
    http_client: HttpClient,
    api_url: String,
}

impl MovieApiSource {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Pulls the `error` message out of a backend error body, if there is one
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body.to_string())
    }

    /// Converts the backend's JSON into a batch; each element is parsed leniently
    fn parse_batch(body: Value) -> AppResult<Vec<ItemRecord>> {
        match body {
            Value::Array(items) => Ok(items.into_iter().map(ItemRecord::from_value).collect()),
            other => Err(AppError::ExternalApi(format!(
                "Expected a list of recommendations, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[async_trait::async_trait]
impl RecommendationSource for MovieApiSource {
    async fn recommend(&self, preference: &str) -> AppResult<Vec<ItemRecord>> {
        let url = format!("{}{}", self.api_url, RECOMMEND_PATH);
        let response = self
            .http_client
            .post(&url)
            .json(&RecommendBody { preference })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Recommendation API returned status {}: {}",
                status,
                Self::error_message(&body)
            )));
        }

        let body: Value = response.json().await?;
        let items = Self::parse_batch(body)?;

        tracing::info!(
            results = items.len(),
            provider = self.name(),
            "Recommendations fetched"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "movie_api"
    }
}
