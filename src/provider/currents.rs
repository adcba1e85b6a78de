use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Error, Result};
use crate::news::{Article, ArticleSource};
use crate::provider::{build_query, FetchOutcome, NewsProvider};

use async_trait::async_trait;

/// Secondary provider: a header-authenticated search API (`Authorization`
/// header, `keywords` parameter, `{news: [...]}` response with its own
/// field names and date format).
#[derive(Debug, Clone)]
pub struct CurrentsProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_duration: Duration,
}

impl CurrentsProvider {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout_duration: Duration,
        user_agent: &str,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout_duration)
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint,
            api_key,
            timeout_duration,
        }
    }

    async fn request(&self, query: &str, api_key: &str) -> Result<CurrentsResponse> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", api_key)
            .query(&[("keywords", query), ("language", "en")])
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::HttpError(format!(
                "HTTP {} from currents: {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown error")
            )));
        }

        response
            .json::<CurrentsResponse>()
            .await
            .map_err(|e| Error::ProviderResponse(format!("Malformed currents body: {}", e)))
    }
}

#[async_trait]
impl NewsProvider for CurrentsProvider {
    fn id(&self) -> &'static str {
        "currents"
    }

    fn is_configured(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.is_empty())
    }

    async fn fetch(&self, preferences: &[String]) -> Result<FetchOutcome> {
        let api_key = match self.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => key.to_string(),
            None => return Ok(FetchOutcome::Declined),
        };

        let query = build_query(preferences);
        debug!(query = %query, "Querying currents");

        let body = timeout(self.timeout_duration, self.request(&query, &api_key))
            .await
            .map_err(|_| Error::Timeout(format!("currents request for '{}' timed out", query)))??;

        let articles = body.news.into_iter().map(Article::from).collect();
        Ok(FetchOutcome::Articles(articles))
    }
}

#[derive(Debug, Deserialize)]
struct CurrentsResponse {
    #[serde(default)]
    news: Vec<CurrentsArticle>,
}

#[derive(Debug, Deserialize)]
struct CurrentsArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published: Option<String>,
}

/// Published timestamps arrive as e.g. `2024-03-15 09:00:00 +0000`.
fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl From<CurrentsArticle> for Article {
    fn from(native: CurrentsArticle) -> Self {
        // The API signals "no image" with the literal string "None".
        let image = native.image.filter(|i| !i.is_empty() && i != "None");
        let published_at = native.published.as_deref().and_then(parse_published);

        Self {
            title: native.title.unwrap_or_else(|| "Untitled".to_string()),
            description: native.description,
            content: None,
            url: native.url.unwrap_or_default(),
            image,
            published_at,
            source: ArticleSource {
                name: "Currents".to_string(),
                url: None,
            },
        }
    }
}
