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

/// Primary provider: a query-string authenticated search API
/// (`q` + `apiKey` parameters, camelCase JSON response).
#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_duration: Duration,
    page_size: usize,
}

impl NewsApiProvider {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout_duration: Duration,
        page_size: usize,
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
            page_size,
        }
    }

    async fn request(&self, query: &str, api_key: &str) -> Result<NewsApiResponse> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("apiKey", api_key),
                ("pageSize", &self.page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::HttpError(format!(
                "HTTP {} from newsapi: {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown error")
            )));
        }

        response
            .json::<NewsApiResponse>()
            .await
            .map_err(|e| Error::ProviderResponse(format!("Malformed newsapi body: {}", e)))
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn id(&self) -> &'static str {
        "newsapi"
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
        debug!(query = %query, "Querying newsapi");

        let body = timeout(self.timeout_duration, self.request(&query, &api_key))
            .await
            .map_err(|_| Error::Timeout(format!("newsapi request for '{}' timed out", query)))??;

        let articles = body.articles.into_iter().map(Article::from).collect();
        Ok(FetchOutcome::Articles(articles))
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<DateTime<Utc>>,
    source: Option<NewsApiSource>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

impl From<NewsApiArticle> for Article {
    fn from(native: NewsApiArticle) -> Self {
        let source_name = native
            .source
            .and_then(|s| s.name)
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            title: native.title.unwrap_or_else(|| "Untitled".to_string()),
            description: native.description,
            content: native.content,
            url: native.url.unwrap_or_default(),
            image: native.url_to_image,
            published_at: native.published_at,
            source: ArticleSource {
                name: source_name,
                url: None,
            },
        }
    }
}
