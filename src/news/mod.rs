pub mod pipeline;
pub mod synthetic;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Canonical article shape every provider is mapped into.
///
/// Optional fields a provider does not supply are `None` and serialize as
/// explicit `null`, so every article in a response is structurally uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    pub source: ArticleSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub name: String,
    pub url: Option<String>,
}

/// Which source satisfied a retrieval: the cache, a named live provider,
/// or local synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Cache,
    Provider(String),
    Synthetic,
}

impl Provenance {
    pub fn as_str(&self) -> &str {
        match self {
            Provenance::Cache => "cache",
            Provenance::Provider(id) => id,
            Provenance::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Provenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of one pipeline invocation. Constructed fresh per call, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    pub articles: Vec<Article>,
    pub cached: bool,
    pub provenance: Provenance,
}

/// Response envelope the thin outer surface (CLI here, an HTTP layer in a
/// full deployment) wraps a retrieval in.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub news: Vec<Article>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub cached: bool,
    pub source: Provenance,
}

impl ResponseEnvelope {
    pub fn new(result: RetrievalResult, preferences: Option<Vec<String>>, query: Option<String>) -> Self {
        let metadata = ResponseMetadata {
            count: result.articles.len(),
            preferences,
            query,
            cached: result.cached,
            source: result.provenance,
        };
        Self {
            news: result.articles,
            metadata,
        }
    }
}
