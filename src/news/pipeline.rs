use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::cache::{derive_key, NewsCache};
use crate::news::synthetic::synthesize_articles;
use crate::news::{Provenance, RetrievalResult};
use crate::provider::{FetchOutcome, NewsProvider};

/// Ordered fallback retrieval: cache, then each provider once in priority
/// order, then local synthesis. Write-through on every non-cache result.
///
/// The pipeline never fails outward: every error a provider produces is
/// absorbed into "try the next source", and synthesis always succeeds.
pub struct NewsPipeline {
    cache: Arc<NewsCache>,
    providers: Vec<Arc<dyn NewsProvider>>,
}

impl NewsPipeline {
    pub fn new(cache: Arc<NewsCache>, providers: Vec<Arc<dyn NewsProvider>>) -> Self {
        Self { cache, providers }
    }

    pub fn cache(&self) -> &NewsCache {
        &self.cache
    }

    /// Retrieve articles for a preference set.
    ///
    /// Providers are attempted sequentially; the first non-empty success
    /// wins. Declined, failed, and empty outcomes all advance the chain.
    pub async fn get_news(&self, preferences: &[String]) -> RetrievalResult {
        let key = derive_key(preferences);

        if let Some(articles) = self.cache.get(&key) {
            debug!(key = %key, count = articles.len(), "Cache hit");
            return RetrievalResult {
                articles,
                cached: true,
                provenance: Provenance::Cache,
            };
        }

        for provider in &self.providers {
            match provider.fetch(preferences).await {
                Ok(FetchOutcome::Declined) => {
                    debug!(provider = provider.id(), "Provider not configured, skipping");
                }
                Ok(FetchOutcome::Articles(articles)) if articles.is_empty() => {
                    debug!(provider = provider.id(), "Provider returned no articles");
                }
                Ok(FetchOutcome::Articles(articles)) => {
                    debug!(
                        provider = provider.id(),
                        count = articles.len(),
                        "Provider satisfied request"
                    );
                    self.cache.set(&key, articles.clone());
                    return RetrievalResult {
                        articles,
                        cached: false,
                        provenance: Provenance::Provider(provider.id().to_string()),
                    };
                }
                Err(e) if e.is_temporary() => {
                    warn!(provider = provider.id(), error = %e, "Provider attempt failed");
                }
                Err(e) => {
                    error!(provider = provider.id(), error = %e, "Provider attempt failed");
                }
            }
        }

        debug!(key = %key, "All providers exhausted, synthesizing");
        let articles = synthesize_articles(preferences);
        self.cache.set(&key, articles.clone());

        RetrievalResult {
            articles,
            cached: false,
            provenance: Provenance::Synthetic,
        }
    }

    /// Search under a preference set: the query term is unioned into the
    /// preference set and the same retrieval machinery runs.
    pub async fn search_news(&self, query: &str, preferences: &[String]) -> RetrievalResult {
        let mut expanded = preferences.to_vec();
        expanded.push(query.to_string());
        self.get_news(&expanded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::news::{Article, ArticleSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum StubBehavior {
        Decline,
        Fail,
        Empty,
        Yield(Vec<Article>),
    }

    struct StubProvider {
        id: &'static str,
        behavior: StubBehavior,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(id: &'static str, behavior: StubBehavior) -> Arc<Self> {
            Arc::new(Self {
                id,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NewsProvider for StubProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn is_configured(&self) -> bool {
            !matches!(self.behavior, StubBehavior::Decline)
        }

        async fn fetch(&self, _preferences: &[String]) -> Result<FetchOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                StubBehavior::Decline => Ok(FetchOutcome::Declined),
                StubBehavior::Fail => Err(Error::HttpError("stub failure".to_string())),
                StubBehavior::Empty => Ok(FetchOutcome::Articles(vec![])),
                StubBehavior::Yield(articles) => Ok(FetchOutcome::Articles(articles.clone())),
            }
        }
    }

    fn articles_from(name: &str) -> Vec<Article> {
        vec![Article {
            title: format!("Story from {}", name),
            description: None,
            content: None,
            url: format!("https://example.com/{}", name),
            image: None,
            published_at: None,
            source: ArticleSource {
                name: name.to_string(),
                url: None,
            },
        }]
    }

    fn prefs(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    fn pipeline(providers: Vec<Arc<dyn NewsProvider>>) -> NewsPipeline {
        NewsPipeline::new(Arc::new(NewsCache::new(Duration::from_secs(60))), providers)
    }

    #[tokio::test]
    async fn test_first_non_empty_provider_wins() {
        let primary = StubProvider::new("primary", StubBehavior::Yield(articles_from("primary")));
        let secondary = StubProvider::new("secondary", StubBehavior::Yield(articles_from("secondary")));
        let p = pipeline(vec![primary.clone() as Arc<dyn NewsProvider>, secondary.clone()]);

        let result = p.get_news(&prefs(&["tech"])).await;

        assert_eq!(result.provenance, Provenance::Provider("primary".to_string()));
        assert!(!result.cached);
        assert_eq!(result.articles[0].source.name, "primary");
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_declined_failed_and_empty_all_advance() {
        let declined = StubProvider::new("declined", StubBehavior::Decline);
        let failed = StubProvider::new("failed", StubBehavior::Fail);
        let empty = StubProvider::new("empty", StubBehavior::Empty);
        let last = StubProvider::new("last", StubBehavior::Yield(articles_from("last")));
        let p = pipeline(vec![
            declined.clone() as Arc<dyn NewsProvider>,
            failed.clone(),
            empty.clone(),
            last.clone(),
        ]);

        let result = p.get_news(&prefs(&["tech"])).await;

        assert_eq!(result.provenance, Provenance::Provider("last".to_string()));
        assert_eq!(declined.call_count(), 1);
        assert_eq!(failed.call_count(), 1);
        assert_eq!(empty.call_count(), 1);
        assert_eq!(last.call_count(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_falls_back_to_synthesis() {
        let failed = StubProvider::new("failed", StubBehavior::Fail);
        let p = pipeline(vec![failed as Arc<dyn NewsProvider>]);

        let preferences = prefs(&["sports", "finance"]);
        let result = p.get_news(&preferences).await;

        assert_eq!(result.provenance, Provenance::Synthetic);
        assert!(!result.cached);
        assert_eq!(result.articles.len(), 4);
        assert!(result.articles.iter().all(|a| a.title.contains("sports")));
    }

    #[tokio::test]
    async fn test_no_providers_synthesizes() {
        let p = pipeline(vec![]);
        let result = p.get_news(&[]).await;

        assert_eq!(result.provenance, Provenance::Synthetic);
        assert_eq!(result.articles.len(), 3);
    }

    #[tokio::test]
    async fn test_write_through_then_cache_hit() {
        let provider = StubProvider::new("primary", StubBehavior::Yield(articles_from("primary")));
        let p = pipeline(vec![provider.clone() as Arc<dyn NewsProvider>]);
        let preferences = prefs(&["tech"]);

        let first = p.get_news(&preferences).await;
        assert!(!first.cached);
        assert_eq!(first.provenance, Provenance::Provider("primary".to_string()));

        let second = p.get_news(&preferences).await;
        assert!(second.cached);
        assert_eq!(second.provenance, Provenance::Cache);
        assert_eq!(second.articles, first.articles);

        // The hit skipped the provider entirely.
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_synthetic_results_are_cached_too() {
        let p = pipeline(vec![]);
        let preferences = prefs(&["tech"]);

        let first = p.get_news(&preferences).await;
        assert_eq!(first.provenance, Provenance::Synthetic);

        let second = p.get_news(&preferences).await;
        assert_eq!(second.provenance, Provenance::Cache);
        assert_eq!(second.articles, first.articles);
    }

    #[tokio::test]
    async fn test_cache_hit_is_order_independent() {
        let provider = StubProvider::new("primary", StubBehavior::Yield(articles_from("primary")));
        let p = pipeline(vec![provider.clone() as Arc<dyn NewsProvider>]);

        p.get_news(&prefs(&["tech", "ai"])).await;
        let reordered = p.get_news(&prefs(&["ai", "tech"])).await;

        assert!(reordered.cached);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_unions_query_into_preferences() {
        let p = pipeline(vec![]);

        let via_search = p.search_news("ai", &prefs(&["tech"])).await;
        let via_get = p.get_news(&prefs(&["tech", "ai"])).await;

        // Same derived key: the second call is served from the entry the
        // first one wrote.
        assert!(!via_search.cached);
        assert!(via_get.cached);
        assert_eq!(via_get.articles, via_search.articles);
    }
}
