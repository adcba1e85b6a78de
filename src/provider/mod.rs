pub mod currents;
pub mod newsapi;

use async_trait::async_trait;

use crate::error::Result;
use crate::news::Article;

pub use currents::CurrentsProvider;
pub use newsapi::NewsApiProvider;

/// Substituted for an empty preference set when building a query.
pub const GENERIC_TOPIC: &str = "general";
/// Separator between preference terms in a provider query.
pub const QUERY_SEPARATOR: &str = " OR ";

/// What one provider attempt produced.
///
/// "Declined" (no credential, no network I/O attempted) is distinct from a
/// failed call (`Err` from `fetch`) and from a successful call that found
/// nothing. The pipeline treats all three as "advance the chain" but logs
/// them differently.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Declined,
    Articles(Vec<Article>),
}

/// Uniform capability over external article sources.
///
/// Providers get exactly one bounded-timeout attempt per pipeline call; any
/// retrying happens across requests, never inside a provider.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Stable identifier, used as the provenance tag.
    fn id(&self) -> &'static str;

    /// Whether a credential is available. Unconfigured providers must
    /// decline from `fetch` without touching the network.
    fn is_configured(&self) -> bool;

    async fn fetch(&self, preferences: &[String]) -> Result<FetchOutcome>;
}

/// Build the search query for a preference set: terms joined with a
/// boolean-OR separator, or the generic topic for an empty set.
pub fn build_query(preferences: &[String]) -> String {
    if preferences.is_empty() {
        GENERIC_TOPIC.to_string()
    } else {
        preferences.join(QUERY_SEPARATOR)
    }
}
