use chrono::{Duration as ChronoDuration, Utc};

use crate::news::{Article, ArticleSource};
use crate::provider::GENERIC_TOPIC;

const SOURCE_NAME: &str = "Newsdesk Wire";

/// Generate placeholder articles when no live provider yields usable data.
///
/// Always succeeds: three base articles built around the lead topic (the
/// first preference, or the generic topic for an empty set), plus one extra
/// article per preference term beyond the first. Every title references the
/// lead topic.
pub fn synthesize_articles(preferences: &[String]) -> Vec<Article> {
    let lead = preferences
        .first()
        .map(String::as_str)
        .unwrap_or(GENERIC_TOPIC);

    let now = Utc::now();
    let mut articles = Vec::with_capacity(3 + preferences.len().saturating_sub(1));

    let base_titles = [
        format!("Breaking developments in {}", lead),
        format!("What to watch in {} this week", lead),
        format!("The state of {}: a round-up", lead),
    ];

    for (i, title) in base_titles.into_iter().enumerate() {
        articles.push(Article {
            title,
            description: Some(format!("An overview of recent {} coverage.", lead)),
            content: Some(format!(
                "No live sources were reachable, so this is generated coverage of {}.",
                lead
            )),
            url: format!("https://newsdesk.invalid/{}/{}", slug(lead), i + 1),
            image: None,
            published_at: Some(now - ChronoDuration::hours(i as i64)),
            source: ArticleSource {
                name: SOURCE_NAME.to_string(),
                url: None,
            },
        });
    }

    for (i, extra) in preferences.iter().skip(1).enumerate() {
        articles.push(Article {
            title: format!("Where {} meets {}", lead, extra),
            description: Some(format!(
                "How the {} story intersects with {}.",
                lead, extra
            )),
            content: Some(format!(
                "Generated coverage connecting {} and {}.",
                lead, extra
            )),
            url: format!("https://newsdesk.invalid/{}/{}", slug(lead), i + 4),
            image: None,
            published_at: Some(now - ChronoDuration::hours((i + 3) as i64)),
            source: ArticleSource {
                name: SOURCE_NAME.to_string(),
                url: None,
            },
        });
    }

    articles
}

fn slug(topic: &str) -> String {
    topic
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}
