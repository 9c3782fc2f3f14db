use url::Url;

use crate::api::Story;

/// Domain shown for self posts, which have no url of their own.
pub const HN_DOMAIN: &str = "news.ycombinator.com";

/// Host of `url` with a single leading `www.` removed.
///
/// Malformed or missing urls yield an empty string.
pub fn extract_domain(url: Option<&str>) -> String {
    let Some(raw) = url.filter(|u| !u.is_empty()) else {
        return String::new();
    };
    match Url::parse(raw) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
            .unwrap_or_default(),
        Err(e) => {
            tracing::debug!(url = raw, error = %e, "unparseable story url");
            String::new()
        }
    }
}

pub fn display_domain(story: &Story) -> String {
    match story.url.as_deref() {
        Some(url) => extract_domain(Some(url)),
        None => HN_DOMAIN.to_string(),
    }
}

/// "Ask HN" / "Show HN" badge for titles carrying the prefix.
pub fn story_tag(title: &str) -> Option<&'static str> {
    if title.starts_with("Ask HN") {
        Some("Ask HN")
    } else if title.starts_with("Show HN") {
        Some("Show HN")
    } else {
        None
    }
}
