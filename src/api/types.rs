use serde::{Deserialize, Serialize};

/// A story, job or poll as returned by `/item/{id}.json`.
///
/// Only `id` is guaranteed; everything else may be absent for tombstoned
/// or non-discussable items.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Story {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<u64>,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dead: bool,
}

impl Story {
    /// URL to the HN discussion page for this story.
    pub fn hn_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }

    /// URL to the story content (article URL, or HN page for self-posts).
    pub fn content_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.hn_url())
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() && (self.deleted || self.dead) {
            "[deleted]"
        } else {
            &self.title
        }
    }

    pub fn author(&self) -> &str {
        self.by.as_deref().unwrap_or("[deleted]")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Story,
    Job,
    Poll,
    #[serde(other)]
    Other,
}

/// Which ranked listing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    #[default]
    Top,
    New,
    Best,
}

impl StoryType {
    pub fn endpoint(&self) -> &'static str {
        match self {
            StoryType::Top => "topstories",
            StoryType::New => "newstories",
            StoryType::Best => "beststories",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StoryType::Top => "Top",
            StoryType::New => "New",
            StoryType::Best => "Best",
        }
    }

    pub fn all() -> &'static [StoryType] {
        &[StoryType::Top, StoryType::New, StoryType::Best]
    }
}

impl std::str::FromStr for StoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "new" => Ok(Self::New),
            "best" => Ok(Self::Best),
            _ => Err(format!("Invalid story type: {s}. Use 'top', 'new' or 'best'")),
        }
    }
}

impl std::fmt::Display for StoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
