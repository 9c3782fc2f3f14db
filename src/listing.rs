//! Headless `list` command: drives the feed controller to completion
//! without a terminal and prints the result.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::api::{Story, StoryType};
use crate::cli::ListFormat;
use crate::feed::{self, FeedController, Phase};
use crate::fetch::QueryCache;
use crate::format::display_domain;
use crate::time::format_relative_age;

/// Reveal pages of `story_type` until `count` stories are resolved or the
/// ranking runs out.
pub async fn collect(
    cache: &QueryCache,
    story_type: StoryType,
    count: usize,
    page_size: usize,
) -> Result<Vec<Arc<Story>>> {
    let mut controller = FeedController::new(page_size);
    let mut pending = FuturesUnordered::new();
    pending.push(feed::execute(cache, controller.initialize(story_type)));

    loop {
        while let Some(event) = pending.next().await {
            for fetch in controller.handle(event) {
                pending.push(feed::execute(cache, fetch));
            }
        }

        match controller.phase() {
            Phase::Errored(message) => bail!(message),
            Phase::Exhausted => break,
            _ if controller.visible_len() >= count => break,
            _ => {}
        }

        let more = controller.on_viewport_near_end();
        if more.is_empty() {
            break;
        }
        for fetch in more {
            pending.push(feed::execute(cache, fetch));
        }
    }

    let mut stories = controller.visible_slice();
    stories.truncate(count);
    tracing::debug!(count = stories.len(), feed = %story_type, "listing collected");
    Ok(stories)
}

fn points(n: u32) -> String {
    if n == 1 {
        "1 point".to_string()
    } else {
        format!("{n} points")
    }
}

fn comments(n: u32) -> String {
    if n == 1 {
        "1 comment".to_string()
    } else {
        format!("{n} comments")
    }
}

pub fn render_text(stories: &[Arc<Story>], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for (i, story) in stories.iter().enumerate() {
        let _ = write!(
            out,
            "{}. {} ({}) | {} | by {} | {}",
            i + 1,
            story.display_title(),
            display_domain(story),
            points(story.score),
            story.author(),
            format_relative_age(story.time, now),
        );
        if let Some(n) = story.descendants {
            let _ = write!(out, " | {}", comments(n));
        }
        out.push('\n');
    }
    out
}

pub fn render_json(stories: &[Arc<Story>]) -> Result<String> {
    let records: Vec<&Story> = stories.iter().map(Arc::as_ref).collect();
    serde_json::to_string_pretty(&records).context("Failed to serialize stories to JSON")
}

pub fn render(stories: &[Arc<Story>], format: ListFormat, now: DateTime<Utc>) -> Result<String> {
    match format {
        ListFormat::Text => Ok(render_text(stories, now)),
        ListFormat::Json => render_json(stories),
    }
}
