//! Test doubles and builders shared across module tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::api::{ApiError, HnApi, ItemKind, Story, StoryType};
use crate::app::App;
use crate::feed::{DEFAULT_PAGE_SIZE, FeedEvent, FetchKind};
use crate::fetch::{QueryCache, RetryPolicy};
use crate::theme::{ResolvedTheme, ThemeVariant, default_for_variant};
use crate::time::{Clock, fixed_clock};

/// Fixed timestamp for deterministic tests: 2023-11-15 00:00:00 UTC.
/// Sample stories are posted around 1700000000, about a day earlier.
pub const TEST_NOW: i64 = 1700092800;

pub struct StoryBuilder {
    id: u64,
    title: String,
    url: Option<String>,
    score: u32,
    by: Option<String>,
    time: i64,
    descendants: Option<u32>,
    kind: ItemKind,
}

impl Default for StoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl StoryBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            title: "Test Story".to_string(),
            url: Some("https://example.com".to_string()),
            score: 100,
            by: Some("testuser".to_string()),
            time: 1700000000,
            descendants: Some(10),
            kind: ItemKind::Story,
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn no_url(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.by = Some(author.to_string());
        self
    }

    pub fn comments(mut self, count: u32) -> Self {
        self.descendants = Some(count);
        self
    }

    /// Jobs and similar items carry no comment count.
    pub fn no_comments(mut self) -> Self {
        self.descendants = None;
        self
    }

    pub fn time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> Story {
        Story {
            id: self.id,
            title: self.title,
            url: self.url,
            text: None,
            by: self.by,
            score: self.score,
            time: self.time,
            descendants: self.descendants,
            kids: Vec::new(),
            kind: self.kind,
            deleted: false,
            dead: false,
        }
    }
}

/// In-memory [`HnApi`] with call counting, queued failures and an optional
/// gate that holds every call until a permit is added.
#[derive(Default)]
pub struct FakeApi {
    ids: Mutex<HashMap<StoryType, Vec<u64>>>,
    stories: Mutex<HashMap<u64, Story>>,
    story_failures: Mutex<HashMap<u64, VecDeque<ApiError>>>,
    id_failures: Mutex<HashMap<StoryType, VecDeque<ApiError>>>,
    story_calls: Mutex<HashMap<u64, usize>>,
    id_calls: Mutex<HashMap<StoryType, usize>>,
    gate: Option<Arc<Semaphore>>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits for one permit on the returned semaphore.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let api = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (api, gate)
    }

    pub fn with_ids(self, story_type: StoryType, ids: Vec<u64>) -> Self {
        self.ids.lock().unwrap().insert(story_type, ids);
        self
    }

    pub fn with_story(self, story: Story) -> Self {
        self.stories.lock().unwrap().insert(story.id, story);
        self
    }

    /// Queue a failure for the next call on `id`; later calls succeed.
    pub fn fail_story(&self, id: u64, err: ApiError) {
        self.story_failures
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push_back(err);
    }

    pub fn fail_ids(&self, story_type: StoryType, err: ApiError) {
        self.id_failures
            .lock()
            .unwrap()
            .entry(story_type)
            .or_default()
            .push_back(err);
    }

    pub fn story_calls(&self, id: u64) -> usize {
        self.story_calls.lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    pub fn id_calls(&self, story_type: StoryType) -> usize {
        self.id_calls
            .lock()
            .unwrap()
            .get(&story_type)
            .copied()
            .unwrap_or(0)
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl HnApi for FakeApi {
    async fn list_ids(&self, story_type: StoryType) -> Result<Vec<u64>, ApiError> {
        *self.id_calls.lock().unwrap().entry(story_type).or_default() += 1;
        self.wait_for_gate().await;

        let failure = self
            .id_failures
            .lock()
            .unwrap()
            .get_mut(&story_type)
            .and_then(VecDeque::pop_front);
        if let Some(err) = failure {
            return Err(err);
        }
        Ok(self
            .ids
            .lock()
            .unwrap()
            .get(&story_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_story(&self, id: u64) -> Result<Story, ApiError> {
        *self.story_calls.lock().unwrap().entry(id).or_default() += 1;
        self.wait_for_gate().await;

        let failure = self
            .story_failures
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(VecDeque::pop_front);
        if let Some(err) = failure {
            return Err(err);
        }
        let stored = self.stories.lock().unwrap().get(&id).cloned();
        Ok(stored.unwrap_or_else(|| {
            StoryBuilder::new()
                .id(id)
                .title(&format!("Story {id}"))
                .build()
        }))
    }
}

/// Builds an [`App`] whose controller has been driven through its public
/// operations into the requested state, without spawning any tasks.
pub struct TestAppBuilder {
    feed: StoryType,
    stories: Vec<Story>,
    page_size: Option<usize>,
    fetching: bool,
    loading_more: bool,
    more_available: bool,
    error: Option<ApiError>,
    selected_index: usize,
    show_help: bool,
    theme: ResolvedTheme,
    clock: Arc<dyn Clock>,
    viewport_height: Option<u16>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            feed: StoryType::Top,
            stories: Vec::new(),
            page_size: None,
            fetching: false,
            loading_more: false,
            more_available: false,
            error: None,
            selected_index: 0,
            show_help: false,
            theme: default_for_variant(ThemeVariant::Dark),
            clock: fixed_clock(TEST_NOW),
            viewport_height: None,
        }
    }

    pub fn feed(mut self, feed: StoryType) -> Self {
        self.feed = feed;
        self
    }

    pub fn with_stories(mut self, stories: Vec<Story>) -> Self {
        self.stories = stories;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Id list requested but not yet received.
    pub fn fetching(mut self) -> Self {
        self.fetching = true;
        self
    }

    /// Another page has been revealed and none of it has resolved yet.
    pub fn loading_more(mut self) -> Self {
        self.loading_more = true;
        self.more_available = true;
        self
    }

    /// The ranking holds more ids than the stories given.
    pub fn more_available(mut self) -> Self {
        self.more_available = true;
        self
    }

    pub fn error(mut self, err: ApiError) -> Self {
        self.error = Some(err);
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn show_help(mut self) -> Self {
        self.show_help = true;
        self
    }

    pub fn theme(mut self, theme: ResolvedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn viewport_height(mut self, height: u16) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn build(self) -> App {
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let api = Arc::new(FakeApi::new());
        let cache = Arc::new(QueryCache::new(api, RetryPolicy::none()));
        let mut app = App::new(self.theme, cache, self.feed, page_size);
        app.clock = self.clock;
        app.show_help = self.show_help;
        app.viewport_height = self.viewport_height;

        let fetch = app.controller.initialize(self.feed);
        let generation = fetch.generation;

        if !self.fetching {
            let mut ids: Vec<u64> = self.stories.iter().map(|s| s.id).collect();
            if self.more_available {
                let next = ids.iter().max().copied().unwrap_or(0) + 1;
                ids.extend(next..next + page_size as u64 * 3);
            }
            let by_id: HashMap<u64, Story> =
                self.stories.into_iter().map(|s| (s.id, s)).collect();

            let mut fetches = app.controller.handle(FeedEvent::Ids {
                generation,
                result: Ok(Arc::new(ids)),
            });
            loop {
                for fetch in fetches {
                    if let FetchKind::Story(id) = fetch.kind
                        && let Some(story) = by_id.get(&id)
                    {
                        app.controller.handle(FeedEvent::Story {
                            generation,
                            id,
                            result: Ok(Arc::new(story.clone())),
                        });
                    }
                }
                if app.controller.visible_len() >= by_id.len() {
                    break;
                }
                fetches = app.controller.on_viewport_near_end();
                if fetches.is_empty() {
                    break;
                }
            }
            if self.loading_more {
                app.controller.on_viewport_near_end();
            }
        }

        if let Some(err) = self.error {
            app.controller.handle(FeedEvent::Ids {
                generation,
                result: Err(err),
            });
        }

        app.selected_index = self.selected_index;
        app
    }
}

pub fn sample_stories() -> Vec<Story> {
    vec![
        StoryBuilder::new()
            .id(1)
            .title("Show HN: A terminal reader for Hacker News")
            .url("https://github.com/user/hnfeed")
            .score(142)
            .author("dang")
            .comments(47)
            .time(1700000000)
            .build(),
        StoryBuilder::new()
            .id(2)
            .title("Why Rust is the Future of Systems Programming")
            .url("https://www.example.com/rust-future")
            .score(89)
            .author("pg")
            .comments(23)
            .time(1699990000)
            .build(),
        StoryBuilder::new()
            .id(3)
            .title("Ask HN: What are you working on?")
            .no_url()
            .score(56)
            .author("sama")
            .comments(128)
            .time(1699980000)
            .build(),
        StoryBuilder::new()
            .id(4)
            .title("Acme is hiring engineers")
            .url("https://jobs.acme.dev/openings")
            .score(1)
            .author("acme")
            .no_comments()
            .kind(ItemKind::Job)
            .time(1700092000)
            .build(),
        StoryBuilder::new()
            .id(5)
            .title("A Deep Dive into Linux Kernel Networking")
            .url("https://lwn.net/kernel-networking")
            .score(167)
            .author("patio11")
            .comments(1)
            .time(1699960000)
            .build(),
    ]
}
