use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{Story, StoryType};
use crate::feed::{self, FeedController, FeedEvent, Fetch, FetchKind};
use crate::fetch::{QueryCache, QueryKey};
use crate::theme::ResolvedTheme;
use crate::time::Clock;

/// A finished fetch, routed back to the UI loop.
pub struct AsyncResult {
    pub task_id: u64,
    pub event: FeedEvent,
}

#[derive(Debug)]
pub struct TaskInfo {
    pub id: u64,
    pub description: String,
    pub started_at: Instant,
    /// Cache entry the task resolves, if any.
    pub key: Option<QueryKey>,
}

#[derive(Debug)]
pub struct LogEntry {
    pub message: String,
}

/// Debug panel state: task tracking and log messages.
#[derive(Debug, Default)]
pub struct DebugState {
    pub visible: bool,
    pub running_tasks: Vec<TaskInfo>,
    pub log: VecDeque<LogEntry>,
    next_task_id: u64,
}

impl DebugState {
    const MAX_LOG_ENTRIES: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.log.push_back(LogEntry {
            message: msg.into(),
        });
        if self.log.len() > Self::MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn start_task(&mut self, description: impl Into<String>) -> u64 {
        self.push_task(description.into(), None)
    }

    pub fn start_query(&mut self, key: QueryKey, description: impl Into<String>) -> u64 {
        self.push_task(description.into(), Some(key))
    }

    fn push_task(&mut self, description: String, key: Option<QueryKey>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        self.running_tasks.push(TaskInfo {
            id,
            description,
            started_at: Instant::now(),
            key,
        });
        id
    }

    pub fn end_task(&mut self, id: u64, outcome: &str) {
        if let Some(pos) = self.running_tasks.iter().position(|t| t.id == id) {
            let task = self.running_tasks.remove(pos);
            let elapsed = task.started_at.elapsed();
            self.log(format!("{} {}: {:.2?}", task.description, outcome, elapsed));
        }
    }

    /// Drop every running task, e.g. after their generation was cancelled.
    pub fn abandon_tasks(&mut self) {
        let count = self.running_tasks.len();
        if count > 0 {
            self.running_tasks.clear();
            self.log(format!("Cancelled {count} tasks"));
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    PageDown,
    PageUp,
    OpenUrl,
    OpenDiscussion,
    Quit,
    Refresh,
    ToggleHelp,
    ToggleDebug,
    SwitchFeed(StoryType),
    NextFeed,
    PrevFeed,
    UpdateViewportHeight(u16),
}

pub struct App {
    pub feed: StoryType,
    pub controller: FeedController,
    pub cache: Arc<QueryCache>,
    pub selected_index: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub theme: ResolvedTheme,
    pub clock: Arc<dyn Clock>,
    // Async task management
    pub result_tx: mpsc::Sender<AsyncResult>,
    pub result_rx: mpsc::Receiver<AsyncResult>,
    cancel: CancellationToken,
    pub loading_start: Option<Instant>,
    // Debug pane
    pub debug: DebugState,
    // Viewport tracking for the near-end signal
    pub viewport_height: Option<u16>,
}

impl App {
    pub fn new(
        theme: ResolvedTheme,
        cache: Arc<QueryCache>,
        feed: StoryType,
        page_size: usize,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::channel(64);
        Self {
            feed,
            controller: FeedController::new(page_size),
            cache,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            theme,
            clock: crate::time::system_clock(),
            result_tx,
            result_rx,
            cancel: CancellationToken::new(),
            loading_start: None,
            debug: DebugState::new(),
            viewport_height: None,
        }
    }

    pub fn handle_async_result(&mut self, result: AsyncResult) {
        let AsyncResult { task_id, event } = result;
        if event.generation() != self.controller.generation() {
            self.debug.end_task(task_id, "discarded (stale)");
            return;
        }
        self.debug
            .end_task(task_id, if event.is_ok() { "completed" } else { "failed" });

        let was_errored = self.controller.error().is_some();
        let fetches = self.controller.handle(event);
        self.dispatch(fetches);
        if !was_errored && let Some(err) = self.controller.error() {
            self.debug.log(format!("Error: {err}"));
        }
        self.clamp_selection();
        self.sync_viewport();
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::SelectNext => self.select_next(),
            Message::SelectPrev => self.select_prev(),
            Message::SelectFirst => self.select_first(),
            Message::SelectLast => self.select_last(),
            Message::PageDown => self.page_down(),
            Message::PageUp => self.page_up(),
            Message::OpenUrl => self.open_url(),
            Message::OpenDiscussion => self.open_discussion(),
            Message::Quit => self.should_quit = true,
            Message::Refresh => self.load_feed(),
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::ToggleDebug => self.debug.toggle(),
            Message::SwitchFeed(feed) => self.switch_feed(feed),
            Message::NextFeed => self.cycle_feed(1),
            Message::PrevFeed => self.cycle_feed(-1),
            Message::UpdateViewportHeight(height) => self.viewport_height = Some(height),
        }
        self.sync_viewport();
    }

    pub fn stories(&self) -> Vec<Arc<Story>> {
        self.controller.visible_slice()
    }

    pub fn selected_story(&self) -> Option<Arc<Story>> {
        self.stories().get(self.selected_index).cloned()
    }

    fn select_next(&mut self) {
        let count = self.controller.visible_len();
        if count > 0 && self.selected_index < count - 1 {
            self.selected_index += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn select_first(&mut self) {
        self.selected_index = 0;
    }

    fn select_last(&mut self) {
        self.selected_index = self.controller.visible_len().saturating_sub(1);
    }

    fn page_down(&mut self) {
        let count = self.controller.visible_len();
        if count > 0 {
            self.selected_index = (self.selected_index + 10).min(count - 1);
        }
    }

    fn page_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(10);
    }

    fn clamp_selection(&mut self) {
        let count = self.controller.visible_len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    fn open_url(&mut self) {
        if let Some(story) = self.selected_story() {
            self.open(&story.content_url());
        }
    }

    fn open_discussion(&mut self) {
        if let Some(story) = self.selected_story() {
            self.open(&story.hn_url());
        }
    }

    fn open(&mut self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::warn!(%url, error = %e, "failed to open browser");
            self.debug.log(format!("Failed to open {url}: {e}"));
        }
    }

    fn switch_feed(&mut self, feed: StoryType) {
        if self.feed != feed {
            self.feed = feed;
            self.load_feed();
        }
    }

    fn cycle_feed(&mut self, direction: i32) {
        let feeds = StoryType::all();
        let current_idx = feeds.iter().position(|&f| f == self.feed).unwrap_or(0);
        let new_idx = (current_idx as i32 + direction).rem_euclid(feeds.len() as i32) as usize;
        self.switch_feed(feeds[new_idx]);
    }

    /// Start (or restart) the current feed with a fresh ranking.
    pub fn load_feed(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.debug.abandon_tasks();

        self.cache.invalidate_ids(self.feed);
        let fetch = self.controller.initialize(self.feed);
        self.selected_index = 0;
        self.loading_start = Some(Instant::now());
        self.dispatch(vec![fetch]);
    }

    pub fn should_show_spinner(&self) -> bool {
        const MIN_SPINNER_DURATION: Duration = Duration::from_millis(500);
        match self.loading_start {
            Some(start) => self.controller.is_loading() || start.elapsed() < MIN_SPINNER_DURATION,
            None => false,
        }
    }

    pub fn visible_story_capacity(&self) -> usize {
        const LAYOUT_OVERHEAD: u16 = 4; // 1 tabs + 1 status bar + 2 borders
        const STORY_HEIGHT: u16 = 2; // title + metadata

        self.viewport_height
            .map(|h| (h.saturating_sub(LAYOUT_OVERHEAD) / STORY_HEIGHT) as usize)
            .unwrap_or(0)
    }

    /// Whether the end of the rendered list is within one story of the
    /// bottom of the viewport.
    pub fn near_end(&self) -> bool {
        let visible = self.controller.visible_len();
        if visible == 0 {
            return false;
        }
        let window_end = (self.selected_index + 1).max(self.visible_story_capacity());
        window_end + 1 >= visible
    }

    fn sync_viewport(&mut self) {
        let fetches = self.controller.observe_viewport(self.near_end());
        if !fetches.is_empty() {
            self.debug.log(format!(
                "Revealing {} of {}",
                self.controller.reveal_count(),
                self.controller.ids_len().unwrap_or(0)
            ));
        }
        self.dispatch(fetches);
    }

    fn dispatch(&mut self, fetches: Vec<Fetch>) {
        for fetch in fetches {
            self.spawn_fetch(fetch);
        }
    }

    /// Run one fetch through the cache on the runtime. The task races the
    /// generation's cancellation token; cancelled tasks send nothing.
    fn spawn_fetch(&mut self, fetch: Fetch) {
        let task_desc = match fetch.kind {
            FetchKind::Ids(story_type) => format!("Load {} ids", story_type.label()),
            FetchKind::Story(id) => format!("Load story {id}"),
        };
        let task_id = self.debug.start_query(fetch.kind.into(), task_desc);
        let cache = Arc::clone(&self.cache);
        let tx = self.result_tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!(?fetch, "fetch cancelled");
                }
                event = feed::execute(&cache, fetch) => {
                    let _ = tx.send(AsyncResult { task_id, event }).await;
                }
            }
        });
    }
}
