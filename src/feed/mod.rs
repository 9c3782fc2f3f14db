//! Incremental reveal of a ranked story listing.
//!
//! [`FeedController`] never performs I/O. Its operations return [`Fetch`]
//! commands for the caller to run, and results come back as [`FeedEvent`]s
//! tagged with the generation that issued them. Anything from an older
//! generation is dropped, which is how a switch of listing discards late
//! responses.

mod sentinel;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::api::{ApiError, Story, StoryType};
use crate::fetch::{QueryCache, QueryKey};

pub use sentinel::Sentinel;

/// Default number of stories revealed per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How far reveal count may run ahead of resolved records before growth
/// is held back.
pub const SLACK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Ids(StoryType),
    Story(u64),
}

impl From<FetchKind> for QueryKey {
    fn from(kind: FetchKind) -> Self {
        match kind {
            FetchKind::Ids(story_type) => QueryKey::Ids(story_type),
            FetchKind::Story(id) => QueryKey::Story(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetch {
    pub generation: u64,
    pub kind: FetchKind,
}

#[derive(Debug)]
pub enum FeedEvent {
    Ids {
        generation: u64,
        result: Result<Arc<Vec<u64>>, ApiError>,
    },
    Story {
        generation: u64,
        id: u64,
        result: Result<Arc<Story>, ApiError>,
    },
}

impl FeedEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FeedEvent::Ids { generation, .. } | FeedEvent::Story { generation, .. } => *generation,
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            FeedEvent::Ids { result, .. } => result.is_ok(),
            FeedEvent::Story { result, .. } => result.is_ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FetchingIds,
    PartiallyLoaded,
    Stable,
    Exhausted,
    Errored(String),
}

/// Resolve a [`Fetch`] through the cache.
pub async fn execute(cache: &QueryCache, fetch: Fetch) -> FeedEvent {
    let generation = fetch.generation;
    match fetch.kind {
        FetchKind::Ids(story_type) => FeedEvent::Ids {
            generation,
            result: cache.ids(story_type).await,
        },
        FetchKind::Story(id) => FeedEvent::Story {
            generation,
            id,
            result: cache.story(id).await,
        },
    }
}

#[derive(Debug)]
pub struct FeedController {
    story_type: Option<StoryType>,
    page_size: usize,
    generation: u64,
    reveal_count: usize,
    ids: Option<Arc<Vec<u64>>>,
    stories: HashMap<u64, Arc<Story>>,
    requested: HashSet<u64>,
    error: Option<String>,
    sentinel: Sentinel,
}

impl FeedController {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            story_type: None,
            page_size,
            generation: 0,
            reveal_count: page_size,
            ids: None,
            stories: HashMap::new(),
            requested: HashSet::new(),
            error: None,
            sentinel: Sentinel::default(),
        }
    }

    /// Start over on `story_type`, discarding everything from the previous
    /// selection.
    pub fn initialize(&mut self, story_type: StoryType) -> Fetch {
        self.generation += 1;
        self.story_type = Some(story_type);
        self.reveal_count = self.page_size;
        self.ids = None;
        self.stories.clear();
        self.requested.clear();
        self.error = None;
        self.sentinel.reset();
        tracing::info!(feed = %story_type, generation = self.generation, "initializing feed");
        self.fetch(FetchKind::Ids(story_type))
    }

    pub fn handle(&mut self, event: FeedEvent) -> Vec<Fetch> {
        if self.story_type.is_none() || event.generation() != self.generation {
            tracing::debug!(
                event_generation = event.generation(),
                generation = self.generation,
                "discarding stale result"
            );
            return Vec::new();
        }
        if self.error.is_some() {
            return Vec::new();
        }

        match event {
            FeedEvent::Ids { result: Ok(ids), .. } => {
                if self.ids.is_some() {
                    return Vec::new();
                }
                self.reveal_count = self.reveal_count.min(ids.len());
                tracing::info!(count = ids.len(), "received ranked ids");
                self.ids = Some(ids);
                self.request_revealed()
            }
            FeedEvent::Story {
                id, result: Ok(story), ..
            } => {
                if self.requested.contains(&id) {
                    self.stories.insert(id, story);
                }
                Vec::new()
            }
            FeedEvent::Ids { result: Err(e), .. } | FeedEvent::Story { result: Err(e), .. } => {
                self.fail(&e);
                Vec::new()
            }
        }
    }

    /// Grow the reveal count by one page if the viewport has caught up.
    pub fn on_viewport_near_end(&mut self) -> Vec<Fetch> {
        if self.error.is_some() {
            return Vec::new();
        }
        let Some(total) = self.ids.as_ref().map(|ids| ids.len()) else {
            return Vec::new();
        };
        if self.reveal_count >= total {
            return Vec::new();
        }
        let visible = self.visible_len();
        if visible < self.page_size || visible < self.reveal_count.saturating_sub(SLACK) {
            return Vec::new();
        }

        self.reveal_count = (self.reveal_count + self.page_size).min(total);
        tracing::info!(reveal_count = self.reveal_count, total, "revealing more stories");
        self.request_revealed()
    }

    /// Feed the current near-end signal; acts only on its edges.
    pub fn observe_viewport(&mut self, near_end: bool) -> Vec<Fetch> {
        if self
            .sentinel
            .observe(near_end, self.visible_len(), self.page_size)
        {
            self.on_viewport_near_end()
        } else {
            Vec::new()
        }
    }

    /// Resolved stories within the reveal count, in rank order.
    pub fn visible_slice(&self) -> Vec<Arc<Story>> {
        self.revealed_ids()
            .iter()
            .filter_map(|id| self.stories.get(id).cloned())
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.revealed_ids()
            .iter()
            .filter(|id| self.stories.contains_key(id))
            .count()
    }

    pub fn phase(&self) -> Phase {
        if self.story_type.is_none() {
            return Phase::Idle;
        }
        if let Some(msg) = &self.error {
            return Phase::Errored(msg.clone());
        }
        let Some(ids) = &self.ids else {
            return Phase::FetchingIds;
        };
        if self.pending_count() > 0 {
            Phase::PartiallyLoaded
        } else if self.reveal_count >= ids.len() {
            Phase::Exhausted
        } else {
            Phase::Stable
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase(), Phase::FetchingIds | Phase::PartiallyLoaded)
    }

    /// Growing an already populated list, as opposed to the first load.
    pub fn is_loading_more(&self) -> bool {
        self.phase() == Phase::PartiallyLoaded && self.visible_len() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.requested
            .iter()
            .filter(|id| !self.stories.contains_key(id))
            .count()
    }

    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }

    pub fn ids_len(&self) -> Option<usize> {
        self.ids.as_ref().map(|ids| ids.len())
    }

    pub fn story_type(&self) -> Option<StoryType> {
        self.story_type
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn revealed_ids(&self) -> &[u64] {
        match &self.ids {
            Some(ids) => &ids[..self.reveal_count.min(ids.len())],
            None => &[],
        }
    }

    fn request_revealed(&mut self) -> Vec<Fetch> {
        let new_ids: Vec<u64> = self
            .revealed_ids()
            .iter()
            .copied()
            .filter(|id| !self.requested.contains(id))
            .collect();
        let generation = self.generation;
        new_ids
            .into_iter()
            .filter(|id| self.requested.insert(*id))
            .map(|id| Fetch {
                generation,
                kind: FetchKind::Story(id),
            })
            .collect()
    }

    fn fail(&mut self, err: &ApiError) {
        tracing::warn!(error = %err, generation = self.generation, "feed failed");
        self.error = Some(err.user_message());
    }

    fn fetch(&self, kind: FetchKind) -> Fetch {
        Fetch {
            generation: self.generation,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StoryBuilder;

    fn ids_event(generation: u64, ids: Vec<u64>) -> FeedEvent {
        FeedEvent::Ids {
            generation,
            result: Ok(Arc::new(ids)),
        }
    }

    fn story_event(generation: u64, id: u64) -> FeedEvent {
        FeedEvent::Story {
            generation,
            id,
            result: Ok(Arc::new(StoryBuilder::new().id(id).build())),
        }
    }

    fn story_ids(fetches: &[Fetch]) -> Vec<u64> {
        fetches
            .iter()
            .filter_map(|f| match f.kind {
                FetchKind::Story(id) => Some(id),
                FetchKind::Ids(_) => None,
            })
            .collect()
    }

    fn resolve_all(controller: &mut FeedController, fetches: Vec<Fetch>) {
        for fetch in fetches {
            if let FetchKind::Story(id) = fetch.kind {
                let more = controller.handle(story_event(fetch.generation, id));
                assert!(more.is_empty());
            }
        }
    }

    fn visible_ids(controller: &FeedController) -> Vec<u64> {
        controller.visible_slice().iter().map(|s| s.id).collect()
    }

    /// Controller on `top` with `n` ids (1..=n) and the first page requested.
    fn loaded(n: u64, page_size: usize) -> (FeedController, Vec<Fetch>) {
        let mut controller = FeedController::new(page_size);
        let fetch = controller.initialize(StoryType::Top);
        let fetches = controller.handle(ids_event(fetch.generation, (1..=n).collect()));
        (controller, fetches)
    }

    #[test]
    fn starts_idle() {
        let controller = FeedController::new(DEFAULT_PAGE_SIZE);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.reveal_count(), DEFAULT_PAGE_SIZE);
        assert!(controller.visible_slice().is_empty());
    }

    #[test]
    fn initialize_requests_ids() {
        let mut controller = FeedController::new(10);
        let fetch = controller.initialize(StoryType::New);
        assert_eq!(fetch.kind, FetchKind::Ids(StoryType::New));
        assert_eq!(fetch.generation, 1);
        assert_eq!(controller.phase(), Phase::FetchingIds);
        assert!(controller.is_loading());
    }

    #[test]
    fn ids_request_first_page() {
        let (controller, fetches) = loaded(50, 10);
        assert_eq!(story_ids(&fetches), (1..=10).collect::<Vec<_>>());
        assert_eq!(controller.phase(), Phase::PartiallyLoaded);
        assert_eq!(controller.ids_len(), Some(50));
    }

    #[test]
    fn short_id_list_clamps_reveal_count() {
        let (mut controller, fetches) = loaded(4, 10);
        assert_eq!(controller.reveal_count(), 4);
        resolve_all(&mut controller, fetches);
        assert_eq!(controller.phase(), Phase::Exhausted);
        assert!(controller.on_viewport_near_end().is_empty());
    }

    #[test]
    fn empty_id_list_is_exhausted() {
        let (controller, fetches) = loaded(0, 10);
        assert!(fetches.is_empty());
        assert_eq!(controller.reveal_count(), 0);
        assert_eq!(controller.phase(), Phase::Exhausted);
    }

    #[test]
    fn visible_slice_keeps_rank_order_regardless_of_arrival() {
        let (mut controller, _) = loaded(3, 10);
        let generation = controller.generation();

        controller.handle(story_event(generation, 3));
        controller.handle(story_event(generation, 1));
        assert_eq!(visible_ids(&controller), vec![1, 3]);
        assert_eq!(controller.phase(), Phase::PartiallyLoaded);

        controller.handle(story_event(generation, 2));
        assert_eq!(visible_ids(&controller), vec![1, 2, 3]);
    }

    #[test]
    fn fifty_ids_grow_by_pages_until_exhausted() {
        let (mut controller, fetches) = loaded(50, 10);
        resolve_all(&mut controller, fetches);
        assert_eq!(controller.phase(), Phase::Stable);
        assert_eq!(controller.visible_len(), 10);

        let fetches = controller.on_viewport_near_end();
        assert_eq!(controller.reveal_count(), 20);
        assert_eq!(story_ids(&fetches), (11..=20).collect::<Vec<_>>());
        resolve_all(&mut controller, fetches);

        while controller.reveal_count() < 50 {
            let before = controller.reveal_count();
            let fetches = controller.on_viewport_near_end();
            assert_eq!(controller.reveal_count(), before + 10);
            resolve_all(&mut controller, fetches);
        }

        assert_eq!(controller.phase(), Phase::Exhausted);
        assert_eq!(visible_ids(&controller), (1..=50).collect::<Vec<_>>());
        assert!(controller.on_viewport_near_end().is_empty());
        assert_eq!(controller.reveal_count(), 50);
    }

    #[test]
    fn growth_caps_at_id_count() {
        let (mut controller, fetches) = loaded(15, 10);
        resolve_all(&mut controller, fetches);

        let fetches = controller.on_viewport_near_end();
        assert_eq!(controller.reveal_count(), 15);
        assert_eq!(fetches.len(), 5);
    }

    #[test]
    fn immediate_second_trigger_does_not_double_advance() {
        let (mut controller, fetches) = loaded(50, 10);
        resolve_all(&mut controller, fetches);

        let first = controller.on_viewport_near_end();
        let second = controller.on_viewport_near_end();
        assert_eq!(first.len(), 10);
        assert!(second.is_empty());
        assert_eq!(controller.reveal_count(), 20);
    }

    #[test]
    fn growth_waits_for_slack_threshold() {
        let (mut controller, fetches) = loaded(50, 10);
        resolve_all(&mut controller, fetches);
        let fetches = controller.on_viewport_near_end();
        let generation = controller.generation();

        // 16 of 20 visible: more than 3 behind
        for fetch in &fetches[..6] {
            if let FetchKind::Story(id) = fetch.kind {
                controller.handle(story_event(generation, id));
            }
        }
        assert!(controller.on_viewport_near_end().is_empty());

        // 17 of 20 visible: within slack
        if let FetchKind::Story(id) = fetches[6].kind {
            controller.handle(story_event(generation, id));
        }
        assert_eq!(controller.on_viewport_near_end().len(), 10);
        assert_eq!(controller.reveal_count(), 30);
    }

    #[test]
    fn no_growth_before_a_full_page_is_visible() {
        let (mut controller, fetches) = loaded(50, 10);
        let generation = controller.generation();
        for fetch in &fetches[..9] {
            if let FetchKind::Story(id) = fetch.kind {
                controller.handle(story_event(generation, id));
            }
        }
        assert!(controller.on_viewport_near_end().is_empty());
        assert!(controller.observe_viewport(true).is_empty());
        assert_eq!(controller.reveal_count(), 10);
    }

    #[test]
    fn no_growth_before_ids_arrive() {
        let mut controller = FeedController::new(10);
        controller.initialize(StoryType::Best);
        assert!(controller.on_viewport_near_end().is_empty());
        assert_eq!(controller.reveal_count(), 10);
    }

    #[test]
    fn reveal_count_is_monotonic_under_repeated_triggers() {
        let (mut controller, fetches) = loaded(35, 10);
        resolve_all(&mut controller, fetches);
        let mut last = controller.reveal_count();
        for _ in 0..20 {
            let fetches = controller.observe_viewport(true);
            resolve_all(&mut controller, fetches);
            controller.observe_viewport(false);
            assert!(controller.reveal_count() >= last);
            assert!(controller.reveal_count() <= 35);
            last = controller.reveal_count();
        }
        assert_eq!(last, 35);
        assert_eq!(controller.phase(), Phase::Exhausted);
    }

    #[test]
    fn viewport_signal_is_edge_triggered() {
        let (mut controller, fetches) = loaded(50, 10);
        resolve_all(&mut controller, fetches);

        let fetches = controller.observe_viewport(true);
        assert_eq!(fetches.len(), 10);
        // Same frame again, nothing resolved in between
        assert!(controller.observe_viewport(true).is_empty());
        assert!(controller.observe_viewport(true).is_empty());
        assert_eq!(controller.reveal_count(), 20);
    }

    #[test]
    fn viewport_signal_refires_as_records_resolve() {
        let (mut controller, fetches) = loaded(50, 10);
        resolve_all(&mut controller, fetches);
        let fetches = controller.observe_viewport(true);
        resolve_all(&mut controller, fetches);

        // Visible count changed while still near the end
        assert_eq!(controller.observe_viewport(true).len(), 10);
        assert_eq!(controller.reveal_count(), 30);
    }

    #[test]
    fn far_from_end_does_not_grow() {
        let (mut controller, fetches) = loaded(50, 10);
        resolve_all(&mut controller, fetches);
        assert!(controller.observe_viewport(false).is_empty());
        assert_eq!(controller.reveal_count(), 10);
    }

    #[test]
    fn duplicate_story_results_are_harmless() {
        let (mut controller, _) = loaded(3, 10);
        let generation = controller.generation();
        controller.handle(story_event(generation, 2));
        controller.handle(story_event(generation, 2));
        assert_eq!(visible_ids(&controller), vec![2]);
    }

    #[test]
    fn unrequested_story_is_ignored() {
        let (mut controller, _) = loaded(30, 10);
        let generation = controller.generation();
        controller.handle(story_event(generation, 25));
        assert!(controller.visible_slice().is_empty());
    }

    #[test]
    fn id_failure_is_errored_with_message() {
        let mut controller = FeedController::new(10);
        let fetch = controller.initialize(StoryType::Top);
        controller.handle(FeedEvent::Ids {
            generation: fetch.generation,
            result: Err(ApiError::Network("connection failed".into())),
        });
        assert_eq!(
            controller.phase(),
            Phase::Errored("Network error: connection failed".into())
        );
        assert_eq!(controller.error(), Some("Network error: connection failed"));
    }

    #[test]
    fn story_failure_is_terminal_for_the_type() {
        let (mut controller, fetches) = loaded(50, 10);
        let generation = controller.generation();
        controller.handle(FeedEvent::Story {
            generation,
            id: 1,
            result: Err(ApiError::HttpStatus(500, "Internal Server Error".into())),
        });
        assert!(matches!(controller.phase(), Phase::Errored(_)));

        resolve_all(&mut controller, fetches);
        assert!(controller.visible_slice().is_empty());
        assert!(controller.on_viewport_near_end().is_empty());
        assert!(matches!(controller.phase(), Phase::Errored(_)));
    }

    #[test]
    fn initialize_escapes_errored() {
        let mut controller = FeedController::new(10);
        let fetch = controller.initialize(StoryType::Top);
        controller.handle(FeedEvent::Ids {
            generation: fetch.generation,
            result: Err(ApiError::NotFound("topstories.json".into())),
        });

        controller.initialize(StoryType::New);
        assert_eq!(controller.phase(), Phase::FetchingIds);
        assert!(controller.error().is_none());
    }

    #[test]
    fn switching_type_discards_late_results() {
        let mut controller = FeedController::new(10);
        let top = controller.initialize(StoryType::Top);
        let top_fetches = controller.handle(ids_event(top.generation, (1..=20).collect()));

        let new = controller.initialize(StoryType::New);
        assert_eq!(controller.reveal_count(), 10);
        assert_eq!(controller.phase(), Phase::FetchingIds);

        // Late "top" results after the switch
        assert!(
            controller
                .handle(ids_event(top.generation, (1..=20).collect()))
                .is_empty()
        );
        resolve_all(&mut controller, top_fetches);
        controller.handle(FeedEvent::Story {
            generation: top.generation,
            id: 1,
            result: Err(ApiError::Network("late failure".into())),
        });
        assert_eq!(controller.phase(), Phase::FetchingIds);
        assert!(controller.visible_slice().is_empty());

        let fetches = controller.handle(ids_event(new.generation, (100..130).collect()));
        assert_eq!(story_ids(&fetches), (100..110).collect::<Vec<_>>());
        resolve_all(&mut controller, fetches);
        assert_eq!(visible_ids(&controller), (100..110).collect::<Vec<_>>());
        assert_eq!(controller.story_type(), Some(StoryType::New));
    }

    #[test]
    fn ids_already_requested_are_not_requested_again() {
        let (mut controller, first) = loaded(50, 10);
        resolve_all(&mut controller, first);
        let second = controller.on_viewport_near_end();
        assert!(story_ids(&second).iter().all(|id| *id > 10));
    }

    #[test]
    fn loading_more_only_once_populated() {
        let (mut controller, fetches) = loaded(50, 10);
        assert!(controller.is_loading());
        assert!(!controller.is_loading_more());
        resolve_all(&mut controller, fetches);
        assert!(!controller.is_loading());

        controller.on_viewport_near_end();
        assert!(controller.is_loading_more());
    }

    #[test]
    fn page_fetches_carry_current_generation() {
        let mut controller = FeedController::new(5);
        controller.initialize(StoryType::Top);
        let generation = controller.initialize(StoryType::Best).generation;

        let fetches = controller.handle(ids_event(generation, (1..=8).collect()));

        assert_eq!(fetches.len(), 5);
        assert!(fetches.iter().all(|f| f.generation == generation));
        assert_eq!(
            fetches[0],
            Fetch {
                generation,
                kind: FetchKind::Story(1),
            }
        );
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let controller = FeedController::new(0);
        assert_eq!(controller.page_size(), 1);
    }
}
