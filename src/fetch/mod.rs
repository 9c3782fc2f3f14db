//! Session cache in front of [`HnApi`].
//!
//! Every key is either a ranked id list or a single story. Concurrent
//! requests for one key share a single underlying call, and the first
//! successful value for a key is kept for the rest of the session.

mod retry;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::api::{ApiError, HnApi, Story, StoryType};

pub use retry::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Ids(StoryType),
    Story(u64),
}

/// Snapshot of one key: cached data, in-flight flag, last failure.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStatus<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<ApiError>,
}

impl<T> Default for QueryStatus<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, ApiError>>>;

enum Slot<T> {
    Pending { attempt: u64, fetch: SharedFetch<T> },
    Ready(T),
    Failed(ApiError),
}

struct Slots<K, T> {
    map: HashMap<K, Slot<T>>,
    next_attempt: u64,
}

impl<K, T> Default for Slots<K, T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            next_attempt: 0,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct QueryCache {
    api: Arc<dyn HnApi>,
    retry: RetryPolicy,
    ids: Mutex<Slots<StoryType, Arc<Vec<u64>>>>,
    stories: Mutex<Slots<u64, Arc<Story>>>,
}

impl QueryCache {
    pub fn new(api: Arc<dyn HnApi>, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            ids: Mutex::default(),
            stories: Mutex::default(),
        }
    }

    pub async fn ids(&self, story_type: StoryType) -> Result<Arc<Vec<u64>>, ApiError> {
        let api = Arc::clone(&self.api);
        let retry = self.retry;
        let key = QueryKey::Ids(story_type);
        resolve(&self.ids, story_type, key, move || {
            async move {
                retry
                    .run(key, || api.list_ids(story_type))
                    .await
                    .map(Arc::new)
            }
            .boxed()
        })
        .await
    }

    pub async fn story(&self, id: u64) -> Result<Arc<Story>, ApiError> {
        let api = Arc::clone(&self.api);
        let retry = self.retry;
        let key = QueryKey::Story(id);
        resolve(&self.stories, id, key, move || {
            async move { retry.run(key, || api.get_story(id)).await.map(Arc::new) }.boxed()
        })
        .await
    }

    pub fn ids_status(&self, story_type: StoryType) -> QueryStatus<Arc<Vec<u64>>> {
        status_of(&self.ids, &story_type)
    }

    pub fn story_status(&self, id: u64) -> QueryStatus<Arc<Story>> {
        status_of(&self.stories, &id)
    }

    /// Status for either kind of key, with the value erased.
    pub fn key_status(&self, key: QueryKey) -> QueryStatus<()> {
        fn erase<T>(status: QueryStatus<T>) -> QueryStatus<()> {
            QueryStatus {
                data: status.data.map(|_| ()),
                loading: status.loading,
                error: status.error,
            }
        }
        match key {
            QueryKey::Ids(story_type) => erase(self.ids_status(story_type)),
            QueryKey::Story(id) => erase(self.story_status(id)),
        }
    }

    /// Forget a settled id list so the next request fetches a fresh ranking.
    /// An in-flight request is left alone and will be joined.
    pub fn invalidate_ids(&self, story_type: StoryType) {
        let mut slots = lock(&self.ids);
        if !matches!(slots.map.get(&story_type), Some(Slot::Pending { .. })) {
            slots.map.remove(&story_type);
        }
    }

    pub fn cached_story_count(&self) -> usize {
        lock(&self.stories)
            .map
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }
}

async fn resolve<K, T, F>(
    slots: &Mutex<Slots<K, T>>,
    slot_key: K,
    key: QueryKey,
    start: F,
) -> Result<T, ApiError>
where
    K: Eq + Hash + Copy,
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> BoxFuture<'static, Result<T, ApiError>>,
{
    let (attempt, fetch) = {
        let mut guard = lock(slots);
        match guard.map.get(&slot_key) {
            Some(Slot::Ready(value)) => {
                tracing::trace!(?key, "cache hit");
                return Ok(value.clone());
            }
            Some(Slot::Pending { attempt, fetch }) => {
                tracing::debug!(?key, "joining in-flight request");
                (*attempt, fetch.clone())
            }
            Some(Slot::Failed(_)) | None => {
                let attempt = guard.next_attempt;
                guard.next_attempt += 1;
                let fetch = start().shared();
                guard.map.insert(
                    slot_key,
                    Slot::Pending {
                        attempt,
                        fetch: fetch.clone(),
                    },
                );
                (attempt, fetch)
            }
        }
    };

    let result = fetch.await;

    let mut guard = lock(slots);
    let is_current = matches!(
        guard.map.get(&slot_key),
        Some(Slot::Pending { attempt: current, .. }) if *current == attempt
    );
    if is_current {
        let settled = match &result {
            Ok(value) => Slot::Ready(value.clone()),
            Err(e) => Slot::Failed(e.clone()),
        };
        guard.map.insert(slot_key, settled);
    }
    result
}

fn status_of<K, T>(slots: &Mutex<Slots<K, T>>, slot_key: &K) -> QueryStatus<T>
where
    K: Eq + Hash,
    T: Clone,
{
    match lock(slots).map.get(slot_key) {
        Some(Slot::Ready(value)) => QueryStatus {
            data: Some(value.clone()),
            ..QueryStatus::default()
        },
        Some(Slot::Pending { .. }) => QueryStatus {
            loading: true,
            ..QueryStatus::default()
        },
        Some(Slot::Failed(e)) => QueryStatus {
            error: Some(e.clone()),
            ..QueryStatus::default()
        },
        None => QueryStatus::default(),
    }
}
