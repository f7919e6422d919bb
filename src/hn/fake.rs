//! In-memory `StorySource` for tests.

use super::fetch::{FetchError, StorySource};
use super::model::{RawStory, StoryId};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeSource {
    pub ids: Vec<StoryId>,
    pub items: HashMap<StoryId, RawStory>,
    pub failing: HashSet<StoryId>,
    pub fail_ids: bool,
    pub story_calls: Mutex<Vec<StoryId>>,
    pub id_list_calls: AtomicUsize,
}

impl FakeSource {
    /// `n` linked stories with ids `1..=n`.
    pub fn with_stories(n: u64) -> Self {
        let mut fake = Self::default();
        for id in 1..=n {
            fake.push(story(id));
        }
        fake
    }

    pub fn push(&mut self, raw: RawStory) {
        self.ids.push(raw.id);
        self.items.insert(raw.id, raw);
    }

    pub fn id_list_fetches(&self) -> usize {
        self.id_list_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<StoryId> {
        self.story_calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

pub fn story(id: StoryId) -> RawStory {
    RawStory {
        id,
        title: format!("Story {id}"),
        url: Some(format!("https://example.com/{id}")),
        score: id as i64 * 10,
        by: format!("user{id}"),
        time: 1_000,
        descendants: id,
        kind: "story".into(),
    }
}

pub fn job(id: StoryId) -> RawStory {
    RawStory {
        kind: "job".into(),
        ..story(id)
    }
}

fn unavailable(id: StoryId) -> FetchError {
    FetchError::Status {
        url: format!("fake://item/{id}.json"),
        status: StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[async_trait]
impl StorySource for FakeSource {
    async fn fetch_top_ids(&self) -> Result<Vec<StoryId>, FetchError> {
        self.id_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ids {
            return Err(unavailable(0));
        }
        Ok(self.ids.clone())
    }

    async fn fetch_story(&self, id: StoryId) -> Result<Option<RawStory>, FetchError> {
        if let Ok(mut calls) = self.story_calls.lock() {
            calls.push(id);
        }
        if self.failing.contains(&id) {
            return Err(unavailable(id));
        }
        Ok(self.items.get(&id).cloned())
    }
}
