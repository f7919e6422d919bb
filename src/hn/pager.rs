use super::fetch::{FetchError, StorySource};
use super::model::{DisplayStory, RawStory};
use super::time_ago::{format_time_ago, now_epoch};
use futures_util::future::try_join_all;
use std::ops::Range;
use tracing::debug;

/// One requested page of the top-stories list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    /// Zero-based position of the page's first id in the global list.
    pub offset: usize,
    /// How many ids fell inside the page range, before filtering.
    pub requested: usize,
    pub stories: Vec<DisplayStory>,
}

/// Zero-based id range for a 1-based `page`. Page 0 is read as page 1.
pub fn page_range(page: usize, page_size: usize) -> Range<usize> {
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    start..start.saturating_add(page_size)
}

pub struct Pager<S> {
    source: S,
}

impl<S: StorySource> Pager<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch_page(&self, page: usize, page_size: usize) -> Result<Page, FetchError> {
        self.fetch_page_at(page, page_size, now_epoch()).await
    }

    /// Fetches every record on the page together; any failure fails the page.
    pub async fn fetch_page_at(
        &self,
        page: usize,
        page_size: usize,
        now: i64,
    ) -> Result<Page, FetchError> {
        let ids = self.source.fetch_top_ids().await?;
        let range = page_range(page, page_size);
        let offset = range.start;
        let slice = &ids[range.start.min(ids.len())..range.end.min(ids.len())];
        debug!("page {page}: {} ids from offset {offset}", slice.len());

        let records = try_join_all(slice.iter().map(|&id| self.source.fetch_story(id))).await?;

        let stories = records
            .into_iter()
            .enumerate()
            .filter_map(|(pos, raw)| {
                let raw = raw.filter(RawStory::is_displayable)?;
                Some(project(raw, offset + pos + 1, now))
            })
            .collect();

        Ok(Page {
            number: page.max(1),
            offset,
            requested: slice.len(),
            stories,
        })
    }

    pub async fn total_count(&self) -> Result<usize, FetchError> {
        Ok(self.source.fetch_top_ids().await?.len())
    }
}

fn project(raw: RawStory, rank: usize, now: i64) -> DisplayStory {
    DisplayStory {
        id: raw.id,
        title: raw.title,
        url: raw.url.unwrap_or_default(),
        points: raw.score,
        author: raw.by,
        time_ago: format_time_ago(now, raw.time),
        comments: raw.descendants,
        rank,
    }
}
