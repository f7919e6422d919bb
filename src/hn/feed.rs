use super::fetch::{FetchError, StorySource};
use super::model::DisplayStory;
use super::pager::Pager;
use tracing::debug;

/// The accumulated story list behind the stories screen.
///
/// `has_more` trusts the total id count; a page whose id range came back
/// short only ends the feed sooner.
pub struct StoryFeed<S> {
    pager: Pager<S>,
    page_size: usize,
    stories: Vec<DisplayStory>,
    loaded_pages: usize,
    total: Option<usize>,
    exhausted: bool,
}

impl<S: StorySource> StoryFeed<S> {
    pub fn new(source: S, page_size: usize) -> Self {
        Self {
            pager: Pager::new(source),
            page_size: page_size.max(1),
            stories: Vec::new(),
            loaded_pages: 0,
            total: None,
            exhausted: false,
        }
    }

    pub fn stories(&self) -> &[DisplayStory] {
        &self.stories
    }

    pub fn loaded_pages(&self) -> usize {
        self.loaded_pages
    }

    pub fn source(&self) -> &S {
        self.pager.source()
    }

    pub fn has_more(&self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.total {
            Some(total) => self.loaded_pages * self.page_size < total,
            None => self.loaded_pages == 0,
        }
    }

    /// Starts over from page 1. On error the current list is kept.
    pub async fn load_first(&mut self) -> Result<(), FetchError> {
        let page = self.pager.fetch_page(1, self.page_size).await?;
        let total = self.pager.total_count().await?;
        debug!("loaded first page: {} stories of {total}", page.stories.len());
        self.exhausted = page.requested < self.page_size;
        self.stories = page.stories;
        self.loaded_pages = 1;
        self.total = Some(total);
        Ok(())
    }

    /// Appends the next page, returning how many stories were added.
    pub async fn load_more(&mut self) -> Result<usize, FetchError> {
        if self.loaded_pages == 0 {
            self.load_first().await?;
            return Ok(self.stories.len());
        }
        if !self.has_more() {
            return Ok(0);
        }
        let next = self.loaded_pages + 1;
        let page = self.pager.fetch_page(next, self.page_size).await?;
        debug!(
            "loaded page {} at offset {}: {} of {} ids kept",
            page.number,
            page.offset,
            page.stories.len(),
            page.requested
        );
        if page.requested < self.page_size {
            self.exhausted = true;
        }
        let added = page.stories.len();
        self.stories.extend(page.stories);
        self.loaded_pages = next;
        Ok(added)
    }
}
