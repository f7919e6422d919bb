use serde::Deserialize;
use url::Url;

pub type StoryId = u64;

/// An item as returned by `/item/{id}.json`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawStory {
    pub id: StoryId,
    #[serde(default)]
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub descendants: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl RawStory {
    /// Only linked stories are shown; jobs, polls and text posts are skipped.
    pub fn is_displayable(&self) -> bool {
        self.kind == "story" && self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStory {
    pub id: StoryId,
    pub title: String,
    pub url: String,
    pub points: i64,
    pub author: String,
    pub time_ago: String,
    pub comments: u64,
    pub rank: usize,
}

impl DisplayStory {
    pub fn domain(&self) -> String {
        match Url::parse(&self.url) {
            Ok(u) => match u.host_str() {
                Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
                None => self.url.clone(),
            },
            Err(_) => self.url.clone(),
        }
    }

    pub fn discussion_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub karma: i64,
    pub about: Option<String>,
    #[serde(default)]
    pub submitted: Vec<StoryId>,
}
