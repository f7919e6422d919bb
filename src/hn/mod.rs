mod feed;
mod fetch;
mod model;
mod pager;
mod time_ago;

#[cfg(test)]
mod fake;

use crate::config::RuntimeConfig;
use crate::open_url::open_url;
use crate::ui::{prompt_menu, show_message, MenuChoice};
use crate::util::sanitize::{html_to_text, sanitize_for_terminal, MAX_LABEL_CHARS};
use anyhow::Result;
use tracing::warn;

pub use feed::StoryFeed;
pub use fetch::{HnClient, StorySource, DEFAULT_API_BASE};
pub use model::{DisplayStory, User};
pub use time_ago::{format_time_ago, now_epoch};

/// Stories screen. Returns `true` when the user asked to quit the app.
pub async fn run(cfg: &RuntimeConfig) -> Result<bool> {
    let client = HnClient::new(&cfg.api_base)?;
    let mut feed = StoryFeed::new(client, cfg.page_size);
    let header = cfg.header.as_deref();

    if !load_with_retry(&mut feed, true, |p| retry_prompt(p, header)).await? {
        return Ok(false);
    }

    loop {
        let mut labels: Vec<String> = feed.stories().iter().map(story_label).collect();
        let load_more_idx = feed.has_more().then(|| {
            labels.push("Load more".to_string());
            labels.len() - 1
        });

        let prompt = format!(
            "Top stories ({} loaded over {} pages, b = back, q = quit)",
            feed.stories().len(),
            feed.loaded_pages()
        );
        match prompt_menu(&prompt, &labels, None, header)? {
            MenuChoice::Back => return Ok(false),
            MenuChoice::Quit => return Ok(true),
            MenuChoice::Invalid => continue,
            MenuChoice::Index(i) if Some(i) == load_more_idx => {
                if !load_with_retry(&mut feed, false, |p| retry_prompt(p, header)).await? {
                    return Ok(false);
                }
            }
            MenuChoice::Index(i) => {
                let Some(story) = feed.stories().get(i).cloned() else { continue };
                if story_menu(cfg, feed.source(), &story).await? {
                    return Ok(true);
                }
            }
        }
    }
}

fn retry_prompt(prompt: &str, header: Option<&str>) -> Result<MenuChoice> {
    prompt_menu(prompt, &["Try again".to_string()], Some(0), header)
}

/// Runs a load, asking before each retry. Only an explicit "Try again"
/// reloads; `Ok(false)` means the user backed out, and prompt errors are
/// returned without touching the network again.
async fn load_with_retry<S, F>(feed: &mut StoryFeed<S>, first: bool, mut ask: F) -> Result<bool>
where
    S: StorySource,
    F: FnMut(&str) -> Result<MenuChoice>,
{
    loop {
        let res = if first {
            feed.load_first().await
        } else {
            feed.load_more().await.map(|_| ())
        };
        let err = match res {
            Ok(()) => return Ok(true),
            Err(err) => err,
        };
        warn!("story load failed: {err}");
        let what = if first { "stories" } else { "more stories" };
        let prompt = format!("Failed to load {what}. Please try again.");
        loop {
            match ask(&prompt)? {
                MenuChoice::Index(_) => break,
                MenuChoice::Invalid => continue,
                MenuChoice::Back | MenuChoice::Quit => return Ok(false),
            }
        }
    }
}

async fn story_menu(cfg: &RuntimeConfig, client: &HnClient, story: &DisplayStory) -> Result<bool> {
    let labels = vec![
        format!("Open link ({})", sanitize_for_terminal(&story.domain(), MAX_LABEL_CHARS)),
        format!("Open discussion ({} comments)", story.comments),
        format!("View author: {}", sanitize_for_terminal(&story.author, MAX_LABEL_CHARS)),
    ];
    let title = sanitize_for_terminal(&story.title, MAX_LABEL_CHARS);
    loop {
        let target = match prompt_menu(&title, &labels, Some(0), cfg.header.as_deref())? {
            MenuChoice::Back => return Ok(false),
            MenuChoice::Quit => return Ok(true),
            MenuChoice::Invalid => continue,
            MenuChoice::Index(0) => story.url.clone(),
            MenuChoice::Index(1) => story.discussion_url(),
            MenuChoice::Index(_) => {
                show_user(cfg, client, &story.author).await?;
                continue;
            }
        };
        if let Err(err) = open_url(&target, cfg.open_command.as_deref()) {
            let lines = vec![
                sanitize_for_terminal(&target, MAX_LABEL_CHARS),
                format!("{err:#}"),
            ];
            show_message(cfg.header.as_deref(), "Could not open link", &lines)?;
        }
    }
}

async fn show_user(cfg: &RuntimeConfig, client: &HnClient, handle: &str) -> Result<()> {
    let lines = match client.fetch_user(handle).await {
        Ok(Some(user)) => user_lines(&user),
        Ok(None) => vec![format!("No such user: {handle}")],
        Err(err) => {
            warn!("user fetch failed: {err}");
            vec!["Failed to load profile. Please try again.".to_string()]
        }
    };
    let title = format!("user: {}", sanitize_for_terminal(handle, MAX_LABEL_CHARS));
    show_message(cfg.header.as_deref(), &title, &lines)
}

fn user_lines(user: &User) -> Vec<String> {
    let created = time::OffsetDateTime::from_unix_timestamp(user.created)
        .ok()
        .and_then(|t| t.format(time::macros::format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| "unknown".to_string());
    let mut lines = vec![
        format!("created: {created} ({})", format_time_ago(now_epoch(), user.created)),
        format!("karma: {}", user.karma),
        format!("submissions: {}", user.submitted.len()),
    ];
    if let Some(about) = user.about.as_deref() {
        lines.push(String::new());
        lines.extend(html_to_text(about));
    }
    lines
}

fn story_label(story: &DisplayStory) -> String {
    format!(
        "{}. {} ({})\n{} points by {} {} | {} comments",
        story.rank,
        sanitize_for_terminal(&story.title, MAX_LABEL_CHARS),
        sanitize_for_terminal(&story.domain(), MAX_LABEL_CHARS),
        story.points,
        sanitize_for_terminal(&story.author, MAX_LABEL_CHARS),
        story.time_ago,
        story.comments,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hn::fake::FakeSource;
    use anyhow::anyhow;

    #[test]
    fn label_has_rank_domain_and_meta_line() {
        let story = DisplayStory {
            id: 42,
            title: "Show HN: \x1b[1mThing".into(),
            url: "https://www.example.org/post".into(),
            points: 120,
            author: "dang".into(),
            time_ago: "3 hours ago".into(),
            comments: 57,
            rank: 11,
        };
        assert_eq!(
            story_label(&story),
            "11. Show HN: Thing (example.org)\n120 points by dang 3 hours ago | 57 comments"
        );
    }

    #[test]
    fn user_lines_include_karma_and_bio() {
        let user = User {
            id: "pg".into(),
            created: 1_160_418_092,
            karma: 155_000,
            about: Some("Bug fixer.<p>Essays".into()),
            submitted: vec![1, 2, 3],
        };
        let lines = user_lines(&user);
        assert!(lines[0].starts_with("created: 2006-10-09"));
        assert_eq!(lines[1], "karma: 155000");
        assert_eq!(lines[2], "submissions: 3");
        assert_eq!(&lines[4..], &["Bug fixer.".to_string(), "Essays".to_string()]);
    }

    fn failing_feed() -> StoryFeed<FakeSource> {
        let fake = FakeSource {
            fail_ids: true,
            ..FakeSource::default()
        };
        StoryFeed::new(fake, 10)
    }

    #[tokio::test]
    async fn input_error_in_retry_prompt_does_not_refetch() {
        let mut feed = failing_feed();
        let res = load_with_retry(&mut feed, true, |_| Err(anyhow!("stdin closed"))).await;
        assert!(res.is_err());
        assert_eq!(feed.source().id_list_fetches(), 1);
    }

    #[tokio::test]
    async fn mistyped_retry_answer_asks_again_without_refetch() {
        let mut feed = failing_feed();
        let mut answers = vec![MenuChoice::Back, MenuChoice::Invalid, MenuChoice::Invalid];
        let gave_up = load_with_retry(&mut feed, true, |_| {
            answers.pop().ok_or_else(|| anyhow!("no more answers"))
        })
        .await
        .expect("should not error");
        assert!(!gave_up);
        assert!(answers.is_empty());
        assert_eq!(feed.source().id_list_fetches(), 1);
    }

    #[tokio::test]
    async fn try_again_reloads_once_per_answer() {
        let mut feed = failing_feed();
        let mut answers = vec![MenuChoice::Back, MenuChoice::Index(0)];
        let gave_up = load_with_retry(&mut feed, true, |_| {
            answers.pop().ok_or_else(|| anyhow!("no more answers"))
        })
        .await
        .expect("should not error");
        assert!(!gave_up);
        assert_eq!(feed.source().id_list_fetches(), 2);
    }

    #[tokio::test]
    async fn successful_load_never_prompts() {
        let mut feed = StoryFeed::new(FakeSource::with_stories(5), 10);
        let loaded = load_with_retry(&mut feed, true, |_| Err(anyhow!("should not be asked")))
            .await
            .expect("should load");
        assert!(loaded);
        assert_eq!(feed.stories().len(), 5);
    }
}
