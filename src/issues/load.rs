use super::model::Issue;
use std::{fs, path::Path};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("failed to read issues file: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed issues data: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Parses the whole list or nothing; one bad record rejects the file.
pub fn parse_issues(json: &str) -> Result<Vec<Issue>, ValidationError> {
    Ok(serde_json::from_str::<Vec<Issue>>(json)?)
}

pub fn read_issues(path: &Path) -> Result<Vec<Issue>, ValidationError> {
    let txt = fs::read_to_string(path)?;
    parse_issues(&txt)
}

/// Loads the issue list, falling back to an empty list when it is invalid.
pub fn load_issues_safely(path: &Path) -> Vec<Issue> {
    match read_issues(path) {
        Ok(issues) => issues,
        Err(err) => {
            warn!("discarding issues from {}: {err}", path.display());
            Vec::new()
        }
    }
}
