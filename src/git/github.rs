//! GitHub URL validation and repository coordinates

use crate::error::PromptError;
use anyhow::Result;
use core::fmt;
use url::Url;

/// Hosts accepted as GitHub
pub const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

/// Check whether `url` is a GitHub URL
///
/// Only the host is inspected; the repository is not contacted.
#[must_use]
pub fn validate_github_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| GITHUB_HOSTS.contains(&host))
        })
        .unwrap_or(false)
}

/// Owner and name of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extract owner and repository name from a GitHub URL
///
/// A trailing slash and `.git` suffix are ignored. Extra path segments
/// (`/tree/main/...`) are ignored as well.
///
/// # Errors
///
/// Returns a validation error if the URL does not parse or has fewer than
/// two path segments.
pub fn parse_repo_coordinates(url: &str) -> Result<RepoCoordinates> {
    let parsed = Url::parse(url)
        .map_err(|e| PromptError::validation(format!("Invalid GitHub URL '{url}': {e}")))?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [owner, name, ..] => {
            let name = name.strip_suffix(".git").unwrap_or(name);
            if name.is_empty() {
                return Err(PromptError::validation(format!(
                    "Invalid GitHub URL format: '{url}'. Expected https://github.com/owner/repo"
                ))
                .into());
            }
            Ok(RepoCoordinates {
                owner: (*owner).to_owned(),
                name: name.to_owned(),
            })
        }
        _ => Err(PromptError::validation(format!(
            "Invalid GitHub URL format: '{url}'. Expected https://github.com/owner/repo"
        ))
        .into()),
    }
}
