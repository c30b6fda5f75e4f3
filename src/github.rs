//! GitHub commit references and the two HTTP endpoints this tool talks to:
//! the commit metadata API and the raw file content host.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// A parsed GitHub commit reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub owner: String,
    pub repo: String,
    pub sha: String,
}

/// Change status of a file in commit metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Changed,
    Copied,
    #[serde(other)]
    Other,
}

impl FileStatus {
    /// Whether this tool downloads the file's content.
    /// Renamed and removed entries are skipped deliberately.
    pub fn downloadable(self) -> bool {
        matches!(self, FileStatus::Added | FileStatus::Modified)
    }
}

/// A file touched by a commit, as reported by the metadata API
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    #[serde(rename = "filename")]
    pub path: String,
    pub status: FileStatus,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

/// Parse a commit URL of the form
/// `https://github.com/{owner}/{repo}/commit/{sha}`.
///
/// The sha must be one or more lowercase hex characters and must consume the
/// rest of the string. Anything else (wrong scheme, missing segments,
/// uppercase hex, trailing suffix) yields `None`.
pub fn parse_commit_url(url: &str) -> Option<CommitRef> {
    let rest = url.strip_prefix("https://github.com/")?;
    let mut parts = rest.splitn(4, '/');
    let owner = parts.next()?;
    let repo = parts.next()?;
    let commit = parts.next()?;
    let sha = parts.next()?;

    if owner.is_empty() || repo.is_empty() || commit != "commit" {
        return None;
    }
    if sha.is_empty() || !sha.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return None;
    }

    Some(CommitRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        sha: sha.to_string(),
    })
}

/// URL of the commit metadata API endpoint
pub fn commit_api_url(reference: &CommitRef) -> String {
    format!(
        "https://api.github.com/repos/{}/{}/commits/{}",
        reference.owner, reference.repo, reference.sha
    )
}

/// URL serving a file's raw bytes at the given commit
pub fn raw_content_url(reference: &CommitRef, path: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/{}/{}/{}/{}",
        reference.owner, reference.repo, reference.sha, path
    )
}

/// The two fetch operations the download engine needs. `GithubClient` is
/// the real implementation; tests substitute scripted sources.
pub trait CommitSource {
    /// Fetch commit metadata and return the list of files it touched
    fn commit_files(&self, reference: &CommitRef) -> Result<Vec<ChangedFile>>;

    /// Fetch the raw bytes of one file at the referenced commit
    fn fetch_raw(&self, reference: &CommitRef, path: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP client for the GitHub endpoints
pub struct GithubClient {
    http: reqwest::blocking::Client,
}

impl GithubClient {
    pub fn new() -> Result<Self> {
        // The GitHub API rejects requests without a user agent
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http })
    }
}

impl CommitSource for GithubClient {
    fn commit_files(&self, reference: &CommitRef) -> Result<Vec<ChangedFile>> {
        let url = commit_api_url(reference);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {} from {}", status, url));
        }

        let detail: CommitDetail = response
            .json()
            .context("Failed to parse commit metadata")?;
        Ok(detail.files)
    }

    fn fetch_raw(&self, reference: &CommitRef, path: &str) -> Result<Vec<u8>> {
        let url = raw_content_url(reference, path);
        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {} from {}", status, url));
        }

        let bytes = response.bytes().context("Failed to read response body")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_url() {
        let reference = parse_commit_url("https://github.com/octo/repo/commit/deadbeef").unwrap();
        assert_eq!(reference.owner, "octo");
        assert_eq!(reference.repo, "repo");
        assert_eq!(reference.sha, "deadbeef");
    }

    #[test]
    fn test_parse_rejects_http_scheme() {
        assert!(parse_commit_url("http://github.com/a/b/commit/abc123").is_none());
    }

    #[test]
    fn test_parse_rejects_uppercase_hex() {
        assert!(parse_commit_url("https://github.com/a/b/commit/ABC123").is_none());
    }

    #[test]
    fn test_parse_rejects_missing_segments() {
        assert!(parse_commit_url("https://github.com/a/b").is_none());
        assert!(parse_commit_url("https://github.com/a/b/commit").is_none());
        assert!(parse_commit_url("https://github.com/a/b/commit/").is_none());
        assert!(parse_commit_url("https://github.com//b/commit/abc").is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_middle_segment() {
        assert!(parse_commit_url("https://github.com/a/b/pull/123").is_none());
    }

    #[test]
    fn test_parse_rejects_trailing_suffix() {
        assert!(parse_commit_url("https://github.com/a/b/commit/abc123/extra").is_none());
        assert!(parse_commit_url("https://github.com/a/b/commit/abc123.patch").is_none());
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        assert!(parse_commit_url("https://gitlab.com/a/b/commit/abc123").is_none());
    }

    #[test]
    fn test_commit_api_url() {
        let reference = CommitRef {
            owner: "octo".to_string(),
            repo: "repo".to_string(),
            sha: "deadbeef".to_string(),
        };
        assert_eq!(
            commit_api_url(&reference),
            "https://api.github.com/repos/octo/repo/commits/deadbeef"
        );
    }

    #[test]
    fn test_raw_content_url() {
        let reference = CommitRef {
            owner: "octo".to_string(),
            repo: "repo".to_string(),
            sha: "deadbeef".to_string(),
        };
        assert_eq!(
            raw_content_url(&reference, "src/lib.rs"),
            "https://raw.githubusercontent.com/octo/repo/deadbeef/src/lib.rs"
        );
    }

    #[test]
    fn test_deserialize_changed_files() {
        let json = r#"{
            "sha": "deadbeef",
            "files": [
                {"filename": "a.txt", "status": "added", "additions": 1, "deletions": 0},
                {"filename": "b.txt", "status": "removed", "additions": 0, "deletions": 3},
                {"filename": "c/d.txt", "status": "modified", "additions": 2, "deletions": 2}
            ]
        }"#;

        let detail: CommitDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.files.len(), 3);
        assert_eq!(detail.files[0].path, "a.txt");
        assert_eq!(detail.files[0].status, FileStatus::Added);
        assert_eq!(detail.files[1].status, FileStatus::Removed);
        assert_eq!(detail.files[2].path, "c/d.txt");
        assert_eq!(detail.files[2].status, FileStatus::Modified);
    }

    #[test]
    fn test_deserialize_unknown_status() {
        let json = r#"{"filename": "x", "status": "something-new"}"#;
        let file: ChangedFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.status, FileStatus::Other);
        assert!(!file.status.downloadable());
    }

    #[test]
    fn test_deserialize_missing_files_array() {
        let detail: CommitDetail = serde_json::from_str(r#"{"sha": "abc"}"#).unwrap();
        assert!(detail.files.is_empty());
    }

    #[test]
    fn test_downloadable_statuses() {
        assert!(FileStatus::Added.downloadable());
        assert!(FileStatus::Modified.downloadable());
        assert!(!FileStatus::Removed.downloadable());
        assert!(!FileStatus::Renamed.downloadable());
        assert!(!FileStatus::Changed.downloadable());
        assert!(!FileStatus::Copied.downloadable());
    }
}
