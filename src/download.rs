//! Sequential download engine: fetch commit metadata, then fetch and write
//! each added or modified file one at a time, reporting progress after every
//! completed file.

use crate::github::{ChangedFile, CommitRef, CommitSource};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// The four failure kinds surfaced to the presentation layer.
/// Display messages are user-facing dialog text.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The commit URL did not parse
    #[error("Invalid GitHub commit URL.")]
    InvalidReference,

    /// No destination folder was chosen
    #[error("Please choose a download folder.")]
    MissingDestination,

    /// A request failed or came back with a non-success status.
    /// `subject` is either "commit metadata" or the repo-relative file path.
    #[error("Network or API error while fetching {subject}: {detail}")]
    NetworkOrApi { subject: String, detail: String },

    /// Catch-all, e.g. a filesystem permission failure
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// In-memory state of one download operation. Created when the operation
/// starts, mutated as files complete, discarded when it ends.
#[derive(Debug, Clone, Default)]
pub struct DownloadSession {
    pub total: usize,
    pub completed: usize,
    pub current_file: String,
    pub failed: bool,
}

impl DownloadSession {
    /// Completion percentage, rounded to the nearest integer
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Keep only the files whose content gets downloaded, preserving the order
/// supplied by the metadata
pub fn retain_downloadable(files: Vec<ChangedFile>) -> Vec<ChangedFile> {
    files
        .into_iter()
        .filter(|f| f.status.downloadable())
        .collect()
}

/// Local path for a repo-relative file under the destination directory.
/// Absolute paths and `..` components in the metadata are rejected so a
/// hostile `filename` cannot escape the destination.
pub fn local_destination(dest: &Path, repo_path: &str) -> Result<PathBuf, DownloadError> {
    let relative = Path::new(repo_path);
    let escapes = relative.is_absolute()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(DownloadError::Unexpected(format!(
            "unsafe file path in commit metadata: {}",
            repo_path
        )));
    }
    Ok(dest.join(relative))
}

/// Write fetched bytes to their destination, creating intermediate
/// directories as needed. Overwrites any existing file silently.
pub fn write_local_file(dest: &Path, repo_path: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    let local = local_destination(dest, repo_path)?;

    if let Some(parent) = local.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DownloadError::Unexpected(format!("could not create {}: {}", parent.display(), e))
        })?;
    }

    fs::write(&local, bytes).map_err(|e| {
        DownloadError::Unexpected(format!("could not write {}: {}", local.display(), e))
    })?;

    Ok(local)
}

/// Download every added or modified file of `reference` into `dest`.
///
/// Strictly sequential: metadata first, then one raw fetch and one write per
/// file, in metadata order, on the calling thread. The first failure aborts
/// the whole operation; files already written stay on disk. `progress` is
/// invoked with a session snapshot once before the first file and after each
/// completed file, plus a final failed snapshot if the operation aborts.
/// An empty filtered list returns a zero-total session without invoking
/// `progress` at all.
pub fn download_commit_files<S, F>(
    source: &S,
    reference: &CommitRef,
    dest: &Path,
    mut progress: F,
) -> Result<DownloadSession, DownloadError>
where
    S: CommitSource,
    F: FnMut(&DownloadSession),
{
    let mut session = DownloadSession::default();
    match run(source, reference, dest, &mut session, &mut progress) {
        Ok(()) => Ok(session),
        Err(e) => {
            session.failed = true;
            progress(&session);
            Err(e)
        }
    }
}

fn run<S, F>(
    source: &S,
    reference: &CommitRef,
    dest: &Path,
    session: &mut DownloadSession,
    progress: &mut F,
) -> Result<(), DownloadError>
where
    S: CommitSource,
    F: FnMut(&DownloadSession),
{
    let files = source
        .commit_files(reference)
        .map_err(|e| DownloadError::NetworkOrApi {
            subject: "commit metadata".to_string(),
            detail: e.to_string(),
        })?;

    let files = retain_downloadable(files);
    session.total = files.len();
    if files.is_empty() {
        return Ok(());
    }

    progress(session);

    for file in &files {
        let bytes =
            source
                .fetch_raw(reference, &file.path)
                .map_err(|e| DownloadError::NetworkOrApi {
                    subject: file.path.clone(),
                    detail: e.to_string(),
                })?;

        write_local_file(dest, &file.path, &bytes)?;

        session.completed += 1;
        session.current_file = file.path.clone();
        progress(session);
    }

    Ok(())
}
