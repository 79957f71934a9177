//! Release notes: one line per commit since the previous release tag.

use crate::error::Result;
use crate::git::{CommitSummary, Repository};

/// Notes for a repository without any version tag
pub const INITIAL_RELEASE: &str = "Initial release.";

/// Build the notes for everything committed after `latest_tag`.
///
/// Each commit is rendered through `commit_format`; see [`format_commit`].
pub fn build(repository: &dyn Repository, latest_tag: Option<&str>, commit_format: &str) -> Result<String> {
    let tag = match latest_tag {
        Some(tag) => tag,
        None => return Ok(format!("{}\n", INITIAL_RELEASE)),
    };

    let commits = repository.commits_since(Some(tag))?;
    tracing::debug!(tag, count = commits.len(), "collected release notes");

    let mut notes = String::new();
    for commit in &commits {
        notes.push_str(format_commit(commit_format, commit).trim());
        notes.push('\n');
    }
    Ok(notes)
}

/// Render one commit.
///
/// Placeholders: `{hash}` (7 characters), `{longHash}`, `{message}` (the
/// subject line, with `...` when a body follows), `{author.name}` and
/// `{author.email}`.
pub fn format_commit(format: &str, commit: &CommitSummary) -> String {
    let short_hash = commit.hash.get(..7).unwrap_or(&commit.hash);

    format
        .replace("{hash}", short_hash)
        .replace("{longHash}", &commit.hash)
        .replace("{message}", &subject(&commit.message))
        .replace("{author.name}", &commit.author_name)
        .replace("{author.email}", &commit.author_email)
}

fn subject(message: &str) -> String {
    let mut lines = message.lines();
    let first = lines.next().unwrap_or("").trim();

    if lines.any(|line| !line.trim().is_empty()) {
        format!("{}...", first)
    } else {
        first.to_string()
    }
}
