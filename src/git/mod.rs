//! Git operations abstraction layer
//!
//! The release pipeline only talks to the [Repository] trait. Implementations:
//!
//! - [repository::Git2Repository]: a real repository backed by `git2`, pushing
//!   through the system `git` binary
//! - [mock::MockRepository]: an in-memory implementation that records calls
//!
//! ```rust,no_run
//! # use release_that::git::{Git2Repository, Repository};
//! # fn example() -> release_that::Result<()> {
//! let repo = Git2Repository::open(".")?;
//! let tags = repo.list_tags()?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockFailure, MockRepository};
pub use repository::Git2Repository;

use crate::error::Result;

/// Options for creating the release commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    /// Stage every change in the working tree before committing
    pub stage_all: bool,
    /// Create the commit even when the tree is unchanged
    pub allow_empty: bool,
}

/// A commit as listed in release notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Full hexadecimal object id
    pub hash: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
}

/// The version-control operations a release needs.
///
/// ## Error Handling
///
/// Every failure maps to a fatal [crate::error::ReleaseError]; callers do not
/// retry or roll back.
pub trait Repository: Send {
    /// All tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Short name of the branch HEAD points to
    ///
    /// Works before the first commit. Fails on a detached HEAD.
    fn current_branch(&self) -> Result<String>;

    /// Commits reachable from HEAD but not from `tag`, newest first.
    ///
    /// Without a tag every commit is listed; an unborn HEAD has none.
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitSummary>>;

    /// Create a commit on HEAD and return its hash
    ///
    /// Fails when nothing changed unless `options.allow_empty` is set.
    fn commit(&self, message: &str, options: CommitOptions) -> Result<String>;

    /// Create an annotated tag at HEAD
    ///
    /// Fails if the tag already exists.
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push `refspecs` to `remote`, appending `arguments` verbatim
    fn push(&self, remote: &str, refspecs: &[String], arguments: &[String]) -> Result<()>;
}
