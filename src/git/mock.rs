use std::cell::RefCell;

use crate::error::{ReleaseError, Result};
use crate::git::{CommitOptions, CommitSummary, Repository};

/// A mutating call received by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Commit {
        message: String,
        options: CommitOptions,
    },
    Tag {
        name: String,
        message: String,
    },
    Push {
        remote: String,
        refspecs: Vec<String>,
        arguments: Vec<String>,
    },
}

/// Which operation a [MockRepository] should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Commit,
    Tag,
    Push,
}

/// Mock repository for testing without actual git operations
///
/// Successful commits and tags are kept, so a failure later in the
/// pipeline leaves them visible just like a real repository would.
pub struct MockRepository {
    /// Tag names with the history length at the time they were created
    tags: RefCell<Vec<(String, usize)>>,
    /// Every commit, oldest first
    history: RefCell<Vec<CommitSummary>>,
    branch: Option<String>,
    failure: Option<MockFailure>,
    calls: RefCell<Vec<GitCall>>,
    commits: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            tags: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            branch: Some("main".to_string()),
            failure: None,
            calls: RefCell::new(Vec::new()),
            commits: RefCell::new(Vec::new()),
        }
    }

    /// Add an existing tag at the current end of history
    pub fn with_tag(self, name: impl Into<String>) -> Self {
        let position = self.history.borrow().len();
        self.tags.borrow_mut().push((name.into(), position));
        self
    }

    /// Add an existing commit on top of history
    pub fn with_commit(self, message: impl Into<String>) -> Self {
        self.record(message.into());
        self
    }

    fn record(&self, message: String) -> String {
        let mut history = self.history.borrow_mut();
        let hash = format!("{:040x}", history.len() + 1);
        history.push(CommitSummary {
            hash: hash.clone(),
            message,
            author_name: "Mock Author".to_string(),
            author_email: "mock@example.com".to_string(),
        });
        hash
    }

    /// Set the current branch; `None` simulates a detached HEAD
    pub fn with_branch(mut self, branch: Option<&str>) -> Self {
        self.branch = branch.map(str::to_string);
        self
    }

    /// Make one operation fail
    pub fn failing_on(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Mutating calls received so far, including failed ones
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    /// Messages of commits that were created
    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    fn check(&self, operation: MockFailure) -> Result<()> {
        if self.failure == Some(operation) {
            return Err(ReleaseError::git(format!("simulated {:?} failure", operation)));
        }
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags())
    }

    fn current_branch(&self) -> Result<String> {
        self.branch
            .clone()
            .ok_or_else(|| ReleaseError::git("HEAD is detached, cannot push a branch"))
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitSummary>> {
        let start = match tag {
            Some(tag) => self
                .tags
                .borrow()
                .iter()
                .find(|(name, _)| name == tag)
                .map(|(_, position)| *position)
                .ok_or_else(|| ReleaseError::git(format!("tag '{}' not found", tag)))?,
            None => 0,
        };

        Ok(self.history.borrow()[start..].iter().rev().cloned().collect())
    }

    fn commit(&self, message: &str, options: CommitOptions) -> Result<String> {
        self.calls.borrow_mut().push(GitCall::Commit {
            message: message.to_string(),
            options,
        });
        self.check(MockFailure::Commit)?;

        self.commits.borrow_mut().push(message.to_string());
        Ok(self.record(message.to_string()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.calls.borrow_mut().push(GitCall::Tag {
            name: name.to_string(),
            message: message.to_string(),
        });
        self.check(MockFailure::Tag)?;

        if self.tags.borrow().iter().any(|(tag, _)| tag == name) {
            return Err(ReleaseError::git(format!("tag '{}' already exists", name)));
        }
        let position = self.history.borrow().len();
        self.tags.borrow_mut().push((name.to_string(), position));
        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String], arguments: &[String]) -> Result<()> {
        self.calls.borrow_mut().push(GitCall::Push {
            remote: remote.to_string(),
            refspecs: refspecs.to_vec(),
            arguments: arguments.to_vec(),
        });
        self.check(MockFailure::Push)
    }
}
