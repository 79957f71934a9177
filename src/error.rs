use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release-that operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Not a git repository: {}", .0.display())]
    NotAGitRepository(PathBuf),

    #[error("Invalid version format: '{0}' - expected MAJOR.MINOR.PATCH[-PRERELEASE]")]
    InvalidVersionFormat(String),

    #[error("Version {0} cannot be incremented: a component is at its maximum")]
    VersionOverflow(String),

    #[error("Hook `{command}` failed: {reason}")]
    HookExecution { command: String, reason: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-that
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version format error for the offending input
    pub fn invalid_version(input: impl Into<String>) -> Self {
        ReleaseError::InvalidVersionFormat(input.into())
    }

    /// Create a git failure that did not originate in libgit2
    pub fn git(msg: impl Into<String>) -> Self {
        ReleaseError::GitOperation(msg.into())
    }

    /// Create a hook failure for the given command
    pub fn hook(command: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::HookExecution {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create a prompt error with context
    pub fn prompt(msg: impl Into<String>) -> Self {
        ReleaseError::Prompt(msg.into())
    }

    /// Whether this error must stop the release.
    ///
    /// Hook failures are advisory; everything else halts the pipeline.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReleaseError::HookExecution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_not_a_repository_mentions_path() {
        let err = ReleaseError::NotAGitRepository(PathBuf::from("/tmp/nowhere"));
        assert_eq!(err.to_string(), "Not a git repository: /tmp/nowhere");
    }

    #[test]
    fn test_invalid_version_mentions_input() {
        let err = ReleaseError::invalid_version("v1.2");
        let msg = err.to_string();
        assert!(msg.contains("'v1.2'"));
        assert!(msg.contains("MAJOR.MINOR.PATCH"));
    }

    #[test]
    fn test_hook_failures_are_not_fatal() {
        assert!(!ReleaseError::hook("false", "exit status 1").is_fatal());
        assert!(ReleaseError::git("push rejected").is_fatal());
        assert!(ReleaseError::invalid_version("x").is_fatal());
        assert!(ReleaseError::VersionOverflow("1.0.0".into()).is_fatal());
        assert!(ReleaseError::NotAGitRepository(PathBuf::from(".")).is_fatal());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::invalid_version("x"), "Invalid version format"),
            (ReleaseError::git("x"), "Git operation failed"),
            (ReleaseError::hook("x", "y"), "Hook `x` failed"),
            (ReleaseError::prompt("x"), "Prompt error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
