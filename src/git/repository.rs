use git2::{ErrorCode, IndexAddOption, Repository as Git2Repo, Signature, Sort};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReleaseError, Result};
use crate::git::{CommitOptions, CommitSummary, Repository};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Open the repository whose working tree is `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::open(path.as_ref())?;
        Self::from_git2(repo)
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::git("bare repositories are not supported"))?;

        Ok(Git2Repository { repo, workdir })
    }

    fn signature(&self) -> Result<Signature<'static>> {
        self.repo.signature().map_err(|e| {
            ReleaseError::git(format!(
                "cannot determine author, set user.name and user.email: {}",
                e.message()
            ))
        })
    }
}

impl Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn current_branch(&self) -> Result<String> {
        // HEAD itself, not its target, so an unborn branch still has a name
        let head = self.repo.find_reference("HEAD")?;
        let target = match head.symbolic_target_bytes() {
            Some(target) => target,
            None => return Err(ReleaseError::git("HEAD is detached, cannot push a branch")),
        };

        let target = std::str::from_utf8(target)
            .map_err(|_| ReleaseError::git("current branch name is not valid UTF-8"))?;
        target
            .strip_prefix("refs/heads/")
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::git(format!("HEAD points outside refs/heads: {}", target)))
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitSummary>> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        match walk.push_head() {
            Ok(()) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(Vec::new())
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(tag) = tag {
            let tagged = self
                .repo
                .find_reference(&format!("refs/tags/{}", tag))?
                .peel_to_commit()?;
            walk.hide(tagged.id())?;
        }

        walk.map(|oid| -> Result<CommitSummary> {
            let commit = self.repo.find_commit(oid?)?;
            let author = commit.author();
            Ok(CommitSummary {
                hash: commit.id().to_string(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                author_name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
                author_email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
            })
        })
        .collect()
    }

    fn commit(&self, message: &str, options: CommitOptions) -> Result<String> {
        let mut index = self.repo.index()?;

        if options.stage_all {
            index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
            index.update_all(["*"], None)?;
            index.write()?;
        }

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };

        if !options.allow_empty {
            let unchanged = match &parent {
                Some(parent) => parent.tree_id() == tree_id,
                None => tree.is_empty(),
            };
            if unchanged {
                return Err(ReleaseError::git("nothing to commit, working tree clean"));
            }
        }

        let signature = self.signature()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        tracing::debug!(%oid, "created commit");
        Ok(oid.to_string())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| ReleaseError::git(format!("cannot create tag '{}': {}", name, e.message())))?;

        tracing::debug!(tag = name, commit = %head.id(), "created annotated tag");
        Ok(())
    }

    fn push(&self, remote: &str, refspecs: &[String], arguments: &[String]) -> Result<()> {
        tracing::debug!(remote, ?refspecs, ?arguments, "running git push");

        // Arguments go to git verbatim, after the refspecs
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.workdir)
            .arg("push")
            .arg(remote)
            .args(refspecs)
            .args(arguments)
            .output()
            .map_err(|e| ReleaseError::git(format!("cannot run git push: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::git(format!(
                "push to '{}' failed: {}",
                remote,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::RepositoryInitOptions;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Git2Repository) {
        let dir = TempDir::new().unwrap();
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let repo = Git2Repo::init_opts(dir.path(), &options).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        let repo = Git2Repository::from_git2(repo).unwrap();
        (dir, repo)
    }

    const STAGE_ALL: CommitOptions = CommitOptions {
        stage_all: true,
        allow_empty: false,
    };

    #[test]
    fn test_commit_stages_everything() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("README.md"), "hello\n").unwrap();

        let hash = repo.commit("chore: release 0.1.0", STAGE_ALL).unwrap();

        let raw = Git2Repo::open(dir.path()).unwrap();
        let head = raw.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.id().to_string(), hash);
        assert_eq!(head.message(), Some("chore: release 0.1.0"));
        assert!(head.tree().unwrap().get_name("README.md").is_some());
    }

    #[test]
    fn test_commit_refuses_empty_unless_allowed() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.commit("first", STAGE_ALL).unwrap();

        let err = repo.commit("second", STAGE_ALL).unwrap_err();
        assert!(err.to_string().contains("nothing to commit"));

        let allow = CommitOptions {
            stage_all: true,
            allow_empty: true,
        };
        assert!(repo.commit("second", allow).is_ok());
    }

    #[test]
    fn test_commit_without_staging_ignores_worktree() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.commit("first", STAGE_ALL).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let no_stage = CommitOptions {
            stage_all: false,
            allow_empty: false,
        };
        assert!(repo.commit("second", no_stage).is_err());
    }

    #[test]
    fn test_annotated_tag_and_listing() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.commit("first", STAGE_ALL).unwrap();

        repo.create_annotated_tag("1.0.0", "Release Tag 1.0.0").unwrap();
        assert_eq!(repo.list_tags().unwrap(), vec!["1.0.0".to_string()]);

        let raw = Git2Repo::open(dir.path()).unwrap();
        let reference = raw.find_reference("refs/tags/1.0.0").unwrap();
        let tag = reference.peel_to_tag().unwrap();
        assert_eq!(tag.message(), Some("Release Tag 1.0.0"));

        let err = repo.create_annotated_tag("1.0.0", "again").unwrap_err();
        assert!(err.to_string().contains("cannot create tag '1.0.0'"));
    }

    #[test]
    fn test_current_branch() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.commit("first", STAGE_ALL).unwrap();

        assert_eq!(repo.current_branch().unwrap(), "main");
    }

    #[test]
    fn test_current_branch_before_first_commit() {
        let (_dir, repo) = init_repo();
        assert_eq!(repo.current_branch().unwrap(), "main");
        assert!(repo.commits_since(None).unwrap().is_empty());
    }

    #[test]
    fn test_current_branch_detached_head_fails() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let hash = repo.commit("first", STAGE_ALL).unwrap();

        let raw = Git2Repo::open(dir.path()).unwrap();
        raw.set_head_detached(git2::Oid::from_str(&hash).unwrap())
            .unwrap();
        assert!(repo.current_branch().is_err());
    }

    #[test]
    fn test_commits_since_tag() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.commit("first", STAGE_ALL).unwrap();
        repo.create_annotated_tag("1.0.0", "Release Tag 1.0.0").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        repo.commit("feat: second\n\nwith a body", STAGE_ALL).unwrap();
        fs::write(dir.path().join("c.txt"), "c").unwrap();
        repo.commit("fix: third", STAGE_ALL).unwrap();

        let since_tag = repo.commits_since(Some("1.0.0")).unwrap();
        let messages: Vec<&str> = since_tag.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["fix: third", "feat: second\n\nwith a body"]);
        assert_eq!(since_tag[0].author_name, "Test User");
        assert_eq!(since_tag[0].author_email, "test@example.com");
        assert_eq!(since_tag[0].hash.len(), 40);

        assert_eq!(repo.commits_since(None).unwrap().len(), 3);
        assert!(repo.commits_since(Some("9.9.9")).is_err());
    }

    #[test]
    fn test_push_to_missing_remote_fails() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        repo.commit("first", STAGE_ALL).unwrap();

        let err = repo
            .push("nowhere", &["HEAD".to_string()], &[])
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
