//! Main release workflow orchestration logic
//!
//! Runs the fixed pipeline:
//! beforeAll → verify repository → beforeRelease → determine version →
//! release notes → commit → tag → push → summary → afterAll.
//! The first fatal error stops the run; earlier steps are not undone.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::actions::{Action, ActionOutcome, Committing, Pushing, Tagging};
use crate::boundary::BoundaryWarning;
use crate::context::ReleaseContext;
use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::hooks::LifecycleEvent;
use crate::release_notes;
use crate::version_manager::VersionManager;

/// Explicit version selection from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    Major,
    Minor,
    Patch,
    /// `--custom`, with the version if one was given
    Custom(Option<String>),
}

impl VersionSelector {
    /// First selector set, checked in the order major, minor, patch, custom
    pub fn from_flags(major: bool, minor: bool, patch: bool, custom: Option<Option<String>>) -> Option<Self> {
        if major {
            Some(VersionSelector::Major)
        } else if minor {
            Some(VersionSelector::Minor)
        } else if patch {
            Some(VersionSelector::Patch)
        } else {
            custom.map(VersionSelector::Custom)
        }
    }
}

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseArgs {
    /// Version choice; `None` prompts interactively
    pub selector: Option<VersionSelector>,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub version: SemanticVersion,
    pub commit: ActionOutcome,
    pub tag: ActionOutcome,
    pub push: ActionOutcome,
    /// Notes for the commits since the previous release; `None` when disabled
    pub notes: Option<String>,
    /// Lifecycle events in the order they were emitted
    pub events: Vec<LifecycleEvent>,
    pub elapsed: Duration,
}

/// Fails with `NotAGitRepository` unless `workdir` holds repository metadata
pub fn verify_repository(workdir: &Path) -> Result<()> {
    if workdir.join(".git").exists() {
        Ok(())
    } else {
        Err(ReleaseError::NotAGitRepository(workdir.to_path_buf()))
    }
}

/// Pick the release version from the selector, or ask the user
pub fn determine_version(
    args: &ReleaseArgs,
    ctx: &mut ReleaseContext,
    manager: &VersionManager,
) -> Result<SemanticVersion> {
    match &args.selector {
        Some(VersionSelector::Major) => manager.next_major(),
        Some(VersionSelector::Minor) => manager.next_minor(),
        Some(VersionSelector::Patch) => manager.next_patch(),
        Some(VersionSelector::Custom(Some(raw))) => manager.parse_custom(raw),
        Some(VersionSelector::Custom(None)) => {
            let raw = ctx.console.ask("Custom version")?;
            manager.parse_custom(&raw)
        }
        None => {
            let choices = manager.choices()?;
            let selection = ctx.console.choice(
                "Choose the version",
                &choices,
                VersionManager::DEFAULT_CHOICE,
            )?;
            manager.from_console_input(&selection, &mut ctx.console)
        }
    }
}

fn warn_unreachable_hooks(ctx: &mut ReleaseContext) {
    let count = ctx
        .events
        .hooks_for(LifecycleEvent::AfterRelease)
        .len();
    if count > 0 {
        ctx.console.boundary_warning(&BoundaryWarning::NeverEmitted {
            event: LifecycleEvent::AfterRelease,
            count,
        });
    }
}

/// Print the released version with its notes, or only the version when quiet
fn print_summary(ctx: &mut ReleaseContext, version: &SemanticVersion, notes: Option<&str>, elapsed: Duration) {
    if ctx.console.is_quiet() {
        ctx.console.result(&version.to_string());
        return;
    }

    ctx.console.line("");
    ctx.console.line(&format!("Release {}", version));
    if let Some(notes) = notes.filter(|notes| !notes.is_empty()) {
        ctx.console.line("");
        for line in notes.lines() {
            ctx.console.line(line);
        }
    }
    ctx.console.line("");
    ctx.console
        .line(&crate::ui::formatter::format_elapsed(elapsed.as_secs_f64()));
}

/// Main release workflow
///
/// `open_repository` is called with the working directory once it has been
/// verified to contain a repository.
pub fn run_release<F>(
    args: &ReleaseArgs,
    ctx: &mut ReleaseContext,
    open_repository: F,
) -> Result<ReleaseReport>
where
    F: FnOnce(&Path) -> Result<Box<dyn Repository>>,
{
    let started = Instant::now();

    if ctx.dry_run {
        ctx.console.warn("Running in dry-run mode.");
    }
    warn_unreachable_hooks(ctx);

    ctx.emit(LifecycleEvent::BeforeAll);

    verify_repository(&ctx.workdir)?;
    let repository = open_repository(&ctx.workdir)?;

    ctx.emit(LifecycleEvent::BeforeRelease);

    let manager = VersionManager::from_repository(repository.as_ref(), &ctx.config)?;
    let version = determine_version(args, ctx, &manager)?;
    tracing::info!(%version, current = %manager.current(), "release version chosen");
    ctx.version = Some(version.clone());

    let notes = match &ctx.config.release_notes {
        Some(section) => Some(release_notes::build(
            repository.as_ref(),
            manager.latest_tag(),
            &section.commit_format,
        )?),
        None => None,
    };

    let commit = Committing.run(ctx, repository.as_ref(), &manager, &version)?;
    let tag = Tagging.run(ctx, repository.as_ref(), &manager, &version)?;

    let pushed_tag = tag.ran().then(|| manager.tag_name(&version));
    let push = Pushing::new(pushed_tag).run(ctx, repository.as_ref(), &manager, &version)?;

    let elapsed = started.elapsed();
    print_summary(ctx, &version, notes.as_deref(), elapsed);

    ctx.emit(LifecycleEvent::AfterAll);

    if ctx.dry_run {
        ctx.console.line("");
        ctx.console.warn("End dry-run.");
    }

    Ok(ReleaseReport {
        version,
        commit,
        tag,
        push,
        notes,
        events: ctx.events.history().to_vec(),
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::context;
    use crate::config::Config;
    use crate::git::MockRepository;
    use crate::hooks::HookFilter;
    use crate::ui::testing::{scripted, SharedBuffer};
    use tempfile::TempDir;

    /// Run a `--patch` release against `repo` in a directory that looks like a checkout
    fn release(config: Config, quiet: bool, repo: MockRepository) -> (Result<ReleaseReport>, SharedBuffer) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let (console, out) = scripted("");
        let mut ctx = ReleaseContext::new(
            config,
            console.with_quiet(quiet),
            &HookFilter::default(),
            dir.path(),
            false,
        );
        let args = ReleaseArgs {
            selector: Some(VersionSelector::Patch),
        };

        let result = run_release(&args, &mut ctx, move |_| Ok(Box::new(repo) as Box<dyn Repository>));
        (result, out)
    }

    fn tagged_history() -> MockRepository {
        MockRepository::new()
            .with_commit("initial")
            .with_tag("1.0.0")
            .with_commit("feat: add parser")
    }

    #[test]
    fn test_selector_first_match_wins() {
        assert_eq!(
            VersionSelector::from_flags(true, true, true, Some(None)),
            Some(VersionSelector::Major)
        );
        assert_eq!(
            VersionSelector::from_flags(false, true, true, None),
            Some(VersionSelector::Minor)
        );
        assert_eq!(
            VersionSelector::from_flags(false, false, true, Some(Some("9.9.9".into()))),
            Some(VersionSelector::Patch)
        );
        assert_eq!(
            VersionSelector::from_flags(false, false, false, Some(Some("9.9.9".into()))),
            Some(VersionSelector::Custom(Some("9.9.9".into())))
        );
        assert_eq!(VersionSelector::from_flags(false, false, false, None), None);
    }

    #[test]
    fn test_determine_version_from_flags() {
        let config = Config::default();
        let manager = VersionManager::new(SemanticVersion::new(1, 2, 3), &config);
        let (mut ctx, _) = context(config, "", false);

        let cases = [
            (VersionSelector::Major, "2.0.0"),
            (VersionSelector::Minor, "1.3.0"),
            (VersionSelector::Patch, "1.2.4"),
            (VersionSelector::Custom(Some("5.0.0-beta.1".into())), "5.0.0-beta.1"),
        ];
        for (selector, expected) in cases {
            let args = ReleaseArgs {
                selector: Some(selector),
            };
            let version = determine_version(&args, &mut ctx, &manager).unwrap();
            assert_eq!(version.to_string(), expected);
        }
    }

    #[test]
    fn test_determine_version_custom_flag_is_strict() {
        let config = Config::default();
        let manager = VersionManager::new(SemanticVersion::zero(), &config);
        let (mut ctx, _) = context(config, "", false);
        let args = ReleaseArgs {
            selector: Some(VersionSelector::Custom(Some("v1.2".into()))),
        };

        let err = determine_version(&args, &mut ctx, &manager).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidVersionFormat(_)));
    }

    #[test]
    fn test_determine_version_interactive_default_is_minor() {
        let config = Config::default();
        let manager = VersionManager::new(SemanticVersion::new(0, 3, 1), &config);
        let (mut ctx, _) = context(config, "\n", false);

        let version = determine_version(&ReleaseArgs::default(), &mut ctx, &manager).unwrap();
        assert_eq!(version.to_string(), "0.4.0");
    }

    #[test]
    fn test_determine_version_interactive_custom() {
        let config = Config::default();
        let manager = VersionManager::new(SemanticVersion::zero(), &config);
        let (mut ctx, _) = context(config, "5\n3.0.0-rc.2\n", false);

        let version = determine_version(&ReleaseArgs::default(), &mut ctx, &manager).unwrap();
        assert_eq!(version.to_string(), "3.0.0-rc.2");
    }

    #[test]
    fn test_verify_repository() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = verify_repository(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::NotAGitRepository(_)));

        std::fs::create_dir(dir.path().join(".git")).unwrap();
        assert!(verify_repository(dir.path()).is_ok());
    }

    #[test]
    fn test_release_prints_notes_since_latest_tag() {
        let config = Config::from_toml("[releaseNotes]\ncommitFormat = \"- {message}\"").unwrap();
        let (result, out) = release(config, false, tagged_history());

        let report = result.unwrap();
        assert_eq!(report.version.to_string(), "1.0.1");
        assert_eq!(report.notes.as_deref(), Some("- feat: add parser\n"));
        let output = out.contents();
        assert!(output.contains("Release 1.0.1"));
        assert!(output.contains("- feat: add parser"));
        assert!(output.contains("Released in"));
    }

    #[test]
    fn test_first_release_notes() {
        let (result, out) = release(Config::default(), false, MockRepository::new().with_commit("a"));

        assert_eq!(result.unwrap().notes.as_deref(), Some("Initial release.\n"));
        assert!(out.contents().contains("Initial release."));
    }

    #[test]
    fn test_release_notes_can_be_disabled() {
        let config = Config::from_toml("releaseNotes = false").unwrap();
        let (result, _) = release(config, false, tagged_history());
        assert_eq!(result.unwrap().notes, None);
    }

    #[test]
    fn test_quiet_release_prints_only_the_version() {
        let (result, out) = release(Config::default(), true, tagged_history());

        assert!(result.is_ok());
        let output = out.contents();
        assert!(!output.contains("Release 1.0.1"));
        assert!(!output.contains("Committed"));
        assert!(!output.contains("Released in"));
        assert_eq!(output.lines().last(), Some("1.0.1"));
    }
}
