use crate::actions::{run_step, Action, ActionOutcome, Step};
use crate::context::ReleaseContext;
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::git::{CommitOptions, Repository};
use crate::hooks::LifecycleEvent;
use crate::version_manager::VersionManager;

/// Creates the release commit
pub struct Committing;

impl Action for Committing {
    fn name(&self) -> &'static str {
        "commit"
    }

    fn run(
        &self,
        ctx: &mut ReleaseContext,
        repository: &dyn Repository,
        manager: &VersionManager,
        version: &SemanticVersion,
    ) -> Result<ActionOutcome> {
        let section = ctx.config.commit.clone();
        let message = manager.commit_message(version);
        let options = section
            .as_ref()
            .map(|commit| CommitOptions {
                stage_all: commit.stage_all,
                allow_empty: commit.empty,
            })
            .unwrap_or(CommitOptions {
                stage_all: true,
                allow_empty: false,
            });

        let step = Step {
            name: self.name(),
            before: LifecycleEvent::BeforeCommit,
            after: LifecycleEvent::AfterCommit,
            enabled: section.is_some(),
            question: format!("Commit `{}`", message),
            report: format!("Committed `{}`", message),
        };

        run_step(ctx, step, || {
            let hash = repository.commit(&message, options)?;
            tracing::info!(%hash, "release commit created");
            Ok(())
        })
    }
}
