//! The three git steps of a release: commit, tag and push.
//!
//! Every step follows the same shape: skip when its section is disabled,
//! confirm with the user, emit `before<Step>`, mutate the repository unless
//! running dry, report, emit `after<Step>`.

pub mod commit;
pub mod push;
pub mod tag;

pub use commit::Committing;
pub use push::Pushing;
pub use tag::Tagging;

use crate::boundary::BoundaryWarning;
use crate::context::ReleaseContext;
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::git::Repository;
use crate::hooks::LifecycleEvent;
use crate::version_manager::VersionManager;

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The repository was changed
    Performed,
    /// Dry run: everything but the repository change happened
    Simulated,
    /// The user answered no
    Declined,
    /// The configuration section is `false`
    Disabled,
}

impl ActionOutcome {
    /// Whether the step went through, for real or simulated
    pub fn ran(&self) -> bool {
        matches!(self, ActionOutcome::Performed | ActionOutcome::Simulated)
    }
}

/// One step of the release pipeline
pub trait Action {
    fn name(&self) -> &'static str;

    fn run(
        &self,
        ctx: &mut ReleaseContext,
        repository: &dyn Repository,
        manager: &VersionManager,
        version: &SemanticVersion,
    ) -> Result<ActionOutcome>;
}

/// Description of a step for [`run_step`]
pub(crate) struct Step {
    pub name: &'static str,
    pub before: LifecycleEvent,
    pub after: LifecycleEvent,
    pub enabled: bool,
    pub question: String,
    pub report: String,
}

pub(crate) fn run_step<F>(ctx: &mut ReleaseContext, step: Step, perform: F) -> Result<ActionOutcome>
where
    F: FnOnce() -> Result<()>,
{
    if !step.enabled {
        ctx.console
            .boundary_warning(&BoundaryWarning::StepDisabled { step: step.name });
        return Ok(skip(ctx, &step, ActionOutcome::Disabled));
    }

    if !ctx.console.confirm(&step.question, true)? {
        ctx.console.status(&format!("Skipped {}", step.name));
        return Ok(skip(ctx, &step, ActionOutcome::Declined));
    }

    ctx.emit(step.before);

    let outcome = if ctx.dry_run {
        tracing::info!(step = step.name, "dry run, repository left untouched");
        ActionOutcome::Simulated
    } else {
        perform()?;
        ActionOutcome::Performed
    };

    if outcome == ActionOutcome::Simulated {
        ctx.console.success(&format!("[dry-run] {}", step.report));
    } else {
        ctx.console.success(&step.report);
    }

    ctx.emit(step.after);
    Ok(outcome)
}

fn skip(ctx: &mut ReleaseContext, step: &Step, outcome: ActionOutcome) -> ActionOutcome {
    if ctx.config.fire_skipped_hooks {
        ctx.emit(step.before);
        ctx.emit(step.after);
    }
    outcome
}
