use crate::actions::{run_step, Action, ActionOutcome, Step};
use crate::context::ReleaseContext;
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::git::Repository;
use crate::hooks::LifecycleEvent;
use crate::version_manager::VersionManager;

/// Creates the annotated release tag at HEAD
pub struct Tagging;

impl Action for Tagging {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn run(
        &self,
        ctx: &mut ReleaseContext,
        repository: &dyn Repository,
        manager: &VersionManager,
        version: &SemanticVersion,
    ) -> Result<ActionOutcome> {
        let name = manager.tag_name(version);
        let message = manager.tag_message(version);

        let step = Step {
            name: self.name(),
            before: LifecycleEvent::BeforeTag,
            after: LifecycleEvent::AfterTag,
            enabled: ctx.config.tag.is_some(),
            question: format!("Tag `{}`", name),
            report: format!("Tagged `{}`", name),
        };

        run_step(ctx, step, || repository.create_annotated_tag(&name, &message))
    }
}
