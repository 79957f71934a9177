use crate::actions::{run_step, Action, ActionOutcome, Step};
use crate::context::ReleaseContext;
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::git::Repository;
use crate::hooks::LifecycleEvent;
use crate::version_manager::VersionManager;

/// Pushes the current branch, and the release tag when one was created
pub struct Pushing {
    /// Tag created by the tag step, if it ran
    pub tag: Option<String>,
}

impl Pushing {
    pub fn new(tag: Option<String>) -> Self {
        Pushing { tag }
    }
}

impl Action for Pushing {
    fn name(&self) -> &'static str {
        "push"
    }

    fn run(
        &self,
        ctx: &mut ReleaseContext,
        repository: &dyn Repository,
        _manager: &VersionManager,
        _version: &SemanticVersion,
    ) -> Result<ActionOutcome> {
        let section = ctx.config.push.clone();

        let (remote, arguments, refspecs, what) = match &section {
            Some(push) => {
                let branch = repository.current_branch()?;
                let mut refspecs = vec![branch.clone()];
                let mut what = format!("`{}`", branch);
                if let Some(tag) = &self.tag {
                    refspecs.push(format!("refs/tags/{}", tag));
                    what.push_str(&format!(" and tag `{}`", tag));
                }
                (push.remote.clone(), push.argument_list(), refspecs, what)
            }
            None => (String::new(), Vec::new(), Vec::new(), String::new()),
        };

        let step = Step {
            name: self.name(),
            before: LifecycleEvent::BeforePush,
            after: LifecycleEvent::AfterPush,
            enabled: section.is_some(),
            question: format!("Push {} to `{}`", what, remote),
            report: format!("Pushed {} to `{}`", what, remote),
        };

        run_step(ctx, step, || repository.push(&remote, &refspecs, &arguments))
    }
}
