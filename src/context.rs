use std::path::PathBuf;

use crate::config::Config;
use crate::domain::SemanticVersion;
use crate::hooks::{EventBus, HookContext, HookFilter, LifecycleEvent};
use crate::ui::Console;

/// Everything shared by the steps of one release run.
///
/// Built once at startup and passed by reference into each step.
pub struct ReleaseContext {
    pub config: Config,
    pub console: Console,
    pub events: EventBus,
    pub workdir: PathBuf,
    pub dry_run: bool,
    /// Set once the target version has been determined
    pub version: Option<SemanticVersion>,
}

impl ReleaseContext {
    pub fn new(
        config: Config,
        console: Console,
        filter: &HookFilter,
        workdir: impl Into<PathBuf>,
        dry_run: bool,
    ) -> Self {
        let events = EventBus::from_config(&config.hooks, filter);
        ReleaseContext {
            config,
            console,
            events,
            workdir: workdir.into(),
            dry_run,
            version: None,
        }
    }

    pub fn hook_context(&self, event: LifecycleEvent) -> HookContext {
        HookContext {
            event,
            workdir: self.workdir.clone(),
            version: self.version.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Emit `event` to the hooks registered for it
    pub fn emit(&mut self, event: LifecycleEvent) -> usize {
        let context = self.hook_context(event);
        self.events.emit(event, &context, &mut self.console)
    }
}
