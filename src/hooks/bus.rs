use std::collections::HashMap;

use crate::boundary::BoundaryWarning;
use crate::config::HooksConfig;
use crate::error::ReleaseError;
use crate::hooks::{Hook, HookContext, HookFilter, LifecycleEvent};
use crate::ui::Console;

/// Registry of hooks per lifecycle event for one release run
#[derive(Debug, Default)]
pub struct EventBus {
    hooks: HashMap<LifecycleEvent, Vec<Hook>>,
    history: Vec<LifecycleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one hook per configured command, in declaration order
    pub fn from_config(hooks: &HooksConfig, filter: &HookFilter) -> Self {
        let mut bus = EventBus::new();
        for (event, commands) in hooks {
            for command in commands.commands() {
                bus.on(*event, Hook::new(command, *event, filter));
            }
        }
        bus
    }

    pub fn on(&mut self, event: LifecycleEvent, hook: Hook) {
        self.hooks.entry(event).or_default().push(hook);
    }

    pub fn hooks_for(&self, event: LifecycleEvent) -> &[Hook] {
        self.hooks.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Events emitted so far, in emission order
    pub fn history(&self) -> &[LifecycleEvent] {
        &self.history
    }

    /// Run every enabled hook registered for `event`, in registration order.
    ///
    /// Hook failures are reported on the console and never stop the
    /// remaining hooks. Returns how many hooks were executed.
    pub fn emit(&mut self, event: LifecycleEvent, context: &HookContext, console: &mut Console) -> usize {
        self.history.push(event);
        tracing::debug!(%event, "emitting lifecycle event");

        let mut executed = 0;
        for hook in self.hooks_for(event).iter().filter(|hook| hook.should_run()) {
            console.status(&format!("Running {} hook `{}`", event, hook.resolved_command(context)));
            executed += 1;

            match hook.run(context) {
                Ok(()) => {}
                Err(ReleaseError::HookExecution { command, reason }) => {
                    tracing::warn!(%event, %command, %reason, "hook failed");
                    console.boundary_warning(&BoundaryWarning::HookFailed {
                        event,
                        command,
                        reason,
                    });
                }
                Err(other) => {
                    tracing::warn!(%event, error = %other, "hook failed");
                    console.warn(&other.to_string());
                }
            }
        }

        executed
    }
}
