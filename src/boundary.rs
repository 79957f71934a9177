use std::fmt;

use crate::hooks::LifecycleEvent;

/// Non-fatal issues met during a release that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A configured hook exited unsuccessfully; the pipeline continues
    HookFailed {
        event: LifecycleEvent,
        command: String,
        reason: String,
    },
    /// `--no-hook` named something that is not a lifecycle event
    UnknownHookName { name: String },
    /// Hooks were configured for an event the pipeline never emits
    NeverEmitted {
        event: LifecycleEvent,
        count: usize,
    },
    /// A pipeline step was skipped because its section is `false`
    StepDisabled { step: &'static str },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::HookFailed {
                event,
                command,
                reason,
            } => write!(f, "{} hook `{}` {}", event, command, reason),
            BoundaryWarning::UnknownHookName { name } => {
                write!(f, "Ignoring unknown hook name '{}' in --no-hook", name)
            }
            BoundaryWarning::NeverEmitted { event, count } => write!(
                f,
                "{} hook(s) configured for '{}' will not run: no release step emits it",
                count, event
            ),
            BoundaryWarning::StepDisabled { step } => {
                write!(f, "Skipping {}: disabled in configuration", step)
            }
        }
    }
}
