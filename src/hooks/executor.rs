use std::collections::BTreeSet;
use std::process::{Command, Stdio};

use crate::domain::Template;
use crate::error::{ReleaseError, Result};
use crate::hooks::{HookContext, LifecycleEvent};

/// Which hooks were switched off on the command line.
///
/// Built once at startup from `--no-hooks` and `--no-hook=a,b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookFilter {
    pub disable_all: bool,
    pub excluded: BTreeSet<LifecycleEvent>,
}

impl HookFilter {
    /// Build a filter, returning the names in `no_hook` that match no event
    pub fn new<S: AsRef<str>>(disable_all: bool, no_hook: &[S]) -> (Self, Vec<String>) {
        let mut excluded = BTreeSet::new();
        let mut unknown = Vec::new();

        let names = no_hook
            .iter()
            .flat_map(|entry| entry.as_ref().split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty());

        for name in names {
            match name.parse::<LifecycleEvent>() {
                Ok(event) => {
                    excluded.insert(event);
                }
                Err(_) => unknown.push(name.to_string()),
            }
        }

        (
            HookFilter {
                disable_all,
                excluded,
            },
            unknown,
        )
    }

    pub fn allows(&self, event: LifecycleEvent) -> bool {
        !self.disable_all && !self.excluded.contains(&event)
    }
}

/// A user-configured shell command bound to a lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    pub command: String,
    pub event: LifecycleEvent,
    pub enabled: bool,
}

impl Hook {
    pub fn new(command: impl Into<String>, event: LifecycleEvent, filter: &HookFilter) -> Self {
        Hook {
            command: command.into(),
            event,
            enabled: filter.allows(event),
        }
    }

    pub fn should_run(&self) -> bool {
        self.enabled
    }

    /// The command line with `{version}` filled in when a version is known
    pub fn resolved_command(&self, context: &HookContext) -> String {
        match &context.version {
            Some(version) => Template::new(self.command.as_str()).render(version),
            None => self.command.clone(),
        }
    }

    /// Execute the hook through the platform shell
    ///
    /// Output is inherited so the user sees it as it is produced. Any
    /// non-zero exit code is returned as a hook failure.
    pub fn run(&self, context: &HookContext) -> Result<()> {
        let command_line = self.resolved_command(context);
        tracing::debug!(event = %self.event, command = %command_line, "running hook");

        let mut cmd = shell_command(&command_line);
        cmd.current_dir(&context.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        for (key, value) in context.to_env_vars() {
            cmd.env(key, value);
        }

        let status = cmd
            .status()
            .map_err(|e| ReleaseError::hook(&command_line, format!("cannot spawn: {}", e)))?;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("exited with code {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(ReleaseError::hook(command_line, reason));
        }

        Ok(())
    }
}

#[cfg(not(windows))]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command_line);
    cmd
}
