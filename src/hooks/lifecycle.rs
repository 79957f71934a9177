use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::SemanticVersion;

/// Lifecycle points of the release pipeline at which hooks may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    BeforeAll,
    AfterAll,
    BeforeRelease,
    AfterRelease,
    BeforeCommit,
    AfterCommit,
    BeforeTag,
    AfterTag,
    BeforePush,
    AfterPush,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 10] = [
        LifecycleEvent::BeforeAll,
        LifecycleEvent::AfterAll,
        LifecycleEvent::BeforeRelease,
        LifecycleEvent::AfterRelease,
        LifecycleEvent::BeforeCommit,
        LifecycleEvent::AfterCommit,
        LifecycleEvent::BeforeTag,
        LifecycleEvent::AfterTag,
        LifecycleEvent::BeforePush,
        LifecycleEvent::AfterPush,
    ];

    /// Get the event name as written in configuration
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::BeforeAll => "beforeAll",
            LifecycleEvent::AfterAll => "afterAll",
            LifecycleEvent::BeforeRelease => "beforeRelease",
            LifecycleEvent::AfterRelease => "afterRelease",
            LifecycleEvent::BeforeCommit => "beforeCommit",
            LifecycleEvent::AfterCommit => "afterCommit",
            LifecycleEvent::BeforeTag => "beforeTag",
            LifecycleEvent::AfterTag => "afterTag",
            LifecycleEvent::BeforePush => "beforePush",
            LifecycleEvent::AfterPush => "afterPush",
        }
    }
}

impl FromStr for LifecycleEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifecycleEvent::ALL
            .iter()
            .copied()
            .find(|event| event.name() == s)
            .ok_or_else(|| format!("unknown lifecycle event '{}'", s))
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Event being emitted
    pub event: LifecycleEvent,
    /// Directory the hook runs in
    pub workdir: PathBuf,
    /// Version being released, once chosen
    pub version: Option<SemanticVersion>,
    /// Whether git mutations are suppressed
    pub dry_run: bool,
}

impl HookContext {
    /// Convert context to environment variables for the hook command
    ///
    /// Maps context fields to RELEASE_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASE_EVENT".to_string(), self.event.name().to_string());
        env.insert(
            "RELEASE_DRY_RUN".to_string(),
            if self.dry_run { "1" } else { "0" }.to_string(),
        );

        if let Some(ref version) = self.version {
            env.insert("RELEASE_VERSION".to_string(), version.to_string());
        }

        env
    }
}
