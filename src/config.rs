use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};
use crate::hooks::LifecycleEvent;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Contents written by `--init`
pub const DEFAULT_CONFIG: &str = r#"# release-that configuration
#
# Every section can be disabled by setting it to `false`, e.g. `push = false`.

[commit]
message = "chore: release {version}"
empty = false
stageAll = true

[push]
remote = "origin"
arguments = ""

[tag]
name = "{version}"
message = "Release Tag {version}"

# Printed after the release. Placeholders: {hash}, {longHash}, {message},
# {author.name} and {author.email}.
[releaseNotes]
commitFormat = "* {hash} {message}"

[hooks]
# beforeAll = "cargo test"
# afterTag = ["echo tagged {version}"]
"#;

/// Represents the complete configuration for a release run.
///
/// A section set to `None` was disabled with `false` in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub commit: Option<CommitConfig>,
    pub push: Option<PushConfig>,
    pub tag: Option<TagConfig>,
    pub release_notes: Option<ReleaseNotesConfig>,
    pub hooks: HooksConfig,
    pub fire_skipped_hooks: bool,
}

/// Commit step settings
#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CommitConfig {
    pub message: String,
    pub empty: bool,
    pub stage_all: bool,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            message: "chore: release {version}".to_string(),
            empty: false,
            stage_all: true,
        }
    }
}

/// Push step settings
#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PushConfig {
    pub remote: String,
    pub arguments: String,
}

impl PushConfig {
    /// Extra `git push` arguments, split on whitespace
    pub fn argument_list(&self) -> Vec<String> {
        self.arguments
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        PushConfig {
            remote: "origin".to_string(),
            arguments: String::new(),
        }
    }
}

/// Tag step settings
#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TagConfig {
    pub name: String,
    pub message: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            name: "{version}".to_string(),
            message: "Release Tag {version}".to_string(),
        }
    }
}

/// Release notes printed at the end of a run
#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ReleaseNotesConfig {
    /// Line written for each commit since the previous release
    pub commit_format: String,
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        ReleaseNotesConfig {
            commit_format: "* {hash} {message}".to_string(),
        }
    }
}

/// One or many shell commands configured for an event
#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum HookCommands {
    One(String),
    Many(Vec<String>),
}

impl HookCommands {
    /// Commands in declaration order, blank entries dropped
    pub fn commands(&self) -> Vec<&str> {
        let all: Vec<&str> = match self {
            HookCommands::One(command) => vec![command.as_str()],
            HookCommands::Many(commands) => commands.iter().map(String::as_str).collect(),
        };
        all.into_iter().filter(|c| !c.trim().is_empty()).collect()
    }
}

/// Hook commands keyed by lifecycle event
pub type HooksConfig = BTreeMap<LifecycleEvent, HookCommands>;

impl Default for Config {
    fn default() -> Self {
        Config {
            commit: Some(CommitConfig::default()),
            push: Some(PushConfig::default()),
            tag: Some(TagConfig::default()),
            release_notes: Some(ReleaseNotesConfig::default()),
            hooks: HooksConfig::new(),
            fire_skipped_hooks: false,
        }
    }
}

/// The document as written. Sections stay raw until their shape
/// (table, boolean toggle, or array for `push`) is known.
#[derive(serde::Deserialize, Default)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
struct RawConfig {
    commit: Option<toml::Value>,
    push: Option<toml::Value>,
    tag: Option<toml::Value>,
    release_notes: Option<toml::Value>,
    hooks: Option<toml::Value>,
    fire_skipped_hooks: bool,
}

/// Resolve one section: missing or `true` gives the defaults, `false`
/// disables it, a table is read field by field.
fn section<T: DeserializeOwned + Default>(
    raw: Option<toml::Value>,
    name: &str,
    allow_list: bool,
) -> Result<Option<T>> {
    match raw {
        None | Some(toml::Value::Boolean(true)) => Ok(Some(T::default())),
        Some(toml::Value::Boolean(false)) => Ok(None),
        Some(toml::Value::Array(_)) if allow_list => Ok(Some(T::default())),
        Some(table @ toml::Value::Table(_)) => table
            .try_into()
            .map(Some)
            .map_err(|e| ReleaseError::config(format!("section `{}`: {}", name, e))),
        Some(other) => Err(ReleaseError::config(format!(
            "section `{}` must be a table or `false`, found {}",
            name,
            other.type_str()
        ))),
    }
}

impl Config {
    fn from_raw(raw: RawConfig) -> Result<Self> {
        let hooks = match raw.hooks {
            None | Some(toml::Value::Boolean(_)) => HooksConfig::new(),
            Some(table @ toml::Value::Table(_)) => {
                let events: HooksConfig = table
                    .try_into()
                    .map_err(|e| ReleaseError::config(format!("section `hooks`: {}", e)))?;
                events
            }
            Some(other) => {
                return Err(ReleaseError::config(format!(
                    "section `hooks` must be a table or `false`, found {}",
                    other.type_str()
                )))
            }
        };

        Ok(Config {
            commit: section(raw.commit, "commit", false)?,
            push: section(raw.push, "push", true)?,
            tag: section(raw.tag, "tag", false)?,
            release_notes: section(raw.release_notes, "releaseNotes", false)?,
            hooks,
            fire_skipped_hooks: raw.fire_skipped_hooks,
        })
    }

    /// Parse a configuration document
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = parse_document(content)?;
        Config::from_raw(raw)
    }

    /// Commit settings, falling back to defaults when the section is disabled
    pub fn commit_or_default(&self) -> CommitConfig {
        self.commit.clone().unwrap_or_default()
    }

    /// Tag settings, falling back to defaults when the section is disabled
    pub fn tag_or_default(&self) -> TagConfig {
        self.tag.clone().unwrap_or_default()
    }

    /// Hook commands configured for a single event
    pub fn hook_commands(&self, event: LifecycleEvent) -> Vec<&str> {
        self.hooks
            .get(&event)
            .map(HookCommands::commands)
            .unwrap_or_default()
    }
}

fn parse_document<T: DeserializeOwned>(content: &str) -> Result<T> {
    toml::from_str(content).map_err(|e| ReleaseError::config(e.to_string()))
}

/// Resolves which configuration file applies, if any.
///
/// Lookup order:
/// 1. Custom path provided as parameter (relative paths resolve against `workdir`)
/// 2. `release.toml` in the working directory
/// 3. `release-that/release.toml` in the user config directory
pub fn locate_config(config_path: Option<&str>, workdir: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = config_path {
        let path = workdir.join(path);
        if !path.is_file() {
            return Err(ReleaseError::config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    let local = workdir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("release-that").join(CONFIG_FILE_NAME);
        if user.is_file() {
            return Ok(Some(user));
        }
    }

    Ok(None)
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If an explicit path is missing, or a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>, workdir: &Path) -> Result<Config> {
    match locate_config(config_path, workdir)? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let content = fs::read_to_string(&path)?;
            Config::from_toml(&content).map_err(|e| {
                ReleaseError::config(format!("{}: {}", path.display(), e))
            })
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Writes [`DEFAULT_CONFIG`] into `workdir`, refusing to overwrite unless `force` is set.
pub fn write_default_config(workdir: &Path, force: bool) -> Result<PathBuf> {
    let path = workdir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(ReleaseError::config(format!(
            "{} already exists, use --force to overwrite it",
            path.display()
        )));
    }

    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}
