use crate::config::Config;
use crate::domain::{SemanticVersion, Template};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::ui::Console;

/// Choice label that asks for a hand-typed version
pub const CUSTOM_CHOICE: &str = "custom";

/// Computes candidate versions from the latest tag and renders the
/// configured commit and tag templates.
#[derive(Debug, Clone)]
pub struct VersionManager {
    current: SemanticVersion,
    latest_tag: Option<String>,
    commit_message: Template,
    tag_name: Template,
    tag_message: Template,
}

impl VersionManager {
    pub fn new(current: SemanticVersion, config: &Config) -> Self {
        let commit = config.commit_or_default();
        let tag = config.tag_or_default();

        VersionManager {
            current,
            latest_tag: None,
            commit_message: Template::new(commit.message),
            tag_name: Template::new(tag.name),
            tag_message: Template::new(tag.message),
        }
    }

    /// Start from the greatest version tagged in `repository`, or `0.0.0`
    pub fn from_repository(repository: &dyn Repository, config: &Config) -> Result<Self> {
        let tags = repository.list_tags()?;
        let tag_template = Template::new(config.tag_or_default().name);

        let manager = match latest_tag(&tags, &tag_template) {
            Some((tag, current)) => {
                let mut manager = VersionManager::new(current, config);
                manager.latest_tag = Some(tag.to_string());
                manager
            }
            None => VersionManager::new(SemanticVersion::zero(), config),
        };
        tracing::debug!(current = %manager.current, tag = ?manager.latest_tag, "resolved current version");

        Ok(manager)
    }

    pub fn current(&self) -> &SemanticVersion {
        &self.current
    }

    /// Name of the tag the current version was read from
    pub fn latest_tag(&self) -> Option<&str> {
        self.latest_tag.as_deref()
    }

    pub fn next_major(&self) -> Result<SemanticVersion> {
        self.current.next_major()
    }

    pub fn next_minor(&self) -> Result<SemanticVersion> {
        self.current.next_minor()
    }

    pub fn next_patch(&self) -> Result<SemanticVersion> {
        self.current.next_patch()
    }

    pub fn next_release_candidate(&self) -> Result<SemanticVersion> {
        self.current.next_release_candidate()
    }

    /// Labels offered by the interactive version prompt, `custom` last
    pub fn choices(&self) -> Result<Vec<String>> {
        Ok(vec![
            format!("major ({})", self.next_major()?),
            format!("minor ({})", self.next_minor()?),
            format!("patch ({})", self.next_patch()?),
            format!("release candidate ({})", self.next_release_candidate()?),
            CUSTOM_CHOICE.to_string(),
        ])
    }

    /// Index of the default entry in [`Self::choices`]
    pub const DEFAULT_CHOICE: usize = 1;

    /// Map a label from [`Self::choices`] back to a version.
    ///
    /// `custom` asks `console` for a version and parses it strictly.
    pub fn from_console_input(&self, selection: &str, console: &mut Console) -> Result<SemanticVersion> {
        let selection = selection.trim();
        let label = selection
            .split_once(" (")
            .map(|(label, _)| label)
            .unwrap_or(selection);

        match label {
            "major" => self.next_major(),
            "minor" => self.next_minor(),
            "patch" => self.next_patch(),
            "release candidate" => self.next_release_candidate(),
            CUSTOM_CHOICE => {
                let raw = console.ask("Custom version")?;
                self.parse_custom(&raw)
            }
            _ => Err(ReleaseError::invalid_version(selection)),
        }
    }

    /// Parse a user-supplied version strictly
    pub fn parse_custom(&self, raw: &str) -> Result<SemanticVersion> {
        SemanticVersion::parse(raw.trim())
    }

    pub fn commit_message(&self, version: &SemanticVersion) -> String {
        self.commit_message.render(version)
    }

    pub fn tag_name(&self, version: &SemanticVersion) -> String {
        self.tag_name.render(version)
    }

    pub fn tag_message(&self, version: &SemanticVersion) -> String {
        self.tag_message.render(version)
    }
}

/// Tag holding the greatest version among `tags`, with that version.
///
/// A tag is read through the tag-name template first, then as a bare
/// version with an optional `v` prefix. Tags that do not parse, or whose
/// version cannot be incremented, are skipped.
pub fn latest_tag<'a, S: AsRef<str>>(
    tags: &'a [S],
    tag_template: &Template,
) -> Option<(&'a str, SemanticVersion)> {
    tags.iter()
        .filter_map(|tag| {
            let tag = tag.as_ref();
            let parsed = tag_template
                .extract(tag)
                .and_then(|version| SemanticVersion::parse(version).ok())
                .or_else(|| SemanticVersion::parse_tag(tag).ok());
            match parsed {
                Some(version) if version.can_advance() => Some((tag, version)),
                Some(_) => {
                    tracing::debug!(tag, "skipping tag whose version cannot be incremented");
                    None
                }
                None => {
                    tracing::debug!(tag, "skipping tag that is not a version");
                    None
                }
            }
        })
        .max_by(|a, b| a.1.cmp(&b.1))
}
