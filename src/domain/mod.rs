//! Domain logic - pure release rules independent of git operations

pub mod template;
pub mod version;

pub use template::{Template, VERSION_PLACEHOLDER};
pub use version::SemanticVersion;
