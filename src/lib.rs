pub mod actions;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod logging;
pub mod release_notes;
pub mod ui;
pub mod version_manager;

pub use error::{ReleaseError, Result};
