//! Lifecycle hooks
//!
//! Users bind shell commands to fixed points of the release pipeline:
//! - beforeAll / afterAll: around the whole run
//! - beforeRelease / afterRelease: around version selection
//! - before/after Commit, Tag and Push: around each git step

pub mod bus;
pub mod executor;
pub mod lifecycle;

pub use bus::EventBus;
pub use executor::{Hook, HookFilter};
pub use lifecycle::{HookContext, LifecycleEvent};
