pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use core::cleanup::{CleanupOptions, CleanupOutcome, CleanupPolicy, SummaryReporter};
pub use core::git::{GitService, VersionControl};
pub use utils::{Result, WtreeError};
