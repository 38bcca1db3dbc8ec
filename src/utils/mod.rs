pub mod error;
pub mod interrupt;
pub mod names;
pub mod path;

pub use error::{Result, WtreeError};
pub use names::{parse_pr_number, validate_worktree_name};
pub use path::PathValidator;
