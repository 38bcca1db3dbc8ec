pub mod clean;
pub mod clean_branches;
pub mod common;
pub mod completion;
pub mod config;
pub mod create;
pub mod current_branch;
pub mod jump;
pub mod passthrough;
pub mod pr;
pub mod remove;
