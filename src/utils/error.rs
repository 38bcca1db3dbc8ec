use thiserror::Error;

#[derive(Error, Debug)]
pub enum WtreeError {
    #[error("{message}")]
    InvalidArgs { message: String },

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Not a git repository: {path}")]
    NotARepository { path: String },

    #[error("Invalid {label}: {reason}")]
    Validation { label: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Repository state error: {message}")]
    RepoState { message: String },

    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    #[error("Cannot access directory: {path}")]
    DirectoryAccess { path: String },

    #[error("Refusing: {message}")]
    PolicyRefusal { message: String },

    #[error("Interactive selection unavailable: {message}")]
    SelectorUnavailable { message: String },

    #[error("{message}")]
    NothingSelected { message: String },

    #[error("Interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WtreeError>;

impl WtreeError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs {
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn not_a_repository(path: impl Into<String>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    pub fn validation(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            label: label.into(),
            reason: reason.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn repo_state(message: impl Into<String>) -> Self {
        Self::RepoState {
            message: message.into(),
        }
    }

    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    pub fn directory_access(path: impl Into<String>) -> Self {
        Self::DirectoryAccess { path: path.into() }
    }

    pub fn policy_refusal(message: impl Into<String>) -> Self {
        Self::PolicyRefusal {
            message: message.into(),
        }
    }

    pub fn selector_unavailable(message: impl Into<String>) -> Self {
        Self::SelectorUnavailable {
            message: message.into(),
        }
    }

    pub fn nothing_selected(message: impl Into<String>) -> Self {
        Self::NothingSelected {
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    ///
    /// Usage and input problems are 1, failures of git itself are 2, safety
    /// refusals the user can override with `--force` are 3.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgs { .. }
            | Self::NotFound { .. }
            | Self::NotARepository { .. }
            | Self::Validation { .. }
            | Self::Config { .. }
            | Self::SelectorUnavailable { .. }
            | Self::Json(_) => 1,
            Self::RepoState { .. }
            | Self::GitOperation { .. }
            | Self::DirectoryAccess { .. }
            | Self::NothingSelected { .. }
            | Self::Io(_) => 2,
            Self::PolicyRefusal { .. } => 3,
            Self::Interrupted => 130,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation_helpers() {
        let git_err = WtreeError::git_operation("worktree add failed");
        assert!(matches!(git_err, WtreeError::GitOperation { .. }));
        assert_eq!(
            git_err.to_string(),
            "Git operation failed: worktree add failed"
        );

        let validation = WtreeError::validation("worktree path", "contains '..'");
        assert_eq!(
            validation.to_string(),
            "Invalid worktree path: contains '..'"
        );

        let refusal = WtreeError::policy_refusal("feature has unmerged commits");
        assert_eq!(refusal.to_string(), "Refusing: feature has unmerged commits");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(WtreeError::invalid_args("x").exit_code(), 1);
        assert_eq!(WtreeError::not_found("/x").exit_code(), 1);
        assert_eq!(WtreeError::not_a_repository("/x").exit_code(), 1);
        assert_eq!(WtreeError::validation("path", "bad").exit_code(), 1);
        assert_eq!(WtreeError::repo_state("x").exit_code(), 2);
        assert_eq!(WtreeError::git_operation("x").exit_code(), 2);
        assert_eq!(WtreeError::directory_access("/x").exit_code(), 2);
        assert_eq!(WtreeError::nothing_selected("x").exit_code(), 2);
        assert_eq!(WtreeError::policy_refusal("x").exit_code(), 3);
        assert_eq!(WtreeError::Interrupted.exit_code(), 130);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WtreeError = io_err.into();
        assert!(matches!(err, WtreeError::Io(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
