use crate::utils::error::{Result, WtreeError};
use regex::Regex;
use std::sync::OnceLock;

/// Subset of `git check-ref-format` rules, checked before git ever sees the name
/// so a bad name fails as a usage error instead of a git failure.
const BRANCH_RULES: &[(&str, &str)] = &[
    (r"\.\.", "contains '..'"),
    (r"^-", "starts with '-'"),
    (r"/$", "ends with '/'"),
    (r"\.lock$", "ends with '.lock'"),
    (r"[\x00-\x20\x7f]", "contains whitespace or control characters"),
    (r"[~^:\\*?\[]", "contains one of ~ ^ : \\ * ? ["),
    (r"^@$", "is exactly '@'"),
    (r"(^|/)\.", "has a component starting with '.'"),
    (r"@\{", "contains '@{'"),
    (r"//", "has an empty component"),
];

const MAX_BRANCH_NAME_LEN: usize = 250;

type CompiledRules = Vec<(Regex, &'static str)>;

fn compiled_rules() -> std::result::Result<&'static CompiledRules, &'static regex::Error> {
    static RULES: OnceLock<std::result::Result<CompiledRules, regex::Error>> = OnceLock::new();
    RULES
        .get_or_init(|| {
            BRANCH_RULES
                .iter()
                .map(|(pattern, reason)| Regex::new(pattern).map(|rule| (rule, *reason)))
                .collect()
        })
        .as_ref()
}

pub struct GitValidator;

impl GitValidator {
    pub fn validate_branch_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(WtreeError::invalid_args("Branch name cannot be empty"));
        }

        if name.len() > MAX_BRANCH_NAME_LEN {
            return Err(WtreeError::invalid_args(format!(
                "Branch name is longer than {} characters",
                MAX_BRANCH_NAME_LEN
            )));
        }

        if name.starts_with("refs/") {
            return Err(WtreeError::invalid_args(
                "Branch name cannot start with 'refs/'",
            ));
        }

        let rules =
            compiled_rules().map_err(|e| WtreeError::config_error(format!("Regex error: {}", e)))?;
        for (rule, reason) in rules {
            if rule.is_match(name) {
                return Err(WtreeError::invalid_args(format!(
                    "Invalid branch name '{}': {}",
                    name, reason
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_branch_names() {
        for name in ["valid-branch", "feature/test", "v1.0.0", "pr-42", "user@host"] {
            assert!(
                GitValidator::validate_branch_name(name).is_ok(),
                "should accept {}",
                name
            );
        }
    }

    #[test]
    fn test_rejects_malformed_branch_names() {
        let invalid_names = [
            "",
            "branch..name",
            "-invalid",
            "invalid/",
            "branch name",
            "@",
            "branch@{",
            "branch~1",
            "refs/heads/test",
            "feature/.hidden",
            ".hidden",
            "topic.lock",
            "a//b",
        ];

        for invalid_name in invalid_names {
            let err = GitValidator::validate_branch_name(invalid_name).unwrap_err();
            assert_eq!(err.exit_code(), 1, "{}", invalid_name);
        }
    }

    #[test]
    fn test_error_names_the_broken_rule() {
        let err = GitValidator::validate_branch_name("topic.lock").unwrap_err();
        assert!(err.to_string().contains("ends with '.lock'"));
    }

    #[test]
    fn test_rules_compile_once_and_cover_the_table() {
        let first = compiled_rules().unwrap();
        let second = compiled_rules().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.len(), BRANCH_RULES.len());
    }

    #[test]
    fn test_validate_branch_name_too_long() {
        let long_name = "a".repeat(251);
        assert!(GitValidator::validate_branch_name(&long_name).is_err());
        assert!(GitValidator::validate_branch_name(&"a".repeat(250)).is_ok());
    }
}
