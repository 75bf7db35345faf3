//! 構成名の検証

use regex::Regex;
use std::sync::LazyLock;

use crate::common::error::{GcloudctxError, Result};

/// 構成名の最大長
pub const MAX_NAME_LENGTH: usize = 63;

// 先頭は英字、以降は英数字・ハイフン・アンダースコア
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("configuration name pattern is valid")
});

/// 構成名を検証する
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GcloudctxError::invalid_name(
            "configuration name cannot be empty",
        ));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(GcloudctxError::invalid_name(format!(
            "configuration name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }

    if !NAME_PATTERN.is_match(name) {
        return Err(GcloudctxError::invalid_name(
            "configuration name must start with a letter and contain only alphanumeric characters, hyphens, and underscores",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in [
            "myconfig",
            "my-config",
            "my_config",
            "config123",
            "my-config_123",
            "A",
        ] {
            assert!(validate_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in [
            "",
            "-config",
            "_config",
            "123config",
            "my config",
            "my@config",
            "my.config",
            "設定",
        ] {
            let err = validate_name(name).unwrap_err();
            assert!(
                matches!(err, GcloudctxError::InvalidName { .. }),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_length_boundary() {
        let max = format!("a{}", "b".repeat(MAX_NAME_LENGTH - 1));
        assert_eq!(max.len(), 63);
        assert!(validate_name(&max).is_ok());

        let too_long = format!("{max}c");
        let err = validate_name(&too_long).unwrap_err();
        assert!(err.to_string().contains("63"));
    }
}
