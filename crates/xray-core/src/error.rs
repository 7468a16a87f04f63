use std::fmt;

/// Invalid renderer configuration, reported when the renderer is built
/// rather than when a tree is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Text values are rendered but the maximum length leaves no room for
    /// any character.
    NonPositiveMaxLength(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveMaxLength(max_length) => write!(
                f,
                "text max length should be greater than 0, not {max_length}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_bad_value() {
        let err = ConfigError::NonPositiveMaxLength(0);
        assert_eq!(
            err.to_string(),
            "text max length should be greater than 0, not 0"
        );
    }
}
