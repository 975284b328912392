//! Error types for vault access and the command-line shell.
//!
//! Two layers exist on purpose. Per-reference conditions (unresolved links,
//! non-text targets, section misses) are ordinary values in
//! [`crate::resolver::ResolveOutcome`] because they are recovered locally
//! and must never abort an expansion. The errors here are the ones a caller
//! actually observes: a vault that cannot be opened, an input file that
//! cannot be read, a base path that does not belong to the vault.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failures surfaced to callers of the vault and the CLI.
#[derive(Debug, Error)]
pub enum GraftError {
    #[error("vault root '{path}' does not exist or is not a directory")]
    VaultNotFound { path: String },

    #[error("'{path}' is not inside the vault")]
    OutsideVault { path: String },

    #[error("failed to read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An error paired with a suggestion for fixing it, for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: anyhow::Error,
    pub suggestion: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new(error: anyhow::Error) -> Self {
        Self {
            error,
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print the error (and suggestion, if any) to stderr with color.
    pub fn display(&self) {
        eprintln!("{} {:#}", "error:".red().bold(), self.error);
        if let Some(suggestion) = &self.suggestion {
            eprintln!("{} {}", "hint:".yellow().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Attach a suggestion appropriate to the failure, when one is known.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<GraftError>() {
        Some(GraftError::VaultNotFound { .. }) => {
            Some("pass the vault root with --vault <DIR>".to_string())
        }
        Some(GraftError::OutsideVault { .. }) => Some(
            "the input file must live under the vault root so links can resolve".to_string(),
        ),
        _ => None,
    };

    let ctx = ErrorContext::new(error);
    match suggestion {
        Some(s) => ctx.with_suggestion(s),
        None => ctx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_not_found_gets_a_suggestion() {
        let err = anyhow::Error::from(GraftError::VaultNotFound {
            path: "/nope".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
        assert!(ctx.to_string().contains("/nope"));
    }

    #[test]
    fn test_plain_error_has_no_suggestion() {
        let ctx = user_friendly_error(anyhow::anyhow!("something else"));
        assert!(ctx.suggestion.is_none());
    }

    #[test]
    fn test_io_error_preserves_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = GraftError::Io {
            path: "a.md".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
