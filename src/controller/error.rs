//! Error types reaching the feed controller.

use thiserror::Error;

/// The single failure kind of the page boundary. Transient and permanent
/// failures are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page fetch failed: {}", .message.as_deref().unwrap_or("no details"))]
pub struct FetchError {
    pub message: Option<String>,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }

    /// The collaborator's message, unless missing or blank.
    pub fn user_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        assert_eq!(
            FetchError::new("timeout").to_string(),
            "page fetch failed: timeout"
        );
        assert_eq!(
            FetchError::without_message().to_string(),
            "page fetch failed: no details"
        );
    }

    #[test]
    fn blank_message_is_not_user_facing() {
        assert_eq!(FetchError::new("  ").user_message(), None);
        assert_eq!(FetchError::new("offline").user_message(), Some("offline"));
    }
}
