//! Conversation turn types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Route label recorded when processing failed.
pub const ERROR_ROUTE: &str = "error";

/// Route label recorded when no tool was used.
pub const NO_ROUTE: &str = "none";

/// One query and its outcome.
///
/// Exactly one of `response` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub query: String,
    /// Tool route key, `"none"` or `"error"`.
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn answered(
        query: impl Into<String>,
        route: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            route: route.into(),
            response: Some(response.into()),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            route: ERROR_ROUTE.into(),
            response: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.route == ERROR_ROUTE
    }
}
