//! Success envelope shared by every endpoint.
//!
//! Shape: `{ success, message?, data, pagination? }`; failures use the
//! error envelope in the sibling error module.

use pagination::PageInfo;
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope wrapping a response payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Always `true` in the success envelope.
    pub success: bool,
    /// Optional human-readable note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload.
    pub data: T,
    /// Pagination block for list endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T> Envelope<T> {
    /// Envelope around a detail payload.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            pagination: None,
        }
    }

    /// Envelope around one page of a list payload.
    pub const fn page(data: T, pagination: PageInfo) -> Self {
        Self {
            success: true,
            message: None,
            data,
            pagination: Some(pagination),
        }
    }

    /// Attach a human-readable note.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
