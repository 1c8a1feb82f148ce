//! Read-model entities for the reference collections.

use serde::Serialize;

use super::identifier::NativeKey;

/// Record shape shared by departments, categories, and subcategories.
///
/// `legacy_code` is the external identifier carried over from the
/// predecessor system; it may be missing for post-migration records and is
/// not guaranteed unique. `parent_ref` is stored untyped: it holds either a
/// native key or a legacy code of the parent entity type, or an orphaned
/// value matching neither. Orphans resolve to an explicit unresolved
/// marker, never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntity {
    /// Store-assigned canonical identifier.
    pub key: NativeKey,
    /// External identifier from the predecessor system, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_code: Option<String>,
    /// Human-readable label.
    pub display_name: String,
    /// Raw reference to the parent entity (key or legacy code, untyped).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<String>,
    /// Display ordering hint; opaque to the core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
    /// Presentation image; opaque to the core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
}

/// Promotional banner record. Plain list resource without reference fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    /// Store-assigned canonical identifier.
    pub key: NativeKey,
    /// Banner headline.
    pub title: String,
    /// Presentation image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    /// Display ordering hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}
