//! Identifier classification for the reference-resolution layer.
//!
//! Reference fields historically stored either a store-assigned native key
//! or a legacy external code in the same slot. Every raw identifier is
//! classified exactly once into the [`Identifier`] union; logic downstream
//! of classification never re-probes the raw string.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference entity kinds participating in the department → category →
/// subcategory hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Top of the hierarchy; has no parent.
    Department,
    /// Child of a department.
    Category,
    /// Child of a category.
    SubCategory,
}

impl EntityType {
    /// Parent entity type in the hierarchy, if any.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Department => None,
            Self::Category => Some(Self::Department),
            Self::SubCategory => Some(Self::Category),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Department => "department",
            Self::Category => "category",
            Self::SubCategory => "subcategory",
        };
        write!(f, "{label}")
    }
}

/// Length of a native store key in hexadecimal characters.
pub const NATIVE_KEY_LEN: usize = 24;

/// Validation failure raised when a string is not a native key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("native keys are {NATIVE_KEY_LEN}-character hexadecimal strings")]
pub struct NativeKeyError;

/// Store-assigned canonical identifier: a 24-character hexadecimal string.
///
/// The format check is purely local; it never touches the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NativeKey(String);

impl NativeKey {
    /// Whether `raw` is syntactically a native key.
    #[must_use]
    pub fn is_native_format(raw: &str) -> bool {
        raw.len() == NATIVE_KEY_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Validate and construct a native key. Hex digits are normalised to
    /// lowercase, matching how the store renders keys.
    ///
    /// # Examples
    /// ```
    /// use greenbasket_backend::domain::NativeKey;
    ///
    /// assert!(NativeKey::parse("64f1c0ffee64f1c0ffee64f1").is_ok());
    /// assert!(NativeKey::parse("18").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, NativeKeyError> {
        if Self::is_native_format(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(NativeKeyError)
        }
    }

    /// The key as its hexadecimal string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NativeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NativeKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Raw reference value classified by syntactic form.
///
/// The native-key format gates which lookup path a value takes: a string
/// that looks like a native key is only ever tried against keys, never
/// retried as a legacy code. A fallback chain in both directions would let
/// a malformed key that collides with a legacy code resolve incorrectly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Syntactically a store key; resolved by key lookup only.
    Native(NativeKey),
    /// Anything else non-empty; resolved by legacy-code lookup only.
    Legacy(String),
}

impl Identifier {
    /// Classify a raw identifier, returning `None` for empty or
    /// whitespace-only input (absence, which is not an error).
    #[must_use]
    pub fn classify(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match NativeKey::parse(trimmed) {
            Ok(key) => Some(Self::Native(key)),
            Err(NativeKeyError) => Some(Self::Legacy(trimmed.to_owned())),
        }
    }
}

/// Whether two legacy codes identify the same record.
///
/// Writers over the years stored codes as strings in some rows and as
/// numbers in others, so the store matches numerically as well as
/// textually: `"018"` and a row storing `18` are the same code. Batch
/// result mapping must use the same equivalence the store queries with.
#[must_use]
pub fn legacy_codes_equivalent(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    matches!((a.parse::<i64>(), b.parse::<i64>()), (Ok(x), Ok(y)) if x == y)
}
