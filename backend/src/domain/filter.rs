//! Normalization of caller-supplied reference filters.
//!
//! A list query such as "products where category = X" accepts X as either
//! a native key or a legacy code. The filter value goes through the same
//! resolution algorithm as result decoration; passing the raw string into
//! the store would at best match nothing and at worst match something
//! unrelated. An unresolved filter value short-circuits the whole query to
//! an empty page.

use crate::domain::identifier::{EntityType, NativeKey};
use crate::domain::ports::ReferenceStoreError;
use crate::domain::resolver::{ReferenceResolver, ResolvedRef, Resolution};

/// Raw reference filters as they arrive from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Raw department identifier, key or legacy code.
    pub department: Option<String>,
    /// Raw category identifier, key or legacy code.
    pub category: Option<String>,
    /// Raw subcategory identifier, key or legacy code.
    pub subcategory: Option<String>,
    /// Free-text search over product names.
    pub search: Option<String>,
}

/// A resolved filter field: the canonical key plus the record's legacy
/// code. The stored reference columns are themselves mixed-format, so the
/// store adapter matches rows holding either form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefMatch {
    /// Canonical key of the referenced record.
    pub key: NativeKey,
    /// Legacy code of the referenced record, when it carries one.
    pub legacy_code: Option<String>,
}

impl From<&ResolvedRef> for RefMatch {
    fn from(resolved: &ResolvedRef) -> Self {
        Self {
            key: resolved.key.clone(),
            legacy_code: resolved.entity.legacy_code.clone(),
        }
    }
}

/// Reference filters with every supplied value resolved to canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFilter {
    /// Department constraint, when supplied and resolved.
    pub department: Option<RefMatch>,
    /// Category constraint, when supplied and resolved.
    pub category: Option<RefMatch>,
    /// Subcategory constraint, when supplied and resolved.
    pub subcategory: Option<RefMatch>,
    /// Free-text search over product names.
    pub search: Option<String>,
}

/// Result of normalizing a [`CatalogFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedFilter {
    /// All supplied values resolved; safe to query with.
    Query(ResolvedFilter),
    /// At least one supplied value matched nothing: the query must return
    /// zero results without reaching the primary collection.
    Empty,
}

impl CatalogFilter {
    /// Resolve every supplied reference value through `resolver`.
    ///
    /// # Errors
    /// Returns [`ReferenceStoreError`] when the reference collections
    /// cannot be queried. Unresolved values are not errors; they yield
    /// [`NormalizedFilter::Empty`].
    pub async fn normalize(
        &self,
        resolver: &ReferenceResolver,
    ) -> Result<NormalizedFilter, ReferenceStoreError> {
        let mut resolved = ResolvedFilter {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            ..ResolvedFilter::default()
        };

        let fields = [
            (EntityType::Department, self.department.as_deref()),
            (EntityType::Category, self.category.as_deref()),
            (EntityType::SubCategory, self.subcategory.as_deref()),
        ];
        for (entity, raw) in fields {
            match resolver.resolve(entity, raw).await? {
                Resolution::Absent => {}
                Resolution::Unresolved { .. } => return Ok(NormalizedFilter::Empty),
                Resolution::Resolved(ref matched) => {
                    let slot = match entity {
                        EntityType::Department => &mut resolved.department,
                        EntityType::Category => &mut resolved.category,
                        EntityType::SubCategory => &mut resolved.subcategory,
                    };
                    *slot = Some(RefMatch::from(matched));
                }
            }
        }

        Ok(NormalizedFilter::Query(resolved))
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
