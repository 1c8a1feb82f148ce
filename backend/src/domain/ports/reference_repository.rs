//! Read-side port for the three reference collections.
//!
//! The resolver and populator only ever read departments, categories, and
//! subcategories through this port; writes belong to administrative tooling
//! outside this service. Point lookups back single resolution; the batch
//! variants exist so callers can bound store round-trips per request.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::entity::ReferenceEntity;
use crate::domain::identifier::{EntityType, NativeKey, legacy_codes_equivalent};

/// Errors raised when reading the reference collections.
///
/// Data-quality outcomes (absent or dangling references) are ordinary
/// return values, not errors; this enum only covers the store itself
/// being unreachable or rejecting a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceStoreError {
    /// Store connection could not be established.
    #[error("reference store connection failed: {message}")]
    Connection {
        /// Driver-provided description of the fault.
        message: String,
    },
    /// Query failed during execution or row conversion.
    #[error("reference store query failed: {message}")]
    Query {
        /// Driver-provided description of the fault.
        message: String,
    },
}

impl ReferenceStoreError {
    /// Connection-level failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-level failure.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading reference entities by key or legacy code.
///
/// Batch lookups must return every match in one round-trip;
/// `find_by_legacy_codes` returns matches in a deterministic order so that
/// duplicate legacy codes (a data defect in the source system) resolve
/// first-match reproducibly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// Look up a single entity by native key.
    async fn find_by_key(
        &self,
        entity: EntityType,
        key: &NativeKey,
    ) -> Result<Option<ReferenceEntity>, ReferenceStoreError>;

    /// Look up a single entity by legacy code.
    async fn find_by_legacy_code(
        &self,
        entity: EntityType,
        code: &str,
    ) -> Result<Option<ReferenceEntity>, ReferenceStoreError>;

    /// Batch lookup by native keys. Missing keys are simply absent from
    /// the result; order is unspecified.
    async fn find_by_keys(
        &self,
        entity: EntityType,
        keys: &[NativeKey],
    ) -> Result<Vec<ReferenceEntity>, ReferenceStoreError>;

    /// Batch lookup by legacy codes, ordered by key so duplicate codes
    /// yield a stable first match.
    async fn find_by_legacy_codes(
        &self,
        entity: EntityType,
        codes: &[String],
    ) -> Result<Vec<ReferenceEntity>, ReferenceStoreError>;
}

/// In-memory implementation for tests and local fixtures.
///
/// Every trait call increments a query counter, letting tests assert the
/// round-trip bounds that the batch resolution path guarantees. Legacy
/// lookups match with the store's numeric equivalence: rows written with
/// numeric codes answer requests for zero-padded string forms.
#[derive(Debug, Default)]
pub struct FixtureReferenceRepository {
    entities: HashMap<EntityType, Vec<ReferenceEntity>>,
    queries: AtomicUsize,
}

impl FixtureReferenceRepository {
    /// Empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the fixture's collection for `entity`.
    #[must_use]
    pub fn with(mut self, entity: EntityType, record: ReferenceEntity) -> Self {
        self.entities.entry(entity).or_default().push(record);
        self
    }

    /// Number of store round-trips issued so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn rows(&self, entity: EntityType) -> &[ReferenceEntity] {
        self.entities.get(&entity).map_or(&[], Vec::as_slice)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReferenceRepository for FixtureReferenceRepository {
    async fn find_by_key(
        &self,
        entity: EntityType,
        key: &NativeKey,
    ) -> Result<Option<ReferenceEntity>, ReferenceStoreError> {
        self.record_query();
        Ok(self.rows(entity).iter().find(|r| &r.key == key).cloned())
    }

    async fn find_by_legacy_code(
        &self,
        entity: EntityType,
        code: &str,
    ) -> Result<Option<ReferenceEntity>, ReferenceStoreError> {
        self.record_query();
        let mut matches: Vec<&ReferenceEntity> = self
            .rows(entity)
            .iter()
            .filter(|r| {
                r.legacy_code
                    .as_deref()
                    .is_some_and(|stored| legacy_codes_equivalent(code, stored))
            })
            .collect();
        matches.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        Ok(matches.first().map(|r| (*r).clone()))
    }

    async fn find_by_keys(
        &self,
        entity: EntityType,
        keys: &[NativeKey],
    ) -> Result<Vec<ReferenceEntity>, ReferenceStoreError> {
        self.record_query();
        Ok(self
            .rows(entity)
            .iter()
            .filter(|r| keys.contains(&r.key))
            .cloned()
            .collect())
    }

    async fn find_by_legacy_codes(
        &self,
        entity: EntityType,
        codes: &[String],
    ) -> Result<Vec<ReferenceEntity>, ReferenceStoreError> {
        self.record_query();
        let mut matches: Vec<ReferenceEntity> = self
            .rows(entity)
            .iter()
            .filter(|r| {
                r.legacy_code.as_deref().is_some_and(|stored| {
                    codes.iter().any(|c| legacy_codes_equivalent(c, stored))
                })
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        Ok(matches)
    }
}
