//! Identifier resolution: raw reference values to canonical records.
//!
//! Several legacy call sites each re-implemented a slightly different
//! fallback between key lookups and legacy-code lookups. This module is
//! the single resolution algorithm they all share now:
//!
//! 1. empty input is [`Resolution::Absent`] (absence is not an error);
//! 2. input in native-key format is looked up by key only; a well-formed
//!    key that matches nothing is conclusively [`Resolution::Unresolved`],
//!    never retried as a legacy code;
//! 3. anything else is looked up by legacy code.
//!
//! The batch variant [`ReferenceResolver::resolve_all`] deduplicates its
//! input and issues at most one key query plus one legacy-code query,
//! regardless of how many identifiers it is given.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entity::ReferenceEntity;
use crate::domain::identifier::{
    EntityType, Identifier, NativeKey, legacy_codes_equivalent,
};
use crate::domain::ports::{ReferenceRepository, ReferenceStoreError};

/// A reference value that matched a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRef {
    /// Canonical key of the matched record.
    pub key: NativeKey,
    /// The matched record itself, for projection and chain traversal.
    pub entity: ReferenceEntity,
}

/// Outcome of resolving one raw reference value.
///
/// All three outcomes are ordinary values; only the store being
/// unreachable is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The identifier matched a record by key or legacy code.
    Resolved(ResolvedRef),
    /// Non-empty identifier matching no record of the requested type.
    Unresolved {
        /// The identifier as supplied (trimmed).
        raw: String,
    },
    /// No identifier was supplied. Distinct from [`Resolution::Unresolved`]:
    /// absence is not a data-quality problem.
    Absent,
}

impl Resolution {
    /// Whether this outcome carries a matched record.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Results of a batch resolution, keyed by the trimmed raw identifier.
#[derive(Debug, Default)]
pub struct ResolutionMap {
    entries: HashMap<String, Resolution>,
}

impl ResolutionMap {
    /// Outcome for a raw identifier. Total: empty input maps to
    /// [`Resolution::Absent`] and identifiers outside the batch map to
    /// [`Resolution::Unresolved`].
    ///
    /// Lookup goes through the same classification as the batch itself,
    /// so case differences in native keys do not miss their entry.
    #[must_use]
    pub fn get(&self, raw: Option<&str>) -> Resolution {
        let Some(trimmed) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Resolution::Absent;
        };
        let Some(identifier) = Identifier::classify(trimmed) else {
            return Resolution::Absent;
        };
        let raw_form = match &identifier {
            Identifier::Native(key) => key.as_str(),
            Identifier::Legacy(code) => code.as_str(),
        };
        self.entries
            .get(raw_form)
            .cloned()
            .unwrap_or_else(|| Resolution::Unresolved {
                raw: trimmed.to_owned(),
            })
    }

    /// Number of distinct non-empty identifiers in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch resolved no identifiers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves raw reference values against the reference collections.
#[derive(Clone)]
pub struct ReferenceResolver {
    repo: Arc<dyn ReferenceRepository>,
}

impl ReferenceResolver {
    /// Resolver reading through the given repository port.
    #[must_use]
    pub fn new(repo: Arc<dyn ReferenceRepository>) -> Self {
        Self { repo }
    }

    /// Resolve one raw identifier for `entity`.
    ///
    /// # Errors
    /// Returns [`ReferenceStoreError`] only when the store cannot be
    /// queried; data-quality outcomes are encoded in [`Resolution`].
    pub async fn resolve(
        &self,
        entity: EntityType,
        raw: Option<&str>,
    ) -> Result<Resolution, ReferenceStoreError> {
        let Some(trimmed) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(Resolution::Absent);
        };
        let Some(identifier) = Identifier::classify(trimmed) else {
            return Ok(Resolution::Absent);
        };
        match identifier {
            Identifier::Native(key) => {
                let found = self.repo.find_by_key(entity, &key).await?;
                // Unresolved echoes the identifier exactly as supplied;
                // classification lowercases keys for lookup only.
                Ok(found.map_or_else(
                    || Resolution::Unresolved {
                        raw: trimmed.to_owned(),
                    },
                    |record| {
                        Resolution::Resolved(ResolvedRef {
                            key: record.key.clone(),
                            entity: record,
                        })
                    },
                ))
            }
            Identifier::Legacy(code) => {
                let found = self.repo.find_by_legacy_code(entity, &code).await?;
                Ok(found.map_or(
                    Resolution::Unresolved { raw: code },
                    |record| {
                        Resolution::Resolved(ResolvedRef {
                            key: record.key.clone(),
                            entity: record,
                        })
                    },
                ))
            }
        }
    }

    /// Resolve a batch of raw identifiers for `entity`.
    ///
    /// Input is deduplicated and split by syntactic class; at most one
    /// key batch query and one legacy-code batch query reach the store.
    /// Per-identifier outcomes are identical to calling
    /// [`ReferenceResolver::resolve`] one at a time.
    ///
    /// # Errors
    /// Returns [`ReferenceStoreError`] when either batch query fails; the
    /// whole batch is abandoned rather than partially resolved.
    pub async fn resolve_all<'a, I>(
        &self,
        entity: EntityType,
        raws: I,
    ) -> Result<ResolutionMap, ReferenceStoreError>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut keys: Vec<NativeKey> = Vec::new();
        let mut codes: Vec<String> = Vec::new();
        let mut entries: HashMap<String, Resolution> = HashMap::new();

        for raw in raws {
            let Some(trimmed) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
                continue;
            };
            let Some(identifier) = Identifier::classify(trimmed) else {
                continue;
            };
            let raw_form = match &identifier {
                Identifier::Native(key) => key.as_str().to_owned(),
                Identifier::Legacy(code) => code.clone(),
            };
            if entries.contains_key(&raw_form) {
                continue;
            }
            match identifier {
                Identifier::Native(key) => keys.push(key),
                Identifier::Legacy(code) => codes.push(code),
            }
            // Seed with Unresolved carrying the identifier as supplied;
            // matched rows overwrite below.
            entries.insert(
                raw_form,
                Resolution::Unresolved {
                    raw: trimmed.to_owned(),
                },
            );
        }

        if !keys.is_empty() {
            for record in self.repo.find_by_keys(entity, &keys).await? {
                let raw_form = record.key.as_str().to_owned();
                entries.insert(
                    raw_form,
                    Resolution::Resolved(ResolvedRef {
                        key: record.key.clone(),
                        entity: record,
                    }),
                );
            }
        }

        if !codes.is_empty() {
            // Rows arrive ordered by key; duplicate legacy codes keep the
            // first match, mirroring single-item resolution. Mapping back
            // uses the same numeric equivalence the store queries with, so
            // a request for "018" claims a row storing 18.
            for record in self.repo.find_by_legacy_codes(entity, &codes).await? {
                let Some(stored) = record.legacy_code.clone() else {
                    continue;
                };
                for requested in &codes {
                    if !legacy_codes_equivalent(requested, &stored) {
                        continue;
                    }
                    if let Some(slot) = entries.get_mut(requested) {
                        if !slot.is_resolved() {
                            *slot = Resolution::Resolved(ResolvedRef {
                                key: record.key.clone(),
                                entity: record.clone(),
                            });
                        }
                    }
                }
            }
        }

        Ok(ResolutionMap { entries })
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
