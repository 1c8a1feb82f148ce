//! Hierarchical population: reference fields replaced by projected
//! summaries of the referenced entities.
//!
//! A [`FieldSpec`] declares, per reference field, the entity type, the
//! summary attributes to embed, and optionally a nested spec for the
//! referenced entity's own parent reference (subcategory → category →
//! department, product → category → department). Population is a pure
//! transform over JSON documents: resolved references become projected
//! objects, dangling ones become an explicit sentinel, absent ones become
//! `null`. Bad data never aborts a call; only the store being unreachable
//! does.
//!
//! [`Populator::populate_many`] resolves level by level across the whole
//! input with a request-scoped memo, so a page of N records costs a number
//! of store round-trips bounded by the number of entity types in the
//! declared chains, not by N.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::entity::ReferenceEntity;
use crate::domain::identifier::EntityType;
use crate::domain::ports::{ReferenceRepository, ReferenceStoreError};
use crate::domain::resolver::{ReferenceResolver, Resolution};

/// Display name embedded for references that match no record.
pub const UNRESOLVED_LABEL: &str = "Unresolved reference";

/// Summary attribute of a reference entity that a projection may embed.
///
/// The canonical key is always embedded and is not part of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionField {
    /// Human-readable label.
    DisplayName,
    /// Legacy external identifier, when the record carries one.
    LegacyCode,
    /// Display ordering hint.
    Sequence,
    /// Presentation image.
    ImageLink,
}

impl ProjectionField {
    fn apply(self, entity: &ReferenceEntity, out: &mut Map<String, Value>) {
        match self {
            Self::DisplayName => {
                out.insert(
                    "displayName".to_owned(),
                    Value::String(entity.display_name.clone()),
                );
            }
            Self::LegacyCode => {
                if let Some(code) = &entity.legacy_code {
                    out.insert("legacyCode".to_owned(), Value::String(code.clone()));
                }
            }
            Self::Sequence => {
                if let Some(sequence) = entity.sequence {
                    out.insert("sequence".to_owned(), Value::from(sequence));
                }
            }
            Self::ImageLink => {
                if let Some(link) = &entity.image_link {
                    out.insert("imageLink".to_owned(), Value::String(link.clone()));
                }
            }
        }
    }
}

/// Programming errors in a field specification.
///
/// These indicate a defect in the calling route, not bad data, and fail
/// fast at spec construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldSpecError {
    /// The outer entity type has no parent to nest under.
    #[error("`{field}` declares a nested spec but {outer} has no parent entity")]
    NoParent {
        /// Field the outer spec populates.
        field: String,
        /// Entity type of the outer spec.
        outer: EntityType,
    },
    /// The nested spec's entity type is not the outer type's parent.
    #[error("`{field}` nests {nested} under {outer}; the parent of {outer} is {expected}")]
    InvalidNesting {
        /// Field the outer spec populates.
        field: String,
        /// Entity type of the outer spec.
        outer: EntityType,
        /// Entity type declared by the nested spec.
        nested: EntityType,
        /// The outer type's actual parent.
        expected: EntityType,
    },
}

/// Declaration of one reference field to populate.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    field: String,
    entity: EntityType,
    projection: Vec<ProjectionField>,
    nested: Option<Box<FieldSpec>>,
}

impl FieldSpec {
    /// Spec for `field` referencing `entity`, projecting the display name.
    pub fn new(field: impl Into<String>, entity: EntityType) -> Self {
        Self {
            field: field.into(),
            entity,
            projection: vec![ProjectionField::DisplayName],
            nested: None,
        }
    }

    /// Replace the projected attributes.
    #[must_use]
    pub fn with_projection(mut self, projection: Vec<ProjectionField>) -> Self {
        self.projection = projection;
        self
    }

    /// Declare a nested spec for the referenced entity's parent reference.
    ///
    /// # Errors
    /// Returns [`FieldSpecError`] when the nested entity type is not the
    /// parent of this spec's entity type. This is a caller defect and must
    /// surface immediately rather than silently skipping the level.
    pub fn with_nested(mut self, nested: Self) -> Result<Self, FieldSpecError> {
        let Some(expected) = self.entity.parent() else {
            return Err(FieldSpecError::NoParent {
                field: self.field,
                outer: self.entity,
            });
        };
        if nested.entity != expected {
            return Err(FieldSpecError::InvalidNesting {
                field: self.field,
                outer: self.entity,
                nested: nested.entity,
                expected,
            });
        }
        self.nested = Some(Box::new(nested));
        Ok(self)
    }

    /// Field name this spec reads and replaces.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Entity type the field references.
    #[must_use]
    pub const fn entity(&self) -> EntityType {
        self.entity
    }
}

/// Raw state of one reference slot before resolution.
enum Slot {
    /// No value supplied: populates to `null`.
    Absent,
    /// String or numeric value: resolved against the store.
    Lookup(String),
    /// Structurally unusable value (array, object, boolean): populates to
    /// the unresolved sentinel without touching the store.
    Malformed(String),
}

fn slot_of(value: Option<&Value>) -> Slot {
    match value {
        None | Some(Value::Null) => Slot::Absent,
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Slot::Absent
            } else {
                Slot::Lookup(trimmed.to_owned())
            }
        }
        // Legacy writers stored numeric codes in places.
        Some(Value::Number(n)) => Slot::Lookup(n.to_string()),
        Some(other) => Slot::Malformed(other.to_string()),
    }
}

fn slot_of_parent(parent_ref: Option<&str>) -> Slot {
    match parent_ref.map(str::trim) {
        None | Some("") => Slot::Absent,
        Some(raw) => Slot::Lookup(raw.to_owned()),
    }
}

fn sentinel(raw: &str) -> Value {
    serde_json::json!({
        "key": raw,
        "displayName": UNRESOLVED_LABEL,
        "unresolved": true,
    })
}

type Memo = HashMap<(EntityType, String), Resolution>;

/// Populates reference fields across records of the primary collections.
#[derive(Clone)]
pub struct Populator {
    resolver: ReferenceResolver,
}

impl Populator {
    /// Populator reading through the given repository port.
    #[must_use]
    pub fn new(repo: Arc<dyn ReferenceRepository>) -> Self {
        Self {
            resolver: ReferenceResolver::new(repo),
        }
    }

    /// Populator sharing an existing resolver.
    #[must_use]
    pub const fn with_resolver(resolver: ReferenceResolver) -> Self {
        Self { resolver }
    }

    /// Populate the declared reference fields of a single record.
    ///
    /// # Errors
    /// Returns [`ReferenceStoreError`] when the store cannot be queried;
    /// dangling or absent references are encoded in the output instead.
    pub async fn populate(
        &self,
        record: Value,
        specs: &[FieldSpec],
    ) -> Result<Value, ReferenceStoreError> {
        let mut populated = self.populate_many(vec![record], specs).await?;
        Ok(populated.pop().unwrap_or(Value::Null))
    }

    /// Populate the declared reference fields of every record, preserving
    /// input order.
    ///
    /// Resolution is batched across the whole input: per chain level, at
    /// most one key query and one legacy-code query per entity type reach
    /// the store, however many records were supplied.
    ///
    /// # Errors
    /// Returns [`ReferenceStoreError`] when any batch query fails; the
    /// whole call is abandoned since partial population would be
    /// indistinguishable from a data bug.
    pub async fn populate_many(
        &self,
        records: Vec<Value>,
        specs: &[FieldSpec],
    ) -> Result<Vec<Value>, ReferenceStoreError> {
        let memo = self.resolve_levels(&records, specs).await?;

        Ok(records
            .into_iter()
            .map(|record| Self::render_record(record, specs, &memo))
            .collect())
    }

    /// Walk the declared chains level by level, batching resolution per
    /// entity type and memoising outcomes for the rest of the call.
    async fn resolve_levels(
        &self,
        records: &[Value],
        specs: &[FieldSpec],
    ) -> Result<Memo, ReferenceStoreError> {
        let mut memo: Memo = HashMap::new();

        // Level 0: raw values read straight off the records.
        let mut pending: Vec<(&FieldSpec, HashSet<String>)> = specs
            .iter()
            .map(|spec| {
                let mut raws = HashSet::new();
                for record in records {
                    let value = record.as_object().and_then(|obj| obj.get(spec.field()));
                    if let Slot::Lookup(raw) = slot_of(value) {
                        raws.insert(raw);
                    }
                }
                (spec, raws)
            })
            .collect();

        while !pending.is_empty() {
            let mut by_type: HashMap<EntityType, HashSet<String>> = HashMap::new();
            for (spec, raws) in &pending {
                let unseen = raws
                    .iter()
                    .filter(|raw| !memo.contains_key(&(spec.entity, (*raw).clone())));
                by_type.entry(spec.entity).or_default().extend(unseen.cloned());
            }

            for (entity, raws) in by_type {
                if raws.is_empty() {
                    continue;
                }
                let resolved = self
                    .resolver
                    .resolve_all(entity, raws.iter().map(|raw| Some(raw.as_str())))
                    .await?;
                for raw in raws {
                    let outcome = resolved.get(Some(raw.as_str()));
                    memo.insert((entity, raw), outcome);
                }
            }

            // Next level: parent references of the entities just resolved.
            let mut next: Vec<(&FieldSpec, HashSet<String>)> = Vec::new();
            for (spec, raws) in pending {
                let Some(nested) = spec.nested.as_deref() else {
                    continue;
                };
                let mut child_raws = HashSet::new();
                for raw in raws {
                    let outcome = memo.get(&(spec.entity, raw));
                    if let Some(Resolution::Resolved(resolved)) = outcome {
                        if let Slot::Lookup(parent) =
                            slot_of_parent(resolved.entity.parent_ref.as_deref())
                        {
                            child_raws.insert(parent);
                        }
                    }
                }
                next.push((nested, child_raws));
            }
            pending = next;
        }

        Ok(memo)
    }

    fn render_record(record: Value, specs: &[FieldSpec], memo: &Memo) -> Value {
        let Value::Object(mut obj) = record else {
            // Non-document rows pass through untouched.
            return record;
        };
        for spec in specs {
            let slot = slot_of(obj.get(spec.field()));
            obj.insert(spec.field().to_owned(), Self::render_slot(spec, &slot, memo));
        }
        Value::Object(obj)
    }

    fn render_slot(spec: &FieldSpec, slot: &Slot, memo: &Memo) -> Value {
        let raw = match slot {
            Slot::Absent => return Value::Null,
            Slot::Malformed(raw) => return sentinel(raw),
            Slot::Lookup(raw) => raw,
        };
        match memo.get(&(spec.entity, raw.clone())) {
            Some(Resolution::Resolved(resolved)) => {
                let mut out = Map::new();
                out.insert(
                    "key".to_owned(),
                    Value::String(resolved.key.as_str().to_owned()),
                );
                for projection in &spec.projection {
                    projection.apply(&resolved.entity, &mut out);
                }
                if let Some(nested) = spec.nested.as_deref() {
                    let parent_slot = slot_of_parent(resolved.entity.parent_ref.as_deref());
                    out.insert(
                        nested.field().to_owned(),
                        Self::render_slot(nested, &parent_slot, memo),
                    );
                }
                Value::Object(out)
            }
            Some(Resolution::Absent) => Value::Null,
            Some(Resolution::Unresolved { raw }) => sentinel(raw),
            None => sentinel(raw),
        }
    }
}

#[cfg(test)]
#[path = "populate_tests.rs"]
mod tests;
