//! MongoDB-backed implementation of the reference read port.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Collection, Database};

use crate::domain::entity::ReferenceEntity;
use crate::domain::identifier::{EntityType, NativeKey};
use crate::domain::ports::{ReferenceRepository, ReferenceStoreError};

use super::error_mapping::map_reference_error;
use super::rows::{collection_name, legacy_field, row_to_reference};

/// Reference read adapter over the departments, categories, and
/// subcategories collections.
#[derive(Clone)]
pub struct MongoReferenceRepository {
    db: Database,
}

impl MongoReferenceRepository {
    /// Adapter reading from the given database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, entity: EntityType) -> Collection<Document> {
        self.db.collection(collection_name(entity))
    }
}

fn object_id(key: &NativeKey) -> Result<ObjectId, ReferenceStoreError> {
    ObjectId::parse_str(key.as_str())
        .map_err(|err| ReferenceStoreError::query(format!("invalid key `{key}`: {err}")))
}

/// Legacy codes were written as strings in some rows and numbers in
/// others; match both stored forms.
fn legacy_code_forms(code: &str) -> Vec<Bson> {
    let mut forms = vec![Bson::String(code.to_owned())];
    if let Ok(numeric) = code.parse::<i64>() {
        forms.push(Bson::Int64(numeric));
        if let Ok(narrow) = i32::try_from(numeric) {
            forms.push(Bson::Int32(narrow));
        }
    }
    forms
}

fn map_row(entity: EntityType, doc: &Document) -> Result<ReferenceEntity, ReferenceStoreError> {
    row_to_reference(entity, doc).map_err(ReferenceStoreError::query)
}

#[async_trait]
impl ReferenceRepository for MongoReferenceRepository {
    async fn find_by_key(
        &self,
        entity: EntityType,
        key: &NativeKey,
    ) -> Result<Option<ReferenceEntity>, ReferenceStoreError> {
        let row = self
            .collection(entity)
            .find_one(doc! { "_id": object_id(key)? })
            .await
            .map_err(|err| map_reference_error(&err))?;
        row.as_ref().map(|doc| map_row(entity, doc)).transpose()
    }

    async fn find_by_legacy_code(
        &self,
        entity: EntityType,
        code: &str,
    ) -> Result<Option<ReferenceEntity>, ReferenceStoreError> {
        let filter = doc! { legacy_field(entity): { "$in": legacy_code_forms(code) } };
        // Sorted by key so duplicate codes yield a stable first match.
        let row = self
            .collection(entity)
            .find_one(filter)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|err| map_reference_error(&err))?;
        row.as_ref().map(|doc| map_row(entity, doc)).transpose()
    }

    async fn find_by_keys(
        &self,
        entity: EntityType,
        keys: &[NativeKey],
    ) -> Result<Vec<ReferenceEntity>, ReferenceStoreError> {
        let ids = keys
            .iter()
            .map(object_id)
            .collect::<Result<Vec<_>, _>>()?;
        let rows: Vec<Document> = self
            .collection(entity)
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|err| map_reference_error(&err))?
            .try_collect()
            .await
            .map_err(|err| map_reference_error(&err))?;
        rows.iter().map(|doc| map_row(entity, doc)).collect()
    }

    async fn find_by_legacy_codes(
        &self,
        entity: EntityType,
        codes: &[String],
    ) -> Result<Vec<ReferenceEntity>, ReferenceStoreError> {
        let forms: Vec<Bson> = codes
            .iter()
            .flat_map(|code| legacy_code_forms(code))
            .collect();
        let rows: Vec<Document> = self
            .collection(entity)
            .find(doc! { legacy_field(entity): { "$in": forms } })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|err| map_reference_error(&err))?
            .try_collect()
            .await
            .map_err(|err| map_reference_error(&err))?;
        rows.iter().map(|doc| map_row(entity, doc)).collect()
    }
}
