//! MongoDB-backed implementation of the catalog read port.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Collection, Database};
use pagination::PageRequest;
use serde_json::Value;

use crate::domain::filter::{RefMatch, ResolvedFilter};
use crate::domain::identifier::{EntityType, NativeKey};
use crate::domain::ports::{
    BannerPage, CatalogRepository, CatalogStoreError, ProductPage, ReferencePage, SortSpec,
};

use super::bson_json::record_to_json;
use super::error_mapping::map_catalog_error;
use super::rows::{collection_name, parent_field, row_to_banner, row_to_reference};

/// Catalog read adapter over the products and banners collections, plus
/// paged listings of the reference collections.
#[derive(Clone)]
pub struct MongoCatalogRepository {
    db: Database,
}

impl MongoCatalogRepository {
    /// Adapter reading from the given database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn products(&self) -> Collection<Document> {
        self.db.collection("products")
    }

    fn banners(&self) -> Collection<Document> {
        self.db.collection("banners")
    }

    async fn page_of(
        &self,
        collection: &Collection<Document>,
        filter: Document,
        sort: &SortSpec,
        window: &PageRequest,
    ) -> Result<(Vec<Document>, u64), CatalogStoreError> {
        let total = collection
            .count_documents(filter.clone())
            .await
            .map_err(|err| map_catalog_error(&err))?;
        let rows: Vec<Document> = collection
            .find(filter)
            .sort(sort_doc(sort))
            .skip(window.skip())
            .limit(i64::from(window.limit()))
            .await
            .map_err(|err| map_catalog_error(&err))?
            .try_collect()
            .await
            .map_err(|err| map_catalog_error(&err))?;
        Ok((rows, total))
    }
}

fn sort_doc(sort: &SortSpec) -> Document {
    let direction = if sort.ascending { 1 } else { -1 };
    doc! { sort.field.as_str(): direction }
}

fn object_id(key: &NativeKey) -> Result<ObjectId, CatalogStoreError> {
    ObjectId::parse_str(key.as_str())
        .map_err(|err| CatalogStoreError::query(format!("invalid key `{key}`: {err}")))
}

/// Reference columns in the primary collections are mixed-format: rows
/// hold the parent's object id, its hex string, or its legacy code
/// (string or numeric). A resolved filter matches all stored forms.
fn ref_constraint(matched: &RefMatch) -> Result<Bson, CatalogStoreError> {
    let mut forms = vec![
        Bson::ObjectId(object_id(&matched.key)?),
        Bson::String(matched.key.as_str().to_owned()),
    ];
    if let Some(code) = &matched.legacy_code {
        forms.push(Bson::String(code.clone()));
        if let Ok(numeric) = code.parse::<i64>() {
            forms.push(Bson::Int64(numeric));
            if let Ok(narrow) = i32::try_from(numeric) {
                forms.push(Bson::Int32(narrow));
            }
        }
    }
    Ok(Bson::Document(doc! { "$in": forms }))
}

fn escape_regex(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn product_filter(filter: &ResolvedFilter) -> Result<Document, CatalogStoreError> {
    let mut query = Document::new();
    let references = [
        ("department", filter.department.as_ref()),
        ("category", filter.category.as_ref()),
        ("subcategory", filter.subcategory.as_ref()),
    ];
    for (field, matched) in references {
        if let Some(matched) = matched {
            query.insert(field, ref_constraint(matched)?);
        }
    }
    if let Some(term) = &filter.search {
        query.insert(
            "name",
            doc! { "$regex": escape_regex(term), "$options": "i" },
        );
    }
    Ok(query)
}

#[async_trait]
impl CatalogRepository for MongoCatalogRepository {
    async fn search_products(
        &self,
        filter: &ResolvedFilter,
        sort: &SortSpec,
        window: &PageRequest,
    ) -> Result<ProductPage, CatalogStoreError> {
        let (rows, total) = self
            .page_of(&self.products(), product_filter(filter)?, sort, window)
            .await?;
        Ok(ProductPage {
            records: rows.into_iter().map(record_to_json).collect(),
            total,
        })
    }

    async fn find_product(
        &self,
        key: &NativeKey,
    ) -> Result<Option<Value>, CatalogStoreError> {
        let row = self
            .products()
            .find_one(doc! { "_id": object_id(key)? })
            .await
            .map_err(|err| map_catalog_error(&err))?;
        Ok(row.map(record_to_json))
    }

    async fn list_references<'a>(
        &self,
        entity: EntityType,
        parent: Option<&'a RefMatch>,
        sort: &SortSpec,
        window: &PageRequest,
    ) -> Result<ReferencePage, CatalogStoreError> {
        let mut filter = Document::new();
        if let Some(matched) = parent {
            let Some(field) = parent_field(entity) else {
                return Err(CatalogStoreError::query(format!(
                    "{entity} listings cannot be constrained by a parent"
                )));
            };
            filter.insert(field, ref_constraint(matched)?);
        }

        let collection = self.db.collection::<Document>(collection_name(entity));
        let (rows, total) = self.page_of(&collection, filter, sort, window).await?;
        let records = rows
            .iter()
            .map(|doc| row_to_reference(entity, doc).map_err(CatalogStoreError::query))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReferencePage { records, total })
    }

    async fn list_banners(
        &self,
        window: &PageRequest,
    ) -> Result<BannerPage, CatalogStoreError> {
        let (rows, total) = self
            .page_of(
                &self.banners(),
                Document::new(),
                &SortSpec::ascending("sequence"),
                window,
            )
            .await?;
        let records = rows
            .iter()
            .map(|doc| row_to_banner(doc).map_err(CatalogStoreError::query))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BannerPage { records, total })
    }
}
