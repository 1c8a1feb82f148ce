//! Document-to-domain row conversion and the per-entity collection map.
//!
//! The stored collections predate this service. Legacy identifier fields
//! keep their historical names (`department_id`, `idcategory_master`,
//! `idsub_category_master`), and writers over the years stored codes as
//! strings in some rows and as numbers in others; all conversions here
//! tolerate both forms.

use mongodb::bson::{Bson, Document};

use crate::domain::entity::{Banner, ReferenceEntity};
use crate::domain::identifier::{EntityType, NativeKey};

/// Stored collection name for a reference entity type.
pub fn collection_name(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Department => "departments",
        EntityType::Category => "categories",
        EntityType::SubCategory => "subcategories",
    }
}

/// Historical legacy-code field name for a reference entity type.
pub fn legacy_field(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Department => "department_id",
        EntityType::Category => "idcategory_master",
        EntityType::SubCategory => "idsub_category_master",
    }
}

/// Stored field holding the (mixed-format) parent reference, if the
/// entity type has a parent.
pub fn parent_field(entity: EntityType) -> Option<&'static str> {
    match entity {
        EntityType::Department => None,
        EntityType::Category => Some("department"),
        EntityType::SubCategory => Some("category"),
    }
}

/// Read a field that may hold a string or a number, as a trimmed string.
pub fn string_like(doc: &Document, field: &str) -> Option<String> {
    match doc.get(field)? {
        Bson::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Bson::Int32(i) => Some(i.to_string()),
        Bson::Int64(i) => Some(i.to_string()),
        Bson::Double(d) if d.fract() == 0.0 => Some(format!("{}", *d as i64)),
        _ => None,
    }
}

fn int_like(doc: &Document, field: &str) -> Option<i64> {
    match doc.get(field)? {
        Bson::Int32(i) => Some(i64::from(*i)),
        Bson::Int64(i) => Some(*i),
        Bson::Double(d) if d.fract() == 0.0 => Some(*d as i64),
        _ => None,
    }
}

fn key_of(doc: &Document) -> Result<NativeKey, String> {
    let oid = doc
        .get_object_id("_id")
        .map_err(|err| format!("row missing object id: {err}"))?;
    NativeKey::parse(&oid.to_hex()).map_err(|err| err.to_string())
}

/// Convert one stored reference document into the domain read model.
pub fn row_to_reference(entity: EntityType, doc: &Document) -> Result<ReferenceEntity, String> {
    Ok(ReferenceEntity {
        key: key_of(doc)?,
        legacy_code: string_like(doc, legacy_field(entity)),
        display_name: string_like(doc, "name").unwrap_or_default(),
        parent_ref: parent_field(entity).and_then(|field| string_like(doc, field)),
        sequence: int_like(doc, "sequence"),
        image_link: string_like(doc, "image"),
    })
}

/// Convert one stored banner document into the domain read model.
pub fn row_to_banner(doc: &Document) -> Result<Banner, String> {
    Ok(Banner {
        key: key_of(doc)?,
        title: string_like(doc, "title")
            .or_else(|| string_like(doc, "name"))
            .unwrap_or_default(),
        image_link: string_like(doc, "image"),
        sequence: int_like(doc, "sequence"),
    })
}
