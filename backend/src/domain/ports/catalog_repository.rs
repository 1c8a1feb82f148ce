//! Read-side port for the primary collections (products, reference
//! listings, banners).
//!
//! Queries arrive with their reference constraints already normalized
//! (see the filter module): handlers never push raw identifier strings
//! through this port. Pagination arithmetic lives in the `pagination`
//! crate; this port only consumes the resulting window.

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::Value;

use crate::domain::entity::{Banner, ReferenceEntity};
use crate::domain::filter::{RefMatch, ResolvedFilter};
use crate::domain::identifier::{EntityType, NativeKey};

/// Errors raised when querying the primary collections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogStoreError {
    /// Store connection could not be established.
    #[error("catalog store connection failed: {message}")]
    Connection {
        /// Driver-provided description of the fault.
        message: String,
    },
    /// Query failed during execution or row conversion.
    #[error("catalog store query failed: {message}")]
    Query {
        /// Driver-provided description of the fault.
        message: String,
    },
}

impl CatalogStoreError {
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

/// Sort order for a list query. Fields are whitelisted per resource by the
/// inbound layer before reaching the port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Stored field to order by.
    pub field: String,
    /// Ascending when true, descending otherwise.
    pub ascending: bool,
}

impl SortSpec {
    /// Ascending sort on `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }
}

/// One page of raw product documents plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// Raw documents in page order, reference fields unpopulated.
    pub records: Vec<Value>,
    /// Total matches across all pages.
    pub total: u64,
}

/// One page of reference entities plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePage {
    /// Entities in page order.
    pub records: Vec<ReferenceEntity>,
    /// Total matches across all pages.
    pub total: u64,
}

/// One page of banners plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerPage {
    /// Banners in page order.
    pub records: Vec<Banner>,
    /// Total matches across all pages.
    pub total: u64,
}

/// Port for reading the catalog's primary collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Page through products matching a resolved filter.
    async fn search_products(
        &self,
        filter: &ResolvedFilter,
        sort: &SortSpec,
        window: &PageRequest,
    ) -> Result<ProductPage, CatalogStoreError>;

    /// Look up one product by native key.
    async fn find_product(&self, key: &NativeKey)
        -> Result<Option<Value>, CatalogStoreError>;

    /// Page through a reference collection, optionally constrained to the
    /// children of `parent`.
    ///
    /// The named lifetime is required by the generated mock: `parent` is a
    /// reference nested inside a generic.
    async fn list_references<'a>(
        &self,
        entity: EntityType,
        parent: Option<&'a RefMatch>,
        sort: &SortSpec,
        window: &PageRequest,
    ) -> Result<ReferencePage, CatalogStoreError>;

    /// Page through banners.
    async fn list_banners(&self, window: &PageRequest)
        -> Result<BannerPage, CatalogStoreError>;
}
