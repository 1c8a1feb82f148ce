//! Driver-error translation into port errors.
//!
//! Server-selection and I/O faults mean the store is unreachable and map
//! to the connection variants; everything else is a query failure.

use mongodb::error::{Error, ErrorKind};

use crate::domain::ports::{CatalogStoreError, ReferenceStoreError};

fn is_connection_fault(error: &Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_)
    )
}

/// Map a driver error for the reference collections.
pub fn map_reference_error(error: &Error) -> ReferenceStoreError {
    if is_connection_fault(error) {
        ReferenceStoreError::connection(error.to_string())
    } else {
        ReferenceStoreError::query(error.to_string())
    }
}

/// Map a driver error for the primary collections.
pub fn map_catalog_error(error: &Error) -> CatalogStoreError {
    if is_connection_fault(error) {
        CatalogStoreError::connection(error.to_string())
    } else {
        CatalogStoreError::query(error.to_string())
    }
}
