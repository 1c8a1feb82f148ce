//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without a live store.

use std::sync::Arc;

use crate::domain::ports::{CatalogRepository, ReferenceRepository};
use crate::domain::{Populator, ReferenceResolver};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Read access to the reference collections.
    pub references: Arc<dyn ReferenceRepository>,
    /// Read access to the primary collections.
    pub catalog: Arc<dyn CatalogRepository>,
}

impl HttpState {
    /// Bundle the two read ports.
    pub fn new(
        references: Arc<dyn ReferenceRepository>,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        Self {
            references,
            catalog,
        }
    }

    /// Resolver reading through the reference port.
    #[must_use]
    pub fn resolver(&self) -> ReferenceResolver {
        ReferenceResolver::new(self.references.clone())
    }

    /// Populator reading through the reference port.
    #[must_use]
    pub fn populator(&self) -> Populator {
        Populator::with_resolver(self.resolver())
    }
}
