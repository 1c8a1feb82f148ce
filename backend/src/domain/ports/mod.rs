//! Domain ports: async traits behind which persistence hides.
//!
//! Inbound adapters depend on these traits (as `Arc<dyn …>`), never on a
//! concrete store. Each port ships a mock (tests) and, where useful, an
//! in-memory fixture implementation.

pub mod catalog_repository;
pub mod reference_repository;

pub use self::catalog_repository::*;
pub use self::reference_repository::*;
