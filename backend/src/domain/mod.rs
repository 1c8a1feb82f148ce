//! Domain core: identifier resolution, hierarchical population, and
//! filter normalization for the catalog's reference hierarchy.
//!
//! The reference collections (departments, categories, subcategories)
//! carry two identifier schemes at once: store-assigned native keys and
//! legacy external codes inherited from a predecessor system, stored
//! untyped in the same fields. Everything in this module exists to make
//! that ambiguity total and safe: every raw value resolves to a matched
//! record, an explicit unresolved marker, or an absence marker, never an
//! exception for bad data.

pub mod entity;
pub mod filter;
pub mod identifier;
pub mod populate;
pub mod ports;
pub mod resolver;

pub use self::entity::{Banner, ReferenceEntity};
pub use self::filter::{CatalogFilter, NormalizedFilter, RefMatch, ResolvedFilter};
pub use self::identifier::{EntityType, Identifier, NativeKey, NativeKeyError};
pub use self::populate::{FieldSpec, FieldSpecError, Populator, ProjectionField, UNRESOLVED_LABEL};
pub use self::resolver::{ReferenceResolver, Resolution, ResolutionMap, ResolvedRef};
