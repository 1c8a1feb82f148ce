//! MongoDB-backed implementations of the read ports.

pub mod bson_json;
pub mod client;
pub mod error_mapping;
pub mod mongo_catalog_repository;
pub mod mongo_reference_repository;
pub mod rows;

pub use self::client::connect;
pub use self::mongo_catalog_repository::MongoCatalogRepository;
pub use self::mongo_reference_repository::MongoReferenceRepository;
