//! # Core models for vartab.
//!
//! Shared types for exporting a tabular variant dataset to one
//! coordinate-sorted text file: variant records, typed shard keys,
//! bidirectional sample identity maps, and the table schema model,
//! plus small io helpers used across the workspace.
pub mod errors;
pub mod models;
pub mod utils;

// re-export for cleaner imports
pub use errors::ExportError;
pub use models::sample::{SampleIdentity, SampleMap, SampleNameEncoding};
pub use models::schema::{ColumnSpec, FieldType, TableSchema};
pub use models::shard_key::ShardKey;
pub use models::variant::VariantRecord;
