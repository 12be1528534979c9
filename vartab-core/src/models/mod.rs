pub mod sample;
pub mod schema;
pub mod shard_key;
pub mod variant;

// re-export for cleaner imports
pub use self::sample::{SampleIdentity, SampleMap, SampleNameEncoding};
pub use self::schema::{ColumnSpec, FieldType, TableSchema};
pub use self::shard_key::ShardKey;
pub use self::variant::VariantRecord;
