//! # vartab-export
//!
//! Exports a tabular variant dataset to one coordinate-sorted,
//! VCF-shaped text file. Records are partitioned into key-addressable
//! shards covering contiguous genomic regions, each shard is sorted and
//! written independently, and a header plus all shards are concatenated
//! in shard-name order. The shard naming scheme guarantees that plain
//! lexicographic name order reconstructs the total genomic order, so no
//! global sort pass is needed.
pub mod compose;
pub mod consts;
pub mod header;
pub mod pipeline;
pub mod regions;
pub mod samples;
pub mod schema_select;
pub mod shard;

// Re-exports
pub use compose::*;
pub use header::*;
pub use pipeline::*;
pub use regions::*;
pub use samples::*;
pub use schema_select::*;
pub use shard::*;
