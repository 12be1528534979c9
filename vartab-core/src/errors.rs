use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Error parsing genomic region: {0}")]
    RegionParse(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Can't resolve sample: {0}")]
    UnresolvedSample(String),

    #[error("Conflicting sample table entry: {0}")]
    SampleConflict(String),

    #[error("Error parsing variant record: {0}")]
    RecordParse(String),

    #[error("Error parsing shard name: {0}")]
    ShardName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
