pub const EXPORT_CMD: &str = "export";

/// Fixed columns of the output's column-header line, in order.
pub const FIXED_COLUMNS: [&str; 9] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// Marker prefix of meta-information lines.
pub const META_LINE_PREFIX: &str = "##";

pub const FILE_FORMAT_LINE: &str = "##fileformat=VCFv4.3";

/// Well-known source table columns that map onto fixed output columns
/// rather than INFO meta lines.
pub const REFERENCE_NAME_COLUMN: &str = "reference_name";
pub const START_POSITION_COLUMN: &str = "start_position";
pub const END_POSITION_COLUMN: &str = "end_position";
pub const NAMES_COLUMN: &str = "names";
pub const REFERENCE_BASES_COLUMN: &str = "reference_bases";
pub const ALTERNATE_BASES_COLUMN: &str = "alternate_bases";
pub const QUALITY_COLUMN: &str = "quality";
pub const FILTER_COLUMN: &str = "filter";
pub const CALL_COLUMN: &str = "call";

pub const DEFAULT_SHARD_WIDTH: &str = "1000000";
pub const DEFAULT_TEMP_DIR: &str = ".";
