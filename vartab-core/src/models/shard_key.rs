use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ExportError;

/// Number of digits in the zero-padded bucket suffix of a rendered key.
pub const BUCKET_DIGITS: usize = 11;

///
/// ShardKey struct, the identity of one shard of the output.
///
/// A key covers either a whole reference sequence (`bucket` is `None`,
/// used when sharding is disabled) or one contiguous bucket of
/// `shard width` bases starting at `bucket`. The rendered form of the
/// key is also the shard artifact's file name, so the ordering of keys
/// must match the lexicographic ordering of their rendered names; the
/// fixed-width zero-padded bucket suffix is what makes that hold for
/// positions of any magnitude.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct ShardKey {
    pub reference_name: String,
    pub bucket: Option<u64>,
}

impl ShardKey {
    ///
    /// Key covering an entire reference sequence.
    ///
    pub fn whole_reference(reference_name: &str) -> Self {
        ShardKey {
            reference_name: reference_name.to_string(),
            bucket: None,
        }
    }

    ///
    /// Key covering the bucket beginning at `bucket_start`.
    ///
    pub fn bucket(reference_name: &str, bucket_start: u64) -> Self {
        ShardKey {
            reference_name: reference_name.to_string(),
            bucket: Some(bucket_start),
        }
    }
}

impl Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bucket {
            Some(start) => write!(f, "{}_{:011}", self.reference_name, start),
            None => write!(f, "{}", self.reference_name),
        }
    }
}

impl FromStr for ShardKey {
    type Err = ExportError;

    ///
    /// Parse a discovered shard artifact name back into a typed key.
    ///
    /// A name ending in `_` plus an 11-digit bucket start is a bucketed
    /// key; anything else is a whole-reference key. Reference names may
    /// themselves contain underscores, so only the final segment is
    /// considered.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ExportError::ShardName(
                "shard name must not be empty".to_string(),
            ));
        }

        if let Some((reference_name, suffix)) = s.rsplit_once('_') {
            if suffix.len() == BUCKET_DIGITS && suffix.bytes().all(|b| b.is_ascii_digit()) {
                let bucket_start = suffix.parse::<u64>().map_err(|e| {
                    ExportError::ShardName(format!("invalid bucket suffix {suffix}: {e}"))
                })?;
                if !reference_name.is_empty() {
                    return Ok(ShardKey::bucket(reference_name, bucket_start));
                }
            }
        }

        Ok(ShardKey::whole_reference(s))
    }
}

impl Ord for ShardKey {
    ///
    /// Keys order exactly as their rendered names compare as plain
    /// strings. Composition relies on this equivalence: sorting parsed
    /// keys and sorting raw artifact names must agree.
    ///
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for ShardKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
