use std::str::FromStr;

use fxhash::FxHashMap;

use crate::errors::ExportError;

/// Placeholder call emitted for samples with no genotype data on a record.
pub const MISSING_CALL: &str = "./.";

/// Number of fixed (non-call) columns in a serialized record line.
pub const FIXED_FIELD_COUNT: usize = 9;

///
/// One variant row from the source table.
///
/// `start` is 0-based, as the source table stores it; serialization
/// writes the conventional 1-based position. The encoded column values
/// (alternate bases, info, format, per-sample calls) pass through
/// opaquely; their inner grammar is owned by the record formatter that
/// produced the table.
///
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub reference_name: String,
    pub start: u64,
    pub names: String,
    pub reference_bases: String,
    pub alternate_bases: String,
    pub quality: String,
    pub filters: String,
    pub info: String,
    pub format: String,

    /// Per-sample call strings keyed by stable sample id.
    pub calls: FxHashMap<u64, String>,
}

impl VariantRecord {
    ///
    /// The record's ordering key: records sort by reference name, then
    /// 0-based start position.
    ///
    pub fn coordinate(&self) -> (&str, u64) {
        (&self.reference_name, self.start)
    }

    ///
    /// Serialize the record to one output line.
    ///
    /// Fixed columns are tab-separated, followed by one call column per
    /// entry of `ordered_ids`, in that exact order. Samples without a
    /// call on this record are densified to [MISSING_CALL] so every line
    /// has the same column count as the header.
    ///
    pub fn as_line(&self, ordered_ids: &[u64]) -> String {
        let position = (self.start + 1).to_string();

        let mut fields: Vec<&str> = Vec::with_capacity(FIXED_FIELD_COUNT + ordered_ids.len());
        fields.push(&self.reference_name);
        fields.push(&position);
        fields.push(&self.names);
        fields.push(&self.reference_bases);
        fields.push(&self.alternate_bases);
        fields.push(&self.quality);
        fields.push(&self.filters);
        fields.push(&self.info);
        fields.push(&self.format);

        for id in ordered_ids {
            fields.push(self.calls.get(id).map_or(MISSING_CALL, String::as_str));
        }

        fields.join("\t")
    }
}

impl FromStr for VariantRecord {
    type Err = ExportError;

    ///
    /// Parse one row of the extracted record stream.
    ///
    /// Rows carry the nine fixed columns, tab-separated, followed by
    /// zero or more `sample_id=call` tokens.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('\t').collect();
        if parts.len() < FIXED_FIELD_COUNT {
            return Err(ExportError::RecordParse(format!(
                "expected at least {FIXED_FIELD_COUNT} tab-separated fields, found {}: {s}",
                parts.len()
            )));
        }

        let start = parts[1]
            .parse::<u64>()
            .map_err(|e| ExportError::RecordParse(format!("invalid start position {}: {e}", parts[1])))?;

        let mut calls = FxHashMap::default();
        for token in &parts[FIXED_FIELD_COUNT..] {
            let (id, call) = token.split_once('=').ok_or_else(|| {
                ExportError::RecordParse(format!("invalid call token {token}: expected sample_id=call"))
            })?;
            let id = id
                .parse::<u64>()
                .map_err(|e| ExportError::RecordParse(format!("invalid sample id {id}: {e}")))?;
            calls.insert(id, call.to_string());
        }

        Ok(VariantRecord {
            reference_name: parts[0].to_string(),
            start,
            names: parts[2].to_string(),
            reference_bases: parts[3].to_string(),
            alternate_bases: parts[4].to_string(),
            quality: parts[5].to_string(),
            filters: parts[6].to_string(),
            info: parts[7].to_string(),
            format: parts[8].to_string(),
            calls,
        })
    }
}
