use std::str::FromStr;

use vartab_core::errors::ExportError;
use vartab_core::models::VariantRecord;

///
/// One region request of the form `reference:start-end`.
///
/// Both bounds are inclusive and apply to a record's 0-based start
/// position: a record matches when `start <= record.start <= end`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicRegion {
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicRegion {
    pub fn contains(&self, record: &VariantRecord) -> bool {
        record.reference_name == self.reference_name
            && record.start >= self.start
            && record.start <= self.end
    }
}

impl FromStr for GenomicRegion {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (reference_name, range) = s.rsplit_once(':').ok_or_else(|| {
            ExportError::RegionParse(format!("{s:?} is missing a reference name"))
        })?;

        if reference_name.is_empty() {
            return Err(ExportError::RegionParse(format!(
                "{s:?} is missing a reference name"
            )));
        }

        let (start, end) = range.split_once('-').ok_or_else(|| {
            ExportError::RegionParse(format!("{s:?} is missing a start-end range"))
        })?;

        let start = start
            .parse::<u64>()
            .map_err(|e| ExportError::RegionParse(format!("invalid start bound {start:?}: {e}")))?;
        let end = end
            .parse::<u64>()
            .map_err(|e| ExportError::RegionParse(format!("invalid end bound {end:?}: {e}")))?;

        if end < start {
            return Err(ExportError::RegionParse(format!(
                "end bound {end} is before start bound {start}"
            )));
        }

        Ok(GenomicRegion {
            reference_name: reference_name.to_string(),
            start,
            end,
        })
    }
}

///
/// Selection predicate over the extracted record stream.
///
/// Built eagerly from all region strings before any extraction begins,
/// so a malformed region fails the run up front. Per-region conditions
/// combine with OR; an empty request list selects everything.
///
#[derive(Debug, Default)]
pub struct RegionFilter {
    regions: Vec<GenomicRegion>,
}

impl RegionFilter {
    pub fn new(specs: &[String]) -> Result<Self, ExportError> {
        let regions = specs
            .iter()
            .map(|spec| spec.parse())
            .collect::<Result<Vec<GenomicRegion>, ExportError>>()?;

        Ok(RegionFilter { regions })
    }

    pub fn matches(&self, record: &VariantRecord) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|region| region.contains(record))
    }
}
