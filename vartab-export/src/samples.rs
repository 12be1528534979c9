use std::collections::HashSet;

use vartab_core::errors::ExportError;
use vartab_core::models::sample::{
    sample_fingerprint, SampleIdentity, SampleMap, SampleNameEncoding,
};

///
/// Derive the stable identity for one sample.
///
/// Under [SampleNameEncoding::WithFilePath] the name is first qualified
/// with the source file path, so identical names from different files
/// produce distinct samples. The same (name, path) pair always yields
/// the same id; the id never depends on processing order.
///
pub fn compose_sample_identity(
    name: &str,
    file_path: &str,
    encoding: SampleNameEncoding,
) -> SampleIdentity {
    let name = match encoding {
        SampleNameEncoding::WithoutFilePath => name.to_string(),
        SampleNameEncoding::WithFilePath => format!("{file_path}_{name}"),
    };

    SampleIdentity {
        id: sample_fingerprint(&name),
        name,
    }
}

///
/// Reconcile the final ordered sample name list and its matching id list.
///
/// An explicit, non-empty `explicit_names` list is used verbatim, so the
/// caller controls output column order. Otherwise candidate names are
/// derived from the sample ids observed in the extracted records
/// (first-seen order), deduplicated, and sorted by ordinary string order
/// unless `preserve_order` keeps the observed order instead. Ids are
/// always re-derived from the final names through the name→id direction,
/// so the two lists cannot fall out of step.
///
/// Any name or id that does not resolve is an error: silently dropping a
/// sample would desynchronize the column header from per-record call
/// columns.
///
pub fn resolve_final_sample_names(
    explicit_names: &[String],
    observed_ids: &[u64],
    map: &SampleMap,
    preserve_order: bool,
) -> Result<(Vec<String>, Vec<u64>), ExportError> {
    let ordered_names: Vec<String> = if !explicit_names.is_empty() {
        explicit_names.to_vec()
    } else {
        let mut seen: HashSet<u64> = HashSet::new();
        let mut names: Vec<String> = Vec::new();
        for id in observed_ids {
            if !seen.insert(*id) {
                continue;
            }
            let name = map.name_of(*id).ok_or_else(|| {
                ExportError::UnresolvedSample(format!("no name registered for sample id {id}"))
            })?;
            names.push(name.to_string());
        }
        names.dedup();
        if !preserve_order {
            names.sort();
        }
        names
    };

    let mut ordered_ids: Vec<u64> = Vec::with_capacity(ordered_names.len());
    for name in &ordered_names {
        let id = map
            .id_of(name)
            .ok_or_else(|| ExportError::UnresolvedSample(name.clone()))?;
        ordered_ids.push(id);
    }

    Ok((ordered_names, ordered_ids))
}
