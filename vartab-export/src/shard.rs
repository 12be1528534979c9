use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use fxhash::FxHashMap;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use vartab_core::models::{ShardKey, VariantRecord};

///
/// How many bases of a reference sequence one shard covers.
///
/// `WholeReference` is the unbounded sentinel: one shard per reference
/// sequence, for when a true per-reference sort is affordable.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardWidth {
    WholeReference,
    Bases(u64),
}

impl FromStr for ShardWidth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            return Ok(ShardWidth::WholeReference);
        }

        let bases: u64 = s.parse().with_context(|| {
            format!("Invalid shard width {s:?}: expected a positive integer or \"all\"")
        })?;
        if bases == 0 {
            anyhow::bail!("Invalid shard width 0: shards must cover at least one base");
        }

        Ok(ShardWidth::Bases(bases))
    }
}

///
/// Map a record to the key of the shard it belongs in.
///
/// Records in the same bucket of `width` bases on the same reference
/// collide into the same shard; that is the intended partitioning. The
/// key's rendered name carries the zero-padded bucket start, so names
/// for one reference sort lexicographically in position order.
///
pub fn assign_shard_key(record: &VariantRecord, width: ShardWidth) -> ShardKey {
    match width {
        ShardWidth::WholeReference => ShardKey::whole_reference(&record.reference_name),
        ShardWidth::Bases(bases) => {
            ShardKey::bucket(&record.reference_name, record.start / bases * bases)
        }
    }
}

///
/// Group records by shard key. No ordering is assumed between keys or
/// within a group; each group is sorted later by its own shard writer.
///
pub fn group_by_shard_key(
    records: Vec<VariantRecord>,
    width: ShardWidth,
) -> FxHashMap<ShardKey, Vec<VariantRecord>> {
    let mut groups: FxHashMap<ShardKey, Vec<VariantRecord>> = FxHashMap::default();

    for record in records {
        let key = assign_shard_key(&record, width);
        groups.entry(key).or_default().push(record);
    }

    groups
}

///
/// Sort one shard's records and write them to `<dir>/<key>`.
///
/// The sort is stable on (reference name, start position), so records at
/// the same coordinate keep their input order. Call columns follow
/// `ordered_ids` exactly, one line per record.
///
pub fn write_shard(
    key: &ShardKey,
    mut records: Vec<VariantRecord>,
    dir: &Path,
    ordered_ids: &[u64],
) -> Result<PathBuf> {
    records.sort_by(|a, b| a.coordinate().cmp(&b.coordinate()));

    let path = dir.join(key.to_string());
    let file = File::create(&path)
        .with_context(|| format!("There was an error creating the shard artifact: {:?}", path))?;
    let mut writer = BufWriter::new(file);

    for record in &records {
        writeln!(writer, "{}", record.as_line(ordered_ids))
            .with_context(|| format!("There was an error writing shard artifact: {:?}", path))?;
    }
    writer.flush()?;

    Ok(path)
}

///
/// Write every shard group under `dir`, one artifact per key.
///
/// Groups are independent, so they are sorted and written in parallel;
/// any single failure aborts the run, since the composed output is
/// meaningless with a shard missing.
///
pub fn write_shards(
    groups: FxHashMap<ShardKey, Vec<VariantRecord>>,
    dir: &Path,
    ordered_ids: &[u64],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| {
        format!("There was an error creating the shard directory: {:?}", dir)
    })?;

    let pb = ProgressBar::new(groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} shards ({eta})")?
            .progress_chars("##-"),
    );

    let groups: Vec<(ShardKey, Vec<VariantRecord>)> = groups.into_iter().collect();

    let paths = groups
        .into_par_iter()
        .map(|(key, records)| {
            let path = write_shard(&key, records, dir, ordered_ids)?;
            pb.inc(1);
            Ok(path)
        })
        .collect::<Result<Vec<PathBuf>>>()?;

    pb.finish();

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn record_at(reference_name: &str, start: u64) -> VariantRecord {
        format!("{reference_name}\t{start}\t.\tA\tG\t.\t.\t.\tGT")
            .parse()
            .unwrap()
    }

    #[rstest]
    #[case(5, "chr1_00000000000")]
    #[case(15, "chr1_00000000010")]
    #[case(10_000_000_000, "chr1_10000000000")]
    fn test_assign_bucketed_key(#[case] start: u64, #[case] expected: &str) {
        let key = assign_shard_key(&record_at("chr1", start), ShardWidth::Bases(10));

        assert_eq!(key.to_string(), expected);
    }

    #[rstest]
    fn test_unbounded_width_keys_by_reference() {
        let key = assign_shard_key(&record_at("chr7", 123_456_789), ShardWidth::WholeReference);

        assert_eq!(key, ShardKey::whole_reference("chr7"));
    }

    #[rstest]
    fn test_key_order_follows_position_order() {
        // lexicographic key order must match position order for any
        // width and any magnitude
        for width in [1, 10, 1_000, 5_000_000] {
            let mut previous = assign_shard_key(&record_at("chr1", 0), ShardWidth::Bases(width));
            for start in [1, 9, 10, 99, 1_000, 123_456, 10_000_000_000] {
                let key = assign_shard_key(&record_at("chr1", start), ShardWidth::Bases(width));
                assert!(previous.to_string() <= key.to_string());
                previous = key;
            }
        }
    }

    #[rstest]
    fn test_same_bucket_records_collide() {
        let width = ShardWidth::Bases(1000);

        let a = assign_shard_key(&record_at("chr1", 0), width);
        let b = assign_shard_key(&record_at("chr1", 999), width);
        let c = assign_shard_key(&record_at("chr1", 1000), width);

        assert_eq!(a, b);
        assert_ne!(b, c);
    }

    #[rstest]
    fn test_unbounded_grouping_is_one_shard_per_reference() {
        let records = vec![
            record_at("chr1", 5),
            record_at("chr1", 500_000_000),
            record_at("chr2", 3),
            record_at("chr1", 42),
        ];

        let groups = group_by_shard_key(records, ShardWidth::WholeReference);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get(&ShardKey::whole_reference("chr1")).unwrap().len(), 3);
        assert_eq!(groups.get(&ShardKey::whole_reference("chr2")).unwrap().len(), 1);
    }

    #[rstest]
    fn test_shard_width_parsing() {
        assert_eq!("all".parse::<ShardWidth>().unwrap(), ShardWidth::WholeReference);
        assert_eq!("5000".parse::<ShardWidth>().unwrap(), ShardWidth::Bases(5000));
        assert!("0".parse::<ShardWidth>().is_err());
        assert!("many".parse::<ShardWidth>().is_err());
    }

    #[rstest]
    fn test_write_shard_sorts_records() {
        let dir = tempfile::tempdir().unwrap();
        let key = ShardKey::bucket("chr1", 0);
        let records = vec![record_at("chr1", 8), record_at("chr1", 2), record_at("chr1", 5)];

        let path = write_shard(&key, records, dir.path(), &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let starts: Vec<&str> = content
            .lines()
            .map(|line| line.split('\t').nth(1).unwrap())
            .collect();

        // written positions are 1-based
        assert_eq!(starts, vec!["3", "6", "9"]);
        assert_eq!(path.file_name().unwrap(), "chr1_00000000000");
    }

    #[rstest]
    fn test_write_shards_writes_every_group() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record_at("chr1", 5), record_at("chr1", 15), record_at("chr2", 3)];
        let groups = group_by_shard_key(records, ShardWidth::Bases(10));

        let mut paths = write_shards(groups, dir.path(), &[]).unwrap();
        paths.sort();

        let names: Vec<&str> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["chr1_00000000000", "chr1_00000000010", "chr2_00000000000"]
        );
    }
}
