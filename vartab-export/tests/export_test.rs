use std::fs;
use std::path::{Path, PathBuf};

use rstest::*;
use tempfile::tempdir;

use vartab_export::pipeline::{run_export, ExportConfig, ExportSummary};
use vartab_export::shard::ShardWidth;

fn write_input(dir: &Path, lines: &[&str]) -> PathBuf {
    let input = dir.join("records.tsv");
    fs::write(&input, lines.join("\n")).unwrap();
    input
}

fn write_sample_table(dir: &Path, rows: &[(u64, &str)]) -> PathBuf {
    let table = dir.join("samples.tsv");
    let content: Vec<String> = rows
        .iter()
        .map(|(id, name)| format!("{id}\t{name}\tgs://bucket/source.vcf"))
        .collect();
    fs::write(&table, content.join("\n")).unwrap();
    table
}

fn config(dir: &Path, input: PathBuf, sample_table: PathBuf) -> ExportConfig {
    ExportConfig {
        input,
        sample_table,
        output: dir.join("out.vcf"),
        schema: None,
        representative_header: None,
        regions: Vec::new(),
        shard_width: ShardWidth::Bases(10),
        sample_names: Vec::new(),
        preserve_sample_order: false,
        strict_schema: false,
        temp_dir: dir.to_path_buf(),
    }
}

fn data_lines(output: &Path) -> Vec<String> {
    fs::read_to_string(output)
        .unwrap()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

fn coordinates(lines: &[String]) -> Vec<(String, u64)> {
    lines
        .iter()
        .map(|line| {
            let mut parts = line.split('\t');
            let reference = parts.next().unwrap().to_string();
            let position: u64 = parts.next().unwrap().parse().unwrap();
            (reference, position)
        })
        .collect()
}

#[rstest]
fn test_export_reconstructs_global_order_without_global_sort() {
    let dir = tempdir().unwrap();

    // deliberately unordered across and within references
    let input = write_input(
        dir.path(),
        &[
            "chr1\t15\t.\tC\tT\t.\tPASS\t.\tGT\t1=0|1",
            "chr2\t3\t.\tG\tA\t.\tPASS\t.\tGT\t2=1|1",
            "chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT\t1=0|0\t2=0|1",
        ],
    );
    let samples = write_sample_table(dir.path(), &[(1, "A"), (2, "B")]);
    let cfg = config(dir.path(), input, samples);

    let summary = run_export(&cfg).unwrap();

    assert_eq!(
        summary,
        ExportSummary {
            records: 3,
            shards: 3,
            samples: 2,
        }
    );

    let lines = data_lines(&cfg.output);
    // composed order equals a direct full sort by (reference, start);
    // positions are 1-based on output
    assert_eq!(
        coordinates(&lines),
        vec![
            ("chr1".to_string(), 6),
            ("chr1".to_string(), 16),
            ("chr2".to_string(), 4),
        ]
    );

    // densified calls follow the resolved sample order A, B
    assert_eq!(lines[0], "chr1\t6\t.\tA\tG\t.\tPASS\t.\tGT\t0|0\t0|1");
    assert_eq!(lines[1], "chr1\t16\t.\tC\tT\t.\tPASS\t.\tGT\t0|1\t./.");

    // scratch directory is gone after a successful run
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("vartab_"))
        .collect();
    assert!(leftovers.is_empty());
}

#[rstest]
fn test_explicit_sample_names_control_column_order() {
    let dir = tempdir().unwrap();

    let input = write_input(
        dir.path(),
        &["chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT\t1=0|0\t2=0|1"],
    );
    let samples = write_sample_table(dir.path(), &[(1, "A"), (2, "B")]);
    let mut cfg = config(dir.path(), input, samples);
    cfg.sample_names = vec!["B".to_string(), "A".to_string()];

    run_export(&cfg).unwrap();

    let content = fs::read_to_string(&cfg.output).unwrap();
    let header_line = content
        .lines()
        .find(|line| line.starts_with("#CHROM"))
        .unwrap();

    // explicit order is preserved even though alphabetical order differs
    assert_eq!(
        header_line,
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tB\tA"
    );

    // call columns were reordered to match: B's call first
    let lines = data_lines(&cfg.output);
    assert_eq!(lines[0], "chr1\t6\t.\tA\tG\t.\tPASS\t.\tGT\t0|1\t0|0");
}

#[rstest]
fn test_unbounded_width_is_one_shard_per_reference() {
    let dir = tempdir().unwrap();

    let input = write_input(
        dir.path(),
        &[
            "chr1\t500000000\t.\tC\tT\t.\tPASS\t.\tGT\t1=0|1",
            "chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT\t1=0|0",
            "chr2\t3\t.\tG\tA\t.\tPASS\t.\tGT\t1=1|1",
        ],
    );
    let samples = write_sample_table(dir.path(), &[(1, "A")]);
    let mut cfg = config(dir.path(), input, samples);
    cfg.shard_width = ShardWidth::WholeReference;

    let summary = run_export(&cfg).unwrap();

    assert_eq!(summary.shards, 2);
    assert_eq!(
        coordinates(&data_lines(&cfg.output)),
        vec![
            ("chr1".to_string(), 6),
            ("chr1".to_string(), 500000001),
            ("chr2".to_string(), 4),
        ]
    );
}

#[rstest]
fn test_region_filter_limits_output() {
    let dir = tempdir().unwrap();

    let input = write_input(
        dir.path(),
        &[
            "chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT\t1=0|0",
            "chr1\t15\t.\tC\tT\t.\tPASS\t.\tGT\t1=0|1",
            "chr2\t3\t.\tG\tA\t.\tPASS\t.\tGT\t1=1|1",
        ],
    );
    let samples = write_sample_table(dir.path(), &[(1, "A")]);
    let mut cfg = config(dir.path(), input, samples);
    cfg.regions = vec!["chr1:0-9".to_string()];

    let summary = run_export(&cfg).unwrap();

    assert_eq!(summary.records, 1);
    assert_eq!(coordinates(&data_lines(&cfg.output)), vec![("chr1".to_string(), 6)]);
}

#[rstest]
fn test_malformed_region_fails_before_any_output() {
    let dir = tempdir().unwrap();

    let input = write_input(dir.path(), &["chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT\t1=0|0"]);
    let samples = write_sample_table(dir.path(), &[(1, "A")]);
    let mut cfg = config(dir.path(), input, samples);
    cfg.regions = vec!["chr1:ten-20".to_string()];

    let result = run_export(&cfg);

    assert!(result.is_err());
    assert!(!cfg.output.exists());
}

#[rstest]
fn test_unresolved_sample_aborts_run() {
    let dir = tempdir().unwrap();

    // record carries sample id 9, which the table does not know
    let input = write_input(dir.path(), &["chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT\t9=0|0"]);
    let samples = write_sample_table(dir.path(), &[(1, "A")]);
    let cfg = config(dir.path(), input, samples);

    let result = run_export(&cfg);

    assert!(result.is_err());
    assert!(!cfg.output.exists());
}

#[rstest]
fn test_representative_header_meta_lines_pass_through() {
    let dir = tempdir().unwrap();

    let representative = dir.path().join("rep.vcf");
    fs::write(
        &representative,
        "##fileformat=VCFv4.3\n##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Depth\">\n",
    )
    .unwrap();

    let input = write_input(dir.path(), &["chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT\t1=0|0"]);
    let samples = write_sample_table(dir.path(), &[(1, "A")]);
    let mut cfg = config(dir.path(), input, samples);
    cfg.representative_header = Some(representative);

    run_export(&cfg).unwrap();

    let content = fs::read_to_string(&cfg.output).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines[0], "##fileformat=VCFv4.3");
    assert_eq!(
        lines[1],
        "##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Depth\">"
    );
    assert!(lines[2].starts_with("#CHROM"));
}
