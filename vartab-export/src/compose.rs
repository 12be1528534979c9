use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use vartab_core::models::ShardKey;

///
/// Storage target for shard discovery and final composition.
///
/// The composer drives every storage operation through this interface so
/// the same ordered-concatenation contract holds for a local filesystem
/// and for a remote object store: bytes staged for the output become
/// visible only when `finalize` succeeds, and a failed run leaves no
/// partial output behind. Remote semantics live entirely in the
/// implementing collaborator.
///
pub trait ShardStore {
    /// Names of the shard artifacts currently in `dir`.
    fn list(&self, dir: &Path) -> Result<Vec<String>>;

    /// Open one artifact for reading. A discovered-but-unreadable
    /// artifact is an error, never skipped.
    fn open(&self, path: &Path) -> Result<Box<dyn Read>>;

    /// Begin staging bytes for `output`. Staged bytes must not be
    /// visible at `output` until `finalize`.
    fn stage(&self, output: &Path) -> Result<Box<dyn Write>>;

    /// Atomically publish previously staged bytes at `output`.
    fn finalize(&self, output: &Path) -> Result<()>;

    /// Drop any staged bytes after a failed composition.
    fn discard(&self, output: &Path) -> Result<()>;
}

fn staging_path(output: &Path) -> PathBuf {
    let mut staged = output.as_os_str().to_os_string();
    staged.push(".tmp");
    PathBuf::from(staged)
}

///
/// Local filesystem store. Staging writes to a `.tmp` sibling that is
/// renamed over the output on finalize, which is as atomic as the local
/// filesystem allows.
///
#[derive(Debug, Default)]
pub struct LocalStore;

impl ShardStore for LocalStore {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(dir).with_context(|| {
            format!("There was an error reading the shard directory: {:?}", dir)
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let name = entry.file_name().into_string().map_err(|name| {
                    anyhow::anyhow!("Shard artifact name is not valid UTF-8: {:?}", name)
                })?;
                names.push(name);
            }
        }

        Ok(names)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        let file = File::open(path)
            .with_context(|| format!("Missing or unreadable shard artifact: {:?}", path))?;
        Ok(Box::new(file))
    }

    fn stage(&self, output: &Path) -> Result<Box<dyn Write>> {
        let staged = staging_path(output);
        let file = File::create(&staged).with_context(|| {
            format!("There was an error creating the staged output: {:?}", staged)
        })?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn finalize(&self, output: &Path) -> Result<()> {
        fs::rename(staging_path(output), output).with_context(|| {
            format!("There was an error publishing the output artifact: {:?}", output)
        })?;
        Ok(())
    }

    fn discard(&self, output: &Path) -> Result<()> {
        let staged = staging_path(output);
        if staged.exists() {
            fs::remove_file(&staged)?;
        }
        Ok(())
    }
}

///
/// Concatenate the header artifact and every shard artifact, in
/// ascending key order, into one output artifact.
///
/// Discovered names are parsed into typed [ShardKey]s and sorted by the
/// key's total order, which matches plain string order of the names by
/// construction. Shard content streams through untouched: no re-sorting,
/// no line modification. Any missing or unreadable shard aborts the
/// composition and no output artifact is produced.
///
pub fn compose_shards<S: ShardStore>(
    store: &S,
    header: &Path,
    shard_dir: &Path,
    output: &Path,
) -> Result<()> {
    let mut keys = store
        .list(shard_dir)?
        .iter()
        .map(|name| name.parse())
        .collect::<Result<Vec<ShardKey>, _>>()?;
    keys.sort();

    let result = stream_artifacts(store, &keys, header, shard_dir, output);
    if result.is_err() {
        // keep failure contract: no partial output left behind
        let _ = store.discard(output);
        return result;
    }

    store.finalize(output)
}

fn stream_artifacts<S: ShardStore>(
    store: &S,
    keys: &[ShardKey],
    header: &Path,
    shard_dir: &Path,
    output: &Path,
) -> Result<()> {
    let mut writer = store.stage(output)?;

    let mut reader = store.open(header)?;
    io::copy(&mut reader, &mut writer)
        .with_context(|| format!("There was an error copying the header artifact: {:?}", header))?;

    for key in keys {
        let path = shard_dir.join(key.to_string());
        let mut reader = store.open(&path)?;
        io::copy(&mut reader, &mut writer)
            .with_context(|| format!("There was an error copying shard artifact: {:?}", path))?;
    }

    writer.flush()?;

    Ok(())
}
