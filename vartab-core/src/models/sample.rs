use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use md5::{Digest, Md5};

use crate::errors::ExportError;
use crate::utils::get_dynamic_reader;

///
/// How a sample's stable id is derived from its human-readable name.
///
/// `WithFilePath` qualifies the name with the source file path first, so
/// identical names coming from different files stay distinct samples.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleNameEncoding {
    WithoutFilePath,
    WithFilePath,
}

///
/// The pairing of a stable opaque id and a human-readable name for one
/// biological sample.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIdentity {
    pub id: u64,
    pub name: String,
}

///
/// Stable fingerprint of a (possibly path-qualified) sample name.
///
/// The id must be identical across repeated runs on identical input and
/// must not depend on processing order, so it is a pure digest of the
/// name: the first 8 bytes of its md5, big-endian.
///
pub fn sample_fingerprint(name: &str) -> u64 {
    let mut hasher = Md5::new();
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut id_bytes = [0u8; 8];
    id_bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(id_bytes)
}

///
/// Bidirectional sample identity map.
///
/// Both directions are populated by the single [SampleMap::insert] path,
/// so id→name and name→id cannot disagree: a name maps to exactly one id
/// and vice versa, or construction fails.
///
#[derive(Debug, Default)]
pub struct SampleMap {
    id_to_name: HashMap<u64, String>,
    name_to_id: HashMap<String, u64>,
}

impl SampleMap {
    pub fn new() -> Self {
        SampleMap::default()
    }

    ///
    /// Register one (id, name) pairing.
    ///
    /// Re-inserting an identical pairing is a no-op; a pairing that
    /// contradicts either direction is rejected.
    ///
    pub fn insert(&mut self, id: u64, name: &str) -> Result<(), ExportError> {
        if let Some(existing) = self.id_to_name.get(&id) {
            if existing != name {
                return Err(ExportError::SampleConflict(format!(
                    "id {id} maps to both {existing:?} and {name:?}"
                )));
            }
        }
        if let Some(existing) = self.name_to_id.get(name) {
            if *existing != id {
                return Err(ExportError::SampleConflict(format!(
                    "name {name:?} maps to both ids {existing} and {id}"
                )));
            }
        }

        self.id_to_name.insert(id, name.to_string());
        self.name_to_id.insert(name.to_string(), id);

        Ok(())
    }

    pub fn name_of(&self, id: u64) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<u64> {
        self.name_to_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }

    ///
    /// Build the map from a sample identity table file.
    ///
    /// Each line carries `sample_id <TAB> sample_name` with an optional
    /// trailing source file path column, which only disambiguates the
    /// name and is not stored.
    ///
    /// # Arguments:
    /// - path: path to the sample table (tsv, optionally gzipped)
    ///
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;

        let mut map = SampleMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line
                .with_context(|| format!("There was an error reading line {}", index + 1))?;

            let mut parts = line.split('\t');

            let id = parts.next();
            let name = parts.next();

            if let (Some(id), Some(name)) = (id, name) {
                let id: u64 = id.parse().with_context(|| {
                    format!("Error parsing sample id: {id:?}. It must be coercible to a u64 datatype.")
                })?;

                map.insert(id, name)?;
            } else {
                anyhow::bail!(
                    "Invalid line format: Expected at least two tab-separated values, found: {:?}",
                    line
                );
            }
        }

        Ok(map)
    }
}
