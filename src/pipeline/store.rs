//! Checkpoint storage for generations.
//!
//! A generation is written partition by partition and becomes readable only
//! once it has been committed with every partition present.

use crate::error::{MinerError, Result};
use crate::net::HeuristicsNet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// One stored net and the partition it was routed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub partition_key: usize,
    pub individual: HeuristicsNet,
}

impl GenerationRecord {
    pub fn new(partition_key: usize, individual: HeuristicsNet) -> Self {
        Self {
            partition_key,
            individual,
        }
    }
}

/// Durable home of the population between generations.
///
/// Implementations take `&self` so that partitions of one generation can be
/// written from parallel workers.
pub trait GenerationStore: Send + Sync {
    /// Number of partitions every generation is split into.
    fn partition_count(&self) -> usize;

    /// Writes (or overwrites) one partition of an uncommitted generation.
    fn write_partition(
        &self,
        generation: usize,
        partition: usize,
        records: &[GenerationRecord],
    ) -> Result<()>;

    /// Marks a generation complete.
    ///
    /// # Errors
    /// [`MinerError::PartialGeneration`] unless every partition was written.
    fn commit(&self, generation: usize) -> Result<()>;

    /// Whether the generation has been committed.
    fn is_complete(&self, generation: usize) -> Result<bool>;

    /// Whether anything at all was written for the generation.
    fn exists(&self, generation: usize) -> Result<bool>;

    /// Reads a committed generation, one vector per partition.
    ///
    /// # Errors
    /// [`MinerError::PartialGeneration`] if the generation is not committed.
    fn read_partitions(&self, generation: usize) -> Result<Vec<Vec<GenerationRecord>>>;

    /// Reads a committed generation as a flat list.
    fn read_generation(&self, generation: usize) -> Result<Vec<GenerationRecord>> {
        Ok(self
            .read_partitions(generation)?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Removes everything written for the generation. Absent generations
    /// are not an error.
    fn discard(&self, generation: usize) -> Result<()>;
}

impl<T: GenerationStore + ?Sized> GenerationStore for &T {
    fn partition_count(&self) -> usize {
        (**self).partition_count()
    }

    fn write_partition(
        &self,
        generation: usize,
        partition: usize,
        records: &[GenerationRecord],
    ) -> Result<()> {
        (**self).write_partition(generation, partition, records)
    }

    fn commit(&self, generation: usize) -> Result<()> {
        (**self).commit(generation)
    }

    fn is_complete(&self, generation: usize) -> Result<bool> {
        (**self).is_complete(generation)
    }

    fn exists(&self, generation: usize) -> Result<bool> {
        (**self).exists(generation)
    }

    fn read_partitions(&self, generation: usize) -> Result<Vec<Vec<GenerationRecord>>> {
        (**self).read_partitions(generation)
    }

    fn discard(&self, generation: usize) -> Result<()> {
        (**self).discard(generation)
    }
}

fn check_partition(partition: usize, partition_count: usize) -> Result<()> {
    if partition >= partition_count {
        return Err(MinerError::Configuration(format!(
            "partition {partition} out of range for {partition_count} partitions"
        )));
    }
    Ok(())
}

// ============================================================================
// Filesystem store
// ============================================================================

const SUCCESS_MARKER: &str = "_SUCCESS";

/// Stores each generation as a directory of JSON-lines partition files.
///
/// ```text
/// <root>/gen<g>/part-00000
/// <root>/gen<g>/part-00001
/// ...
/// <root>/gen<g>/_SUCCESS
/// ```
///
/// Partition files are written under a temporary name and renamed into
/// place; the `_SUCCESS` marker is written last by [`commit`].
///
/// [`commit`]: GenerationStore::commit
#[derive(Debug, Clone)]
pub struct FsGenerationStore {
    root: PathBuf,
    partitions: usize,
}

impl FsGenerationStore {
    pub fn new(root: impl Into<PathBuf>, partitions: usize) -> Self {
        Self {
            root: root.into(),
            partitions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn generation_dir(&self, generation: usize) -> PathBuf {
        self.root.join(format!("gen{generation}"))
    }

    fn partition_path(&self, generation: usize, partition: usize) -> PathBuf {
        self.generation_dir(generation)
            .join(format!("part-{partition:05}"))
    }

    fn written_partitions(&self, generation: usize) -> usize {
        (0..self.partitions)
            .filter(|&p| self.partition_path(generation, p).is_file())
            .count()
    }
}

impl GenerationStore for FsGenerationStore {
    fn partition_count(&self) -> usize {
        self.partitions
    }

    fn write_partition(
        &self,
        generation: usize,
        partition: usize,
        records: &[GenerationRecord],
    ) -> Result<()> {
        check_partition(partition, self.partitions)?;
        let dir = self.generation_dir(generation);
        fs::create_dir_all(&dir).map_err(|e| MinerError::io(&dir, e))?;
        write_json_lines(&self.partition_path(generation, partition), records)?;
        debug!(generation, partition, records = records.len(), "partition written");
        Ok(())
    }

    fn commit(&self, generation: usize) -> Result<()> {
        let written = self.written_partitions(generation);
        if written != self.partitions {
            return Err(MinerError::PartialGeneration {
                generation,
                written,
                expected: self.partitions,
            });
        }
        let marker = self.generation_dir(generation).join(SUCCESS_MARKER);
        File::create(&marker)
            .and_then(|f| f.sync_all())
            .map_err(|e| MinerError::io(&marker, e))
    }

    fn is_complete(&self, generation: usize) -> Result<bool> {
        Ok(self
            .generation_dir(generation)
            .join(SUCCESS_MARKER)
            .is_file())
    }

    fn exists(&self, generation: usize) -> Result<bool> {
        Ok(self.generation_dir(generation).exists())
    }

    fn read_partitions(&self, generation: usize) -> Result<Vec<Vec<GenerationRecord>>> {
        if !self.is_complete(generation)? {
            return Err(MinerError::PartialGeneration {
                generation,
                written: self.written_partitions(generation),
                expected: self.partitions,
            });
        }
        (0..self.partitions)
            .map(|p| read_json_lines(&self.partition_path(generation, p)))
            .collect()
    }

    fn discard(&self, generation: usize) -> Result<()> {
        let dir = self.generation_dir(generation);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MinerError::io(&dir, e)),
        }
    }
}

/// Writes one JSON document per line to a temporary file, syncs it and
/// renames it to `path`.
pub(crate) fn write_json_lines<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    let file = File::create(&temp).map_err(|e| MinerError::io(&temp, e))?;
    let mut out = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n").map_err(|e| MinerError::io(&temp, e))?;
    }
    let file = out
        .into_inner()
        .map_err(|e| MinerError::io(&temp, e.into_error()))?;
    file.sync_all().map_err(|e| MinerError::io(&temp, e))?;
    fs::rename(&temp, path).map_err(|e| MinerError::io(path, e))
}

pub(crate) fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| MinerError::io(path, e))?;
    let mut items = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| MinerError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        items.push(serde_json::from_str(&line)?);
    }
    Ok(items)
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Default)]
struct MemoryGeneration {
    partitions: BTreeMap<usize, Vec<GenerationRecord>>,
    committed: bool,
}

/// Keeps generations in process memory.
#[derive(Debug)]
pub struct MemoryGenerationStore {
    partitions: usize,
    generations: Mutex<BTreeMap<usize, MemoryGeneration>>,
}

impl MemoryGenerationStore {
    pub fn new(partitions: usize) -> Self {
        Self {
            partitions,
            generations: Mutex::new(BTreeMap::new()),
        }
    }

    fn with_generations<T>(&self, f: impl FnOnce(&mut BTreeMap<usize, MemoryGeneration>) -> T) -> T {
        let mut guard = self.generations.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl GenerationStore for MemoryGenerationStore {
    fn partition_count(&self) -> usize {
        self.partitions
    }

    fn write_partition(
        &self,
        generation: usize,
        partition: usize,
        records: &[GenerationRecord],
    ) -> Result<()> {
        check_partition(partition, self.partitions)?;
        self.with_generations(|gens| {
            gens.entry(generation)
                .or_default()
                .partitions
                .insert(partition, records.to_vec());
        });
        Ok(())
    }

    fn commit(&self, generation: usize) -> Result<()> {
        let expected = self.partitions;
        self.with_generations(|gens| {
            let written = gens.get(&generation).map_or(0, |g| g.partitions.len());
            if written != expected {
                return Err(MinerError::PartialGeneration {
                    generation,
                    written,
                    expected,
                });
            }
            if let Some(g) = gens.get_mut(&generation) {
                g.committed = true;
            }
            Ok(())
        })
    }

    fn is_complete(&self, generation: usize) -> Result<bool> {
        Ok(self.with_generations(|gens| gens.get(&generation).is_some_and(|g| g.committed)))
    }

    fn exists(&self, generation: usize) -> Result<bool> {
        Ok(self.with_generations(|gens| gens.contains_key(&generation)))
    }

    fn read_partitions(&self, generation: usize) -> Result<Vec<Vec<GenerationRecord>>> {
        let expected = self.partitions;
        self.with_generations(|gens| match gens.get(&generation) {
            Some(g) if g.committed => Ok(g.partitions.values().cloned().collect()),
            other => Err(MinerError::PartialGeneration {
                generation,
                written: other.map_or(0, |g| g.partitions.len()),
                expected,
            }),
        })
    }

    fn discard(&self, generation: usize) -> Result<()> {
        self.with_generations(|gens| gens.remove(&generation));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
