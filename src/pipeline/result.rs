//! Final result set of a run.

use super::store::{read_json_lines, write_json_lines};
use crate::error::{MinerError, Result};
use crate::net::HeuristicsNet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A net of the final generation with its position in the result set.
///
/// Ranks start at 1 and follow ascending fitness, so the fittest net has
/// the highest rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNet {
    pub rank: usize,
    pub individual: HeuristicsNet,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct MinerResult {
    /// Best nets of the last generation, ascending by fitness.
    pub ranked: Vec<RankedNet>,

    /// Last generation evolved.
    pub generations: usize,

    /// Last committed generation found in the store when the run resumed.
    pub resumed_from: Option<usize>,

    /// Best fitness seen in each evaluation stage, then in the final
    /// collection.
    pub fitness_history: Vec<f64>,
}

impl MinerResult {
    /// The fittest net, if any.
    pub fn best(&self) -> Option<&RankedNet> {
        self.ranked.last()
    }
}

/// Keeps the best `limit` nets, ascending by fitness, and ranks them
/// `1..=limit` by position.
///
/// Nets without a fitness sort before every evaluated net.
pub fn rank_population(mut nets: Vec<HeuristicsNet>, limit: usize) -> Vec<RankedNet> {
    nets.sort_by(|a, b| {
        let fa = a.fitness().unwrap_or(f64::NEG_INFINITY);
        let fb = b.fitness().unwrap_or(f64::NEG_INFINITY);
        fa.partial_cmp(&fb).unwrap_or(std::cmp::Ordering::Equal)
    });
    let skip = nets.len().saturating_sub(limit);
    nets.into_iter()
        .skip(skip)
        .enumerate()
        .map(|(i, individual)| RankedNet {
            rank: i + 1,
            individual,
        })
        .collect()
}

/// File name of the result artifact for a run started at `timestamp`.
pub fn result_file_name(timestamp: &str) -> String {
    format!("result_at_{timestamp}")
}

/// Writes `<output_dir>/result_at_<timestamp>` as JSON lines.
pub fn write_result(output_dir: &Path, timestamp: &str, ranked: &[RankedNet]) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| MinerError::io(output_dir, e))?;
    let path = output_dir.join(result_file_name(timestamp));
    write_json_lines(&path, ranked)?;
    Ok(path)
}

/// Reads a result artifact back.
pub fn read_result(path: &Path) -> Result<Vec<RankedNet>> {
    read_json_lines(path)
}
