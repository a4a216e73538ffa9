//! Syndrome decoding against a coset-leader table.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::code::generator::ParityCheckMatrix;
use crate::code::matrix::{apply_pattern, syndrome, Syndrome};
use crate::coset_core::CosetLeaderTable;
use crate::error::{check_length, CodecError, Result};
use crate::types::{Symbol, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStrategy {
    /// Subtract the coset leader of the received word's syndrome.
    #[default]
    Table,
    /// One left-to-right pass of leader-weight-reducing bit flips.
    Greedy,
}

impl std::fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DecodeStrategy::Table => write!(f, "table"),
            DecodeStrategy::Greedy => write!(f, "greedy"),
        }
    }
}

impl FromStr for DecodeStrategy {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "table" => Ok(DecodeStrategy::Table),
            "greedy" | "incremental" => Ok(DecodeStrategy::Greedy),
            other => Err(CodecError::Config(format!("unknown decoder '{}'", other))),
        }
    }
}

/// A table built for another parity-check matrix has no leader for `s`.
fn check_table(h: &ParityCheckMatrix, table: &CosetLeaderTable, s: &Syndrome) -> Result<()> {
    if table.n() != h.n() || table.redundancy() != h.redundancy() {
        return Err(CodecError::DecodeError(s.index()));
    }
    Ok(())
}

/// Corrects `r` by its coset leader. A word with zero syndrome is returned as is.
pub fn decode(r: &[Symbol], h: &ParityCheckMatrix, table: &CosetLeaderTable) -> Result<Word> {
    let s = syndrome(h, r)?;
    check_table(h, table, &s)?;
    if s.is_zero() {
        return Ok(r.to_vec());
    }

    let pattern = table.lookup_pattern(&s).ok_or(CodecError::DecodeError(s.index()))?;
    apply_pattern(r, &pattern)
}

/// Greedy bit-flip correction.
///
/// Walks positions `0..n` once. Each bit is flipped tentatively and the flip kept
/// only if the coset-leader weight of the new syndrome is strictly smaller. Stops
/// as soon as the weight reaches zero.
///
/// Known limitation: this is a single pass and is never repeated to reach a
/// fixed point. A flip is accepted only when position `i` belongs to some
/// minimum-weight pattern of the current syndrome, so with a table of true
/// minimum weights the pass accepts exactly `weight` flips.
pub fn decode_incremental(r: &[Symbol], h: &ParityCheckMatrix, table: &CosetLeaderTable) -> Result<Word> {
    let s = syndrome(h, r)?;
    check_table(h, table, &s)?;
    let mut weight = table.leader_weight(&s)?;
    let mut word = r.to_vec();

    for i in 0..word.len() {
        if weight == 0 {
            break;
        }

        word[i] ^= 1;
        let candidate = table.leader_weight(&syndrome(h, &word)?)?;
        if candidate < weight {
            weight = candidate;
        } else {
            word[i] ^= 1;
        }
    }

    Ok(word)
}

/// The leading `k` symbols of a corrected word.
pub fn extract_message(corrected: &[Symbol], k: usize) -> Result<Word> {
    if corrected.len() < k {
        return Err(CodecError::InputLengthMismatch { expected: k, actual: corrected.len() });
    }
    Ok(corrected[..k].to_vec())
}

/// Decodes with the chosen strategy.
pub fn decode_with(strategy: DecodeStrategy, r: &[Symbol], h: &ParityCheckMatrix, table: &CosetLeaderTable) -> Result<Word> {
    check_length(h.n(), r.len())?;
    match strategy {
        DecodeStrategy::Table => decode(r, h, table),
        DecodeStrategy::Greedy => decode_incremental(r, h, table),
    }
}
