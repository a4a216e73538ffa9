//! Coset-leader (standard array) table shared by all build strategies.
//!
//! A table maps every one of the `2^(n-k)` syndromes of a parity-check matrix to
//! a minimum-weight error pattern producing it. Syndromes are packed into
//! integers (see [`Syndrome::index`]) and used directly as slot indices, so the
//! table never stores a syndrome. Each slot holds its leader weight and the
//! leader's positions as a bitmask of `ceil(n / 64)` words; [`CosetLeader`]
//! values are expanded from a slot only when a caller asks for one.
//!
//! Strategies implement [`TableStrategy`] and fill a [`SlotTable`]; this module
//! validates the input, checks that every syndrome is covered and freezes the
//! slots into a [`CosetLeaderTable`].

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::mem::size_of;
use std::str::FromStr;
use std::time::Instant;

use crate::code::generator::ParityCheckMatrix;
use crate::code::matrix::{column_syndromes, Syndrome};
use crate::coset::{ExhaustiveStrategy, WeightOrderedStrategy};
use crate::coset_parallel::ParallelStrategy;
use crate::error::{CodecError, Result};
use crate::logging::is_verbose;
use crate::types::{BuildMetrics, Symbol, Word};
use crate::{log_success, log_verbose};

/// Largest supported `n - k`. The table has `2^(n-k)` slots.
pub const MAX_REDUNDANCY: usize = 24;

/// Largest codeword length the exhaustive strategy will enumerate (`2^n` patterns).
pub const MAX_EXHAUSTIVE_LENGTH: usize = 24;

/// Largest codeword length any strategy accepts. Slot weights are stored as `u16`.
pub const MAX_CODE_LENGTH: usize = 4096;

const UNASSIGNED: u16 = u16::MAX;
const MASK_BITS: usize = u64::BITS as usize;

/// Creates a progress bar for a table build.
///
/// The bar draws to stderr with `template` only in verbose mode; otherwise it is
/// hidden and just counts, so callers can still read its position afterwards.
pub fn create_progress_bar(total: u64, template: &str) -> ProgressBar {
    if !is_verbose() {
        return ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden());
    }
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}

/// Progress bar templates for different operations
pub mod progress_templates {
    pub const WEIGHT_CLASSES: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} weight classes scanned ({percent}%)";
    pub const PATTERNS: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} patterns ({percent}%) {eta}";
}

/// One table entry, expanded on demand from the packed slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CosetLeader {
    pub syndrome: Syndrome,
    pub pattern: Word,
    pub weight: usize,
}

fn mask_words(n: usize) -> usize {
    n.div_ceil(MASK_BITS).max(1)
}

fn unpack(mask: &[u64], n: usize) -> Word {
    (0..n).map(|j| ((mask[j / MASK_BITS] >> (j % MASK_BITS)) & 1) as Symbol).collect()
}

/// Working state of a table under construction.
///
/// Every slot starts unassigned, which reads as weight `n + 1`. A pattern is
/// accepted only if it is strictly lighter than what the slot already holds, so
/// the first minimum-weight pattern offered for a syndrome is the one that stays.
pub struct SlotTable {
    n: usize,
    words: usize,
    weights: Vec<u16>,
    masks: Vec<u64>,
    assigned: usize,
    patterns_examined: u64,
}

impl SlotTable {
    pub fn new(slot_count: usize, n: usize) -> Self {
        let words = mask_words(n);
        SlotTable {
            n,
            words,
            weights: vec![UNASSIGNED; slot_count],
            masks: vec![0; slot_count * words],
            assigned: 0,
            patterns_examined: 0,
        }
    }

    /// Offers the pattern with ones at `positions` for slot `index`.
    pub fn offer(&mut self, index: usize, positions: &[usize]) -> bool {
        let weight = positions.len();
        if self.weight(index) <= weight {
            return false;
        }
        if self.weights[index] == UNASSIGNED {
            self.assigned += 1;
        }
        self.weights[index] = weight as u16;

        let mask = &mut self.masks[index * self.words..(index + 1) * self.words];
        mask.fill(0);
        for &p in positions {
            mask[p / MASK_BITS] |= 1 << (p % MASK_BITS);
        }
        true
    }

    pub fn weight(&self, index: usize) -> usize {
        match self.weights[index] {
            UNASSIGNED => self.n + 1,
            w => w as usize,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.weights.len()
    }

    pub fn assigned(&self) -> usize {
        self.assigned
    }

    pub fn is_complete(&self) -> bool {
        self.assigned == self.weights.len()
    }

    pub fn record_examined(&mut self, count: u64) {
        self.patterns_examined += count;
    }
}

/// How a strategy walks the space of error patterns.
pub trait TableStrategy {
    const NAME: &'static str;

    /// Template for the verbose progress bar.
    const PROGRESS_TEMPLATE: &'static str = progress_templates::WEIGHT_CLASSES;

    /// Progress units for a code of length `n`; one per weight class by default.
    fn progress_length(n: usize) -> u64 {
        n as u64 + 1
    }

    /// Offers candidate patterns to `slots` until it is complete or the strategy is exhausted.
    ///
    /// `columns[j]` is the packed syndrome of a single error at position `j`; the
    /// syndrome of a pattern is the XOR of its positions' entries.
    fn fill_slots(
        columns: &[usize],
        n: usize,
        slots: &mut SlotTable,
        progress: &ProgressBar,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStrategyKind {
    /// Weight classes in ascending order, stopping once every syndrome is covered.
    #[default]
    #[serde(rename = "weighted")]
    WeightOrdered,
    /// All `2^n` patterns in counting order.
    Exhaustive,
    /// Weight classes in ascending order, each class scanned with rayon.
    Parallel,
}

impl std::fmt::Display for TableStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TableStrategyKind::WeightOrdered => write!(f, "weighted"),
            TableStrategyKind::Exhaustive => write!(f, "exhaustive"),
            TableStrategyKind::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for TableStrategyKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "weighted" | "weight-ordered" => Ok(TableStrategyKind::WeightOrdered),
            "exhaustive" => Ok(TableStrategyKind::Exhaustive),
            "parallel" => Ok(TableStrategyKind::Parallel),
            other => Err(CodecError::Config(format!("unknown table strategy '{}'", other))),
        }
    }
}

/// Complete syndrome → coset leader mapping. Immutable once built.
#[derive(Debug, Clone)]
pub struct CosetLeaderTable {
    n: usize,
    redundancy: usize,
    words: usize,
    weights: Vec<u16>,
    masks: Vec<u64>,
    metrics: BuildMetrics,
}

impl CosetLeaderTable {
    /// Builds the table with the strategy named by `kind`.
    pub fn build(h: &ParityCheckMatrix, kind: TableStrategyKind) -> Result<Self> {
        match kind {
            TableStrategyKind::WeightOrdered => build_with_strategy::<WeightOrderedStrategy>(h),
            TableStrategyKind::Exhaustive => build_with_strategy::<ExhaustiveStrategy>(h),
            TableStrategyKind::Parallel => build_with_strategy::<ParallelStrategy>(h),
        }
    }

    /// Number of entries, always `2^(n-k)`.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn redundancy(&self) -> usize {
        self.redundancy
    }

    fn slot_index(&self, syndrome: &Syndrome) -> Option<usize> {
        (syndrome.len() == self.redundancy).then(|| syndrome.index())
    }

    /// Leader of the syndrome with packed index `index`.
    pub fn get(&self, index: usize) -> Option<CosetLeader> {
        let pattern = self.pattern(index)?;
        Some(CosetLeader {
            syndrome: Syndrome::from_index(index, self.redundancy),
            pattern,
            weight: self.weights[index] as usize,
        })
    }

    /// Leader pattern of slot `index` as a length-`n` word.
    pub fn pattern(&self, index: usize) -> Option<Word> {
        if index >= self.len() {
            return None;
        }
        Some(unpack(&self.masks[index * self.words..(index + 1) * self.words], self.n))
    }

    /// `None` when the syndrome does not belong to this table's parity-check matrix.
    pub fn lookup(&self, syndrome: &Syndrome) -> Option<CosetLeader> {
        self.get(self.slot_index(syndrome)?)
    }

    /// Like [`lookup`](Self::lookup) but expands only the pattern.
    pub fn lookup_pattern(&self, syndrome: &Syndrome) -> Option<Word> {
        self.pattern(self.slot_index(syndrome)?)
    }

    pub fn leader_weight(&self, syndrome: &Syndrome) -> Result<usize> {
        self.slot_index(syndrome)
            .and_then(|index| self.weights.get(index))
            .map(|&w| w as usize)
            .ok_or_else(|| CodecError::DecodeError(syndrome.index()))
    }

    /// Leaders in syndrome order, expanded one at a time.
    pub fn iter(&self) -> impl Iterator<Item = CosetLeader> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    /// `distribution[w]` is the number of coset leaders of weight `w`.
    pub fn weight_distribution(&self) -> Vec<usize> {
        let mut distribution = vec![0; self.metrics.max_leader_weight + 1];
        for &w in &self.weights {
            distribution[w as usize] += 1;
        }
        distribution
    }

    /// Bytes held by the slot arrays.
    pub fn storage_bytes(&self) -> usize {
        self.weights.len() * size_of::<u16>() + self.masks.len() * size_of::<u64>()
    }

    pub fn metrics(&self) -> &BuildMetrics {
        &self.metrics
    }
}

/// Generic table construction using a specific strategy.
pub fn build_with_strategy<S: TableStrategy>(h: &ParityCheckMatrix) -> Result<CosetLeaderTable> {
    let start_time = Instant::now();
    let redundancy = h.redundancy();
    let n = h.n();

    if redundancy == 0 || n == 0 {
        return Err(CodecError::InvalidMatrix("parity-check matrix has no rows or no columns".to_string()));
    }
    if redundancy > MAX_REDUNDANCY {
        return Err(CodecError::TableTooLarge { bits: redundancy, limit: MAX_REDUNDANCY });
    }
    if n > MAX_CODE_LENGTH {
        return Err(CodecError::TableTooLarge { bits: n, limit: MAX_CODE_LENGTH });
    }

    let slot_count = 1usize << redundancy;
    log_verbose!("Building coset leader table ({}): n={}, n-k={}, {} syndromes", S::NAME, n, redundancy, slot_count);

    let columns = column_syndromes(h);
    let mut slots = SlotTable::new(slot_count, n);
    let progress_bar = create_progress_bar(S::progress_length(n), S::PROGRESS_TEMPLATE);
    S::fill_slots(&columns, n, &mut slots, &progress_bar)?;
    let steps_completed = progress_bar.position();
    progress_bar.finish_and_clear();
    log_verbose!(
        "{} finished after {} of {} progress steps",
        S::NAME, steps_completed, progress_bar.length().unwrap_or(0)
    );

    if !slots.is_complete() {
        return Err(CodecError::InvalidMatrix(format!(
            "only {} of {} syndromes are reachable; the rows of H are not independent",
            slots.assigned(), slot_count
        )));
    }

    let SlotTable { words, weights, masks, patterns_examined, .. } = slots;
    let max_leader_weight = weights.iter().copied().max().unwrap_or(0) as usize;

    let mut table = CosetLeaderTable {
        n,
        redundancy,
        words,
        weights,
        masks,
        metrics: BuildMetrics::default(),
    };
    table.metrics = BuildMetrics {
        strategy: S::NAME.to_string(),
        slots: slot_count,
        patterns_examined,
        max_leader_weight,
        steps_completed,
        storage_bytes: table.storage_bytes(),
        duration: start_time.elapsed(),
    };

    log_success!(
        "Coset leader table built in {:.2?} ({}: {} syndromes, {} patterns examined, max weight {}, {} bytes)",
        table.metrics.duration, S::NAME, slot_count, patterns_examined, max_leader_weight, table.metrics.storage_bytes
    );

    Ok(table)
}
