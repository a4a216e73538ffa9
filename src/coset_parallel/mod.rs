//! Parallel coset-leader table construction using Rayon.
//!
//! Weight classes are still visited in ascending order. Inside a class the
//! patterns are partitioned by their lowest set position; partitions are scanned
//! concurrently against a read-only snapshot of the slot weights, then merged
//! back in partition order. Partition order is lexicographic order, so the
//! result is identical to [`crate::coset::WeightOrderedStrategy`].

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coset::utils;
use crate::coset_core::{SlotTable, TableStrategy};
use crate::error::Result;
use crate::log_verbose;

/// Parallel execution strategy marker type using Rayon.
pub struct ParallelStrategy;

/// Candidates found by one partition, in enumeration order.
///
/// Every candidate has the class weight `w`, so positions are stored flat:
/// candidate `i` owns `positions[i * w..(i + 1) * w]`.
struct Candidates {
    indices: Vec<usize>,
    positions: Vec<usize>,
}

fn scan_partition(columns: &[usize], n: usize, w: usize, lead: usize, slots: &SlotTable, examined: &AtomicU64) -> Candidates {
    let mut found = Candidates { indices: Vec::new(), positions: Vec::new() };
    let mut claimed = HashSet::new();
    let mut rest = utils::first_combination(lead + 1, w - 1);
    let mut count = 0u64;

    loop {
        count += 1;
        let index = columns[lead] ^ utils::pattern_syndrome(columns, &rest);
        if slots.weight(index) > w && claimed.insert(index) {
            found.indices.push(index);
            found.positions.push(lead);
            found.positions.extend_from_slice(&rest);
        }
        if !utils::next_combination(&mut rest, n) {
            break;
        }
    }

    examined.fetch_add(count, Ordering::Relaxed);
    found
}

impl TableStrategy for ParallelStrategy {
    const NAME: &'static str = "parallel";

    fn fill_slots(
        columns: &[usize],
        n: usize,
        slots: &mut SlotTable,
        progress_bar: &ProgressBar,
    ) -> Result<()> {
        slots.offer(0, &[]);
        slots.record_examined(1);
        progress_bar.inc(1);

        for w in 1..=n {
            if slots.is_complete() {
                break;
            }

            let examined = AtomicU64::new(0);
            let snapshot: &SlotTable = slots;
            let partitions: Vec<Candidates> = (0..=n - w)
                .into_par_iter()
                .map(|lead| scan_partition(columns, n, w, lead, snapshot, &examined))
                .collect();

            let before = slots.assigned();
            for partition in &partitions {
                for (&index, positions) in partition.indices.iter().zip(partition.positions.chunks_exact(w)) {
                    slots.offer(index, positions);
                }
            }

            let class_examined = examined.load(Ordering::Relaxed);
            slots.record_examined(class_examined);
            progress_bar.inc(1);
            log_verbose!(
                "Weight class {}: {} of {} patterns scanned, {} new leaders",
                w, class_examined, utils::binomial(n, w), slots.assigned() - before
            );
        }

        Ok(())
    }
}
