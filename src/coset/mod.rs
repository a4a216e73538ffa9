//! Sequential coset-leader table strategies.
//!
//! `WeightOrderedStrategy` is the default: it offers every pattern of weight 0,
//! then 1, then 2 and so on, and stops as soon as every syndrome has a leader.
//! `ExhaustiveStrategy` scans all `2^n` patterns; it is only practical for short
//! codes and exists as an independent cross-check.

use indicatif::ProgressBar;

use crate::coset_core::{progress_templates, SlotTable, TableStrategy, MAX_EXHAUSTIVE_LENGTH};
use crate::error::{CodecError, Result};

pub mod utils;

/// Ascending weight classes on one thread.
pub struct WeightOrderedStrategy;

impl TableStrategy for WeightOrderedStrategy {
    const NAME: &'static str = "weight-ordered";

    fn fill_slots(
        columns: &[usize],
        n: usize,
        slots: &mut SlotTable,
        progress_bar: &ProgressBar,
    ) -> Result<()> {
        for w in 0..=n {
            let mut combination = utils::first_combination(0, w);
            let mut examined = 0u64;

            loop {
                examined += 1;
                let index = utils::pattern_syndrome(columns, &combination);
                // Patterns arrive in non-decreasing weight, so the first one to land wins.
                slots.offer(index, &combination);
                if slots.is_complete() || !utils::next_combination(&mut combination, n) {
                    break;
                }
            }

            slots.record_examined(examined);
            progress_bar.inc(1);

            if slots.is_complete() {
                break;
            }
        }

        Ok(())
    }
}

const PROGRESS_CHUNK: u64 = 1 << 16;

/// Every pattern of length n in counting order, keeping strictly lighter patterns.
///
/// Position `j` of the pattern for counter value `i` is bit `n - 1 - j` of `i`.
pub struct ExhaustiveStrategy;

impl TableStrategy for ExhaustiveStrategy {
    const NAME: &'static str = "exhaustive";
    const PROGRESS_TEMPLATE: &'static str = progress_templates::PATTERNS;

    fn progress_length(n: usize) -> u64 {
        if n <= MAX_EXHAUSTIVE_LENGTH { 1 << n } else { 0 }
    }

    fn fill_slots(
        columns: &[usize],
        n: usize,
        slots: &mut SlotTable,
        progress_bar: &ProgressBar,
    ) -> Result<()> {
        if n > MAX_EXHAUSTIVE_LENGTH {
            return Err(CodecError::TableTooLarge { bits: n, limit: MAX_EXHAUSTIVE_LENGTH });
        }

        let total: u64 = 1 << n;
        let mut positions = Vec::with_capacity(n);
        for i in 0..total {
            if i % PROGRESS_CHUNK == 0 {
                progress_bar.set_position(i);
            }
            positions.clear();
            positions.extend((0..n).filter(|&j| (i >> (n - 1 - j)) & 1 == 1));

            let index = utils::pattern_syndrome(columns, &positions);
            slots.offer(index, &positions);
        }

        slots.record_examined(total);
        progress_bar.set_position(total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::generator::{build_generator, build_parity_check, ParityCheckMatrix};
    use crate::coset_core::{build_with_strategy, CosetLeaderTable, TableStrategyKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn random_parity_check(k: usize, n: usize, seed: u64) -> ParityCheckMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let g = build_generator(k, n, &mut rng).unwrap();
        build_parity_check(&g).unwrap()
    }

    #[test]
    fn test_exhaustive_and_weight_ordered_agree_on_weights() {
        for (k, n, seed) in [(2, 5, 1), (4, 8, 2), (6, 11, 3), (3, 10, 4)] {
            let h = random_parity_check(k, n, seed);
            let ordered = build_with_strategy::<WeightOrderedStrategy>(&h).unwrap();
            let exhaustive = build_with_strategy::<ExhaustiveStrategy>(&h).unwrap();

            assert_eq!(ordered.len(), exhaustive.len());
            for (a, b) in ordered.iter().zip(exhaustive.iter()) {
                assert_eq!(a.syndrome, b.syndrome);
                assert_eq!(a.weight, b.weight, "weight mismatch for syndrome {}", a.syndrome);
            }
        }
    }

    #[test]
    fn test_exhaustive_examines_every_pattern() {
        let h = random_parity_check(3, 7, 9);
        let table = CosetLeaderTable::build(&h, TableStrategyKind::Exhaustive).unwrap();
        assert_eq!(table.metrics().patterns_examined, 128);
        assert_eq!(table.metrics().strategy, "exhaustive");
    }

    #[test]
    fn test_weight_ordered_stops_once_complete() {
        // 2^(n-k) = 4 syndromes for n = 20: weight 0 and 1 examine at most 21 patterns
        let h = random_parity_check(18, 20, 10);
        let table = build_with_strategy::<WeightOrderedStrategy>(&h).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.metrics().patterns_examined < 1 + 20 + utils::binomial(20, 2));
    }

    #[test]
    fn test_exhaustive_refuses_long_codes() {
        let h = random_parity_check(20, 25, 11);
        assert_eq!(
            build_with_strategy::<ExhaustiveStrategy>(&h).unwrap_err(),
            CodecError::TableTooLarge { bits: 25, limit: MAX_EXHAUSTIVE_LENGTH }
        );
    }
}
