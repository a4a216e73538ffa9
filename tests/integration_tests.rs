//! Integration tests for the syndrome codec.
//!
//! These tests drive the public API end to end: build a code, send words through
//! the channel, and decode them with every table strategy and decoder.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use syndrome_code::channel::introduce_errors;
use syndrome_code::code::matrix::are_orthogonal;
use syndrome_code::coset_core::MAX_REDUNDANCY;
use syndrome_code::{
    decode, decode_incremental, encode, extract_message, syndrome, BlockCode, CodecError, CodecSession,
    CodeParameters, CosetLeaderTable, DecodeStrategy, GeneratorMatrix, SessionOptions, Symbol,
    TableStrategyKind, Word,
};

fn random_bits<R: Rng>(rng: &mut R, len: usize) -> Word {
    (0..len).map(|_| rng.gen_range(0..2)).collect()
}

fn worked_generator() -> GeneratorMatrix {
    GeneratorMatrix::from_rows(&[vec![1, 0, 1, 0, 1], vec![0, 1, 0, 1, 1]]).unwrap()
}

mod worked_example_tests {
    use super::*;

    #[test]
    fn test_worked_example_end_to_end() {
        let params = CodeParameters::new(5, 2, 2, 0.0).unwrap();
        let session = CodecSession::with_generator(params, worked_generator(), SessionOptions::default()).unwrap();

        assert_eq!(session.parity_check().to_rows(), vec![
            vec![1, 0, 1, 0, 0],
            vec![0, 1, 0, 1, 0],
            vec![1, 1, 0, 0, 1],
        ]);

        let c = encode(&[1, 0], session.generator()).unwrap();
        assert_eq!(c, vec![1, 0, 1, 0, 1]);

        let r = vec![0, 0, 1, 0, 1];
        let s = syndrome(session.parity_check(), &r).unwrap();
        assert_eq!(s.to_string(), "101");

        let corrected = decode(&r, session.parity_check(), session.table()).unwrap();
        assert_eq!(corrected, c);
        assert_eq!(extract_message(&corrected, 2).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_worked_table_has_eight_distinct_leaders() {
        let params = CodeParameters::new(5, 2, 2, 0.0).unwrap();
        let session = CodecSession::with_generator(params, worked_generator(), SessionOptions::default()).unwrap();
        let table = session.table();

        assert_eq!(table.len(), 8);
        assert_eq!(table.get(0).unwrap().pattern, vec![0; 5]);
        assert_eq!(table.weight_distribution(), vec![1, 5, 2]);
    }
}

mod round_trip_tests {
    use super::*;

    #[test]
    fn test_noiseless_round_trip_for_every_strategy() {
        let options = [
            SessionOptions { strategy: TableStrategyKind::WeightOrdered, decoder: DecodeStrategy::Table },
            SessionOptions { strategy: TableStrategyKind::Exhaustive, decoder: DecodeStrategy::Table },
            SessionOptions { strategy: TableStrategyKind::Parallel, decoder: DecodeStrategy::Greedy },
        ];

        for (i, opts) in options.iter().enumerate() {
            let mut rng = ChaCha8Rng::seed_from_u64(100 + i as u64);
            let params = CodeParameters::new(12, 7, 2, 0.0).unwrap();
            let session = CodecSession::with_options(params, *opts, &mut rng).unwrap();

            let input = random_bits(&mut rng, 50);
            let report = session.transmit(&input, &mut rng).unwrap();
            assert_eq!(report.decoded, input, "options {:?}", opts);
            assert_eq!(report.blocks, 8);
        }
    }

    #[test]
    fn test_codewords_decode_to_themselves() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let params = CodeParameters::new(10, 5, 2, 0.0).unwrap();
        let session = CodecSession::new(params, &mut rng).unwrap();
        let code = session.code();

        for _ in 0..20 {
            let m = random_bits(&mut rng, 5);
            let c = code.encode(&m).unwrap();
            assert!(syndrome(session.parity_check(), &c).unwrap().is_zero());
            let result = code.decode(&c).unwrap();
            assert_eq!(result.corrected, c);
            assert_eq!(result.message, m);
        }
    }

    #[test]
    fn test_generator_and_parity_check_are_orthogonal() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        for (n, k) in [(5, 2), (7, 4), (15, 11), (20, 8)] {
            let params = CodeParameters::new(n, k, 2, 0.0).unwrap();
            let session = CodecSession::new(params, &mut rng).unwrap();
            assert!(are_orthogonal(session.generator(), session.parity_check()).unwrap());
            assert_eq!(session.table().len(), 1 << (n - k));
        }
    }
}

mod correction_tests {
    use super::*;

    /// Minimum distance of the code spanned by `g`, by enumerating all messages.
    fn minimum_distance(session: &CodecSession) -> usize {
        let k = session.params().k();
        (1u32..(1 << k))
            .map(|bits| {
                let m: Word = (0..k).map(|j| (bits >> j) & 1).collect();
                encode(&m, session.generator()).unwrap().iter().filter(|&&s| s == 1).count()
            })
            .min()
            .unwrap()
    }

    #[test]
    fn test_single_errors_corrected_when_distance_is_three() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut checked = 0;

        for _ in 0..20 {
            let params = CodeParameters::new(9, 4, 2, 0.0).unwrap();
            let session = CodecSession::new(params, &mut rng).unwrap();
            if minimum_distance(&session) < 3 {
                continue;
            }
            checked += 1;

            let m = random_bits(&mut rng, 4);
            let c = encode(&m, session.generator()).unwrap();
            for i in 0..9 {
                let mut r = c.clone();
                r[i] ^= 1;
                assert_eq!(decode(&r, session.parity_check(), session.table()).unwrap(), c);
                assert_eq!(decode_incremental(&r, session.parity_check(), session.table()).unwrap(), c);
            }
        }
        assert!(checked > 0, "no random [9, 4] code with distance 3 was drawn");
    }

    #[test]
    fn test_coded_transmission_beats_uncoded_on_noisy_channel() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let params = CodeParameters::new(5, 2, 2, 0.02).unwrap();
        let session = CodecSession::with_generator(params, worked_generator(), SessionOptions::default()).unwrap();

        let input = random_bits(&mut rng, 20_000);
        let report = session.transmit(&input, &mut rng).unwrap();

        assert!(report.fixed_errors > 0);
        assert!(
            report.message_bit_errors < report.uncoded_bit_errors,
            "coded {} vs uncoded {}", report.message_bit_errors, report.uncoded_bit_errors
        );
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let params = CodeParameters::new(11, 6, 2, 0.0).unwrap();
        let session = CodecSession::new(params, &mut rng).unwrap();

        for _ in 0..50 {
            let r = random_bits(&mut rng, 11);
            let once = decode(&r, session.parity_check(), session.table()).unwrap();
            let twice = decode(&once, session.parity_check(), session.table()).unwrap();
            assert_eq!(once, twice);
        }
    }
}

mod consistency_tests {
    use super::*;

    #[test]
    fn test_parallel_and_sequential_tables_are_identical() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let params = CodeParameters::new(18, 8, 2, 0.0).unwrap();
        let session = CodecSession::new(params, &mut rng).unwrap();

        let sequential = CosetLeaderTable::build(session.parity_check(), TableStrategyKind::WeightOrdered).unwrap();
        let parallel = CosetLeaderTable::build(session.parity_check(), TableStrategyKind::Parallel).unwrap();
        assert!(sequential.iter().eq(parallel.iter()));
    }

    #[test]
    fn test_exhaustive_agrees_on_leader_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        let params = CodeParameters::new(12, 5, 2, 0.0).unwrap();
        let session = CodecSession::new(params, &mut rng).unwrap();

        let ordered = session.table();
        let exhaustive = CosetLeaderTable::build(session.parity_check(), TableStrategyKind::Exhaustive).unwrap();
        let a: Vec<usize> = ordered.iter().map(|l| l.weight).collect();
        let b: Vec<usize> = exhaustive.iter().map(|l| l.weight).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_seed_gives_same_report() {
        let params = CodeParameters::new(7, 4, 2, 0.05).unwrap();
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let session = CodecSession::new(params, &mut rng).unwrap();
            let input = random_bits(&mut rng, 200);
            let report = session.transmit(&input, &mut rng).unwrap();
            (report.decoded, report.uncoded, report.channel_errors)
        };
        assert_eq!(run(41), run(41));
    }
}

mod channel_tests {
    use super::*;

    #[test]
    fn test_q_ary_replacement_never_repeats_symbol() {
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        let word: Vec<Symbol> = (0..1000).map(|i| i % 5).collect();
        let received = introduce_errors(&word, 1.0, 5, &mut rng).unwrap();

        for (a, b) in word.iter().zip(&received) {
            assert_ne!(a, b);
            assert!(*b < 5);
        }
    }

    #[test]
    fn test_q_ary_session_reports_errors() {
        let mut rng = ChaCha8Rng::seed_from_u64(52);
        let params = CodeParameters::new(7, 4, 4, 0.3).unwrap();
        let session = CodecSession::new(params, &mut rng).unwrap();

        let input = random_bits(&mut rng, 400);
        let report = session.transmit(&input, &mut rng).unwrap();
        assert!(report.channel_errors > 0);
        assert!(report.uncoded.iter().all(|&s| s < 4));
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_oversized_redundancy_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(61);
        let params = CodeParameters::new(40, 10, 2, 0.0).unwrap();
        assert_eq!(
            CodecSession::new(params, &mut rng).err(),
            Some(CodecError::TableTooLarge { bits: 30, limit: MAX_REDUNDANCY })
        );
    }

    #[test]
    fn test_wide_redundancy_table_stays_compact() {
        let mut rng = ChaCha8Rng::seed_from_u64(62);
        let params = CodeParameters::new(26, 6, 2, 0.0).unwrap();
        let session = CodecSession::new(params, &mut rng).unwrap();
        let table = session.table();

        assert_eq!(table.len(), 1 << 20);
        assert_eq!(table.storage_bytes(), table.len() * 10);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(matches!(CodeParameters::new(4, 4, 2, 0.1), Err(CodecError::InvalidDimensions(_))));
        assert_eq!(CodeParameters::new(7, 4, 1, 0.1).unwrap_err(), CodecError::InvalidAlphabet(1));
        assert!(matches!(CodeParameters::new(7, 4, 2, 2.0), Err(CodecError::InvalidProbability(_))));
    }

    #[test]
    fn test_generator_must_be_systematic() {
        let err = GeneratorMatrix::from_rows(&[vec![0, 1, 1, 0, 1], vec![1, 0, 0, 1, 1]]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidMatrix(_)));
    }

    #[test]
    fn test_wrong_length_inputs_are_rejected() {
        let params = CodeParameters::new(5, 2, 2, 0.0).unwrap();
        let session = CodecSession::with_generator(params, worked_generator(), SessionOptions::default()).unwrap();

        assert_eq!(
            encode(&[1, 0, 1], session.generator()).unwrap_err(),
            CodecError::InputLengthMismatch { expected: 2, actual: 3 }
        );
        assert_eq!(
            syndrome(session.parity_check(), &[1, 0]).unwrap_err(),
            CodecError::InputLengthMismatch { expected: 5, actual: 2 }
        );
    }
}
