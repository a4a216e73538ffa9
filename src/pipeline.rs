//! Block-by-block transmission: pad, encode, corrupt, decode, extract.
//!
//! Every block is also sent through the same channel without coding so the
//! report can compare coded and uncoded error counts.

use rand::Rng;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::channel::Channel;
use crate::code::generator::{GeneratorMatrix, ParityCheckMatrix};
use crate::code::systematic::SystematicCode;
use crate::code::BlockCode;
use crate::coset_core::{CosetLeaderTable, TableStrategyKind};
use crate::decoder::DecodeStrategy;
use crate::error::{CodecError, Result};
use crate::types::{CodecConfig, CodeParameters, PhaseMetrics, Symbol, TransmissionMetrics, Word};
use crate::{log_info, log_success, log_verbose};

/// How a session builds its table and corrects received words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionOptions {
    pub strategy: TableStrategyKind,
    pub decoder: DecodeStrategy,
}

impl SessionOptions {
    pub fn from_config(config: &CodecConfig) -> Self {
        SessionOptions {
            strategy: config.strategy(),
            decoder: config.decoder(),
        }
    }
}

/// Everything recorded while one block went through the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockOutcome {
    /// The k message symbols, zero padded.
    pub block: Word,
    pub codeword: Word,
    pub received: Word,
    pub corrected: Word,
    pub message: Word,
    pub leader_weight: usize,
    /// Positions where `received` differs from `codeword`.
    pub error_positions: Vec<usize>,
    /// Error positions inside the message prefix that decoding restored.
    pub fixed_positions: Vec<usize>,
    /// `block` sent without coding.
    pub uncoded_received: Word,
    pub uncoded_error_positions: Vec<usize>,
}

impl BlockOutcome {
    pub fn error_count(&self) -> usize {
        self.error_positions.len()
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_positions.len()
    }

    pub fn uncoded_error_count(&self) -> usize {
        self.uncoded_error_positions.len()
    }

    pub fn is_recovered(&self) -> bool {
        self.message == self.block
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransmissionReport {
    pub params: CodeParameters,
    pub options: SessionOptions,
    pub blocks: usize,
    pub channel_errors: usize,
    pub fixed_errors: usize,
    pub uncoded_errors: usize,
    /// Positions where the decoded stream differs from the input.
    pub message_bit_errors: usize,
    /// Positions where the uncoded stream differs from the input.
    pub uncoded_bit_errors: usize,
    pub decoded: Word,
    pub uncoded: Word,
    pub outcomes: Vec<BlockOutcome>,
    pub metrics: TransmissionMetrics,
}

impl TransmissionReport {
    /// Fraction of input symbols that arrived wrong after decoding.
    pub fn residual_error_rate(&self) -> f64 {
        rate(self.message_bit_errors, self.decoded.len())
    }

    /// Fraction of input symbols that arrived wrong without coding.
    pub fn uncoded_error_rate(&self) -> f64 {
        rate(self.uncoded_bit_errors, self.uncoded.len())
    }
}

fn rate(errors: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        errors as f64 / total as f64
    }
}

fn count_differences(a: &[Symbol], b: &[Symbol]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

#[derive(Default)]
struct BlockTimings {
    encoding: Duration,
    channel: Duration,
    decoding: Duration,
}

/// A fixed code, its parity-check matrix and coset-leader table, plus a channel.
pub struct CodecSession {
    params: CodeParameters,
    options: SessionOptions,
    code: SystematicCode,
    channel: Channel,
}

impl CodecSession {
    /// Random generator, default table strategy and decoder.
    pub fn new<R: Rng + ?Sized>(params: CodeParameters, rng: &mut R) -> Result<Self> {
        Self::with_options(params, SessionOptions::default(), rng)
    }

    pub fn with_options<R: Rng + ?Sized>(params: CodeParameters, options: SessionOptions, rng: &mut R) -> Result<Self> {
        log_info!("Setting up [{}, {}] code (q={}, pe={})", params.n(), params.k(), params.q(), params.pe());
        let code = SystematicCode::setup(&params, options.strategy, options.decoder, rng)?;
        Ok(Self::assemble(params, options, code))
    }

    /// Uses a caller-supplied generator, which must match `params` in `n` and `k`.
    pub fn with_generator(params: CodeParameters, generator: GeneratorMatrix, options: SessionOptions) -> Result<Self> {
        if generator.k() != params.k() || generator.n() != params.n() {
            return Err(CodecError::InvalidDimensions(format!(
                "generator is {}x{} but parameters ask for k={} n={}",
                generator.k(), generator.n(), params.k(), params.n()
            )));
        }
        let code = SystematicCode::from_generator(generator, options.strategy, options.decoder)?;
        Ok(Self::assemble(params, options, code))
    }

    pub fn from_config<R: Rng + ?Sized>(config: &CodecConfig, rng: &mut R) -> Result<Self> {
        Self::with_options(config.resolve()?, SessionOptions::from_config(config), rng)
    }

    fn assemble(params: CodeParameters, options: SessionOptions, code: SystematicCode) -> Self {
        let channel = Channel::from_params(&params);
        CodecSession { params, options, code, channel }
    }

    pub fn params(&self) -> &CodeParameters {
        &self.params
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn code(&self) -> &SystematicCode {
        &self.code
    }

    pub fn generator(&self) -> &GeneratorMatrix {
        self.code.generator()
    }

    pub fn parity_check(&self) -> &ParityCheckMatrix {
        self.code.parity_check()
    }

    pub fn table(&self) -> &CosetLeaderTable {
        self.code.table()
    }

    /// Sends one block of at most k symbols; shorter blocks are zero padded.
    pub fn process_block<R: Rng + ?Sized>(&self, block: &[Symbol], rng: &mut R) -> Result<BlockOutcome> {
        let mut timings = BlockTimings::default();
        self.run_block(block, rng, &mut timings)
    }

    fn run_block<R: Rng + ?Sized>(&self, block: &[Symbol], rng: &mut R, timings: &mut BlockTimings) -> Result<BlockOutcome> {
        let k = self.params.k();
        if block.len() > k {
            return Err(CodecError::InputLengthMismatch { expected: k, actual: block.len() });
        }
        let supplied = block.len();
        let mut block = block.to_vec();
        block.resize(k, 0);

        let start = Instant::now();
        let codeword = self.code.encode(&block)?;
        timings.encoding += start.elapsed();

        let start = Instant::now();
        let coded = self.channel.transmit(&codeword, rng)?;
        let uncoded = self.channel.transmit(&block, rng)?;
        timings.channel += start.elapsed();

        let start = Instant::now();
        let result = self.code.decode(&coded.received)?;
        timings.decoding += start.elapsed();

        let fixed_positions = fixed_positions(&coded.error_positions, &result.message, &block, supplied);

        Ok(BlockOutcome {
            block,
            codeword,
            received: coded.received,
            corrected: result.corrected,
            message: result.message,
            leader_weight: result.leader_weight,
            error_positions: coded.error_positions,
            fixed_positions,
            uncoded_received: uncoded.received,
            uncoded_error_positions: uncoded.error_positions,
        })
    }

    /// Splits `symbols` into k-symbol blocks and sends each one.
    pub fn transmit<R: Rng + ?Sized>(&self, symbols: &[Symbol], rng: &mut R) -> Result<TransmissionReport> {
        let start_time = Instant::now();
        let k = self.params.k();
        let total_blocks = symbols.len().div_ceil(k);
        log_info!("Transmitting {} symbols in {} blocks", symbols.len(), total_blocks);

        let mut timings = BlockTimings::default();
        let mut outcomes = Vec::with_capacity(total_blocks);
        let mut decoded = Vec::with_capacity(total_blocks * k);
        let mut uncoded = Vec::with_capacity(total_blocks * k);

        for (index, chunk) in symbols.chunks(k).enumerate() {
            let outcome = self.run_block(chunk, rng, &mut timings)?;
            log_verbose!(
                "Block {}/{}: {:?} -> {:?}, {} channel errors, {} fixed",
                index + 1, total_blocks, outcome.block, outcome.message,
                outcome.error_count(), outcome.fixed_count()
            );
            decoded.extend_from_slice(&outcome.message);
            uncoded.extend_from_slice(&outcome.uncoded_received);
            outcomes.push(outcome);
        }

        decoded.truncate(symbols.len());
        uncoded.truncate(symbols.len());

        let total_time = start_time.elapsed();
        let metrics = TransmissionMetrics {
            encoding: PhaseMetrics::new("Encoding", timings.encoding, total_time),
            channel: PhaseMetrics::new("Channel", timings.channel, total_time),
            decoding: PhaseMetrics::new("Decoding", timings.decoding, total_time),
            total_time,
        };

        let report = TransmissionReport {
            params: self.params,
            options: self.options,
            blocks: outcomes.len(),
            channel_errors: outcomes.iter().map(BlockOutcome::error_count).sum(),
            fixed_errors: outcomes.iter().map(BlockOutcome::fixed_count).sum(),
            uncoded_errors: outcomes.iter().map(BlockOutcome::uncoded_error_count).sum(),
            message_bit_errors: count_differences(&decoded, symbols),
            uncoded_bit_errors: count_differences(&uncoded, symbols),
            decoded,
            uncoded,
            outcomes,
            metrics,
        };

        log_success!(
            "Transmission finished in {:.2?}: {} blocks, {} channel errors, {} fixed, {} residual vs {} uncoded",
            total_time, report.blocks, report.channel_errors, report.fixed_errors,
            report.message_bit_errors, report.uncoded_bit_errors
        );

        Ok(report)
    }
}

/// Channel-error positions among the first `supplied` message symbols that decoding restored.
///
/// Positions from `supplied` up to k hold zero padding and never count.
fn fixed_positions(error_positions: &[usize], message: &[Symbol], sent: &[Symbol], supplied: usize) -> Vec<usize> {
    error_positions
        .iter()
        .copied()
        .filter(|&i| i < supplied && message[i] == sent[i])
        .collect()
}
