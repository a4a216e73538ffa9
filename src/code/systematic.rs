use rand::Rng;

use crate::code::generator::{build_generator, build_parity_check, GeneratorMatrix, ParityCheckMatrix};
use crate::code::matrix::{self, syndrome};
use crate::code::{BlockCode, DecodeResult};
use crate::coset_core::{CosetLeaderTable, TableStrategyKind};
use crate::decoder::{decode_with, extract_message, DecodeStrategy};
use crate::error::Result;
use crate::types::{CodeParameters, Symbol, Word};

/// A systematic `[n, k]` code together with everything needed to decode it.
///
/// `H` and the coset-leader table are derived from `G` at construction and never
/// change afterwards; a different generator means a new `SystematicCode`.
#[derive(Debug, Clone)]
pub struct SystematicCode {
    generator: GeneratorMatrix,
    parity_check: ParityCheckMatrix,
    table: CosetLeaderTable,
    decoder: DecodeStrategy,
}

impl SystematicCode {
    /// Draws a random generator for `params` and builds the rest from it.
    pub fn setup<R: Rng + ?Sized>(
        params: &CodeParameters,
        strategy: TableStrategyKind,
        decoder: DecodeStrategy,
        rng: &mut R,
    ) -> Result<Self> {
        let generator = build_generator(params.k(), params.n(), rng)?;
        Self::from_generator(generator, strategy, decoder)
    }

    pub fn from_generator(
        generator: GeneratorMatrix,
        strategy: TableStrategyKind,
        decoder: DecodeStrategy,
    ) -> Result<Self> {
        let parity_check = build_parity_check(&generator)?;
        let table = CosetLeaderTable::build(&parity_check, strategy)?;

        Ok(SystematicCode { generator, parity_check, table, decoder })
    }

    pub fn generator(&self) -> &GeneratorMatrix {
        &self.generator
    }

    pub fn parity_check(&self) -> &ParityCheckMatrix {
        &self.parity_check
    }

    pub fn table(&self) -> &CosetLeaderTable {
        &self.table
    }

    pub fn decoder(&self) -> DecodeStrategy {
        self.decoder
    }
}

impl BlockCode for SystematicCode {
    fn encode(&self, message: &[Symbol]) -> Result<Word> {
        matrix::encode(message, &self.generator)
    }

    fn decode(&self, received: &[Symbol]) -> Result<DecodeResult> {
        let leader_weight = self.table.leader_weight(&syndrome(&self.parity_check, received)?)?;
        let corrected = decode_with(self.decoder, received, &self.parity_check, &self.table)?;
        let message = extract_message(&corrected, self.generator.k())?;
        let success = syndrome(&self.parity_check, &corrected)?.is_zero();

        Ok(DecodeResult { corrected, message, leader_weight, success })
    }

    fn input_length(&self) -> usize {
        self.generator.k()
    }

    fn output_length(&self) -> usize {
        self.generator.n()
    }
}
