//! Memoryless symmetric channel over an alphabet of size q.
//!
//! Each position is corrupted independently with probability `pe`. A corrupted
//! binary symbol is flipped; a corrupted q-ary symbol is replaced by a uniformly
//! drawn symbol that differs from the original.

use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::types::{validate_alphabet, validate_probability, CodeParameters, Symbol, Word};

/// Returns a corrupted copy of `word`. Consumes randomness only from `rng`.
pub fn introduce_errors<R: Rng + ?Sized>(word: &[Symbol], pe: f64, q: u32, rng: &mut R) -> Result<Word> {
    Ok(corrupt(word, pe, q, rng)?.received)
}

fn corrupt<R: Rng + ?Sized>(word: &[Symbol], pe: f64, q: u32, rng: &mut R) -> Result<Transmission> {
    validate_alphabet(q)?;
    validate_probability(pe)?;

    let mut received = word.to_vec();
    let mut error_positions = Vec::new();

    for (i, symbol) in received.iter_mut().enumerate() {
        let a: f64 = rng.gen();
        if a >= pe {
            continue;
        }

        if q == 2 {
            *symbol ^= 1;
        } else {
            let current = *symbol;
            let mut replacement = rng.gen_range(0..q);
            while replacement == current {
                replacement = rng.gen_range(0..q);
            }
            *symbol = replacement;
        }
        error_positions.push(i);
    }

    Ok(Transmission { received, error_positions })
}

/// What came out of the channel, and where it was corrupted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transmission {
    pub received: Word,
    pub error_positions: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Channel {
    pe: f64,
    q: u32,
}

impl Channel {
    pub fn new(pe: f64, q: u32) -> Result<Self> {
        validate_alphabet(q)?;
        validate_probability(pe)?;
        Ok(Channel { pe, q })
    }

    pub fn from_params(params: &CodeParameters) -> Self {
        Channel { pe: params.pe(), q: params.q() }
    }

    pub fn pe(&self) -> f64 {
        self.pe
    }

    pub fn q(&self) -> u32 {
        self.q
    }

    pub fn transmit<R: Rng + ?Sized>(&self, word: &[Symbol], rng: &mut R) -> Result<Transmission> {
        corrupt(word, self.pe, self.q, rng)
    }
}
