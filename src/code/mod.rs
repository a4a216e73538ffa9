pub mod generator;
pub mod matrix;
pub mod systematic;

use serde::Serialize;

use crate::types::{Symbol, Word};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeResult {
    pub corrected: Word,
    pub message: Word,
    /// Weight of the coset leader of the received word's syndrome.
    pub leader_weight: usize,
    pub success: bool,
}

pub trait BlockCode {
    fn encode(&self, message: &[Symbol]) -> Result<Word>;
    fn decode(&self, received: &[Symbol]) -> Result<DecodeResult>;
    fn input_length(&self) -> usize;
    fn output_length(&self) -> usize;
}
