//! Binary linear block codes with syndrome decoding over a simulated noisy channel.

pub mod logging;

pub mod channel;
pub mod code;
pub mod coset;
pub mod coset_core;
pub mod coset_parallel;
pub mod decoder;
pub mod error;
pub mod pipeline;
pub mod types;

pub use code::generator::{build_generator, build_parity_check, GeneratorMatrix, ParityCheckMatrix};
pub use code::matrix::{encode, syndrome, Syndrome};
pub use code::systematic::SystematicCode;
pub use code::{BlockCode, DecodeResult};
pub use coset_core::{CosetLeader, CosetLeaderTable, TableStrategyKind};
pub use decoder::{decode, decode_incremental, extract_message, DecodeStrategy};
pub use error::{CodecError, Result};
pub use pipeline::{BlockOutcome, CodecSession, SessionOptions, TransmissionReport};
pub use types::{CodeParameters, CodecConfig, Symbol, Word};
