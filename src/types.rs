use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

use crate::coset_core::TableStrategyKind;
use crate::decoder::DecodeStrategy;
use crate::error::{CodecError, Result};

/// A channel symbol. Binary codes use 0 and 1; a q-ary channel may emit anything in `[0, q)`.
pub type Symbol = u32;

/// A flat sequence of symbols: a block, codeword, received or corrected word.
pub type Word = Vec<Symbol>;

pub const DEFAULT_N: usize = 7;
pub const DEFAULT_K: usize = 4;
pub const DEFAULT_Q: u32 = 2;
pub const DEFAULT_PE: f64 = 0.0001;

/// Helper function to serialize Duration as milliseconds (f64)
fn serialize_duration_as_ms<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Validated code configuration: `0 < k < n`, `q >= 2`, `pe` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CodeParameters {
    n: usize,
    k: usize,
    q: u32,
    pe: f64,
}

impl CodeParameters {
    pub fn new(n: usize, k: usize, q: u32, pe: f64) -> Result<Self> {
        validate_dimensions(k, n)?;
        validate_alphabet(q)?;
        validate_probability(pe)?;
        Ok(CodeParameters { n, k, q, pe })
    }

    /// Codeword length.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Message length.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn q(&self) -> u32 {
        self.q
    }

    pub fn pe(&self) -> f64 {
        self.pe
    }

    /// Number of parity symbols, `n - k`.
    pub fn redundancy(&self) -> usize {
        self.n - self.k
    }

    pub fn rate(&self) -> f64 {
        self.k as f64 / self.n as f64
    }
}

pub(crate) fn validate_dimensions(k: usize, n: usize) -> Result<()> {
    if k == 0 || k >= n {
        return Err(CodecError::InvalidDimensions(format!(
            "need 0 < k < n, got k={} n={}", k, n
        )));
    }
    Ok(())
}

pub(crate) fn validate_alphabet(q: u32) -> Result<()> {
    if q < 2 {
        return Err(CodecError::InvalidAlphabet(q));
    }
    Ok(())
}

pub(crate) fn validate_probability(pe: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&pe) {
        return Err(CodecError::InvalidProbability(pe));
    }
    Ok(())
}

/// Loosely specified configuration. Missing fields fall back to the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub n: Option<usize>,
    pub k: Option<usize>,
    pub q: Option<u32>,
    pub pe: Option<f64>,
    pub seed: Option<u64>,
    pub strategy: Option<TableStrategyKind>,
    pub decoder: Option<DecodeStrategy>,
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CodecError::Config(e.to_string()))
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn overridden_by(self, other: CodecConfig) -> CodecConfig {
        CodecConfig {
            n: other.n.or(self.n),
            k: other.k.or(self.k),
            q: other.q.or(self.q),
            pe: other.pe.or(self.pe),
            seed: other.seed.or(self.seed),
            strategy: other.strategy.or(self.strategy),
            decoder: other.decoder.or(self.decoder),
        }
    }

    pub fn resolve(&self) -> Result<CodeParameters> {
        CodeParameters::new(
            self.n.unwrap_or(DEFAULT_N),
            self.k.unwrap_or(DEFAULT_K),
            self.q.unwrap_or(DEFAULT_Q),
            self.pe.unwrap_or(DEFAULT_PE),
        )
    }

    pub fn strategy(&self) -> TableStrategyKind {
        self.strategy.unwrap_or_default()
    }

    pub fn decoder(&self) -> DecodeStrategy {
        self.decoder.unwrap_or_default()
    }
}

/// Performance metrics for an operation phase
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseMetrics {
    pub name: String,
    #[serde(serialize_with = "serialize_duration_as_ms")]
    pub duration: Duration,
    pub percentage: f64,
}

impl PhaseMetrics {
    pub fn new(name: &str, duration: Duration, total_time: Duration) -> Self {
        let percentage = if total_time.as_nanos() > 0 {
            (duration.as_nanos() as f64 / total_time.as_nanos() as f64) * 100.0
        } else {
            0.0
        };

        PhaseMetrics {
            name: name.to_string(),
            duration,
            percentage,
        }
    }
}

/// Time spent in each stage of a transmission, summed over all blocks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransmissionMetrics {
    pub encoding: PhaseMetrics,
    pub channel: PhaseMetrics,
    pub decoding: PhaseMetrics,
    #[serde(serialize_with = "serialize_duration_as_ms")]
    pub total_time: Duration,
}

/// Table construction statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildMetrics {
    pub strategy: String,
    pub slots: usize,
    pub patterns_examined: u64,
    pub max_leader_weight: usize,
    /// Progress units the strategy completed: weight classes, or patterns for the exhaustive scan.
    pub steps_completed: u64,
    /// Heap bytes held by the finished table.
    pub storage_bytes: usize,
    #[serde(serialize_with = "serialize_duration_as_ms")]
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_parameters_accepts_valid_values() {
        let params = CodeParameters::new(5, 2, 2, 0.1).unwrap();
        assert_eq!(params.n(), 5);
        assert_eq!(params.k(), 2);
        assert_eq!(params.redundancy(), 3);
        assert!((params.rate() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_code_parameters_rejects_bad_dimensions() {
        assert!(matches!(CodeParameters::new(4, 4, 2, 0.0), Err(CodecError::InvalidDimensions(_))));
        assert!(matches!(CodeParameters::new(3, 5, 2, 0.0), Err(CodecError::InvalidDimensions(_))));
        assert!(matches!(CodeParameters::new(3, 0, 2, 0.0), Err(CodecError::InvalidDimensions(_))));
    }

    #[test]
    fn test_code_parameters_rejects_bad_alphabet_and_probability() {
        assert_eq!(CodeParameters::new(5, 2, 1, 0.0), Err(CodecError::InvalidAlphabet(1)));
        assert!(matches!(CodeParameters::new(5, 2, 2, 1.5), Err(CodecError::InvalidProbability(_))));
        assert!(matches!(CodeParameters::new(5, 2, 2, -0.1), Err(CodecError::InvalidProbability(_))));
        assert!(matches!(CodeParameters::new(5, 2, 2, f64::NAN), Err(CodecError::InvalidProbability(_))));
    }

    #[test]
    fn test_probability_bounds_are_inclusive() {
        assert!(CodeParameters::new(5, 2, 2, 0.0).is_ok());
        assert!(CodeParameters::new(5, 2, 2, 1.0).is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let params = CodecConfig::default().resolve().unwrap();
        assert_eq!(params.n(), DEFAULT_N);
        assert_eq!(params.k(), DEFAULT_K);
        assert_eq!(params.q(), DEFAULT_Q);
        assert_eq!(params.pe(), DEFAULT_PE);
    }

    #[test]
    fn test_config_from_json_and_override() {
        let file = CodecConfig::from_json_str(r#"{"n": 10, "k": 5, "pe": 0.05, "decoder": "greedy"}"#).unwrap();
        let flags = CodecConfig { k: Some(6), ..Default::default() };
        let merged = file.overridden_by(flags);

        assert_eq!(merged.n, Some(10));
        assert_eq!(merged.k, Some(6));
        assert_eq!(merged.decoder(), DecodeStrategy::Greedy);
        assert_eq!(merged.strategy(), TableStrategyKind::WeightOrdered);
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        assert!(matches!(CodecConfig::from_json_str("{\"n\": \"seven\"}"), Err(CodecError::Config(_))));
    }

    #[test]
    fn test_phase_metrics_percentage() {
        let phase = PhaseMetrics::new("decode", Duration::from_millis(25), Duration::from_millis(100));
        assert!((phase.percentage - 25.0).abs() < 1e-9);

        let empty = PhaseMetrics::new("decode", Duration::ZERO, Duration::ZERO);
        assert_eq!(empty.percentage, 0.0);
    }

    #[test]
    fn test_metrics_serialize_durations_as_milliseconds() {
        let metrics = BuildMetrics { duration: Duration::from_millis(250), ..Default::default() };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["duration"], serde_json::json!(250.0));
    }
}
