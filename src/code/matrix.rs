//! GF(2) vector and matrix primitives.
//!
//! Matrices are dense `Array2<GF2>`. Words carry integer symbols and enter the
//! arithmetic through their parity, so `Σ mⱼ·G[j][i] mod 2` holds for any
//! symbol values.

use ldpc_toolbox::gf2::GF2;
use ndarray::Array2;
use num_traits::{One, Zero};
use serde::Serialize;

use crate::code::generator::{GeneratorMatrix, ParityCheckMatrix};
use crate::error::{check_length, CodecError, Result};
use crate::types::{Symbol, Word};

/// `H·rᵗ mod 2` as a bit vector. Row 0 of H is the most significant bit of [`Syndrome::index`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Syndrome(Vec<u8>);

impl Syndrome {
    pub fn from_bits(bits: Vec<u8>) -> Self {
        Syndrome(bits.into_iter().map(|b| b & 1).collect())
    }

    /// Inverse of [`Syndrome::index`] for a syndrome of `len` bits.
    pub fn from_index(index: usize, len: usize) -> Self {
        Syndrome((0..len).map(|i| ((index >> (len - 1 - i)) & 1) as u8).collect())
    }

    pub fn index(&self) -> usize {
        self.0.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Syndrome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for b in &self.0 {
            write!(f, "{}", b)?;
        }
        Ok(())
    }
}

pub fn gf2(bit: bool) -> GF2 {
    if bit { GF2::one() } else { GF2::zero() }
}

/// Parity of a symbol as a field element.
pub fn symbol_to_gf2(symbol: Symbol) -> GF2 {
    gf2(symbol & 1 == 1)
}

/// Encode a message with a generator matrix.
///
/// # Arguments
/// * `m` - Message of k symbols; only each symbol's parity is used
/// * `g` - k×n generator matrix
///
/// # Returns
/// The codeword `c = m·G mod 2`, or `InputLengthMismatch` if `m` is not k symbols long
pub fn encode(m: &[Symbol], g: &GeneratorMatrix) -> Result<Word> {
    check_length(g.k(), m.len())?;
    let matrix = g.as_array();

    let codeword = (0..g.n())
        .map(|i| {
            let sum: u64 = m.iter()
                .zip(matrix.column(i))
                .filter(|(_, entry)| entry.is_one())
                .map(|(&symbol, _)| symbol as u64)
                .sum();
            (sum % 2) as Symbol
        })
        .collect();

    Ok(codeword)
}

/// Calculate the syndrome of a received word.
///
/// # Arguments
/// * `h` - (n-k)×n parity-check matrix
/// * `r` - Received word of n symbols
///
/// # Returns
/// The syndrome with `sᵢ = XORⱼ (H[i][j] AND r[j])`
pub fn syndrome(h: &ParityCheckMatrix, r: &[Symbol]) -> Result<Syndrome> {
    check_length(h.n(), r.len())?;

    let bits = h.as_array()
        .rows()
        .into_iter()
        .map(|row| {
            let bit = xor_reduce(row.iter().zip(r).map(|(&entry, &symbol)| entry * symbol_to_gf2(symbol)));
            bit.is_one() as u8
        })
        .collect();

    Ok(Syndrome(bits))
}

/// Sum over GF(2).
pub fn xor_reduce<I>(values: I) -> GF2
where
    I: IntoIterator<Item = GF2>,
{
    values.into_iter().fold(GF2::zero(), |acc, x| acc + x)
}

pub fn transpose(a: &Array2<GF2>) -> Array2<GF2> {
    a.t().to_owned()
}

/// Matrix product over GF(2).
///
/// # Returns
/// `a·b`, or `InvalidMatrix` when the inner dimensions differ
pub fn multiply(a: &Array2<GF2>, b: &Array2<GF2>) -> Result<Array2<GF2>> {
    if a.ncols() != b.nrows() {
        return Err(CodecError::InvalidMatrix(format!(
            "cannot multiply {}x{} by {}x{}",
            a.nrows(), a.ncols(), b.nrows(), b.ncols()
        )));
    }

    Ok(Array2::from_shape_fn((a.nrows(), b.ncols()), |(i, j)| {
        xor_reduce(a.row(i).iter().zip(b.column(j)).map(|(&x, &y)| x * y))
    }))
}

pub fn is_zero_matrix(a: &Array2<GF2>) -> bool {
    a.iter().all(|x| x.is_zero())
}

/// True when `G·Hᵗ ≡ 0`, i.e. every codeword of G has a zero syndrome under H.
pub fn are_orthogonal(g: &GeneratorMatrix, h: &ParityCheckMatrix) -> Result<bool> {
    let product = multiply(g.as_array(), &transpose(h.as_array()))?;
    Ok(is_zero_matrix(&product))
}

/// Packed syndrome of each unit error vector, i.e. of each column of H.
/// The syndrome of any binary pattern is the XOR of the entries for its set positions.
pub fn column_syndromes(h: &ParityCheckMatrix) -> Vec<usize> {
    h.as_array()
        .columns()
        .into_iter()
        .map(|column| column.iter().fold(0usize, |acc, x| (acc << 1) | x.is_one() as usize))
        .collect()
}

/// Count of non-zero symbols.
pub fn hamming_weight(word: &[Symbol]) -> usize {
    word.iter().filter(|&&s| s != 0).count()
}

/// Add an error pattern to a word.
///
/// # Arguments
/// * `word` - Word to correct; symbols may exceed 1 on a q-ary channel
/// * `pattern` - Binary error pattern of the same length
///
/// # Returns
/// `word[j] XOR pattern[j]` for every position
pub fn apply_pattern(word: &[Symbol], pattern: &[Symbol]) -> Result<Word> {
    check_length(word.len(), pattern.len())?;
    Ok(word.iter().zip(pattern).map(|(&s, &e)| s ^ (e & 1)).collect())
}

/// Builds a binary matrix from row vectors, rejecting ragged, empty or non-binary input.
pub fn from_rows(rows: &[Vec<u8>]) -> Result<Array2<GF2>> {
    let nrows = rows.len();
    let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
    if nrows == 0 || ncols == 0 {
        return Err(CodecError::InvalidMatrix("matrix has no rows or no columns".to_string()));
    }
    if let Some(i) = rows.iter().position(|r| r.len() != ncols) {
        return Err(CodecError::InvalidMatrix(format!(
            "row {} has {} entries, expected {}", i, rows[i].len(), ncols
        )));
    }
    if rows.iter().flatten().any(|&b| b > 1) {
        return Err(CodecError::InvalidMatrix("entries must be 0 or 1".to_string()));
    }

    Ok(Array2::from_shape_fn((nrows, ncols), |(i, j)| gf2(rows[i][j] == 1)))
}

pub fn to_rows(a: &Array2<GF2>) -> Vec<Vec<u8>> {
    a.rows()
        .into_iter()
        .map(|row| row.iter().map(|x| x.is_one() as u8).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_generator() -> GeneratorMatrix {
        GeneratorMatrix::from_rows(&[vec![1, 0, 1, 0, 1], vec![0, 1, 0, 1, 1]]).unwrap()
    }

    #[test]
    fn test_encode_worked_example() {
        let g = worked_generator();
        assert_eq!(encode(&[1, 0], &g).unwrap(), vec![1, 0, 1, 0, 1]);
        assert_eq!(encode(&[0, 1], &g).unwrap(), vec![0, 1, 0, 1, 1]);
        assert_eq!(encode(&[1, 1], &g).unwrap(), vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_encode_rejects_wrong_length() {
        let g = worked_generator();
        assert_eq!(
            encode(&[1, 0, 1], &g),
            Err(CodecError::InputLengthMismatch { expected: 2, actual: 3 })
        );
    }

    #[test]
    fn test_encode_uses_symbol_parity() {
        let g = worked_generator();
        // 3 is odd and 2 is even, so this behaves like [1, 0]
        assert_eq!(encode(&[3, 2], &g).unwrap(), vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_syndrome_of_codeword_is_zero() {
        let g = worked_generator();
        let h = crate::code::generator::build_parity_check(&g).unwrap();
        let c = encode(&[1, 1], &g).unwrap();
        assert!(syndrome(&h, &c).unwrap().is_zero());
    }

    #[test]
    fn test_syndrome_rejects_wrong_length() {
        let g = worked_generator();
        let h = crate::code::generator::build_parity_check(&g).unwrap();
        assert!(matches!(syndrome(&h, &[0, 1]), Err(CodecError::InputLengthMismatch { expected: 5, actual: 2 })));
    }

    #[test]
    fn test_syndrome_index_roundtrip() {
        for index in 0..8 {
            let s = Syndrome::from_index(index, 3);
            assert_eq!(s.index(), index);
            assert_eq!(s.len(), 3);
        }
        assert_eq!(Syndrome::from_index(0b100, 3).bits(), &[1, 0, 0]);
        assert_eq!(Syndrome::from_bits(vec![0, 1, 1]).to_string(), "011");
    }

    #[test]
    fn test_column_syndromes_match_unit_vectors() {
        let g = worked_generator();
        let h = crate::code::generator::build_parity_check(&g).unwrap();
        let columns = column_syndromes(&h);

        for (j, &packed) in columns.iter().enumerate() {
            let mut e = vec![0; 5];
            e[j] = 1;
            assert_eq!(syndrome(&h, &e).unwrap().index(), packed);
        }
    }

    #[test]
    fn test_multiply_and_transpose() {
        let a = from_rows(&[vec![1, 1, 0], vec![0, 1, 1]]).unwrap();
        let at = transpose(&a);
        assert_eq!(at.dim(), (3, 2));

        let product = multiply(&a, &at).unwrap();
        // rows have weight 2 (even) and overlap in one position
        assert_eq!(to_rows(&product), vec![vec![0, 1], vec![1, 0]]);

        assert!(matches!(multiply(&a, &a), Err(CodecError::InvalidMatrix(_))));
    }

    #[test]
    fn test_xor_reduce() {
        assert!(xor_reduce(vec![gf2(true), gf2(true), gf2(true)]).is_one());
        assert!(xor_reduce(vec![gf2(true), gf2(true)]).is_zero());
        assert!(xor_reduce(Vec::new()).is_zero());
    }

    #[test]
    fn test_from_rows_validation() {
        assert!(matches!(from_rows(&[]), Err(CodecError::InvalidMatrix(_))));
        assert!(matches!(from_rows(&[vec![]]), Err(CodecError::InvalidMatrix(_))));
        assert!(matches!(from_rows(&[vec![1, 0], vec![1]]), Err(CodecError::InvalidMatrix(_))));
        assert!(matches!(from_rows(&[vec![1, 2]]), Err(CodecError::InvalidMatrix(_))));
    }

    #[test]
    fn test_hamming_weight_and_apply_pattern() {
        assert_eq!(hamming_weight(&[0, 1, 0, 3, 1]), 3);
        assert_eq!(apply_pattern(&[1, 0, 1], &[1, 1, 0]).unwrap(), vec![0, 1, 1]);
        assert!(apply_pattern(&[1, 0], &[1]).is_err());
    }
}
