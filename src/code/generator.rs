use ldpc_toolbox::gf2::GF2;
use ndarray::{concatenate, s, Array2, ArrayView2, Axis};
use num_traits::{One, Zero};
use rand::Rng;

use crate::code::matrix::{self, gf2};
use crate::error::{CodecError, Result};
use crate::types::validate_dimensions;

/// Systematic generator matrix `G = [I_k | P]`, `k x n`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorMatrix {
    matrix: Array2<GF2>,
}

impl GeneratorMatrix {
    /// Accepts a caller-supplied matrix, which must already be in standard form.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        Self::from_array(matrix::from_rows(rows)?)
    }

    pub fn from_array(matrix: Array2<GF2>) -> Result<Self> {
        let (k, n) = matrix.dim();
        validate_dimensions(k, n)?;

        let left = matrix.slice(s![.., ..k]);
        let is_identity = left
            .indexed_iter()
            .all(|((i, j), x)| if i == j { x.is_one() } else { x.is_zero() });
        if !is_identity {
            return Err(CodecError::InvalidMatrix(
                "generator matrix is not in standard form [I_k | P]".to_string(),
            ));
        }

        Ok(GeneratorMatrix { matrix })
    }

    pub fn k(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn as_array(&self) -> &Array2<GF2> {
        &self.matrix
    }

    /// The `k x (n - k)` block `P`.
    pub fn parity_block(&self) -> ArrayView2<'_, GF2> {
        self.matrix.slice(s![.., self.k()..])
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        matrix::to_rows(&self.matrix)
    }
}

/// Parity-check matrix, `(n - k) x n`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParityCheckMatrix {
    matrix: Array2<GF2>,
}

impl ParityCheckMatrix {
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        Ok(ParityCheckMatrix { matrix: matrix::from_rows(rows)? })
    }

    pub fn from_array(matrix: Array2<GF2>) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(CodecError::InvalidMatrix("parity-check matrix has no rows or no columns".to_string()));
        }
        Ok(ParityCheckMatrix { matrix })
    }

    /// Number of check rows, `n - k`.
    pub fn redundancy(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn as_array(&self) -> &Array2<GF2> {
        &self.matrix
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        matrix::to_rows(&self.matrix)
    }
}

/// Random systematic generator. The parity block is uniform 0/1 whatever the channel alphabet.
pub fn build_generator<R: Rng + ?Sized>(k: usize, n: usize, rng: &mut R) -> Result<GeneratorMatrix> {
    validate_dimensions(k, n)?;

    let matrix = Array2::from_shape_fn((k, n), |(i, j)| {
        if j < k {
            gf2(i == j)
        } else {
            gf2(rng.gen::<bool>())
        }
    });

    Ok(GeneratorMatrix { matrix })
}

/// `H = [Pᵗ | I_{n-k}]` for `G = [I_k | P]`.
pub fn build_parity_check(g: &GeneratorMatrix) -> Result<ParityCheckMatrix> {
    let (k, n) = (g.k(), g.n());
    if n <= k {
        return Err(CodecError::InvalidDimensions(format!(
            "n must be greater than k to build a parity-check matrix, got k={} n={}", k, n
        )));
    }

    let pt = g.parity_block().t().to_owned();
    let identity = Array2::<GF2>::eye(n - k);
    let matrix = concatenate(Axis(1), &[pt.view(), identity.view()])
        .map_err(|e| CodecError::InvalidMatrix(e.to_string()))?;

    ParityCheckMatrix::from_array(matrix)
}
