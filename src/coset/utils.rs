/// The lexicographically first combination of `w` positions starting at `start`.
pub fn first_combination(start: usize, w: usize) -> Vec<usize> {
    (start..start + w).collect()
}

/// Advance a combination to its lexicographic successor.
///
/// # Arguments
/// * `combination` - Strictly ascending positions, each below `n`
/// * `n` - Number of available positions
///
/// # Returns
/// `true` if `combination` was advanced, `false` (leaving it untouched) if it was the last one
pub fn next_combination(combination: &mut [usize], n: usize) -> bool {
    let w = combination.len();
    let mut i = w;
    while i > 0 {
        i -= 1;
        if combination[i] < n - w + i {
            combination[i] += 1;
            for j in i + 1..w {
                combination[j] = combination[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Packed syndrome of an error pattern.
///
/// # Arguments
/// * `columns` - Packed syndrome of each single-position error (see `column_syndromes`)
/// * `positions` - Positions set in the pattern
///
/// # Returns
/// The XOR of `columns[p]` over all `p` in `positions`
pub fn pattern_syndrome(columns: &[usize], positions: &[usize]) -> usize {
    positions.iter().fold(0, |acc, &p| acc ^ columns[p])
}

/// `C(n, w)`, saturating at `u64::MAX`.
pub fn binomial(n: usize, w: usize) -> u64 {
    if w > n {
        return 0;
    }
    let w = w.min(n - w);
    let mut result: u128 = 1;
    for i in 0..w {
        result = result * (n - i) as u128 / (i as u128 + 1);
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}
