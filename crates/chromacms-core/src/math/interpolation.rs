//! Interpolation routines for curve tables and CLUT grids
//!
//! CLUT evaluation is multilinear over the 2^N corners surrounding the
//! sample point. ICC grids have at most a handful of input dimensions;
//! this crate evaluates up to 4 (CMYK), so the corner walk stays small.

/// Maximum CLUT input dimensions the evaluator supports
pub const MAX_CLUT_INPUTS: usize = 4;

/// Linear interpolation: a + t * (b - a)
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Lookup in a 1D table with linear interpolation, input in [0, 1]
pub fn lut1d_interp(table: &[f64], input: f64) -> f64 {
    if table.is_empty() {
        return input;
    }
    if table.len() == 1 {
        return table[0];
    }

    let max_idx = (table.len() - 1) as f64;
    let pos = (input * max_idx).clamp(0.0, max_idx);

    let i0 = pos.floor() as usize;
    let i1 = (i0 + 1).min(table.len() - 1);
    let t = pos - i0 as f64;

    lerp(table[i0], table[i1], t)
}

/// Multilinear interpolation in a regular N-dimensional grid
///
/// `grid_points` gives the node count per input dimension (first
/// dimension varies slowest in `samples`, matching ICC CLUT layout);
/// `samples` holds `output_channels` interleaved values per node.
/// Inputs are in [0, 1] and `output` must have room for
/// `output_channels` values.
///
/// At an exact grid node every corner weight but one is zero, so the
/// stored node value is returned without interpolation error.
pub fn multilinear_interp(
    samples: &[f64],
    grid_points: &[u8],
    output_channels: usize,
    input: &[f64],
    output: &mut [f64],
) {
    debug_assert!(grid_points.len() <= MAX_CLUT_INPUTS);
    debug_assert_eq!(grid_points.len(), input.len());

    let n = grid_points.len();
    let mut base_idx = [0usize; MAX_CLUT_INPUTS];
    let mut frac = [0.0f64; MAX_CLUT_INPUTS];

    for dim in 0..n {
        let g = grid_points[dim] as usize;
        if g < 2 {
            base_idx[dim] = 0;
            frac[dim] = 0.0;
            continue;
        }
        let max_idx = (g - 1) as f64;
        let pos = (input[dim].clamp(0.0, 1.0) * max_idx).clamp(0.0, max_idx);
        let i0 = (pos.floor() as usize).min(g - 2);
        base_idx[dim] = i0;
        frac[dim] = pos - i0 as f64;
    }

    for out in output.iter_mut().take(output_channels) {
        *out = 0.0;
    }

    for corner in 0..(1usize << n) {
        let mut weight = 1.0;
        let mut offset = 0usize;

        for dim in 0..n {
            let g = grid_points[dim] as usize;
            let hi = (corner >> dim) & 1 == 1;
            let idx = if hi {
                weight *= frac[dim];
                (base_idx[dim] + 1).min(g.saturating_sub(1))
            } else {
                weight *= 1.0 - frac[dim];
                base_idx[dim]
            };
            offset = offset * g + idx;
        }

        if weight == 0.0 {
            continue;
        }

        let base = offset * output_channels;
        for c in 0..output_channels {
            output[c] += weight * samples[base + c];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 1.0, 0.5) - 0.5).abs() < EPSILON);
        assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < EPSILON);
    }

    #[test]
    fn test_lut1d() {
        let table = vec![0.0, 0.5, 1.0];
        assert!((lut1d_interp(&table, 0.0) - 0.0).abs() < EPSILON);
        assert!((lut1d_interp(&table, 0.5) - 0.5).abs() < EPSILON);
        assert!((lut1d_interp(&table, 1.0) - 1.0).abs() < EPSILON);
        assert!((lut1d_interp(&table, 0.25) - 0.25).abs() < EPSILON);
    }

    /// Build an identity CLUT: node value equals node coordinate
    fn identity_clut(grid: &[u8]) -> Vec<f64> {
        let n = grid.len();
        let total: usize = grid.iter().map(|&g| g as usize).product();
        let mut samples = vec![0.0; total * n];

        for node in 0..total {
            // Decompose flat index, first dimension slowest
            let mut rem = node;
            let mut coords = vec![0usize; n];
            for dim in (0..n).rev() {
                let g = grid[dim] as usize;
                coords[dim] = rem % g;
                rem /= g;
            }
            for dim in 0..n {
                samples[node * n + dim] = coords[dim] as f64 / (grid[dim] as usize - 1) as f64;
            }
        }
        samples
    }

    #[test]
    fn test_multilinear_identity_3d() {
        let grid = [3u8, 3, 3];
        let samples = identity_clut(&grid);

        let inputs = [
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.5, 0.5, 0.5],
            [0.25, 0.5, 0.75],
            [1.0, 0.0, 0.5],
        ];

        let mut out = [0.0; 3];
        for input in inputs {
            multilinear_interp(&samples, &grid, 3, &input, &mut out);
            for c in 0..3 {
                assert!(
                    (out[c] - input[c]).abs() < 1e-9,
                    "identity CLUT failed: {:?} -> {:?}",
                    input,
                    out
                );
            }
        }
    }

    #[test]
    fn test_exact_grid_node() {
        // 2-node grid with arbitrary (non-linear) values: evaluation at
        // a node must return the stored value exactly.
        let grid = [2u8, 2];
        let samples = vec![
            0.1, // (0,0)
            0.7, // (0,1)
            0.3, // (1,0)
            0.9, // (1,1)
        ];

        let mut out = [0.0; 1];
        multilinear_interp(&samples, &grid, 1, &[0.0, 0.0], &mut out);
        assert_eq!(out[0], 0.1);
        multilinear_interp(&samples, &grid, 1, &[1.0, 1.0], &mut out);
        assert_eq!(out[0], 0.9);
        multilinear_interp(&samples, &grid, 1, &[1.0, 0.0], &mut out);
        assert_eq!(out[0], 0.3);
    }

    #[test]
    fn test_multilinear_identity_4d() {
        let grid = [2u8, 2, 2, 2];
        let samples = identity_clut(&grid);

        let input = [0.25, 0.75, 0.5, 1.0];
        let mut out = [0.0; 4];
        multilinear_interp(&samples, &grid, 4, &input, &mut out);
        for c in 0..4 {
            assert!((out[c] - input[c]).abs() < 1e-9);
        }
    }
}
