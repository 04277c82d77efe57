//! Curve - Coefficient Functions over Bend Points
//!
//! A curve in weight space is parametrized by a scalar `t` in `[0, 1]` and a
//! fixed number of bend points. For a given `t` the curve produces one
//! coefficient per bend, and a curve-aware layer evaluates its weights as the
//! coefficient-weighted sum of its per-bend weight tensors. Both curve
//! families here produce coefficients that sum to one, select the first bend
//! exactly at `t = 0` and the last bend exactly at `t = 1`.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

// =============================================================================
// Curve Trait
// =============================================================================

/// Maps a position `t` on the curve to one blending coefficient per bend.
pub trait Curve: Send + Sync {
    /// Number of bend points the curve is defined over.
    fn num_bends(&self) -> usize;

    /// Blending coefficients at position `t`, one per bend.
    ///
    /// The coefficients form a partition of unity for `t` in `[0, 1]`.
    fn coefficients(&self, t: f32) -> Vec<f32>;
}

// =============================================================================
// Bezier Curve
// =============================================================================

/// Bezier curve coefficients over the bend points.
///
/// Bend `i` of `n` receives the Bernstein weight
/// `C(n-1, i) * t^i * (1-t)^(n-1-i)`. The binomial row is precomputed at
/// construction.
pub struct Bezier {
    num_bends: usize,
    binom: Vec<f32>,
}

impl Bezier {
    /// Creates a Bezier curve over `num_bends` bend points.
    ///
    /// # Panics
    ///
    /// Panics if `num_bends < 2`.
    pub fn new(num_bends: usize) -> Self {
        assert!(num_bends >= 2, "A curve needs at least two bends");
        let degree = num_bends - 1;
        let binom = (0..num_bends)
            .map(|i| binomial(degree, i) as f32)
            .collect();
        Self { num_bends, binom }
    }
}

impl Curve for Bezier {
    fn num_bends(&self) -> usize {
        self.num_bends
    }

    fn coefficients(&self, t: f32) -> Vec<f32> {
        let degree = self.num_bends - 1;
        (0..self.num_bends)
            .map(|i| {
                self.binom[i]
                    * t.powi(i as i32)
                    * (1.0 - t).powi((degree - i) as i32)
            })
            .collect()
    }
}

impl std::fmt::Debug for Bezier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bezier")
            .field("num_bends", &self.num_bends)
            .finish()
    }
}

// =============================================================================
// Polygonal Chain
// =============================================================================

/// Piecewise-linear chain through the bend points.
///
/// Bend `i` of `n` receives `max(0, 1 - |t * (n-1) - i|)`, so at any `t` at
/// most two neighboring bends are active and the curve passes through every
/// bend exactly.
pub struct PolyChain {
    num_bends: usize,
}

impl PolyChain {
    /// Creates a polygonal chain over `num_bends` bend points.
    ///
    /// # Panics
    ///
    /// Panics if `num_bends < 2`.
    pub fn new(num_bends: usize) -> Self {
        assert!(num_bends >= 2, "A curve needs at least two bends");
        Self { num_bends }
    }
}

impl Curve for PolyChain {
    fn num_bends(&self) -> usize {
        self.num_bends
    }

    fn coefficients(&self, t: f32) -> Vec<f32> {
        let t_n = t * (self.num_bends - 1) as f32;
        (0..self.num_bends)
            .map(|i| (1.0 - (t_n - i as f32).abs()).max(0.0))
            .collect()
    }
}

impl std::fmt::Debug for PolyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolyChain")
            .field("num_bends", &self.num_bends)
            .finish()
    }
}

// =============================================================================
// Fixed-Bend Layout
// =============================================================================

/// Builds the per-bend fixed flags for a curve with `num_bends` bends.
///
/// The first flag is `fix_start`, the last is `fix_end`, and every interior
/// bend is trainable. Fixed bends hold imported endpoint weights and never
/// require gradients.
///
/// # Panics
///
/// Panics if `num_bends < 2`.
pub fn fix_points(num_bends: usize, fix_start: bool, fix_end: bool) -> Vec<bool> {
    assert!(num_bends >= 2, "A curve needs at least two bends");
    let mut fixed = vec![false; num_bends];
    fixed[0] = fix_start;
    fixed[num_bends - 1] = fix_end;
    fixed
}

/// Binomial coefficient `C(n, k)` computed with the multiplicative formula.
fn binomial(n: usize, k: usize) -> u64 {
    let k = k.min(n - k);
    let mut result = 1u64;
    for i in 0..k {
        result = result * (n - i) as u64 / (i + 1) as u64;
    }
    result
}

// =============================================================================
// Tests
// =============================================================================
