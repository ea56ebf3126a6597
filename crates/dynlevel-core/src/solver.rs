//! Per-block gain computation.
//!
//! Each block gets the gain that would move its measured loudness onto the
//! target, bounded to `±max_gain_db`. Blocks with no defined loudness
//! (gated-out silence) get unity gain, so silence is never boosted.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::ConfigurationError;
use crate::math::db_to_linear;

/// Gain assigned to one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGain {
    /// Index of the block in its segmentation.
    pub block_index: usize,
    /// Gain in dB, within `[-max_gain_db, +max_gain_db]`.
    pub gain_db: f64,
    /// Linear gain, `10^(gain_db / 20)`.
    pub gain: f64,
    /// The unbounded gain exceeded the bound and was clamped.
    pub saturated: bool,
}

impl BlockGain {
    /// Unity gain for a block that could not be measured.
    pub fn unity(block_index: usize) -> Self {
        Self {
            block_index,
            gain_db: 0.0,
            gain: 1.0,
            saturated: false,
        }
    }
}

/// Ordered block gains for one phase.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GainCurve {
    gains: Vec<BlockGain>,
}

impl GainCurve {
    /// Wrap an ordered list of block gains.
    pub fn new(gains: Vec<BlockGain>) -> Self {
        Self { gains }
    }

    /// A curve of `blocks` unity gains.
    pub fn unity(blocks: usize) -> Self {
        Self {
            gains: (0..blocks).map(BlockGain::unity).collect(),
        }
    }

    /// Gains in block order.
    pub fn gains(&self) -> &[BlockGain] {
        &self.gains
    }

    /// Linear gain of block `index`, or unity past the end.
    pub fn linear(&self, index: usize) -> f64 {
        self.gains.get(index).map_or(1.0, |g| g.gain)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.gains.len()
    }

    /// Whether the curve holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    /// Indices of blocks whose gain hit the bound.
    pub fn saturated_blocks(&self) -> Vec<usize> {
        self.gains
            .iter()
            .filter(|g| g.saturated)
            .map(|g| g.block_index)
            .collect()
    }
}

/// Computes bounded per-block gains toward a target loudness.
///
/// ## Example
///
/// ```rust
/// use dynlevel_core::GainSolver;
///
/// let solver = GainSolver::new(-23.0, 6.0).unwrap();
/// let curve = solver.solve(&[Some(-25.0), None, Some(-40.0)]);
///
/// assert!((curve.gains()[0].gain_db - 2.0).abs() < 1e-12);
/// assert_eq!(curve.gains()[1].gain, 1.0);
/// assert_eq!(curve.gains()[2].gain_db, 6.0);
/// assert_eq!(curve.saturated_blocks(), vec![2]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GainSolver {
    target_lufs: f64,
    max_gain_db: f64,
}

impl GainSolver {
    /// Create a solver for `target_lufs` with gains bounded to `±max_gain_db`.
    pub fn new(target_lufs: f64, max_gain_db: f64) -> Result<Self, ConfigurationError> {
        if !target_lufs.is_finite() {
            return Err(ConfigurationError::InvalidTarget(target_lufs));
        }
        if !max_gain_db.is_finite() || max_gain_db < 0.0 {
            return Err(ConfigurationError::InvalidMaxGain(max_gain_db));
        }
        Ok(Self {
            target_lufs,
            max_gain_db,
        })
    }

    /// Target loudness in LUFS.
    pub fn target_lufs(&self) -> f64 {
        self.target_lufs
    }

    /// Gain bound in dB.
    pub fn max_gain_db(&self) -> f64 {
        self.max_gain_db
    }

    /// Gain for a single block measurement.
    pub fn block_gain(&self, block_index: usize, loudness: Option<f64>) -> BlockGain {
        let Some(measured) = loudness else {
            return BlockGain::unity(block_index);
        };

        let wanted = self.target_lufs - measured;
        let gain_db = wanted.clamp(-self.max_gain_db, self.max_gain_db);
        BlockGain {
            block_index,
            gain_db,
            gain: db_to_linear(gain_db),
            saturated: wanted.abs() > self.max_gain_db,
        }
    }

    /// Gains for every block, in order.
    pub fn solve(&self, loudness: &[Option<f64>]) -> GainCurve {
        GainCurve::new(
            loudness
                .iter()
                .enumerate()
                .map(|(index, &lufs)| self.block_gain(index, lufs))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            GainSolver::new(f64::NAN, 2.0),
            Err(ConfigurationError::InvalidTarget(_))
        ));
        assert_eq!(
            GainSolver::new(-16.0, -1.0).unwrap_err(),
            ConfigurationError::InvalidMaxGain(-1.0)
        );
        assert!(GainSolver::new(-16.0, f64::INFINITY).is_err());
        assert!(GainSolver::new(-16.0, 0.0).is_ok());
    }

    #[test]
    fn silence_is_exact_unity() {
        let solver = GainSolver::new(-16.0, 2.0).unwrap();
        let gain = solver.block_gain(3, None);
        assert_eq!(gain.block_index, 3);
        assert_eq!(gain.gain_db, 0.0);
        assert_eq!(gain.gain, 1.0);
        assert!(!gain.saturated);
    }

    #[test]
    fn within_bound_is_exact_distance() {
        let solver = GainSolver::new(-23.0, 6.0).unwrap();
        let gain = solver.block_gain(0, Some(-20.0));
        assert!((gain.gain_db - (-3.0)).abs() < 1e-12);
        assert!((gain.gain - db_to_linear(-3.0)).abs() < 1e-12);
        assert!(!gain.saturated);
    }

    #[test]
    fn bound_clamps_both_directions() {
        let solver = GainSolver::new(-23.0, 2.0).unwrap();
        let up = solver.block_gain(0, Some(-30.0));
        let down = solver.block_gain(1, Some(-10.0));
        assert_eq!(up.gain_db, 2.0);
        assert_eq!(down.gain_db, -2.0);
        assert!(up.saturated && down.saturated);
    }

    #[test]
    fn exactly_at_bound_is_not_saturated() {
        let solver = GainSolver::new(-20.0, 2.0).unwrap();
        let gain = solver.block_gain(0, Some(-22.0));
        assert_eq!(gain.gain_db, 2.0);
        assert!(!gain.saturated);
    }

    #[test]
    fn zero_bound_is_passthrough() {
        let solver = GainSolver::new(-16.0, 0.0).unwrap();
        let curve = solver.solve(&[Some(-30.0), Some(-5.0)]);
        assert!(curve.gains().iter().all(|g| g.gain == 1.0));
        assert_eq!(curve.saturated_blocks(), vec![0, 1]);
    }

    #[test]
    fn curve_lookup() {
        let curve = GainCurve::unity(3);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.linear(1), 1.0);
        assert_eq!(curve.linear(10), 1.0);
        assert!(GainCurve::default().is_empty());
    }
}
