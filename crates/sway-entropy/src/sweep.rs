//! Tolerance sweeps over two signal axes.
//!
//! A sweep evaluates the multiscale entropy of two axes for every tolerance
//! fraction in a [`SweepConfig`] and summarizes each pair of profiles with
//! [`cross_axis_summary`]. The result is an ordered list aligned with the
//! configured tolerance fractions, ready to be charted as response curves.
//!
//! Configuration problems are fatal and reported before any computation.
//! Undefined entropy at a scale and undefined summaries are recorded in place
//! and never abort the sweep.
//!
//! # Examples
//!
//! ```
//! use sway_entropy::{
//!     cancel::CancelToken,
//!     sweep::{SweepConfig, run_sweep},
//! };
//!
//! let x: Vec<f64> = (0..400).map(|i| (f64::from(i) * 0.31).sin()).collect();
//! let y: Vec<f64> = (0..400).map(|i| (f64::from(i) * 0.17).cos()).collect();
//! let config = SweepConfig {
//!     max_scale: 4,
//!     tolerance_fractions: vec![0.2, 0.5],
//!     ..SweepConfig::default()
//! };
//!
//! let report = run_sweep(&x, &y, &config, &CancelToken::new()).unwrap();
//! assert_eq!(report.points.len(), 2);
//! assert_eq!(report.points[0].tolerance_fraction, 0.2);
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sway_stats::spacing::linspace;

use crate::{
    cancel::{CancelToken, Cancelled},
    cross_axis::{CrossAxisError, CrossAxisSummary, MissingScalePolicy, cross_axis_summary},
    multiscale::{EntropyProfile, ScaleLadder},
};

/// Longest signal a sweep accepts.
///
/// SampEn is quadratic in the signal length and a sweep evaluates it
/// `2 · S · R` times, so longer recordings should be split or decimated by
/// the caller.
pub const MAX_SIGNAL_LEN: usize = 100_000;

pub const DEFAULT_MAX_SCALE: usize = 20;
pub const DEFAULT_EMBEDDING_DIM: usize = 2;
pub const DEFAULT_TOLERANCE_RANGE: (f64, f64) = (0.1, 1.0);
pub const DEFAULT_TOLERANCE_COUNT: usize = 5;

/// The horizontal sway axis a signal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Axis {
    X,
    Y,
}

/// Parameters of a tolerance sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Largest coarse-graining scale `S`; scales `1..=S` are evaluated.
    pub max_scale: usize,
    /// Embedding dimension `m`.
    pub embedding_dim: usize,
    /// Tolerance fractions `r`, each multiplied by the per-scale standard deviation.
    pub tolerance_fractions: Vec<f64>,
    pub missing_scale_policy: MissingScalePolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let (start, end) = DEFAULT_TOLERANCE_RANGE;
        Self {
            max_scale: DEFAULT_MAX_SCALE,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            tolerance_fractions: linspace(start, end, DEFAULT_TOLERANCE_COUNT),
            missing_scale_policy: MissingScalePolicy::default(),
        }
    }
}

/// Why a signal cannot be analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SignalError {
    #[display("signal is empty")]
    Empty,
    #[display("signal has {len} samples, more than the limit of {max}")]
    TooLong { len: usize, max: usize },
    #[display("signal has a non-finite sample at index {index}")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("maximum scale must be at least 1")]
    ZeroMaxScale,
    #[display("embedding dimension must be at least 1")]
    ZeroEmbeddingDim,
    #[display("no tolerance fractions given")]
    NoToleranceFractions,
    #[display("tolerance fraction #{index} ({value}) must be positive and finite")]
    InvalidToleranceFraction { index: usize, value: f64 },
    #[display("axis {axis}: {source}")]
    InvalidSignal { axis: Axis, source: SignalError },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SweepError {
    #[display("invalid sweep configuration: {_0}")]
    Config(ConfigError),
    #[display("{_0}")]
    Cancelled(Cancelled),
}

impl SweepConfig {
    /// Checks the parameters independent of any signal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_parameters(self.max_scale, self.embedding_dim)?;
        if self.tolerance_fractions.is_empty() {
            return Err(ConfigError::NoToleranceFractions);
        }
        for (index, &value) in self.tolerance_fractions.iter().enumerate() {
            validate_tolerance_fraction(index, value)?;
        }
        Ok(())
    }

    /// Checks that `signal` can be swept.
    pub fn validate_signal(axis: Axis, signal: &[f64]) -> Result<(), ConfigError> {
        check_signal(signal).map_err(|source| ConfigError::InvalidSignal { axis, source })
    }
}

/// Checks the scale count and embedding dimension.
pub fn validate_parameters(max_scale: usize, embedding_dim: usize) -> Result<(), ConfigError> {
    if max_scale == 0 {
        return Err(ConfigError::ZeroMaxScale);
    }
    if embedding_dim == 0 {
        return Err(ConfigError::ZeroEmbeddingDim);
    }
    Ok(())
}

/// Checks that a tolerance fraction is positive and finite. `index` is its
/// position in the configured list, used in the error.
pub fn validate_tolerance_fraction(index: usize, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidToleranceFraction { index, value })
    }
}

/// Checks that `signal` is non-empty, finite and at most [`MAX_SIGNAL_LEN`] long.
pub fn check_signal(signal: &[f64]) -> Result<(), SignalError> {
    if signal.is_empty() {
        return Err(SignalError::Empty);
    }
    if signal.len() > MAX_SIGNAL_LEN {
        return Err(SignalError::TooLong {
            len: signal.len(),
            max: MAX_SIGNAL_LEN,
        });
    }
    if let Some(index) = signal.iter().position(|v| !v.is_finite()) {
        return Err(SignalError::NonFinite { index });
    }
    Ok(())
}

/// Results for one tolerance fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub tolerance_fraction: f64,
    pub x: EntropyProfile,
    pub y: EntropyProfile,
    pub summary: Result<CrossAxisSummary, CrossAxisError>,
}

/// All sweep points, in the order of [`SweepConfig::tolerance_fractions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub config: SweepConfig,
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    /// Number of points whose summary is undefined.
    #[must_use]
    pub fn num_undefined_summaries(&self) -> usize {
        self.points.iter().filter(|p| p.summary.is_err()).count()
    }
}

/// Runs a tolerance sweep over the `x` and `y` axes.
///
/// Tolerance fractions are evaluated in parallel and reported in configuration
/// order.
///
/// # Errors
///
/// * [`SweepError::Config`] - invalid parameters or signals, before any work is done
/// * [`SweepError::Cancelled`] - `cancel` fired while the sweep was running
pub fn run_sweep(
    x: &[f64],
    y: &[f64],
    config: &SweepConfig,
    cancel: &CancelToken,
) -> Result<SweepReport, SweepError> {
    config.validate()?;
    SweepConfig::validate_signal(Axis::X, x)?;
    SweepConfig::validate_signal(Axis::Y, y)?;

    let _span = tracing::info_span!(
        "sweep",
        x_len = x.len(),
        y_len = y.len(),
        max_scale = config.max_scale,
        dim = config.embedding_dim,
    )
    .entered();
    tracing::info!(
        tolerances = config.tolerance_fractions.len(),
        "starting tolerance sweep"
    );

    let (x_ladder, y_ladder) = rayon::join(
        || ScaleLadder::new(x, config.max_scale),
        || ScaleLadder::new(y, config.max_scale),
    );

    let points = config
        .tolerance_fractions
        .par_iter()
        .map(|&tolerance_fraction| {
            let x = x_ladder.profile(config.embedding_dim, tolerance_fraction, cancel)?;
            let y = y_ladder.profile(config.embedding_dim, tolerance_fraction, cancel)?;
            let summary = cross_axis_summary(&x, &y, config.missing_scale_policy);
            if let Err(err) = &summary {
                tracing::warn!(tolerance_fraction, %err, "summary undefined");
            }
            Ok(SweepPoint {
                tolerance_fraction,
                x,
                y,
                summary,
            })
        })
        .collect::<Result<Vec<_>, Cancelled>>()?;

    let report = SweepReport {
        config: config.clone(),
        points,
    };
    tracing::info!(
        undefined_summaries = report.num_undefined_summaries(),
        "tolerance sweep finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn noise(len: usize, seed: u64) -> Vec<f64> {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let normal = Normal::new(0.0, 0.5).unwrap();
        (0..len).map(|_| normal.sample(&mut rng)).collect()
    }

    fn small_config() -> SweepConfig {
        SweepConfig {
            max_scale: 5,
            tolerance_fractions: vec![0.15, 0.3, 0.6],
            ..SweepConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = SweepConfig::default();
        assert_eq!(config.max_scale, 20);
        assert_eq!(config.embedding_dim, 2);
        assert_eq!(config.tolerance_fractions.len(), 5);
        assert_eq!(config.tolerance_fractions[0], 0.1);
        assert_eq!(config.tolerance_fractions[4], 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let cases = [
            (
                SweepConfig {
                    max_scale: 0,
                    ..SweepConfig::default()
                },
                ConfigError::ZeroMaxScale,
            ),
            (
                SweepConfig {
                    embedding_dim: 0,
                    ..SweepConfig::default()
                },
                ConfigError::ZeroEmbeddingDim,
            ),
            (
                SweepConfig {
                    tolerance_fractions: vec![],
                    ..SweepConfig::default()
                },
                ConfigError::NoToleranceFractions,
            ),
            (
                SweepConfig {
                    tolerance_fractions: vec![0.2, -0.1],
                    ..SweepConfig::default()
                },
                ConfigError::InvalidToleranceFraction {
                    index: 1,
                    value: -0.1,
                },
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }

        let nan = SweepConfig {
            tolerance_fractions: vec![f64::NAN],
            ..SweepConfig::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::InvalidToleranceFraction { index: 0, .. })
        ));
    }

    #[test]
    fn test_signal_length_limit_boundary() {
        // validation runs before any entropy work, so the boundary is cheap to check
        let at_limit = vec![0.0; MAX_SIGNAL_LEN];
        assert!(SweepConfig::validate_signal(Axis::X, &at_limit).is_ok());

        let over_limit = vec![0.0; MAX_SIGNAL_LEN + 1];
        assert_eq!(
            SweepConfig::validate_signal(Axis::Y, &over_limit),
            Err(ConfigError::InvalidSignal {
                axis: Axis::Y,
                source: SignalError::TooLong {
                    len: MAX_SIGNAL_LEN + 1,
                    max: MAX_SIGNAL_LEN,
                },
            })
        );
    }

    #[test]
    fn test_bad_signals_fail_before_computation() {
        let good = noise(50, 1);
        let config = small_config();
        let cancel = CancelToken::new();

        assert_eq!(
            run_sweep(&good, &[], &config, &cancel),
            Err(SweepError::Config(ConfigError::InvalidSignal {
                axis: Axis::Y,
                source: SignalError::Empty,
            }))
        );

        let mut bad = good.clone();
        bad[7] = f64::INFINITY;
        assert_eq!(
            run_sweep(&bad, &good, &config, &cancel),
            Err(SweepError::Config(ConfigError::InvalidSignal {
                axis: Axis::X,
                source: SignalError::NonFinite { index: 7 },
            }))
        );
    }

    #[test]
    fn test_points_follow_configuration_order() {
        let x = noise(300, 2);
        let y = noise(300, 3);
        let config = SweepConfig {
            tolerance_fractions: vec![0.9, 0.1, 0.5],
            ..small_config()
        };
        let report = run_sweep(&x, &y, &config, &CancelToken::new()).unwrap();

        let order: Vec<f64> = report.points.iter().map(|p| p.tolerance_fraction).collect();
        assert_eq!(order, vec![0.9, 0.1, 0.5]);
        for point in &report.points {
            assert_eq!(point.x.len(), 5);
            assert_eq!(point.y.len(), 5);
        }
        assert_eq!(report.config, config);
    }

    #[test]
    fn test_points_match_independent_computation() {
        let x = noise(250, 4);
        let y = noise(250, 5);
        let config = small_config();
        let cancel = CancelToken::new();
        let report = run_sweep(&x, &y, &config, &cancel).unwrap();

        for point in &report.points {
            let px = crate::multiscale::multiscale_entropy(
                &x,
                config.max_scale,
                config.embedding_dim,
                point.tolerance_fraction,
                &cancel,
            )
            .unwrap();
            assert_eq!(point.x, px);
            assert_eq!(
                point.summary,
                cross_axis_summary(&point.x, &point.y, config.missing_scale_policy)
            );
        }
    }

    #[test]
    fn test_undefined_summary_does_not_abort_sweep() {
        // five samples: only scale 1 has enough data, so no summary can be formed
        let x = [0.1, 0.4, 0.2, 0.5, 0.3];
        let config = small_config();
        let report = run_sweep(&x, &x, &config, &CancelToken::new()).unwrap();
        assert_eq!(report.points.len(), 3);
        assert_eq!(report.num_undefined_summaries(), 3);
        for point in &report.points {
            assert!(point.summary.unwrap_err().is_too_few_values());
        }
    }

    #[test]
    fn test_cancelled_sweep() {
        let x = noise(200, 6);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            run_sweep(&x, &x, &small_config(), &cancel),
            Err(SweepError::Cancelled(Cancelled))
        );
    }

    #[test]
    fn test_config_round_trips_through_json_with_defaults() {
        let config: SweepConfig =
            serde_json::from_str(r#"{ "max_scale": 8, "missing_scale_policy": "reject" }"#)
                .unwrap();
        assert_eq!(config.max_scale, 8);
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
        assert_eq!(config.missing_scale_policy, MissingScalePolicy::Reject);

        assert!(serde_json::from_str::<SweepConfig>(r#"{ "scale": 8 }"#).is_err());
    }
}
