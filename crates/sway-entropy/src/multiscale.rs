//! Multiscale Entropy (MSE).
//!
//! MSE evaluates Sample Entropy on coarse-grained copies of a signal at scales
//! `1..=S`. The similarity tolerance is a fraction of each coarse-grained
//! signal's own standard deviation, recomputed per scale, so the threshold
//! follows the variance reduction that block averaging causes.
//!
//! # Examples
//!
//! ```
//! use sway_entropy::{cancel::CancelToken, multiscale::multiscale_entropy};
//!
//! let signal: Vec<f64> = (0..300).map(|i| (f64::from(i) * 0.37).sin()).collect();
//! let profile = multiscale_entropy(&signal, 5, 2, 0.2, &CancelToken::new()).unwrap();
//!
//! assert_eq!(profile.len(), 5);
//! for (scale, entropy) in profile.iter() {
//!     println!("scale {scale}: {entropy:?}");
//! }
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sway_stats::descriptive;

use crate::{
    cancel::{CancelToken, Cancelled},
    coarse_grain::coarse_grain,
    sample_entropy::{self, UndefinedEntropy},
    sweep::{
        ConfigError, SignalError, check_signal, validate_parameters, validate_tolerance_fraction,
    },
};

/// Error returned by [`multiscale_entropy`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum ProfileError {
    #[display("invalid entropy parameters: {_0}")]
    Parameters(ConfigError),
    #[display("invalid signal: {_0}")]
    Signal(SignalError),
    #[display("{_0}")]
    Cancelled(Cancelled),
}

/// Entropy value for one scale: a finite estimate or the reason it is undefined.
pub type ScaleEntropy = Result<f64, UndefinedEntropy>;

/// Per-scale entropy values, indexed by scale `1..=S`.
///
/// The profile always has exactly one entry per requested scale; undefined
/// scales keep their position so profiles from different configurations stay
/// aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntropyProfile {
    values: Vec<ScaleEntropy>,
}

impl EntropyProfile {
    #[must_use]
    pub fn new(values: Vec<ScaleEntropy>) -> Self {
        Self { values }
    }

    /// Number of scales (`S`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entropy at `scale` (1-based), or `None` if the scale is out of range.
    #[must_use]
    pub fn get(&self, scale: usize) -> Option<&ScaleEntropy> {
        scale.checked_sub(1).and_then(|idx| self.values.get(idx))
    }

    /// Iterates over `(scale, entropy)` pairs in scale order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ScaleEntropy)> + '_ {
        self.values.iter().enumerate().map(|(idx, v)| (idx + 1, v))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScaleEntropy] {
        &self.values
    }

    /// Number of scales whose entropy is undefined.
    #[must_use]
    pub fn num_undefined(&self) -> usize {
        self.values.iter().filter(|v| v.is_err()).count()
    }
}

impl FromIterator<ScaleEntropy> for EntropyProfile {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = ScaleEntropy>,
    {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<f64>> for EntropyProfile {
    fn from(values: Vec<f64>) -> Self {
        values.into_iter().map(Ok).collect()
    }
}

/// A coarse-grained signal and the population standard deviation used to
/// scale the tolerance at that scale.
#[derive(Debug, Clone)]
struct Rung {
    samples: Vec<f64>,
    std_dev: f64,
}

/// Coarse-grained copies of one signal at scales `1..=S`.
///
/// Coarse-graining does not depend on the tolerance, so a ladder is built once
/// per signal and reused for every tolerance fraction of a sweep. Callers
/// validate the signal and parameters first.
#[derive(Debug, Clone)]
pub(crate) struct ScaleLadder {
    rungs: Vec<Option<Rung>>,
}

impl ScaleLadder {
    /// Coarse-grains `signal` at every scale in `1..=max_scale`.
    ///
    /// Scales longer than the signal are kept as empty rungs.
    #[must_use]
    pub(crate) fn new(signal: &[f64], max_scale: usize) -> Self {
        let rungs = (1..=max_scale)
            .into_par_iter()
            .map(|scale| {
                coarse_grain(signal, scale).map(|samples| {
                    let std_dev = descriptive::population_std_dev(&samples).unwrap_or(0.0);
                    Rung { samples, std_dev }
                })
            })
            .collect();
        Self { rungs }
    }

    /// Computes the entropy profile for one tolerance fraction.
    ///
    /// Scales are evaluated in parallel; the result is ordered by scale.
    pub(crate) fn profile(
        &self,
        dim: usize,
        tolerance_fraction: f64,
        cancel: &CancelToken,
    ) -> Result<EntropyProfile, Cancelled> {
        let values = self
            .rungs
            .par_iter()
            .enumerate()
            .map(|(idx, rung)| scale_entropy(idx + 1, rung.as_ref(), dim, tolerance_fraction, cancel))
            .collect::<Result<Vec<_>, Cancelled>>()?;
        Ok(EntropyProfile::new(values))
    }
}

fn scale_entropy(
    scale: usize,
    rung: Option<&Rung>,
    dim: usize,
    tolerance_fraction: f64,
    cancel: &CancelToken,
) -> Result<ScaleEntropy, Cancelled> {
    let Some(rung) = rung else {
        return Ok(Err(UndefinedEntropy::InsufficientData {
            len: 0,
            required: sample_entropy::required_len(dim),
        }));
    };
    if let Err(err) = sample_entropy::check_len(rung.samples.len(), dim) {
        tracing::debug!(scale, %err, "scale skipped");
        return Ok(Err(err));
    }

    let tolerance = tolerance_fraction * rung.std_dev;
    let counts =
        sample_entropy::count_matches_cancellable(&rung.samples, dim, tolerance, cancel)?;
    let entropy = counts.entropy();
    match &entropy {
        Ok(value) => tracing::trace!(scale, tolerance, value, "scale evaluated"),
        Err(err) => tracing::debug!(scale, tolerance, %err, "scale undefined"),
    }
    Ok(entropy)
}

/// Computes the multiscale entropy profile of `signal`.
///
/// `profile[τ]` for `τ = 1..=max_scale` is the Sample Entropy of the signal
/// coarse-grained at `τ`, with tolerance
/// `tolerance_fraction * std(coarse-grained signal)`.
///
/// The returned profile always has `max_scale` entries.
///
/// # Errors
///
/// * [`ProfileError::Parameters`] - zero `max_scale` or `dim`, or a tolerance
///   fraction that is not positive and finite
/// * [`ProfileError::Signal`] - empty, overlong or non-finite `signal`
/// * [`ProfileError::Cancelled`] - `cancel` fired during the computation
///
/// All input checks run before any coarse-graining.
pub fn multiscale_entropy(
    signal: &[f64],
    max_scale: usize,
    dim: usize,
    tolerance_fraction: f64,
    cancel: &CancelToken,
) -> Result<EntropyProfile, ProfileError> {
    validate_parameters(max_scale, dim)?;
    validate_tolerance_fraction(0, tolerance_fraction)?;
    check_signal(signal)?;
    let profile = ScaleLadder::new(signal, max_scale).profile(dim, tolerance_fraction, cancel)?;
    Ok(profile)
}
