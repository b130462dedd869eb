//! Summary statistics over two entropy profiles.
//!
//! Postural sway is recorded on two horizontal axes. Their entropy profiles are
//! summed scale by scale and the summed profile is reduced to four numbers:
//! median, standard error, variance and normalized error.
//!
//! # Examples
//!
//! ```
//! use sway_entropy::{
//!     cross_axis::{MissingScalePolicy, cross_axis_summary},
//!     multiscale::EntropyProfile,
//! };
//!
//! let x = EntropyProfile::from(vec![1.0, 1.2, 0.8, 1.0]);
//! let y = EntropyProfile::from(vec![1.0, 0.8, 1.2, 1.0]);
//! let summary = cross_axis_summary(&x, &y, MissingScalePolicy::Exclude).unwrap();
//!
//! assert!((summary.median - 2.0).abs() < 1e-12);
//! assert!(summary.variance.abs() < 1e-12);
//! ```

use std::iter;

use serde::{Deserialize, Serialize};
use sway_stats::descriptive::DescriptiveStats;

use crate::{
    multiscale::{EntropyProfile, ScaleEntropy},
    sample_entropy::UndefinedEntropy,
};

/// Minimum number of defined scales a summary needs (standard error uses `n - 1`).
pub const MIN_SUMMARY_SCALES: usize = 2;

/// How scales with undefined entropy are treated when summarizing.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum MissingScalePolicy {
    /// Drop scales that are undefined on either axis and summarize the rest.
    #[default]
    Exclude,
    /// Refuse to summarize if any scale is undefined.
    Reject,
}

/// Summary of the summed two-axis entropy profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossAxisSummary {
    /// Median of the summed profile.
    pub median: f64,
    /// Bessel-corrected standard deviation divided by `sqrt(n)`.
    pub standard_error: f64,
    /// Population variance (divisor `n`).
    pub variance: f64,
    /// `standard_error / median`.
    pub normalized_error: f64,
    /// Number of scales that contributed.
    pub scales_used: usize,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrossAxisError {
    #[display("profile lengths differ ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[display("profiles are empty")]
    EmptyProfile,
    #[display("entropy at scale {scale} is undefined: {reason}")]
    UndefinedScale {
        scale: usize,
        reason: UndefinedEntropy,
    },
    #[display("only {valid} defined scales, at least {required} required")]
    TooFewValues { valid: usize, required: usize },
    #[display("median of summed entropy is zero")]
    ZeroMedian,
}

/// Sums two profiles scale by scale.
///
/// A scale is undefined in the result if it is undefined in either input; the
/// reason from `x` wins when both are undefined.
pub fn summed_profile(
    x: &EntropyProfile,
    y: &EntropyProfile,
) -> Result<EntropyProfile, CrossAxisError> {
    if x.len() != y.len() {
        return Err(CrossAxisError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    Ok(iter::zip(x.as_slice(), y.as_slice())
        .map(|(a, b)| -> ScaleEntropy { Ok((*a)? + (*b)?) })
        .collect())
}

/// Summarizes the scale-wise sum of two entropy profiles.
///
/// # Errors
///
/// * [`CrossAxisError::LengthMismatch`] / [`CrossAxisError::EmptyProfile`] - unusable inputs
/// * [`CrossAxisError::UndefinedScale`] - any undefined scale under [`MissingScalePolicy::Reject`]
/// * [`CrossAxisError::TooFewValues`] - fewer than [`MIN_SUMMARY_SCALES`] defined scales
/// * [`CrossAxisError::ZeroMedian`] - the normalized error would divide by zero
pub fn cross_axis_summary(
    x: &EntropyProfile,
    y: &EntropyProfile,
    policy: MissingScalePolicy,
) -> Result<CrossAxisSummary, CrossAxisError> {
    let summed = summed_profile(x, y)?;
    if summed.is_empty() {
        return Err(CrossAxisError::EmptyProfile);
    }

    let mut values = Vec::with_capacity(summed.len());
    for (scale, entropy) in summed.iter() {
        match (entropy, policy) {
            (Ok(value), _) => values.push(*value),
            (Err(reason), MissingScalePolicy::Reject) => {
                return Err(CrossAxisError::UndefinedScale {
                    scale,
                    reason: *reason,
                });
            }
            (Err(_), MissingScalePolicy::Exclude) => {}
        }
    }
    summarize(values)
}

/// Summarizes already-summed entropy values.
///
/// # Examples
///
/// ```
/// use sway_entropy::cross_axis::{CrossAxisError, summarize};
///
/// let summary = summarize([2.0, 2.0, 2.0, 2.0]).unwrap();
/// assert_eq!(summary.median, 2.0);
/// assert_eq!(summary.standard_error, 0.0);
///
/// assert!(matches!(
///     summarize([2.0]),
///     Err(CrossAxisError::TooFewValues { valid: 1, required: 2 })
/// ));
/// ```
pub fn summarize<I>(values: I) -> Result<CrossAxisSummary, CrossAxisError>
where
    I: IntoIterator<Item = f64>,
{
    let values = values.into_iter().collect::<Vec<_>>();
    let too_few = CrossAxisError::TooFewValues {
        valid: values.len(),
        required: MIN_SUMMARY_SCALES,
    };
    if values.len() < MIN_SUMMARY_SCALES {
        return Err(too_few);
    }
    let stats = DescriptiveStats::new(values).ok_or(too_few)?;
    let standard_error = stats.standard_error.ok_or(too_few)?;
    if stats.median == 0.0 {
        return Err(CrossAxisError::ZeroMedian);
    }

    Ok(CrossAxisSummary {
        median: stats.median,
        standard_error,
        variance: stats.variance,
        normalized_error: standard_error / stats.median,
        scales_used: stats.count,
    })
}
