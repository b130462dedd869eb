//! Sample Entropy (SampEn) estimation.
//!
//! SampEn measures how predictable a signal is: it is the negative logarithm of
//! the conditional probability that two subsequences ("templates") which are
//! similar for `m` samples remain similar when extended to `m + 1` samples.
//! Regular signals score close to zero; irregular signals score higher.
//!
//! # Template convention
//!
//! For a signal of `n` samples and embedding dimension `m`, templates start at
//! indices `0..n - m`. The template that would end on the very last sample is
//! left out so that every length-`m` template can be extended to length `m + 1`
//! over the *same* index range. Both match counts are normalized by the same
//! denominator `(n - m + 1) * (n - m)`, so the normalization cancels in the
//! ratio and the estimate reduces to `-ln(A / B)`, where `B` counts length-`m`
//! matches and `A` counts length-`m + 1` matches.
//!
//! Two templates match when their Chebyshev distance (maximum absolute
//! elementwise difference) is at most `r`. Self matches are never counted.
//!
//! # Undefined results
//!
//! The estimate is undefined rather than infinite or NaN when the signal is
//! too short or when either match count is zero; see [`UndefinedEntropy`].
//!
//! # Complexity
//!
//! Matching is an explicit nested loop over template pairs, `O(n² · m)` time
//! and `O(1)` extra memory. Counts are `u64` and never truncate. Input-size
//! limits are enforced where sweeps are configured
//! ([`MAX_SIGNAL_LEN`](crate::sweep::MAX_SIGNAL_LEN)), not here.

use serde::{Deserialize, Serialize};

use crate::cancel::{CancelToken, Cancelled};

/// Reason a Sample Entropy estimate is undefined.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UndefinedEntropy {
    /// The signal has fewer than `m + 1` samples.
    #[display("signal has {len} samples but at least {required} are required")]
    InsufficientData { len: usize, required: usize },
    /// No template pair matched at length `m` or at length `m + 1`.
    #[display(
        "no template matches among {templates} templates (length m: {matches_m}, length m+1: {matches_m_plus_1})"
    )]
    DegenerateMatches {
        templates: usize,
        matches_m: u64,
        matches_m_plus_1: u64,
    },
}

/// Template match counts for one signal, dimension and tolerance.
///
/// Counts are over ordered pairs `(i, j)` with `i != j`, so every unordered
/// matching pair contributes two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounts {
    /// Number of samples in the signal.
    pub len: usize,
    /// Embedding dimension `m`.
    pub dim: usize,
    /// Number of templates compared (`len - dim`).
    pub templates: usize,
    /// Matches between length-`m` templates (`B`).
    pub matches_m: u64,
    /// Matches between the same templates extended to length `m + 1` (`A`).
    pub matches_m_plus_1: u64,
}

impl MatchCounts {
    #[expect(clippy::cast_precision_loss)]
    fn normalization(&self) -> f64 {
        let n = self.len as f64;
        let m = self.dim as f64;
        (n - m + 1.0) * (n - m)
    }

    /// Probability estimate `φ(m)` that two length-`m` templates match.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn phi_m(&self) -> f64 {
        self.matches_m as f64 / self.normalization()
    }

    /// Probability estimate `φ(m + 1)` that two extended templates match.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn phi_m_plus_1(&self) -> f64 {
        self.matches_m_plus_1 as f64 / self.normalization()
    }

    /// Sample Entropy `-ln(φ(m + 1) / φ(m))`.
    ///
    /// Undefined when either count is zero.
    pub fn entropy(&self) -> Result<f64, UndefinedEntropy> {
        if self.matches_m == 0 || self.matches_m_plus_1 == 0 {
            return Err(UndefinedEntropy::DegenerateMatches {
                templates: self.templates,
                matches_m: self.matches_m,
                matches_m_plus_1: self.matches_m_plus_1,
            });
        }
        // ln(B / A) rather than -ln(A / B) so that A == B yields +0.0
        Ok((self.phi_m() / self.phi_m_plus_1()).ln())
    }
}

/// Minimum number of samples for which SampEn can be defined at dimension `dim`.
#[must_use]
pub const fn required_len(dim: usize) -> usize {
    dim + 1
}

/// Computes the Sample Entropy of `signal`.
///
/// # Arguments
///
/// * `signal` - The samples to analyze
/// * `dim` - Embedding dimension `m` (template length)
/// * `tolerance` - Absolute similarity threshold `r`, already scaled by the caller
///
/// A NaN or strictly negative `tolerance` matches nothing and therefore
/// yields [`UndefinedEntropy::DegenerateMatches`]. `-0.0` compares equal to
/// `0.0` and matches identical templates. Relative tolerances are validated by
/// [`multiscale_entropy`](crate::multiscale::multiscale_entropy).
///
/// # Panics
///
/// Panics if `dim` is zero.
///
/// # Examples
///
/// ```
/// use sway_entropy::sample_entropy::{UndefinedEntropy, sample_entropy};
///
/// let signal = [1.0, 2.0, 1.0, 2.0, 1.0, 3.0, 1.0, 2.0];
/// let entropy = sample_entropy(&signal, 2, 0.5).unwrap();
/// assert!((entropy - 2.0_f64.ln()).abs() < 1e-12);
///
/// assert!(matches!(
///     sample_entropy(&[1.0, 2.0], 2, 0.5),
///     Err(UndefinedEntropy::InsufficientData { len: 2, required: 3 })
/// ));
/// ```
pub fn sample_entropy(signal: &[f64], dim: usize, tolerance: f64) -> Result<f64, UndefinedEntropy> {
    check_len(signal.len(), dim)?;
    count_matches(signal, dim, tolerance).entropy()
}

/// Returns `InsufficientData` if a signal of `len` samples is too short for `dim`.
pub fn check_len(len: usize, dim: usize) -> Result<(), UndefinedEntropy> {
    let required = required_len(dim);
    if len < required {
        return Err(UndefinedEntropy::InsufficientData { len, required });
    }
    Ok(())
}

/// Counts template matches at lengths `dim` and `dim + 1`.
///
/// # Panics
///
/// Panics if `dim` is zero.
#[must_use]
pub fn count_matches(signal: &[f64], dim: usize, tolerance: f64) -> MatchCounts {
    let mut counts = empty_counts(signal.len(), dim);
    for i in 0..counts.templates {
        let (m, m1) = count_row(signal, dim, tolerance, i, counts.templates);
        counts.matches_m += m;
        counts.matches_m_plus_1 += m1;
    }
    counts
}

/// Cancellable variant of [`count_matches`].
///
/// The token is polled once per template, so cancellation latency is one row
/// of the comparison, `O(n · m)`.
///
/// # Panics
///
/// Panics if `dim` is zero.
pub fn count_matches_cancellable(
    signal: &[f64],
    dim: usize,
    tolerance: f64,
    cancel: &CancelToken,
) -> Result<MatchCounts, Cancelled> {
    let mut counts = empty_counts(signal.len(), dim);
    for i in 0..counts.templates {
        cancel.check()?;
        let (m, m1) = count_row(signal, dim, tolerance, i, counts.templates);
        counts.matches_m += m;
        counts.matches_m_plus_1 += m1;
    }
    Ok(counts)
}

fn empty_counts(len: usize, dim: usize) -> MatchCounts {
    assert!(dim > 0, "embedding dimension must be at least 1");
    MatchCounts {
        len,
        dim,
        templates: len.saturating_sub(dim),
        matches_m: 0,
        matches_m_plus_1: 0,
    }
}

/// Matches of template `i` against every later template, counted in both
/// directions.
fn count_row(signal: &[f64], dim: usize, tolerance: f64, i: usize, templates: usize) -> (u64, u64) {
    let head = &signal[i..i + dim];
    let next = signal[i + dim];
    let mut matches_m = 0;
    let mut matches_m_plus_1 = 0;
    for j in i + 1..templates {
        let similar = head
            .iter()
            .zip(&signal[j..j + dim])
            .all(|(a, b)| (a - b).abs() <= tolerance);
        if !similar {
            continue;
        }
        matches_m += 2;
        if (next - signal[j + dim]).abs() <= tolerance {
            matches_m_plus_1 += 2;
        }
    }
    (matches_m, matches_m_plus_1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_computed_fixture() {
        // templates (1,2) at 0 and 2 match and both extend with 1;
        // templates (2,1) at 1 and 3 match but extend with 2 vs 3
        let signal = [1.0, 2.0, 1.0, 2.0, 1.0, 3.0, 1.0, 2.0];
        let counts = count_matches(&signal, 2, 0.5);
        assert_eq!(counts.templates, 6);
        assert_eq!(counts.matches_m, 4);
        assert_eq!(counts.matches_m_plus_1, 2);
        assert!((counts.phi_m() - 4.0 / 42.0).abs() < 1e-15);
        assert!((counts.entropy().unwrap() - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_one_fixture() {
        let signal = [0.0, 1.0, 0.0, 1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 1.0, 0.0, 2.0];
        let counts = count_matches(&signal, 1, 0.1);
        assert_eq!(counts.matches_m, 42);
        assert_eq!(counts.matches_m_plus_1, 26);
        let expected = (21.0_f64 / 13.0).ln();
        assert!((sample_entropy(&signal, 1, 0.1).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_periodic_signal_is_zero() {
        // period 3 > m, tolerance separates phases: extension is determined by phase
        let signal: Vec<f64> = (0..60).map(|i| f64::from(i % 3)).collect();
        let entropy = sample_entropy(&signal, 2, 0.2).unwrap();
        assert_eq!(entropy, 0.0);
    }

    #[test]
    fn test_constant_signal_is_zero_even_at_zero_tolerance() {
        let signal = [4.2; 10];
        let counts = count_matches(&signal, 2, 0.0);
        // every ordered pair of the 8 templates matches at both lengths
        assert_eq!(counts.matches_m, 8 * 7);
        assert_eq!(counts.matches_m_plus_1, 8 * 7);
        assert_eq!(sample_entropy(&signal, 2, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let signal = [0.0, 1.0, 0.0, 1.0];
        // templates (0,1) and (1,0) differ by exactly 1.0 in every position
        let counts = count_matches(&signal, 1, 1.0);
        assert_eq!(counts.matches_m, 6);
        assert_eq!(counts.matches_m_plus_1, 6);
    }

    #[test]
    fn test_self_matches_are_excluded() {
        // distinct values with tiny tolerance: only self matches could exist
        let signal = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let counts = count_matches(&signal, 2, 0.1);
        assert_eq!(counts.matches_m, 0);
        assert!(matches!(
            counts.entropy(),
            Err(UndefinedEntropy::DegenerateMatches {
                templates: 4,
                matches_m: 0,
                matches_m_plus_1: 0
            })
        ));
    }

    #[test]
    fn test_no_extended_matches_is_degenerate() {
        let signal = [1.0, 2.0, 5.0, 1.0, 2.0, 9.0];
        let err = sample_entropy(&signal, 2, 0.5).unwrap_err();
        assert!(err.is_degenerate_matches(), "{err}");
    }

    #[test]
    fn test_minimum_length_boundary() {
        assert!(sample_entropy(&[1.0, 1.0], 2, 1.0)
            .unwrap_err()
            .is_insufficient_data());
        // m + 1 samples is long enough, but yields a single template and no pairs
        let err = sample_entropy(&[1.0, 1.0, 1.0], 2, 1.0).unwrap_err();
        assert!(err.is_degenerate_matches(), "{err}");
        assert_eq!(sample_entropy(&[1.0; 4], 2, 1.0), Ok(0.0));
    }

    #[test]
    fn test_negative_zero_tolerance_behaves_like_zero() {
        let constant = [2.5; 8];
        assert_eq!(sample_entropy(&constant, 2, -0.0), Ok(0.0));
        let err = sample_entropy(&constant, 2, -0.5).unwrap_err();
        assert!(err.is_degenerate_matches(), "{err}");
    }

    #[test]
    fn test_nan_tolerance_never_escapes_as_nan() {
        let signal = [1.0, 2.0, 1.0, 2.0, 1.0, 2.0];
        let err = sample_entropy(&signal, 1, f64::NAN).unwrap_err();
        assert!(err.is_degenerate_matches());
    }

    #[test]
    fn test_cancellable_matches_plain_counts() {
        let signal: Vec<f64> = (0..50).map(|i| (f64::from(i) * 0.7).sin()).collect();
        let token = CancelToken::new();
        assert_eq!(
            count_matches_cancellable(&signal, 2, 0.3, &token).unwrap(),
            count_matches(&signal, 2, 0.3)
        );
    }

    #[test]
    fn test_fired_token_aborts() {
        let signal = [1.0; 20];
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            count_matches_cancellable(&signal, 2, 0.1, &token),
            Err(Cancelled)
        );
    }

    #[test]
    fn test_undefined_reason_serializes_with_tag() {
        let err = UndefinedEntropy::InsufficientData {
            len: 1,
            required: 3,
        };
        let json = serde_json::to_value(err).unwrap();
        assert_eq!(json["reason"], "insufficient_data");
        assert_eq!(json["required"], 3);
    }
}
