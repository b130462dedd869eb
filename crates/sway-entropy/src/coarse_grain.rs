//! Coarse-graining by non-overlapping block averaging.

/// Downsamples `signal` by averaging consecutive non-overlapping blocks of
/// `scale` samples.
///
/// The result has `signal.len() / scale` samples; output sample `i` is the mean
/// of `signal[i * scale..(i + 1) * scale]`. Trailing samples that do not fill a
/// complete block are discarded. A scale of one returns the signal unchanged.
///
/// # Returns
///
/// * `Some(samples)` - the coarse-grained signal
/// * `None` - if `signal` is shorter than `scale`, so no complete block exists
///
/// # Panics
///
/// Panics if `scale` is zero.
///
/// # Examples
///
/// ```
/// use sway_entropy::coarse_grain::coarse_grain;
///
/// let signal = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// assert_eq!(
///     coarse_grain(&signal, 2),
///     Some(vec![1.5, 3.5, 5.5, 7.5, 9.5])
/// );
/// assert_eq!(coarse_grain(&signal, 11), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn coarse_grain(signal: &[f64], scale: usize) -> Option<Vec<f64>> {
    assert!(scale > 0, "scale must be at least 1");

    if signal.len() < scale {
        return None;
    }
    if scale == 1 {
        return Some(signal.to_vec());
    }

    let width = scale as f64;
    Some(
        signal
            .chunks_exact(scale)
            .map(|block| block.iter().sum::<f64>() / width)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_one_is_identity() {
        let signal = [0.3, -1.25, 7.0, 2.5, 2.5];
        assert_eq!(coarse_grain(&signal, 1).unwrap(), signal);
    }

    #[test]
    fn test_block_means() {
        let signal: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(
            coarse_grain(&signal, 2).unwrap(),
            vec![1.5, 3.5, 5.5, 7.5, 9.5]
        );
    }

    #[test]
    fn test_trailing_samples_are_discarded() {
        // the incomplete block [7, 100] must not leak into the output
        let signal = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 100.0];
        assert_eq!(coarse_grain(&signal, 3).unwrap(), vec![2.0, 5.0]);
    }

    #[test]
    fn test_output_length_is_floor_division() {
        let signal: Vec<f64> = (0..97).map(f64::from).collect();
        for scale in 1..=97 {
            let coarse = coarse_grain(&signal, scale).unwrap();
            assert_eq!(coarse.len(), 97 / scale, "scale {scale}");
            assert!(!coarse.is_empty());
        }
    }

    #[test]
    fn test_shorter_than_scale() {
        assert_eq!(coarse_grain(&[1.0, 2.0], 3), None);
        assert_eq!(coarse_grain(&[], 1), None);
    }

    #[test]
    fn test_regraining_at_scale_one_is_idempotent() {
        let signal: Vec<f64> = (0..20).map(|i| f64::from(i).sin()).collect();
        let coarse = coarse_grain(&signal, 4).unwrap();
        assert_eq!(coarse_grain(&coarse, 1).unwrap(), coarse);
    }

    #[test]
    #[should_panic(expected = "scale must be at least 1")]
    fn test_zero_scale_panics() {
        let _ = coarse_grain(&[1.0], 0);
    }
}
