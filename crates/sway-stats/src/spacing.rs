/// Returns `count` evenly spaced values over the closed interval `[start, end]`.
///
/// Both endpoints are included when `count >= 2`. A `count` of one yields
/// `[start]` and a `count` of zero yields an empty vector.
///
/// # Examples
///
/// ```
/// use sway_stats::spacing::linspace;
///
/// assert_eq!(linspace(0.1, 1.0, 4).len(), 4);
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    // pin the last point so rounding never overshoots `end`
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
