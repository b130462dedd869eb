use serde::{Deserialize, Serialize};

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency, dispersion,
/// and spread for a dataset of `f64` values.
///
/// Two flavours of dispersion are reported because they answer different
/// questions: [`variance`](Self::variance) and [`std_dev`](Self::std_dev) describe
/// the dataset itself (divisor `n`), while [`sample_std_dev`](Self::sample_std_dev)
/// and [`standard_error`](Self::standard_error) treat it as a sample of a larger
/// population (divisor `n - 1`) and are therefore undefined for a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset.
    ///
    /// For an even number of values this is the mean of the two central values.
    pub median: f64,
    /// The population variance of the dataset (divisor `n`).
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
    /// The Bessel-corrected standard deviation (divisor `n - 1`).
    ///
    /// `None` when the dataset contains fewer than two values.
    pub sample_std_dev: Option<f64>,
    /// The standard error of the mean (`sample_std_dev / sqrt(n)`).
    ///
    /// `None` when the dataset contains fewer than two values.
    pub standard_error: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values. The values will be collected and sorted internally.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use sway_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// This is an optimized version that skips the sorting step.
    /// Use this when you already have sorted data to avoid unnecessary work.
    ///
    /// # Arguments
    ///
    /// * `sorted_values` - Values sorted in ascending order
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sway_stats::descriptive::DescriptiveStats;
    /// let values = [1.0, 2.0, 3.0, 4.0];
    /// let stats = DescriptiveStats::from_sorted(&values).unwrap();
    /// assert_eq!(stats.median, 2.5);
    /// assert!(stats.standard_error.is_some());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = median_of_sorted(sorted_values)?;
        let sum_sq = sum_of_squared_deviations(sorted_values, mean);
        let variance = sum_sq / n;
        let std_dev = variance.sqrt();
        let sample_std_dev = (count >= 2).then(|| (sum_sq / (n - 1.0)).sqrt());
        let standard_error = sample_std_dev.map(|s| s / n.sqrt());

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
            sample_std_dev,
            standard_error,
        })
    }
}

/// Returns the median of sorted values.
///
/// The median of an even-length dataset is the mean of its two central values.
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// # use sway_stats::descriptive::median_of_sorted;
/// assert_eq!(median_of_sorted(&[1.0, 2.0, 10.0]), Some(2.0));
/// assert_eq!(median_of_sorted(&[1.0, 2.0, 4.0, 10.0]), Some(3.0));
/// assert_eq!(median_of_sorted(&[]), None);
/// ```
#[must_use]
pub fn median_of_sorted(sorted_values: &[f64]) -> Option<f64> {
    let len = sorted_values.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Some(sorted_values[mid])
    } else {
        Some(f64::midpoint(sorted_values[mid - 1], sorted_values[mid]))
    }
}

/// Arithmetic mean of the values, or `None` when empty.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divisor `n`), or `None` when empty.
///
/// Unlike [`DescriptiveStats::new`] this does not sort or copy the input, so it
/// is the cheap option when only the spread is needed.
///
/// # Examples
///
/// ```
/// # use sway_stats::descriptive::population_std_dev;
/// let sd = population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((sd - 2.0).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    Some((sum_of_squared_deviations(values, mean) / values.len() as f64).sqrt())
}

fn sum_of_squared_deviations(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}
