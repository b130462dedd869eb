//! Velocity and position traces from acceleration samples
//!
//! Traces are derived by scaled first differences: each output sample is the
//! difference between consecutive input samples multiplied by the sampling
//! interval, with a leading zero so the output keeps the input length. The
//! position trace applies the same step to the velocity trace.

use serde::{Deserialize, Serialize};

/// Sampling interval of the device default (100 Hz).
pub const DEFAULT_SAMPLING_INTERVAL: f64 = 0.010;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("sampling interval must be positive and finite, got {value}")]
pub struct InvalidSamplingInterval {
    pub value: f64,
}

/// Time between consecutive samples, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SamplingInterval(f64);

impl SamplingInterval {
    pub fn new(seconds: f64) -> Result<Self, InvalidSamplingInterval> {
        if seconds.is_finite() && seconds > 0.0 {
            Ok(Self(seconds))
        } else {
            Err(InvalidSamplingInterval { value: seconds })
        }
    }

    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }
}

impl Default for SamplingInterval {
    fn default() -> Self {
        Self(DEFAULT_SAMPLING_INTERVAL)
    }
}

impl TryFrom<f64> for SamplingInterval {
    type Error = InvalidSamplingInterval;

    fn try_from(seconds: f64) -> Result<Self, Self::Error> {
        Self::new(seconds)
    }
}

impl From<SamplingInterval> for f64 {
    fn from(interval: SamplingInterval) -> Self {
        interval.0
    }
}

/// `[0, (s[1] - s[0]) · Δt, (s[2] - s[1]) · Δt, ...]`, same length as `samples`.
///
/// # Examples
///
/// ```
/// use sway_recording::kinematics::{SamplingInterval, scaled_difference};
///
/// let dt = SamplingInterval::new(0.5).unwrap();
/// assert_eq!(scaled_difference(&[1.0, 3.0, 2.0], dt), vec![0.0, 1.0, -0.5]);
/// assert!(scaled_difference(&[], dt).is_empty());
/// ```
#[must_use]
pub fn scaled_difference(samples: &[f64], interval: SamplingInterval) -> Vec<f64> {
    if samples.is_empty() {
        return vec![];
    }
    let dt = interval.seconds();
    std::iter::once(0.0)
        .chain(samples.windows(2).map(|w| (w[1] - w[0]) * dt))
        .collect()
}

/// Velocity and position traces for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub velocity: Vec<f64>,
    pub position: Vec<f64>,
}

impl Trajectory {
    /// Derives velocity from `acceleration`, then position from velocity.
    #[must_use]
    pub fn from_acceleration(acceleration: &[f64], interval: SamplingInterval) -> Self {
        let velocity = scaled_difference(acceleration, interval);
        let position = scaled_difference(&velocity, interval);
        Self { velocity, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_validation() {
        assert!(SamplingInterval::new(0.01).is_ok());
        for bad in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            assert!(SamplingInterval::new(bad).is_err(), "{bad} accepted");
        }
        assert_eq!(SamplingInterval::default().seconds(), 0.010);
    }

    #[test]
    fn test_lengths_are_preserved() {
        let acc: Vec<f64> = (0..17).map(f64::from).collect();
        let trajectory = Trajectory::from_acceleration(&acc, SamplingInterval::default());
        assert_eq!(trajectory.velocity.len(), 17);
        assert_eq!(trajectory.position.len(), 17);
        assert_eq!(trajectory.velocity[0], 0.0);
        assert_eq!(trajectory.position[0], 0.0);
    }

    #[test]
    fn test_fixture() {
        let dt = SamplingInterval::new(0.1).unwrap();
        let acc = [0.0, 10.0, 30.0, 30.0];
        let trajectory = Trajectory::from_acceleration(&acc, dt);
        // velocity: [0, 1, 2, 0]; position: [0, 0.1, 0.1, -0.2]
        let expected_velocity = [0.0, 1.0, 2.0, 0.0];
        let expected_position = [0.0, 0.1, 0.1, -0.2];
        for (a, b) in trajectory.velocity.iter().zip(expected_velocity) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
        for (a, b) in trajectory.position.iter().zip(expected_position) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn test_single_sample() {
        let trajectory = Trajectory::from_acceleration(&[9.81], SamplingInterval::default());
        assert_eq!(trajectory.velocity, vec![0.0]);
        assert_eq!(trajectory.position, vec![0.0]);
    }

    #[test]
    fn test_interval_deserialization_is_validated() {
        let ok: SamplingInterval = serde_json::from_str("0.02").unwrap();
        assert_eq!(ok.seconds(), 0.02);
        assert!(serde_json::from_str::<SamplingInterval>("-1.0").is_err());
    }
}
