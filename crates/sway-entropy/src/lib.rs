//! Sample Entropy and Multiscale Entropy for postural-sway signals
//!
//! This crate characterizes how irregular a sway trace is across time scales.
//! It consumes plain `f64` sequences (typically position traces produced by
//! integrating accelerometer recordings) and returns plain numeric results.
//!
//! # Overview
//!
//! The pipeline has four stages, leaves first:
//!
//! 1. **Coarse-graining** ([`coarse_grain::coarse_grain`]): block-average a signal at scale `τ`
//! 2. **Sample Entropy** ([`sample_entropy::sample_entropy`]): `-ln(A / B)` over
//!    Chebyshev template matches at lengths `m + 1` and `m`
//! 3. **Multiscale Entropy** ([`multiscale::multiscale_entropy`]): one SampEn value
//!    per scale `1..=S`, tolerance relative to each coarse-grained signal's spread
//! 4. **Cross-axis statistics** ([`cross_axis::cross_axis_summary`]): median,
//!    standard error, variance and normalized error of the summed X/Y profiles
//!
//! [`sweep::run_sweep`] repeats stages 3–4 over a list of tolerance fractions
//! and returns the ordered response curves.
//!
//! # Undefined values
//!
//! No stage lets NaN or infinity escape. An entropy value that cannot be
//! computed is an [`sample_entropy::UndefinedEntropy`] carrying the reason, and
//! a summary that cannot be computed is a [`cross_axis::CrossAxisError`]. Both
//! are recorded in place so one bad scale or tolerance never aborts a sweep.
//! Only invalid configuration ([`sweep::ConfigError`]) and cancellation stop
//! a sweep.
//!
//! # Concurrency
//!
//! All operations are pure functions. Sweeps fan out over tolerance fractions
//! and scales with `rayon` and collect results by index. Long sweeps can be
//! stopped through a [`cancel::CancelToken`].
//!
//! # Examples
//!
//! ```
//! use sway_entropy::{
//!     cancel::CancelToken,
//!     sweep::{SweepConfig, run_sweep},
//! };
//!
//! let x: Vec<f64> = (0..500).map(|i| (f64::from(i) * 0.21).sin()).collect();
//! let y: Vec<f64> = (0..500).map(|i| (f64::from(i) * 0.13).sin()).collect();
//! let config = SweepConfig {
//!     max_scale: 5,
//!     ..SweepConfig::default()
//! };
//!
//! let report = run_sweep(&x, &y, &config, &CancelToken::new())?;
//! for point in &report.points {
//!     match &point.summary {
//!         Ok(summary) => println!("r={:.2}: median {:.3}", point.tolerance_fraction, summary.median),
//!         Err(err) => println!("r={:.2}: {err}", point.tolerance_fraction),
//!     }
//! }
//! # Ok::<(), sway_entropy::sweep::SweepError>(())
//! ```

pub mod cancel;
pub mod coarse_grain;
pub mod cross_axis;
pub mod multiscale;
pub mod sample_entropy;
pub mod sweep;
