//! Statistical utilities for the sway workspace.
//!
//! This crate provides the small set of numeric helpers the entropy pipeline
//! builds on:
//!
//! - **Descriptive statistics**: mean, median, population and sample dispersion,
//!   standard error
//! - **Spacing**: evenly spaced parameter grids for tolerance sweeps
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`spacing`]: Linearly spaced value grids
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use sway_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Building a tolerance grid
//!
//! ```
//! use sway_stats::spacing::linspace;
//!
//! let grid = linspace(0.1, 1.0, 10);
//! assert_eq!(grid.len(), 10);
//! ```

pub mod descriptive;
pub mod spacing;
