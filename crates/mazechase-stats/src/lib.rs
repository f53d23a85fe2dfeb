//! Summary statistics for batches of evaluated episodes.
//!
//! # Example
//!
//! ```
//! use mazechase_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [12.0, 3.5, 7.0, 0.0];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.max, 12.0);
//! assert_eq!(stats.mean, 5.625);
//! ```

pub mod descriptive;
