//! Export of analysis results for utilization review.

mod review;

pub use review::*;
