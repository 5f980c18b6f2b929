//! Streaming histogram
//!
//! Approximates the distribution of an unbounded stream of samples with a
//! bounded number of weighted bins. Each sample is inserted in sorted position;
//! when the number of bins exceeds the capacity, the two adjacent bins closest
//! in value are merged. Quantiles, cdf, mean and variance are computed from the
//! bins, and the whole state can be written to a compact little-endian buffer.
//!
//! # Examples
//! ```
//! use streamhist_histogram::prelude::*;
//!
//! let mut histo = StreamingHistogram::new(3).unwrap();
//! histo.extend([1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(histo.bins().len(), 3);
//! assert_eq!(histo.quantile(0.5).unwrap(), 1.5);
//!
//! let restored = StreamingHistogram::from_bytes(&histo.to_bytes()).unwrap();
//! assert_eq!(restored, histo);
//! ```

/// Bin type and the histogram interface
pub mod bin;
/// Little-endian binary encoding
pub mod codec;
/// Capacity configuration
pub mod config;
pub mod errors;
mod query;
/// Bin store, insertion and trimming
pub mod streaming;

pub mod prelude {
    pub use crate::{
        bin::{Bin, Histogram},
        config::HistogramConfig,
        errors::{Error, Result},
        streaming::StreamingHistogram,
    };
}
