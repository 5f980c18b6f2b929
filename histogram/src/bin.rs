use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// A weighted point mass standing in for every sample merged into it.
///
/// `value` is the running count-weighted mean of those samples and `count`
/// is how many of them the bin represents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub value: f64,
    pub count: u64,
}

impl Bin {
    pub fn new(value: f64, count: u64) -> Self {
        Self { value, count }
    }

    /// Combines two bins into one located at their count-weighted mean.
    ///
    /// The merged value always lies between the two input values, even when the
    /// weighted sum exceeds the f64 range.
    pub fn merge(&self, other: &Bin) -> Bin {
        let count = self.count + other.count;
        let total = count as f64;
        let mut value =
            (self.value * self.count as f64 + other.value * other.count as f64) / total;
        if !value.is_finite() {
            value = self.value * (self.count as f64 / total)
                + other.value * (other.count as f64 / total);
        }
        let value = value.clamp(self.value.min(other.value), self.value.max(other.value));
        Bin { value, count }
    }
}

/// Streaming histogram interface: samples go in one at a time, trimming is
/// done automatically.
pub trait Histogram {
    /// Records one sample.
    fn add(&mut self, value: f64);

    /// Approximates the value below which `ratio` of the samples fall.
    fn quantile(&self, ratio: f64) -> Result<f64>;

    /// Current bins, sorted by value.
    fn bins(&self) -> &[Bin];
}
