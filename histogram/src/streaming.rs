use std::fmt;

use crate::{
    bin::{Bin, Histogram},
    errors::{Error, Result},
};

// beyond this, the bin vector grows on demand instead of being reserved up front
const PREALLOCATED_BINS_LIMIT: usize = 4096;

const DISPLAY_BAR_WIDTH: f64 = 200.0;

/// Fixed-memory approximate histogram.
///
/// Keeps at most `max_bins` bins sorted by value. When an insertion overflows
/// the capacity, the two adjacent bins closest in value are merged into their
/// weighted mean. Raw samples are never stored.
///
/// The structure is not internally synchronized: an insertion is a multi-step
/// update over the bin vector, so concurrent users must serialize every call
/// behind a lock covering the whole histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingHistogram {
    pub(crate) bins: Vec<Bin>,
    pub(crate) max_bins: usize,
    pub(crate) total: u64,
}

/// Allocates room for `max_bins` plus the transient bin an insertion adds before trimming.
pub(crate) fn bin_storage(max_bins: usize) -> Vec<Bin> {
    Vec::with_capacity(max_bins.min(PREALLOCATED_BINS_LIMIT) + 1)
}

impl StreamingHistogram {
    /// Creates an empty histogram retaining at most `max_bins` bins.
    ///
    /// There is no optimal bin count, somewhere between 20 and 80 is usually enough.
    pub fn new(max_bins: usize) -> Result<Self> {
        if max_bins < 1 {
            return Err(Error::InvalidCapacity {
                max_bins: max_bins as u64,
            });
        }
        Ok(Self {
            bins: bin_storage(max_bins),
            max_bins,
            total: 0,
        })
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Forgets every sample, keeps the capacity.
    pub fn reset(&mut self) {
        self.total = 0;
        self.bins.clear();
    }

    /// Records a sample. Non-finite samples are logged and dropped.
    pub fn add(&mut self, value: f64) {
        if let Err(e) = self.try_add(value) {
            log::warn!("dropping sample: {e}");
        }
    }

    /// Records a sample, failing on non-finite values.
    ///
    /// NaN can't be ordered against the bins and merging opposite infinities
    /// would produce one, so both are refused.
    pub fn try_add(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::MalformedInput(format!(
                "non-finite sample {value}"
            )));
        }
        self.insert(value);
        Ok(())
    }

    fn insert(&mut self, value: f64) {
        self.total += 1;
        let index = self.bins.partition_point(|bin| bin.value < value);
        if self.bins.get(index).is_some_and(|bin| bin.value == value) {
            self.bins[index].count += 1;
            return;
        }
        self.bins.insert(index, Bin::new(value, 1));
        self.trim();
    }

    /// Merges the closest adjacent bins until the capacity is honored.
    fn trim(&mut self) {
        if self.bins.len() <= 1 {
            return;
        }
        while self.bins.len() > self.max_bins {
            // strict comparison keeps the leftmost pair on ties
            let mut min_delta = self.bins[1].value - self.bins[0].value;
            let mut min_delta_index = 1;
            for i in 2..self.bins.len() {
                let delta = self.bins[i].value - self.bins[i - 1].value;
                if delta < min_delta {
                    min_delta = delta;
                    min_delta_index = i;
                }
            }

            let merged = self.bins[min_delta_index - 1].merge(&self.bins[min_delta_index]);
            log::trace!(
                "merging bins {} and {min_delta_index} (gap {min_delta}) into {merged:?}",
                min_delta_index - 1
            );
            self.bins[min_delta_index - 1] = merged;
            self.bins.remove(min_delta_index);
        }
    }
}

impl Histogram for StreamingHistogram {
    fn add(&mut self, value: f64) {
        StreamingHistogram::add(self, value)
    }

    fn quantile(&self, ratio: f64) -> Result<f64> {
        StreamingHistogram::quantile(self, ratio)
    }

    fn bins(&self) -> &[Bin] {
        StreamingHistogram::bins(self)
    }
}

impl Extend<f64> for StreamingHistogram {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.add(value);
        }
    }
}

impl fmt::Display for StreamingHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total: {}", self.total)?;
        for bin in &self.bins {
            let width = (bin.count as f64 / self.total as f64 * DISPLAY_BAR_WIDTH) as usize;
            writeln!(f, "{} \t {}", bin.value, ".".repeat(width))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(histo: &StreamingHistogram) -> Vec<f64> {
        histo.bins.iter().map(|b| b.value).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            StreamingHistogram::new(0),
            Err(Error::InvalidCapacity { max_bins: 0 })
        );
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut histo = StreamingHistogram::new(10).unwrap();
        for v in [5.0, 1.0, 3.0, 2.0, 4.0] {
            histo.add(v);
        }
        assert_eq!(values(&histo), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(histo.total, 5);
    }

    #[test]
    fn test_duplicate_does_not_trim() {
        let mut histo = StreamingHistogram::new(2).unwrap();
        histo.add(1.0);
        histo.add(10.0);
        histo.add(10.0);
        assert_eq!(histo.bins, vec![Bin::new(1.0, 1), Bin::new(10.0, 2)]);
    }

    #[test]
    fn test_trim_picks_smallest_gap() {
        let mut histo = StreamingHistogram::new(3).unwrap();
        for v in [0.0, 10.0, 10.5, 20.0] {
            histo.add(v);
        }
        assert_eq!(
            histo.bins,
            vec![Bin::new(0.0, 1), Bin::new(10.25, 2), Bin::new(20.0, 1)]
        );
    }

    #[test]
    fn test_trim_ties_merge_leftmost() {
        let mut histo = StreamingHistogram::new(3).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0] {
            histo.add(v);
        }
        assert_eq!(
            histo.bins,
            vec![Bin::new(1.5, 2), Bin::new(3.0, 1), Bin::new(4.0, 1)]
        );
    }

    #[test]
    fn test_trim_loops_until_capacity() {
        let mut histo = StreamingHistogram::new(5).unwrap();
        histo.extend([1.0, 2.0, 3.0, 4.0, 5.0]);
        histo.max_bins = 2;
        histo.trim();
        assert_eq!(histo.bins.len(), 2);
        assert_eq!(histo.bins.iter().map(|b| b.count).sum::<u64>(), 5);
    }

    #[test]
    fn test_nan_is_rejected() {
        let mut histo = StreamingHistogram::new(4).unwrap();
        assert!(matches!(histo.try_add(f64::NAN), Err(Error::MalformedInput(_))));
        histo.add(f64::NAN);
        assert!(histo.is_empty());
        assert!(histo.bins.is_empty());
    }

    #[test]
    fn test_infinities_are_rejected() {
        let mut histo = StreamingHistogram::new(1).unwrap();
        histo.extend([f64::INFINITY, 0.0, f64::NEG_INFINITY]);
        assert_eq!(histo.bins, vec![Bin::new(0.0, 1)]);
        assert_eq!(histo.count(), 1);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut histo = StreamingHistogram::new(3).unwrap();
        histo.extend([1.0, 2.0, 3.0, 4.0]);
        histo.reset();
        assert!(histo.is_empty());
        assert!(histo.bins.is_empty());
        assert_eq!(histo.max_bins(), 3);
    }

    #[test]
    fn test_display() {
        let mut histo = StreamingHistogram::new(4).unwrap();
        histo.extend([1.0, 1.0, 1.0, 2.0]);
        let expected = format!("Total: 4\n1 \t {}\n2 \t {}\n", ".".repeat(150), ".".repeat(50));
        assert_eq!(histo.to_string(), expected);
    }

    #[test]
    fn test_huge_capacity_is_not_preallocated() {
        let histo = StreamingHistogram::new(usize::MAX).unwrap();
        assert!(histo.bins.capacity() <= PREALLOCATED_BINS_LIMIT + 1);
    }
}
