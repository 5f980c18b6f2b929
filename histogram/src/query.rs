use crate::{
    bin::Bin,
    errors::{Error, Result},
    streaming::StreamingHistogram,
};

impl StreamingHistogram {
    /// Walks the bins until `ratio` of the samples are covered and returns the
    /// value of the bin where that happens.
    ///
    /// Fails with `UndefinedQuantile` when no bin qualifies, e.g. on an empty
    /// histogram or with a ratio above 1.
    pub fn quantile(&self, ratio: f64) -> Result<f64> {
        let mut remaining = ratio * self.total as f64;
        for bin in &self.bins {
            remaining -= bin.count as f64;
            if remaining <= 0.0 {
                return Ok(bin.value);
            }
        }
        Err(Error::UndefinedQuantile { ratio })
    }

    /// Fraction of the samples with a value lower or equal to `x`.
    pub fn cdf(&self, x: f64) -> Result<f64> {
        if self.total == 0 {
            return Err(Error::UndefinedStatistic("cdf"));
        }
        let count: u64 = self
            .bins
            .iter()
            .filter(|bin| bin.value <= x)
            .map(|bin| bin.count)
            .sum();
        Ok(count as f64 / self.total as f64)
    }

    /// Sample mean of the distribution, 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        let sum: f64 = self
            .bins
            .iter()
            .map(|bin| bin.value * bin.count as f64)
            .sum();
        let mean = sum / total;
        if mean.is_finite() {
            return mean;
        }
        // the running sum left the f64 range, weight each bin before adding
        self.bins
            .iter()
            .map(|bin| bin.value * (bin.count as f64 / total))
            .sum()
    }

    /// Population variance of the distribution, 0 when empty.
    pub fn variance(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sum: f64 = self
            .bins
            .iter()
            .map(|bin| bin.count as f64 * (bin.value - mean) * (bin.value - mean))
            .sum();
        sum / self.total as f64
    }

    pub fn count(&self) -> u64 {
        self.total
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }
}
