//! Error types for histogram construction, queries and decoding

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid histogram capacity {max_bins}, at least one bin is required")]
    InvalidCapacity { max_bins: u64 },

    #[error("no bin satisfies quantile ratio {ratio}")]
    UndefinedQuantile { ratio: f64 },

    #[error("{0} is undefined on an empty histogram")]
    UndefinedStatistic(&'static str),

    #[error("truncated histogram buffer: expected {expected} bytes, found {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    #[error("malformed histogram: {0}")]
    MalformedInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
