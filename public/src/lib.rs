//! streamhist : fixed-memory streaming histograms

pub mod histogram {
    pub use streamhist_histogram::*;
}

pub mod prelude {
    pub use streamhist_histogram::prelude::*;
}
