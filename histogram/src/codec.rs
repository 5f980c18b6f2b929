//! Binary layout of a histogram
//!
//! All fields are little-endian 64-bit words:
//! `[total][max_bins][bin_count]` followed by `bin_count` pairs of
//! `[value as IEEE-754 bits][count]`.

use bytes::{Buf, BufMut};

use crate::{
    bin::Bin,
    errors::{Error, Result},
    streaming::{StreamingHistogram, bin_storage},
};

pub const HEADER_SIZE: usize = 3 * std::mem::size_of::<u64>();
pub const BIN_SIZE: usize = 2 * std::mem::size_of::<u64>();

impl StreamingHistogram {
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + BIN_SIZE * self.bins.len()
    }

    pub fn encode_into<B: BufMut>(&self, buffer: &mut B) {
        buffer.put_u64_le(self.total);
        buffer.put_u64_le(self.max_bins as u64);
        buffer.put_u64_le(self.bins.len() as u64);
        for bin in &self.bins {
            buffer.put_f64_le(bin.value);
            buffer.put_u64_le(bin.count);
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buffer);
        buffer
    }

    /// Rebuilds a histogram written by [`StreamingHistogram::to_bytes`].
    ///
    /// The buffer must hold exactly the declared content and the decoded bins
    /// must satisfy the same invariants `add` maintains.
    pub fn from_bytes(buffer: &[u8]) -> Result<Self> {
        let res = decode(buffer);
        if let Err(e) = &res {
            log::warn!("rejecting histogram buffer of {} bytes: {e}", buffer.len());
        }
        res
    }
}

fn decode(buffer: &[u8]) -> Result<StreamingHistogram> {
    if buffer.len() < HEADER_SIZE {
        return Err(Error::TruncatedInput {
            expected: HEADER_SIZE,
            actual: buffer.len(),
        });
    }
    let mut window = buffer;
    let total = window.get_u64_le();
    let max_bins = window.get_u64_le();
    let bin_count = window.get_u64_le();

    let expected = usize::try_from(bin_count)
        .ok()
        .and_then(|n| n.checked_mul(BIN_SIZE))
        .and_then(|n| n.checked_add(HEADER_SIZE))
        .unwrap_or(usize::MAX);
    if buffer.len() < expected {
        return Err(Error::TruncatedInput {
            expected,
            actual: buffer.len(),
        });
    }
    if buffer.len() > expected {
        return Err(Error::MalformedInput(format!(
            "{bin_count} bins declared but buffer holds {} bytes instead of {expected}",
            buffer.len()
        )));
    }
    if max_bins == 0 {
        return Err(Error::InvalidCapacity { max_bins });
    }
    if max_bins < bin_count {
        return Err(Error::MalformedInput(format!(
            "{bin_count} bins exceed capacity of {max_bins}"
        )));
    }
    let max_bins = usize::try_from(max_bins)
        .map_err(|_| Error::MalformedInput(format!("capacity {max_bins} is too large")))?;

    // bin_count <= buffer.len() / BIN_SIZE at this point
    let bin_count = bin_count as usize;
    let mut bins = bin_storage(max_bins);
    let mut sum: u64 = 0;
    for index in 0..bin_count {
        let bin = Bin::new(window.get_f64_le(), window.get_u64_le());
        if !bin.value.is_finite() {
            return Err(Error::MalformedInput(format!(
                "bin {index} has non-finite value {}",
                bin.value
            )));
        }
        if bin.count == 0 {
            return Err(Error::MalformedInput(format!("bin {index} is empty")));
        }
        if bins.last().is_some_and(|previous| previous.value >= bin.value) {
            return Err(Error::MalformedInput(format!(
                "bin {index} with value {} is out of order",
                bin.value
            )));
        }
        sum = sum
            .checked_add(bin.count)
            .ok_or_else(|| Error::MalformedInput("bin counts overflow".into()))?;
        bins.push(bin);
    }
    if sum != total {
        return Err(Error::MalformedInput(format!(
            "total {total} does not match the {sum} samples held by the bins"
        )));
    }

    log::debug!("decoded histogram total={total} max_bins={max_bins} bins={bin_count}");
    Ok(StreamingHistogram {
        bins,
        max_bins,
        total,
    })
}
