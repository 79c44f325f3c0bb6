//! Bit-depth requantization.
//!
//! Channel values move between arbitrary bit widths when packing and
//! unpacking pixel formats. Upscaling must map the source maximum onto the
//! destination maximum (a 5-bit 31 becomes 255, not the 248 a plain shift
//! would give), downscaling truncates.

use crate::error::{Error, Result};

/// Converts `value` from a `from`-bit range to a `to`-bit range.
///
/// Zero-depth channels always map to 0; the caller substitutes the format's
/// default for absent channels.
pub fn change_bit_depth(value: u32, from: i32, to: i32) -> Result<u32> {
    if from < 0 || to < 0 {
        return Err(Error::configuration(format!(
            "bit depths can't be negative (from {}, to {})",
            from, to
        )));
    }
    if from == 0 || to == 0 {
        return Ok(0);
    }
    if from == to {
        return Ok(value);
    }

    if from < to {
        // Full-range stretch: extend the destination range by doubling until
        // it divides evenly by the source range, then scale back down. This
        // reproduces bit-replication expansion exactly.
        let from_max = (1u32 << from) - 1;
        let mut to_max = (1u64 << to) - 1;

        let mut div = 1u64;
        while to_max % from_max as u64 != 0 {
            div <<= 1;
            to_max = ((to_max + 1) << 1) - 1;
        }

        Ok((value as u64 * (to_max / from_max as u64) / div) as u32)
    } else {
        let limit = ((1u64 << from) / (1u64 << to)) as u32;
        Ok(value / limit)
    }
}
