//! Luminance-alpha formats (LA88, L8, A8, LA44, L4, A4).
//!
//! Alpha occupies the low bits with luminance packed above it; decoding
//! replicates luminance into all three colour channels.

use crate::binary_io::{BinaryReader, BinaryWriter, ByteOrder};
use crate::error::{Error, Result};
use crate::graphics::depth::change_bit_depth;
use crate::graphics::format::{ColourIter, ImageFormat};

pub struct La {
    bit_depth: i32,
    name: String,
    l_depth: i32,
    a_depth: i32,
    byte_order: ByteOrder,
}

/// Shared width rules for the two-channel sub-byte families (LA and HL):
/// the total depth must be 4, 8 or 16 bits and at least one channel must
/// reach 4 bits.
pub(super) fn check_two_channel_depths(
    family: &str,
    high: i32,
    low: i32,
    high_name: &str,
    low_name: &str,
) -> Result<i32> {
    if high < 0 || low < 0 {
        return Err(Error::configuration(format!(
            "{} channel depths can't be negative ({} {}, {} {})",
            family, high_name, high, low_name, low
        )));
    }
    let bit_depth = high + low;
    if bit_depth % 4 != 0 {
        return Err(Error::configuration(format!(
            "overall bit depth has to be dividable by 4 (got {})",
            bit_depth
        )));
    }
    if bit_depth > 16 {
        return Err(Error::configuration(format!(
            "overall bit depth can't be bigger than 16 (got {})",
            bit_depth
        )));
    }
    if bit_depth < 4 {
        return Err(Error::configuration(format!(
            "overall bit depth can't be smaller than 4 (got {})",
            bit_depth
        )));
    }
    if high < 4 && low < 4 {
        return Err(Error::configuration(format!(
            "{} and {} can't both be smaller than 4 ({} {}, {} {})",
            high_name, low_name, high_name, high, low_name, low
        )));
    }
    Ok(bit_depth)
}

impl La {
    pub fn new(l: i32, a: i32) -> Result<Self> {
        La::with_byte_order(l, a, ByteOrder::LittleEndian)
    }

    pub fn with_byte_order(l: i32, a: i32, byte_order: ByteOrder) -> Result<Self> {
        let bit_depth = check_two_channel_depths("LA", l, a, "luminance", "alpha")?;

        let name = format!(
            "{}{}{}{}",
            if l != 0 { "L" } else { "" },
            if a != 0 { "A" } else { "" },
            if l != 0 { l.to_string() } else { String::new() },
            if a != 0 { a.to_string() } else { String::new() }
        );

        Ok(La {
            bit_depth,
            name,
            l_depth: l,
            a_depth: a,
            byte_order,
        })
    }

    fn decode_pixel(&self, reader: &mut BinaryReader) -> Result<image::Rgba<u8>> {
        let value = read_two_channel_value(reader, self.bit_depth)?;

        let l_shift = self.a_depth;
        let a_mask = (1u32 << self.a_depth) - 1;
        let l_mask = (1u32 << self.l_depth) - 1;

        let a = if self.a_depth == 0 {
            255
        } else {
            change_bit_depth(value & a_mask, self.a_depth, 8)?
        };
        let l = if self.l_depth == 0 {
            255
        } else {
            change_bit_depth(value >> l_shift & l_mask, self.l_depth, 8)?
        };

        Ok(image::Rgba([l as u8, l as u8, l as u8, a as u8]))
    }
}

/// Reads one packed pixel for a 4/8/16-bit two-channel format.
pub(super) fn read_two_channel_value(reader: &mut BinaryReader, bit_depth: i32) -> Result<u32> {
    let value = match bit_depth {
        4 => reader.read_nibble()? as u32,
        8 => reader.read_u8()? as u32,
        16 => reader.read_u16()? as u32,
        _ => unreachable!("depths are validated at construction"),
    };
    Ok(value)
}

/// Writes one packed pixel for a 4/8/16-bit two-channel format.
pub(super) fn write_two_channel_value(writer: &mut BinaryWriter, bit_depth: i32, value: u32) {
    match bit_depth {
        4 => writer.write_nibble(value as u8),
        8 => writer.write_u8(value as u8),
        16 => writer.write_u16(value as u16),
        _ => unreachable!("depths are validated at construction"),
    }
}

impl ImageFormat for La {
    fn bit_depth(&self) -> i32 {
        self.bit_depth
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn decode<'a>(&'a self, tex: &'a [u8]) -> ColourIter<'a> {
        let mut reader = BinaryReader::new(tex, self.byte_order);
        // Not self-terminating: the caller bounds consumption to the pixel
        // count; pulling past the end of the buffer yields an I/O error.
        Box::new(std::iter::from_fn(move || {
            Some(self.decode_pixel(&mut reader))
        }))
    }

    fn encode(&self, colours: &mut dyn Iterator<Item = image::Rgba<u8>>) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new(self.byte_order);

        for image::Rgba([_, g, _, a]) in colours {
            let a = if self.a_depth == 0 {
                0
            } else {
                change_bit_depth(a as u32, 8, self.a_depth)?
            };
            // Luminance is taken from the green channel, matching decode's
            // replication.
            let l = if self.l_depth == 0 {
                0
            } else {
                change_bit_depth(g as u32, 8, self.l_depth)?
            };

            let value = a | l << self.a_depth;
            write_two_channel_value(&mut writer, self.bit_depth, value);
        }

        Ok(writer.into_bytes())
    }
}
