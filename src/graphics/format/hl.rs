//! Dual generic-channel formats ("HL").
//!
//! Structurally the same packing as [`super::La`], but the two channels are
//! real data channels rather than grayscale: the high field lands in red and
//! the low field in green, with blue and alpha fixed opaque. Used for
//! non-colour textures such as gradient or height-light maps.

use crate::binary_io::{BinaryReader, BinaryWriter, ByteOrder};
use crate::error::Result;
use crate::graphics::depth::change_bit_depth;
use crate::graphics::format::la::{
    check_two_channel_depths, read_two_channel_value, write_two_channel_value,
};
use crate::graphics::format::{ColourIter, ImageFormat};

pub struct Hl {
    bit_depth: i32,
    name: String,
    r_depth: i32,
    g_depth: i32,
    byte_order: ByteOrder,
}

impl Hl {
    pub fn new(r: i32, g: i32) -> Result<Self> {
        Hl::with_byte_order(r, g, ByteOrder::LittleEndian)
    }

    pub fn with_byte_order(r: i32, g: i32, byte_order: ByteOrder) -> Result<Self> {
        let bit_depth = check_two_channel_depths("HL", r, g, "red", "green")?;

        Ok(Hl {
            bit_depth,
            name: format!("HL{}{}", r, g),
            r_depth: r,
            g_depth: g,
            byte_order,
        })
    }

    fn decode_pixel(&self, reader: &mut BinaryReader) -> Result<image::Rgba<u8>> {
        let value = read_two_channel_value(reader, self.bit_depth)?;

        let r_shift = self.g_depth;
        let g_mask = (1u32 << self.g_depth) - 1;
        let r_mask = (1u32 << self.r_depth) - 1;

        let r = if self.r_depth == 0 {
            255
        } else {
            change_bit_depth(value >> r_shift & r_mask, self.r_depth, 8)?
        };
        let g = if self.g_depth == 0 {
            255
        } else {
            change_bit_depth(value & g_mask, self.g_depth, 8)?
        };

        Ok(image::Rgba([r as u8, g as u8, 255, 255]))
    }
}

impl ImageFormat for Hl {
    fn bit_depth(&self) -> i32 {
        self.bit_depth
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn decode<'a>(&'a self, tex: &'a [u8]) -> ColourIter<'a> {
        let mut reader = BinaryReader::new(tex, self.byte_order);
        // Not self-terminating, same contract as the LA family.
        Box::new(std::iter::from_fn(move || {
            Some(self.decode_pixel(&mut reader))
        }))
    }

    fn encode(&self, colours: &mut dyn Iterator<Item = image::Rgba<u8>>) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new(self.byte_order);

        for image::Rgba([r, g, _, _]) in colours {
            let r = if self.r_depth == 0 {
                0
            } else {
                change_bit_depth(r as u32, 8, self.r_depth)?
            };
            let g = if self.g_depth == 0 {
                0
            } else {
                change_bit_depth(g as u32, 8, self.g_depth)?
            };

            let value = g | r << self.g_depth;
            write_two_channel_value(&mut writer, self.bit_depth, value);
        }

        Ok(writer.into_bytes())
    }
}
