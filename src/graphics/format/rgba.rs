//! Channel-packed RGB/RGBA formats.
//!
//! All channels of one pixel live in a single fixed-width integer; the
//! per-channel bit depths are free parameters, so one codec covers RGBA8888,
//! RGB888, RGBA5551, RGB565, RGBA4444 and friends.

use crate::binary_io::{BinaryReader, BinaryWriter, ByteOrder};
use crate::error::{Error, Result};
use crate::graphics::depth::change_bit_depth;
use crate::graphics::format::{ColourIter, ImageFormat};

pub struct Rgba {
    bit_depth: i32,
    name: String,
    r_depth: i32,
    g_depth: i32,
    b_depth: i32,
    a_depth: i32,
    swap_channels: bool,
    byte_order: ByteOrder,
}

impl Rgba {
    pub fn new(r: i32, g: i32, b: i32, a: i32) -> Result<Self> {
        Rgba::with_options(r, g, b, a, ByteOrder::LittleEndian, false)
    }

    pub fn with_options(
        r: i32,
        g: i32,
        b: i32,
        a: i32,
        byte_order: ByteOrder,
        swap_channels: bool,
    ) -> Result<Self> {
        if r < 0 || g < 0 || b < 0 || a < 0 {
            return Err(Error::configuration(format!(
                "channel depths can't be negative (r {}, g {}, b {}, a {})",
                r, g, b, a
            )));
        }
        let bit_depth = r + g + b + a;
        if bit_depth < 8 {
            return Err(Error::configuration(format!(
                "overall bit depth can't be smaller than 8 (got {})",
                bit_depth
            )));
        }
        if bit_depth > 32 {
            return Err(Error::configuration(format!(
                "overall bit depth can't be bigger than 32 (got {})",
                bit_depth
            )));
        }
        if r == 0 && g == 0 && b == 0 {
            return Err(Error::configuration(
                "at least one colour channel needs a non-zero depth",
            ));
        }

        let name = if swap_channels {
            // ABGR ordering
            format!(
                "{}BGR{}{}{}{}",
                if a != 0 { "A" } else { "" },
                if a != 0 { a.to_string() } else { String::new() },
                b,
                g,
                r
            )
        } else {
            format!(
                "RGB{}{}{}{}{}",
                if a != 0 { "A" } else { "" },
                r,
                g,
                b,
                if a != 0 { a.to_string() } else { String::new() }
            )
        };

        Ok(Rgba {
            bit_depth,
            name,
            r_depth: r,
            g_depth: g,
            b_depth: b,
            a_depth: a,
            swap_channels,
            byte_order,
        })
    }

    /// Bit offsets of each channel inside the packed value, as
    /// (a, r, g, b) shifts.
    fn shifts(&self) -> (i32, i32, i32, i32) {
        if self.swap_channels {
            let r = 0;
            let g = r + self.r_depth;
            let b = g + self.g_depth;
            let a = b + self.b_depth;
            (a, r, g, b)
        } else {
            let a = 0;
            let b = a + self.a_depth;
            let g = b + self.b_depth;
            let r = g + self.g_depth;
            (a, r, g, b)
        }
    }

    fn read_value(&self, reader: &mut BinaryReader) -> std::io::Result<u32> {
        if self.bit_depth <= 8 {
            reader.read_u8().map(|v| v as u32)
        } else if self.bit_depth <= 16 {
            reader.read_u16().map(|v| v as u32)
        } else if self.bit_depth <= 24 {
            let tmp = reader.read_bytes(3)?;
            Ok(match self.byte_order {
                ByteOrder::LittleEndian => {
                    (tmp[2] as u32) << 16 | (tmp[1] as u32) << 8 | tmp[0] as u32
                }
                ByteOrder::BigEndian => {
                    (tmp[0] as u32) << 16 | (tmp[1] as u32) << 8 | tmp[2] as u32
                }
            })
        } else {
            reader.read_u32()
        }
    }

    fn write_value(&self, writer: &mut BinaryWriter, value: u32) {
        if self.bit_depth <= 8 {
            writer.write_u8(value as u8);
        } else if self.bit_depth <= 16 {
            writer.write_u16(value as u16);
        } else if self.bit_depth <= 24 {
            let bytes = match self.byte_order {
                ByteOrder::LittleEndian => {
                    [value as u8, (value >> 8) as u8, (value >> 16) as u8]
                }
                ByteOrder::BigEndian => {
                    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
                }
            };
            writer.write_bytes(&bytes);
        } else {
            writer.write_u32(value);
        }
    }

    fn decode_pixel(&self, reader: &mut BinaryReader) -> Result<image::Rgba<u8>> {
        // Widened to u64 so channel shifts stay in range for 32-bit layouts.
        let value = self.read_value(reader)? as u64;
        let (a_shift, r_shift, g_shift, b_shift) = self.shifts();

        let unpack = |shift: i32, depth: i32| {
            let mask = (1u64 << depth) - 1;
            (value >> shift & mask) as u32
        };
        let a = if self.a_depth == 0 {
            255
        } else {
            change_bit_depth(unpack(a_shift, self.a_depth), self.a_depth, 8)?
        };
        let r = change_bit_depth(unpack(r_shift, self.r_depth), self.r_depth, 8)?;
        let g = change_bit_depth(unpack(g_shift, self.g_depth), self.g_depth, 8)?;
        let b = change_bit_depth(unpack(b_shift, self.b_depth), self.b_depth, 8)?;

        Ok(image::Rgba([r as u8, g as u8, b as u8, a as u8]))
    }
}

impl ImageFormat for Rgba {
    fn bit_depth(&self) -> i32 {
        self.bit_depth
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn decode<'a>(&'a self, tex: &'a [u8]) -> ColourIter<'a> {
        let mut reader = BinaryReader::new(tex, self.byte_order);
        Box::new(std::iter::from_fn(move || {
            // Self-terminating: this family stops exactly at end of stream.
            if reader.is_at_end() {
                return None;
            }
            Some(self.decode_pixel(&mut reader))
        }))
    }

    fn encode(&self, colours: &mut dyn Iterator<Item = image::Rgba<u8>>) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new(self.byte_order);
        let (a_shift, r_shift, g_shift, b_shift) = self.shifts();

        for image::Rgba([r, g, b, a]) in colours {
            let a = if self.a_depth == 0 {
                0
            } else {
                change_bit_depth(a as u32, 8, self.a_depth)?
            };
            let r = change_bit_depth(r as u32, 8, self.r_depth)?;
            let g = change_bit_depth(g as u32, 8, self.g_depth)?;
            let b = change_bit_depth(b as u32, 8, self.b_depth)?;

            let value = (a as u64) << a_shift
                | (b as u64) << b_shift
                | (g as u64) << g_shift
                | (r as u64) << r_shift;
            self.write_value(&mut writer, value as u32);
        }

        Ok(writer.into_bytes())
    }
}
