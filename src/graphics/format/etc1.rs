//! Block-compressed (ETC1 / ETC1A4) streaming layout.
//!
//! The per-block colour math is supplied from outside through [`BlockCodec`];
//! this module only owns the stream shape around it: the optional alpha word
//! that precedes each colour word, the byte order of both, and the grouping
//! of the colour stream into 16-pixel blocks.

use crate::binary_io::{BinaryReader, BinaryWriter, ByteOrder};
use crate::error::Result;
use crate::graphics::format::{ColourIter, ImageFormat};

/// Pixels per compressed block (4x4).
pub const BLOCK_PIXELS: usize = 16;

/// Externally supplied per-block codec.
///
/// `decode_block` receives the 64-bit colour word and, for alpha formats,
/// the 64-bit alpha word, and returns the block's pixels in stream order.
/// `encode_block` is the inverse.
pub trait BlockCodec: Send + Sync {
    fn decode_block(&self, colour: u64, alpha: Option<u64>) -> [image::Rgba<u8>; BLOCK_PIXELS];

    fn encode_block(&self, colours: &[image::Rgba<u8>; BLOCK_PIXELS]) -> (u64, Option<u64>);
}

pub struct Etc1 {
    bit_depth: i32,
    name: &'static str,
    alpha: bool,
    byte_order: ByteOrder,
    codec: Box<dyn BlockCodec>,
}

impl Etc1 {
    pub fn new(alpha: bool, codec: Box<dyn BlockCodec>) -> Self {
        Etc1::with_byte_order(alpha, codec, ByteOrder::LittleEndian)
    }

    pub fn with_byte_order(alpha: bool, codec: Box<dyn BlockCodec>, byte_order: ByteOrder) -> Self {
        Etc1 {
            bit_depth: if alpha { 8 } else { 4 },
            name: if alpha { "ETC1A4" } else { "ETC1" },
            alpha,
            byte_order,
            codec,
        }
    }

    fn decode_block(&self, reader: &mut BinaryReader) -> Result<[image::Rgba<u8>; BLOCK_PIXELS]> {
        // Alpha word first, then the colour word.
        let alpha = if self.alpha {
            Some(reader.read_u64()?)
        } else {
            None
        };
        let colour = reader.read_u64()?;
        Ok(self.codec.decode_block(colour, alpha))
    }
}

impl ImageFormat for Etc1 {
    fn bit_depth(&self) -> i32 {
        self.bit_depth
    }

    fn name(&self) -> &str {
        self.name
    }

    fn decode<'a>(&'a self, tex: &'a [u8]) -> ColourIter<'a> {
        let mut reader = BinaryReader::new(tex, self.byte_order);
        let mut block: Option<std::array::IntoIter<image::Rgba<u8>, BLOCK_PIXELS>> = None;
        // Not self-terminating: the caller bounds consumption to the pixel
        // count, which for padded textures is always a multiple of 16.
        Box::new(std::iter::from_fn(move || {
            if let Some(pixels) = block.as_mut() {
                if let Some(colour) = pixels.next() {
                    return Some(Ok(colour));
                }
            }
            match self.decode_block(&mut reader) {
                Ok(pixels) => {
                    let mut pixels = pixels.into_iter();
                    let first = pixels.next().map(Ok);
                    block = Some(pixels);
                    first
                }
                Err(e) => Some(Err(e)),
            }
        }))
    }

    fn encode(&self, colours: &mut dyn Iterator<Item = image::Rgba<u8>>) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new(self.byte_order);
        let mut block = [image::Rgba([0u8; 4]); BLOCK_PIXELS];
        let mut filled = 0usize;

        for colour in colours {
            block[filled] = colour;
            filled += 1;

            if filled == BLOCK_PIXELS {
                let (colour_word, alpha_word) = self.codec.encode_block(&block);
                if self.alpha {
                    // Fully opaque when the codec has no alpha to give.
                    writer.write_u64(alpha_word.unwrap_or(u64::MAX));
                }
                writer.write_u64(colour_word);
                filled = 0;
            }
        }
        // A trailing partial block is never emitted; padded dimensions keep
        // the pixel count a multiple of the block size.

        Ok(writer.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stub codec: spreads the colour word's low byte across the block and
    /// echoes a recognisable alpha, so the streaming layout is observable
    /// without any real block math.
    struct StubCodec;

    impl BlockCodec for StubCodec {
        fn decode_block(
            &self,
            colour: u64,
            alpha: Option<u64>,
        ) -> [image::Rgba<u8>; BLOCK_PIXELS] {
            let c = colour as u8;
            let a = alpha.map(|a| a as u8).unwrap_or(255);
            [image::Rgba([c, c, c, a]); BLOCK_PIXELS]
        }

        fn encode_block(&self, colours: &[image::Rgba<u8>; BLOCK_PIXELS]) -> (u64, Option<u64>) {
            (colours[0][0] as u64, Some(colours[0][3] as u64))
        }
    }

    #[test]
    fn decode_reads_one_word_per_block_without_alpha() {
        let format = Etc1::new(false, Box::new(StubCodec));
        let tex = 0x2Au64.to_le_bytes();
        let colours: Vec<_> = format
            .decode(&tex)
            .take(BLOCK_PIXELS)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(colours.len(), BLOCK_PIXELS);
        assert!(colours.iter().all(|c| *c == image::Rgba([0x2A, 0x2A, 0x2A, 255])));
    }

    #[test]
    fn decode_reads_alpha_word_before_colour_word() {
        let format = Etc1::new(true, Box::new(StubCodec));
        let mut tex = Vec::new();
        tex.extend_from_slice(&0x80u64.to_le_bytes()); // alpha block
        tex.extend_from_slice(&0x2Au64.to_le_bytes()); // colour block
        let colours: Vec<_> = format
            .decode(&tex)
            .take(BLOCK_PIXELS)
            .collect::<Result<_>>()
            .unwrap();
        assert!(colours.iter().all(|c| *c == image::Rgba([0x2A, 0x2A, 0x2A, 0x80])));
    }

    #[test]
    fn encode_buffers_sixteen_pixels_per_block() {
        let format = Etc1::new(true, Box::new(StubCodec));
        let pixels = vec![image::Rgba([0x11, 0x11, 0x11, 0x44]); BLOCK_PIXELS * 2];
        let bytes = format.encode(&mut pixels.into_iter()).unwrap();
        // Two blocks, each an alpha word followed by a colour word.
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..8], &0x44u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &0x11u64.to_le_bytes());
    }

    #[test]
    fn encode_without_alpha_emits_colour_words_only() {
        let format = Etc1::new(false, Box::new(StubCodec));
        let pixels = vec![image::Rgba([0x11, 0x11, 0x11, 0x44]); BLOCK_PIXELS];
        let bytes = format.encode(&mut pixels.into_iter()).unwrap();
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn overreading_surfaces_an_error() {
        let format = Etc1::new(false, Box::new(StubCodec));
        let tex = 0u64.to_le_bytes();
        let results: Vec<_> = format.decode(&tex).take(BLOCK_PIXELS + 1).collect();
        assert!(results[BLOCK_PIXELS].is_err());
    }
}
