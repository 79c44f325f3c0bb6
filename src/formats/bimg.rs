//! BIMG banner image container.
//!
//! A minimal CTR texture wrapper: a 28-byte little-endian header followed by
//! the raw swizzled pixel blob. The header's format id selects an entry from
//! the fixed CTR format table; width and height size the tiling.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use image::RgbaImage;
use serde::Serialize;

use crate::binary_io::{BinaryReader, BinaryWriter, ByteOrder, Record};
use crate::error::{Error, Result};
use crate::graphics::common::{self, ImageSettings};
use crate::graphics::format::{BlockCodec, Etc1, Hl, ImageFormat, La, Rgba};
use crate::graphics::swizzle::{CtrSwizzle, Orientation};

/// Fixed-layout BIMG header. Copied verbatim between load and save; the
/// reserved and unknown fields are preserved, not interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BimgHeader {
    pub zero1: u32,
    pub data_size: u32,
    pub zero2: u32,
    pub format: u32,
    pub width: u16,
    pub height: u16,
    pub unk1: u32,
    pub unk2: u32,
    pub unk3: u32,
}

impl Record for BimgHeader {
    fn read_from(reader: &mut BinaryReader) -> io::Result<Self> {
        Ok(BimgHeader {
            zero1: reader.read_u32()?,
            data_size: reader.read_u32()?,
            zero2: reader.read_u32()?,
            format: reader.read_u32()?,
            width: reader.read_u16()?,
            height: reader.read_u16()?,
            unk1: reader.read_u32()?,
            unk2: reader.read_u32()?,
            unk3: reader.read_u32()?,
        })
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.zero1);
        writer.write_u32(self.data_size);
        writer.write_u32(self.zero2);
        writer.write_u32(self.format);
        writer.write_u16(self.width);
        writer.write_u16(self.height);
        writer.write_u32(self.unk1);
        writer.write_u32(self.unk2);
        writer.write_u32(self.unk3);
    }
}

/// Pixel layout a BIMG format id stands for. Pure data; turning one into a
/// working codec happens in [`CtrImageFormat::instantiate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CtrImageFormat {
    Rgba { r: i32, g: i32, b: i32, a: i32 },
    La { l: i32, a: i32 },
    Hl { h: i32, l: i32 },
    Etc1 { alpha: bool },
}

impl CtrImageFormat {
    /// Builds the codec for this layout. The block-compressed entries need
    /// the externally supplied block codec.
    pub fn instantiate(&self, block_codec: Option<Box<dyn BlockCodec>>) -> Result<Box<dyn ImageFormat>> {
        Ok(match *self {
            CtrImageFormat::Rgba { r, g, b, a } => Box::new(Rgba::new(r, g, b, a)?),
            CtrImageFormat::La { l, a } => Box::new(La::new(l, a)?),
            CtrImageFormat::Hl { h, l } => Box::new(Hl::new(h, l)?),
            CtrImageFormat::Etc1 { alpha } => {
                let codec = block_codec.ok_or_else(|| {
                    Error::configuration("block-compressed formats need a block codec")
                })?;
                Box::new(Etc1::new(alpha, codec))
            }
        })
    }
}

/// Format-id table of the BIMG container, built once and never mutated.
pub static CTR_FORMATS: LazyLock<BTreeMap<u32, CtrImageFormat>> = LazyLock::new(|| {
    BTreeMap::from([
        (0, CtrImageFormat::Rgba { r: 8, g: 8, b: 8, a: 8 }),
        (1, CtrImageFormat::Rgba { r: 8, g: 8, b: 8, a: 0 }),
        (2, CtrImageFormat::Rgba { r: 5, g: 5, b: 5, a: 1 }),
        (3, CtrImageFormat::Rgba { r: 5, g: 6, b: 5, a: 0 }),
        (4, CtrImageFormat::Rgba { r: 4, g: 4, b: 4, a: 4 }),
        (5, CtrImageFormat::La { l: 8, a: 8 }),
        (6, CtrImageFormat::Hl { h: 8, l: 8 }),
        (7, CtrImageFormat::La { l: 8, a: 0 }),
        (8, CtrImageFormat::La { l: 0, a: 8 }),
        (9, CtrImageFormat::La { l: 4, a: 4 }),
        (10, CtrImageFormat::La { l: 4, a: 0 }),
        (11, CtrImageFormat::La { l: 0, a: 4 }),
        (12, CtrImageFormat::Etc1 { alpha: false }),
        (13, CtrImageFormat::Etc1 { alpha: true }),
    ])
});

/// A loaded BIMG file: the original header plus the decoded bitmap.
pub struct Bimg {
    header: BimgHeader,
    settings: ImageSettings,
    image: RgbaImage,
}

impl Bimg {
    /// Parses a BIMG from memory and decodes its texture.
    pub fn from_bytes(data: &[u8], block_codec: Option<Box<dyn BlockCodec>>) -> Result<Self> {
        let mut reader = BinaryReader::new(data, ByteOrder::LittleEndian);
        let header = BimgHeader::read_from(&mut reader)?;
        let payload = reader.read_bytes(header.data_size as usize)?;

        let layout = CTR_FORMATS.get(&header.format).ok_or_else(|| {
            Error::configuration(format!("unknown BIMG format id {}", header.format))
        })?;
        let format = layout.instantiate(block_codec)?;

        let width = header.width as u32;
        let height = header.height as u32;
        let settings = ImageSettings {
            width,
            height,
            format,
            // The tiling is sized to the stored dimensions; BIMG payloads
            // are exactly dataSize bytes with no pad margin.
            swizzle: Some(CtrSwizzle::new(width, height, Orientation::None, false)),
        };

        let image = common::load(&payload, &settings)?;

        Ok(Bimg {
            header,
            settings,
            image,
        })
    }

    /// Reads and decodes a BIMG file.
    pub fn open(path: impl AsRef<Path>, block_codec: Option<Box<dyn BlockCodec>>) -> Result<Self> {
        let data = fs::read(path)?;
        Bimg::from_bytes(&data, block_codec)
    }

    pub fn header(&self) -> &BimgHeader {
        &self.header
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn format_name(&self) -> &str {
        self.settings.format.name()
    }

    /// Replaces the decoded bitmap, e.g. with a patched banner frame.
    /// Dimensions must match the stored header exactly.
    pub fn set_image(&mut self, image: RgbaImage) -> Result<()> {
        self.check_dimensions(image.width(), image.height())?;
        self.image = image;
        Ok(())
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if width != self.header.width as u32 {
            return Err(Error::Validation {
                dimension: "width",
                expected: self.header.width as u32,
                actual: width,
            });
        }
        if height != self.header.height as u32 {
            return Err(Error::Validation {
                dimension: "height",
                expected: self.header.height as u32,
                actual: height,
            });
        }
        Ok(())
    }

    /// Re-encodes the bitmap after the unchanged header.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.check_dimensions(self.image.width(), self.image.height())?;

        let payload = common::save(&self.image, &self.settings)?;

        let mut writer = BinaryWriter::new(ByteOrder::LittleEndian);
        self.header.write_to(&mut writer);
        writer.write_bytes(&payload);
        Ok(writer.into_bytes())
    }

    /// Writes the re-encoded container to disk. Fails before touching the
    /// file when validation or encoding fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(header: &BimgHeader) -> Vec<u8> {
        let mut writer = BinaryWriter::new(ByteOrder::LittleEndian);
        header.write_to(&mut writer);
        writer.into_bytes()
    }

    fn rgba8888_file(width: u16, height: u16) -> Vec<u8> {
        let data_size = width as u32 * height as u32 * 4;
        let header = BimgHeader {
            data_size,
            format: 0,
            width,
            height,
            unk1: 0x11223344,
            unk2: 0x55667788,
            unk3: 0x99AABBCC,
            ..Default::default()
        };
        let mut file = header_bytes(&header);
        file.extend((0..data_size).map(|i| (i % 253) as u8));
        file
    }

    #[test]
    fn header_is_28_bytes_and_round_trips() {
        let header = BimgHeader {
            zero1: 0,
            data_size: 96000,
            zero2: 0,
            format: 3,
            width: 200,
            height: 120,
            unk1: 1,
            unk2: 2,
            unk3: 3,
        };
        let bytes = header_bytes(&header);
        assert_eq!(bytes.len(), 28);

        let mut reader = BinaryReader::new(&bytes, ByteOrder::LittleEndian);
        assert_eq!(BimgHeader::read_from(&mut reader).unwrap(), header);
    }

    #[test]
    fn format_table_matches_the_container_ids() {
        assert_eq!(CTR_FORMATS.len(), 14);
        assert_eq!(
            CTR_FORMATS[&0],
            CtrImageFormat::Rgba { r: 8, g: 8, b: 8, a: 8 }
        );
        assert_eq!(CTR_FORMATS[&3], CtrImageFormat::Rgba { r: 5, g: 6, b: 5, a: 0 });
        assert_eq!(CTR_FORMATS[&9], CtrImageFormat::La { l: 4, a: 4 });
        assert_eq!(CTR_FORMATS[&13], CtrImageFormat::Etc1 { alpha: true });
    }

    #[test]
    fn unedited_load_save_is_byte_identical() {
        let file = rgba8888_file(200, 120);
        let bimg = Bimg::from_bytes(&file, None).unwrap();
        assert_eq!(bimg.image().dimensions(), (200, 120));
        assert_eq!(bimg.to_bytes().unwrap(), file);
    }

    #[test]
    fn replacing_the_bitmap_survives_a_round_trip() {
        let file = rgba8888_file(8, 8);
        let mut bimg = Bimg::from_bytes(&file, None).unwrap();

        let mut replacement = RgbaImage::new(8, 8);
        for (x, y, pixel) in replacement.enumerate_pixels_mut() {
            *pixel = image::Rgba([x as u8, y as u8, 7, 255]);
        }
        bimg.set_image(replacement.clone()).unwrap();

        let reloaded = Bimg::from_bytes(&bimg.to_bytes().unwrap(), None).unwrap();
        assert_eq!(reloaded.image(), &replacement);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let file = rgba8888_file(8, 8);
        let mut bimg = Bimg::from_bytes(&file, None).unwrap();
        let err = bimg.set_image(RgbaImage::new(8, 16)).unwrap_err();
        match err {
            Error::Validation {
                dimension,
                expected,
                actual,
            } => {
                assert_eq!(dimension, "height");
                assert_eq!(expected, 8);
                assert_eq!(actual, 16);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_format_id_is_rejected() {
        let header = BimgHeader {
            data_size: 0,
            format: 99,
            width: 8,
            height: 8,
            ..Default::default()
        };
        let err = Bimg::from_bytes(&header_bytes(&header), None).err().unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn block_compressed_ids_need_a_codec() {
        let header = BimgHeader {
            data_size: 0,
            format: 12,
            width: 8,
            height: 8,
            ..Default::default()
        };
        let err = Bimg::from_bytes(&header_bytes(&header), None).err().unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn truncated_payload_is_an_io_error() {
        let mut file = rgba8888_file(8, 8);
        file.truncate(100);
        let err = Bimg::from_bytes(&file, None).err().unwrap();
        assert!(matches!(err, Error::Io(_)));
    }
}
