//! Codec core for 3DS (CTR) banner textures.
//!
//! Three layers, bottom up:
//! - [`graphics::depth`] and [`binary_io`]: bit-depth requantization and
//!   endian-aware primitive I/O with nibble packing.
//! - [`graphics::format`] and [`graphics::swizzle`]: the pixel format codecs
//!   (channel-packed RGBA, LA, HL and the block-compressed streaming layout)
//!   and the table-driven tile address engine with its CTR specialization.
//! - [`formats::bimg`]: the BIMG header-plus-blob container that composes
//!   the two into bitmap load/save.

pub mod binary_io;
pub mod error;
pub mod formats;
pub mod graphics;

pub use error::{Error, Result};
pub use formats::bimg::{Bimg, BimgHeader, CtrImageFormat, CTR_FORMATS};
pub use graphics::common::{load, save, ImageSettings};
pub use graphics::format::{BlockCodec, ImageFormat};
pub use graphics::swizzle::{CtrSwizzle, MasterSwizzle, Orientation};
