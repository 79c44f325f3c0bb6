//! Pixel codecs and tile addressing for CTR textures.

pub mod common;
pub mod depth;
pub mod format;
pub mod swizzle;

pub use common::{load, save, ImageSettings};
pub use format::ImageFormat;
