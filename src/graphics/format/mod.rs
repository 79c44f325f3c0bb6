//! Pixel format codecs.
//!
//! Every format converts between its packed byte representation and a
//! stream of canonical 8-bit-per-channel RGBA colours. Decoding is lazy and
//! single-pass: each pulled element advances an internal byte cursor.
//!
//! Termination differs per family and callers depend on both behaviours:
//! the channel-packed [`Rgba`] family stops at end of stream, while the
//! [`La`]/[`Hl`]/[`Etc1`] families do not self-terminate. Consumers must
//! bound them to the pixel count; overreads surface as I/O errors.

mod etc1;
mod hl;
mod la;
mod rgba;

pub use etc1::{BlockCodec, Etc1, BLOCK_PIXELS};
pub use hl::Hl;
pub use la::La;
pub use rgba::Rgba;

use crate::error::Result;

/// Lazy decoded-colour stream borrowed from the input buffer.
pub type ColourIter<'a> = Box<dyn Iterator<Item = Result<image::Rgba<u8>>> + 'a>;

/// A pixel format that can round-trip canonical colours.
pub trait ImageFormat: Send + Sync {
    /// Bits per pixel of the packed representation.
    fn bit_depth(&self) -> i32;

    /// Human-readable format name, derived from the channel layout.
    fn name(&self) -> &str;

    fn decode<'a>(&'a self, tex: &'a [u8]) -> ColourIter<'a>;

    fn encode(&self, colours: &mut dyn Iterator<Item = image::Rgba<u8>>) -> Result<Vec<u8>>;
}
