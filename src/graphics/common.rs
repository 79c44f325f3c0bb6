//! Composition of a pixel format and a swizzle into bitmap load/save.

use image::RgbaImage;

use crate::error::Result;
use crate::graphics::format::ImageFormat;
use crate::graphics::swizzle::CtrSwizzle;

/// Everything needed to move one texture between bytes and bitmap.
/// Built once per container load and immutable afterwards.
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
    pub format: Box<dyn ImageFormat>,
    pub swizzle: Option<CtrSwizzle>,
}

impl ImageSettings {
    /// Dimensions the pixel stream actually covers; padded when swizzled.
    fn padded_dimensions(&self) -> (u32, u32) {
        match &self.swizzle {
            Some(swizzle) => (swizzle.width(), swizzle.height()),
            None => (self.width, self.height),
        }
    }

    /// Destination coordinate of every sequential pixel, in stream order.
    fn points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let (pad_width, pad_height) = self.padded_dimensions();
        (0..pad_width * pad_height)
            .map(move |i| (i % pad_width, i / pad_width))
            .map(move |p| match &self.swizzle {
                Some(swizzle) => swizzle.get(p),
                None => p,
            })
    }
}

/// Decodes a texture blob into a bitmap of the settings' dimensions.
///
/// Consumption is bounded by the (padded) pixel count, so the
/// non-self-terminating formats are safe here; decoded pixels that land in
/// the padding margin are dropped.
pub fn load(tex: &[u8], settings: &ImageSettings) -> Result<RgbaImage> {
    let mut image = RgbaImage::new(settings.width, settings.height);

    for ((x, y), colour) in settings.points().zip(settings.format.decode(tex)) {
        let colour = colour?;
        if x < settings.width && y < settings.height {
            image.put_pixel(x, y, colour);
        }
    }

    Ok(image)
}

/// Re-encodes a bitmap in tile order. Padding pixels outside the bitmap
/// encode as transparent black.
pub fn save(image: &RgbaImage, settings: &ImageSettings) -> Result<Vec<u8>> {
    let mut colours = settings.points().map(|(x, y)| {
        if x < image.width() && y < image.height() {
            *image.get_pixel(x, y)
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });

    settings.format.encode(&mut colours)
}
