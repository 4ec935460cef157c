//! Flattens decoded drawings onto an opaque background.

use crate::domain::drawing::value_objects::Rgb;
use image::{DynamicImage, ImageFormat, RgbImage, Rgba, RgbaImage, imageops};
use std::io::Cursor;

/// Produces an opaque RGB image from any decoded drawing.
///
/// Images with an alpha channel are composited over `background`; everything
/// else is converted channel-wise and `background` is not used.
pub fn normalize(image: &DynamicImage, background: Rgb) -> RgbImage {
    if image.color().has_alpha() {
        composite_over(image, background)
    } else {
        image.to_rgb8()
    }
}

/// Source-over compositing of `image` on a solid `background`.
pub fn composite_over(image: &DynamicImage, background: Rgb) -> RgbImage {
    let [r, g, b] = background.channels();
    let mut canvas = RgbaImage::from_pixel(image.width(), image.height(), Rgba([r, g, b, 255]));
    imageops::overlay(&mut canvas, &image.to_rgba8(), 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// A flattened drawing together with its PNG encoding.
///
/// The same bytes feed the snapshot store and the analyzer.
#[derive(Debug, Clone)]
pub struct NormalizedDrawing {
    pub image: RgbImage,
    pub png: Vec<u8>,
}

impl NormalizedDrawing {
    pub fn new(image: RgbImage) -> Result<Self, image::ImageError> {
        let png = encode_png(&image)?;
        Ok(Self { image, png })
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}
