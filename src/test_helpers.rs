//! Shared test utilities: synthetic source images and a size shorthand.

use crate::size::Size;
use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

/// Build a size, panicking on zero axes.
pub fn size(width: u32, height: u32) -> Size {
    Size::new(width, height).unwrap()
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a small valid PNG file with an alpha channel.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 64, ((x + y) % 256) as u8])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}
