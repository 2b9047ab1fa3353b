//! Logo preparation: decode, downscale, flatten onto white, JPEG-encode.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ImageResult, Rgb, RgbImage};

const JPEG_QUALITY: u8 = 90;

/// Logo ready for embedding as a DCT-encoded image XObject.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub jpeg: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Size on the page, in points.
    pub display_width: f32,
    pub display_height: f32,
}

/// Fit the logo in a `max_width` x `max_height` point box, rasterised at
/// `scale` pixels per point. Small images are never upscaled.
pub fn prepare_logo(
    data: &[u8],
    max_width: f32,
    max_height: f32,
    scale: f32,
) -> ImageResult<LogoImage> {
    let decoded = image::load_from_memory(data)?;
    let scale = scale.max(1.0);

    let target_w = (max_width * scale).round().max(1.0) as u32;
    let target_h = (max_height * scale).round().max(1.0) as u32;
    let resized = if decoded.width() > target_w || decoded.height() > target_h {
        decoded.resize(target_w, target_h, FilterType::Lanczos3)
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u16;
        let over_white = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([over_white(r), over_white(g), over_white(b)])
    });

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&flattened)?;

    let (pixel_width, pixel_height) = flattened.dimensions();
    Ok(LogoImage {
        jpeg,
        pixel_width,
        pixel_height,
        display_width: pixel_width as f32 / scale,
        display_height: pixel_height as f32 / scale,
    })
}
