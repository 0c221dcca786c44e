//! Raster image support
//!
//! Images are printed with the GS v 0 raster bit image command: one bit per
//! dot, rows padded to whole bytes, most significant bit on the left.

#[cfg(feature = "image")]
use crate::error::{PrintError, PrintResult};

/// Monochrome raster image ready to be sent with GS v 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Build an image from packed rows
    ///
    /// Returns `None` if `data` is not exactly `ceil(width / 8) * height` bytes.
    pub fn from_packed(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = width.div_ceil(8) as usize * height as usize;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Width in dots
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in dots
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn row_bytes(&self) -> u32 {
        self.width.div_ceil(8)
    }

    /// Packed raster data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Load an image file and convert it to printer raster data
    ///
    /// The image will be:
    /// - Resized to fit `max_width` dots (384 is safe for 58mm and 80mm paper)
    /// - Converted to 1-bit monochrome by luminance
    /// - Transparent pixels are left white
    #[cfg(feature = "image")]
    #[tracing::instrument]
    pub fn load(path: &str, max_width: u32) -> PrintResult<Self> {
        use image::GenericImageView;

        let img = image::open(path).map_err(|e| PrintError::Image(format!("{}: {}", path, e)))?;
        let (w, h) = img.dimensions();
        tracing::debug!(width = w, height = h, "image opened");

        let max_width = max_width.max(8);
        let (new_w, new_h) = if w > max_width {
            let ratio = max_width as f64 / w as f64;
            (max_width, ((h as f64 * ratio) as u32).max(1))
        } else {
            (w, h)
        };

        let resized = img.resize_exact(new_w, new_h, image::imageops::FilterType::Nearest);
        let rgba = resized.to_rgba8();
        let x_bytes = new_w.div_ceil(8);
        let mut data = Vec::with_capacity((x_bytes * new_h) as usize);

        for y in 0..new_h {
            for x_byte in 0..x_bytes {
                let mut byte = 0u8;
                for bit in 0..8 {
                    let x = x_byte * 8 + bit;
                    if x >= new_w {
                        continue;
                    }
                    let pixel = rgba.get_pixel(x, y);
                    if pixel[3] < 128 {
                        continue;
                    }
                    let luma = 0.299 * pixel[0] as f32
                        + 0.587 * pixel[1] as f32
                        + 0.114 * pixel[2] as f32;
                    if luma < 128.0 {
                        byte |= 1 << (7 - bit);
                    }
                }
                data.push(byte);
            }
        }

        Ok(Self {
            width: new_w,
            height: new_h,
            data,
        })
    }
}
