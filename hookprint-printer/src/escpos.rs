//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::command::{CutMode, Justify};
use crate::encoding::{CodePage, encode_text};
use crate::raster::RasterImage;

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers.
/// Text is encoded to the selected code page as it is written, so command
/// parameters and raster data are never touched by the text encoder.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    code_page: CodePage,
}

impl EscPosBuilder {
    /// Create a new builder that prints text in the given code page
    pub fn new(code_page: CodePage) -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        buf.extend_from_slice(code_page.select_bytes());
        Self { buf, code_page }
    }

    // === Text Output ===

    /// Write text in the printer code page
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(&encode_text(s, self.code_page));
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// Set justification for the following lines
    pub fn justify(&mut self, justify: Justify) -> &mut Self {
        let n = match justify {
            Justify::Left => 0x00,
            Justify::Center => 0x01,
            Justify::Right => 0x02,
        };
        // ESC a n
        self.buf.extend_from_slice(&[0x1B, 0x61, n]);
        self
    }

    // === Text Style ===

    /// Turn emphasized (bold) mode on or off
    pub fn emphasis(&mut self, on: bool) -> &mut Self {
        // ESC E n
        self.buf.extend_from_slice(&[0x1B, 0x45, u8::from(on)]);
        self
    }

    /// Set character size as width and height multipliers (1-8 each)
    pub fn text_size(&mut self, width: u8, height: u8) -> &mut Self {
        let w = width.clamp(1, 8) - 1;
        let h = height.clamp(1, 8) - 1;
        // GS ! n - high nibble width, low nibble height
        self.buf.extend_from_slice(&[0x1D, 0x21, (w << 4) | h]);
        self
    }

    // === Paper Control ===

    /// Feed n lines and cut
    ///
    /// Uses GS V 65/66 n, which lets the printer manage the
    /// cutter-to-head distance.
    pub fn cut(&mut self, mode: CutMode, feed: u8) -> &mut Self {
        let m = match mode {
            CutMode::Full => 0x41,
            CutMode::Partial => 0x42,
        };
        self.buf.extend_from_slice(&[0x1D, 0x56, m, feed]);
        self
    }

    // === Graphics ===

    /// Print a raster image (GS v 0)
    pub fn image(&mut self, image: &RasterImage) -> &mut Self {
        let x_bytes = image.row_bytes();
        let height = image.height();

        // GS v 0 m xL xH yL yH
        self.buf.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
        self.buf.push(x_bytes as u8);
        self.buf.push((x_bytes >> 8) as u8);
        self.buf.push(height as u8);
        self.buf.push((height >> 8) as u8);
        self.buf.extend_from_slice(image.data());

        // Newline after image
        self.buf.push(b'\n');
        self
    }

    /// Print a QR code
    ///
    /// Size: 1-16 (module size in dots)
    pub fn qr_code(&mut self, data: &str, size: u8) -> &mut Self {
        let size = size.clamp(1, 16);

        // Function 165: Select model (Model 2)
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);

        // Function 167: Set module size
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, size]);

        // Function 169: Set error correction (L)
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x30]);

        // Function 180: Store data
        let data_bytes = data.as_bytes();
        let len = data_bytes.len() + 3;
        let p_l = (len & 0xFF) as u8;
        let p_h = ((len >> 8) & 0xFF) as u8;
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, p_l, p_h, 0x31, 0x50, 0x30]);
        self.buf.extend_from_slice(data_bytes);

        // Function 181: Print
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);

        self
    }

    // === Build ===

    /// Finish the job and return the byte buffer
    pub fn build(mut self) -> Vec<u8> {
        self.buf.extend_from_slice(self.code_page.release_bytes());
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(CodePage::default())
    }
}
