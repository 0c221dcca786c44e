//! Print primitives and the receipt they make up
//!
//! A [`Receipt`] is an ordered list of [`Command`]s. Renderers build one
//! without touching any device, and [`Receipt::encode`] turns it into an
//! ESC/POS job.

use crate::encoding::CodePage;
use crate::escpos::EscPosBuilder;
use crate::raster::RasterImage;

/// Horizontal justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Paper cut mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutMode {
    Full,
    /// Leave a small connection
    Partial,
}

/// A single print primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text run, newlines included
    Text(String),
    Emphasis(bool),
    /// Character size multipliers (1-8)
    TextSize { width: u8, height: u8 },
    Justify(Justify),
    /// Print buffer and feed n lines
    Feed(u8),
    /// Feed n lines, then cut
    Cut { mode: CutMode, feed: u8 },
    Image(RasterImage),
    /// QR code with module size in dots (1-16)
    QrCode { data: String, size: u8 },
}

/// Ordered sequence of print primitives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    commands: Vec<Command>,
}

impl Receipt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    /// Write raw text
    pub fn text(&mut self, s: impl Into<String>) -> &mut Self {
        self.push(Command::Text(s.into()))
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.push(Command::Text(format!("{}\n", s)))
    }

    pub fn emphasis(&mut self, on: bool) -> &mut Self {
        self.push(Command::Emphasis(on))
    }

    pub fn text_size(&mut self, width: u8, height: u8) -> &mut Self {
        self.push(Command::TextSize { width, height })
    }

    pub fn justify(&mut self, justify: Justify) -> &mut Self {
        self.push(Command::Justify(justify))
    }

    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.push(Command::Feed(lines))
    }

    pub fn cut(&mut self, mode: CutMode, feed: u8) -> &mut Self {
        self.push(Command::Cut { mode, feed })
    }

    pub fn image(&mut self, image: RasterImage) -> &mut Self {
        self.push(Command::Image(image))
    }

    pub fn qr_code(&mut self, data: impl Into<String>, size: u8) -> &mut Self {
        self.push(Command::QrCode {
            data: data.into(),
            size,
        })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Concatenated text runs, without any styling
    pub fn plain_text(&self) -> String {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Encode the receipt as an ESC/POS job
    pub fn encode(&self, code_page: CodePage) -> Vec<u8> {
        let mut b = EscPosBuilder::new(code_page);
        for command in &self.commands {
            match command {
                Command::Text(s) => b.text(s),
                Command::Emphasis(on) => b.emphasis(*on),
                Command::TextSize { width, height } => b.text_size(*width, *height),
                Command::Justify(j) => b.justify(*j),
                Command::Feed(n) => b.feed(*n),
                Command::Cut { mode, feed } => b.cut(*mode, *feed),
                Command::Image(image) => b.image(image),
                Command::QrCode { data, size } => b.qr_code(data, *size),
            };
        }
        b.build()
    }
}
