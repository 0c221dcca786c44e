//! Receipt sections shared by all event formatters
//!
//! Section order and spacing follow the paper layout: header, labels,
//! title, body, optional QR code, footer with cut.

use chrono::DateTime;
use chrono_tz::Tz;
use hookprint_printer::{CutMode, Justify, RasterImage, Receipt, wrap_text};

use super::ReceiptSettings;
use super::payload::Label;

/// Header fields; empty strings and a zero number are skipped
pub struct Header<'a> {
    pub title: &'a str,
    pub user: &'a str,
    pub repo: &'a str,
    pub number: u64,
    pub assignee: &'a str,
}

/// Wrap-aware receipt writer
pub struct ReceiptWriter<'a> {
    settings: &'a ReceiptSettings,
    receipt: Receipt,
}

impl<'a> ReceiptWriter<'a> {
    pub fn new(settings: &'a ReceiptSettings) -> Self {
        Self {
            settings,
            receipt: Receipt::new(),
        }
    }

    /// Write text as wrapped lines for the given column width
    fn wrapped(&mut self, text: &str, width: usize) {
        for line in wrap_text(text, width, self.settings.code_page) {
            self.receipt.line(&line);
        }
    }

    /// Write text wrapped to the paper width
    pub fn lines(&mut self, text: &str) -> &mut Self {
        self.wrapped(text, self.settings.width);
        self
    }

    pub fn justify(&mut self, justify: Justify) -> &mut Self {
        self.receipt.justify(justify);
        self
    }

    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.receipt.feed(lines);
        self
    }

    pub fn logo(&mut self, logo: Option<RasterImage>) -> &mut Self {
        if let Some(image) = logo {
            self.receipt.justify(Justify::Center).image(image).feed(2);
        }
        self
    }

    pub fn header(&mut self, header: &Header<'_>) -> &mut Self {
        self.receipt
            .justify(Justify::Center)
            .text_size(2, 2)
            .emphasis(true);
        // Double width halves the characters per line
        self.wrapped(header.title, self.settings.width / 2);
        self.receipt.feed(2);

        self.receipt
            .text_size(1, 1)
            .emphasis(false)
            .justify(Justify::Left);

        if header.number > 0 {
            self.lines(&format!("Issue: #{}", header.number));
        }
        if !header.repo.is_empty() {
            self.lines(&format!("Repo: {}", header.repo));
        }
        if !header.user.is_empty() {
            self.lines(&format!("Created by: @{}", header.user));
        }
        if !header.assignee.is_empty() {
            self.lines(&format!("Assigned to: @{}", header.assignee));
        }

        self.receipt.feed(2);
        self
    }

    pub fn labels(&mut self, labels: &[Label]) -> &mut Self {
        if labels.is_empty() {
            return self;
        }

        let tags: Vec<String> = labels
            .iter()
            .filter_map(|l| l.name.as_deref())
            .filter(|name| !name.is_empty())
            .map(|name| format!("[{}]", name))
            .collect();

        self.receipt.emphasis(true);
        self.lines(&tags.join(" "));
        self.receipt.emphasis(false).feed(1);
        self
    }

    pub fn title(&mut self, title: &str) -> &mut Self {
        if !title.is_empty() {
            self.receipt.emphasis(true);
            self.lines(title);
            self.receipt.emphasis(false).feed(2);
        }
        self
    }

    pub fn body(&mut self, body: &str) -> &mut Self {
        if !body.is_empty() {
            self.lines(body);
            self.receipt.feed(2);
        }
        self
    }

    /// QR code linking back to GitHub, when enabled
    pub fn link(&mut self, url: Option<&str>) -> &mut Self {
        if let (Some(size), Some(url)) = (self.settings.qr_module_size, url)
            && !url.is_empty()
        {
            self.receipt
                .justify(Justify::Center)
                .qr_code(url, size)
                .feed(1)
                .justify(Justify::Left);
        }
        self
    }

    pub fn footer(&mut self, timestamp: &str) -> &mut Self {
        if !timestamp.is_empty() {
            self.lines(&format_timestamp(timestamp, self.settings.timezone));
            self.receipt.feed(2);
        }
        self.receipt.cut(CutMode::Partial, 3);
        self
    }

    pub fn finish(self) -> Receipt {
        self.receipt
    }
}

/// Format an ISO 8601 timestamp in the given zone, or return it unchanged
pub fn format_timestamp(raw: &str, tz: Tz) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
