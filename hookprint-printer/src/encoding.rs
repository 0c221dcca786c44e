//! Code page encoding and column-width utilities
//!
//! Thermal printers do not speak UTF-8. Text is converted to the selected
//! printer code page at write time, and line widths are measured in the
//! columns that the encoded bytes occupy on paper:
//! - WPC1252: one column per character, unmappable characters become `?`
//! - GBK: two columns per CJK character, one per ASCII character

use std::fmt;
use std::str::FromStr;

use crate::error::PrintError;

/// Printer code page used for text output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePage {
    /// Windows-1252 (ESC t 16), covers Western European text
    #[default]
    Wpc1252,
    /// GBK via Chinese character mode (FS &)
    Gbk,
}

impl CodePage {
    /// Command bytes that switch the printer into this code page
    pub fn select_bytes(self) -> &'static [u8] {
        match self {
            // ESC t 16 - Select WPC1252
            CodePage::Wpc1252 => &[0x1B, 0x74, 16],
            // FS & - Enable Chinese mode, FS C 1 - Select GBK
            CodePage::Gbk => &[0x1C, 0x26, 0x1C, 0x43, 0x01],
        }
    }

    /// Command bytes that leave this code page at the end of a job
    pub fn release_bytes(self) -> &'static [u8] {
        match self {
            CodePage::Wpc1252 => &[],
            // FS . - Exit Chinese mode
            CodePage::Gbk => &[0x1C, 0x2E],
        }
    }

    fn encoding(self) -> &'static encoding_rs::Encoding {
        match self {
            CodePage::Wpc1252 => encoding_rs::WINDOWS_1252,
            CodePage::Gbk => encoding_rs::GBK,
        }
    }
}

impl FromStr for CodePage {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wpc1252" | "cp1252" | "windows-1252" => Ok(CodePage::Wpc1252),
            "gbk" => Ok(CodePage::Gbk),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown code page: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodePage::Wpc1252 => f.write_str("wpc1252"),
            CodePage::Gbk => f.write_str("gbk"),
        }
    }
}

/// Encode a single character, or `None` if the code page cannot represent it
fn encode_char(c: char, code_page: CodePage) -> Option<Vec<u8>> {
    let mut utf8 = [0u8; 4];
    let (bytes, _, had_errors) = code_page.encoding().encode(c.encode_utf8(&mut utf8));
    if had_errors {
        None
    } else {
        Some(bytes.into_owned())
    }
}

/// Printed width of a single character in columns
pub fn char_width(c: char, code_page: CodePage) -> usize {
    match code_page {
        // The euro sign is printed through the single-byte page
        CodePage::Gbk if c == '€' => 1,
        _ => encode_char(c, code_page).map_or(1, |b| b.len()),
    }
}

/// Printed width of a string in columns
pub fn text_width(s: &str, code_page: CodePage) -> usize {
    s.chars().map(|c| char_width(c, code_page)).sum()
}

/// Encode UTF-8 text into printer bytes
///
/// Characters the code page cannot represent are replaced by `?`.
/// In GBK mode the euro sign is printed by briefly switching to PC858.
pub fn encode_text(s: &str, code_page: CodePage) -> Vec<u8> {
    if s.is_ascii() {
        return s.as_bytes().to_vec();
    }

    let mut out = Vec::with_capacity(s.len() * 2);
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        if code_page == CodePage::Gbk && c == '€' {
            // Exit Chinese -> PC858 -> Euro -> Enter Chinese
            out.extend_from_slice(&[0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26]);
            continue;
        }
        match encode_char(c, code_page) {
            Some(bytes) => out.extend_from_slice(&bytes),
            None => out.push(b'?'),
        }
    }
    out
}

/// Word-wrap text to a maximum column width
///
/// Existing line breaks are kept (`\r\n` is treated as `\n`) and a line
/// that already fits is returned unchanged. Spaces are dropped only where a
/// line is broken, and words wider than a full line are split.
pub fn wrap_text(text: &str, width: usize, code_page: CodePage) -> Vec<String> {
    let width = width.max(1);
    let normalized = text.replace("\r\n", "\n");
    let mut lines = Vec::new();

    for raw in normalized.split('\n') {
        if text_width(raw, code_page) <= width {
            lines.push(raw.to_string());
            continue;
        }

        let mut line = String::new();
        let mut line_width = 0;
        // No word placed on the current line yet
        let mut fresh = true;
        // Current line was started by a break
        let mut broken = false;

        for word in raw.split(' ') {
            if word.is_empty() && fresh && broken {
                continue;
            }

            let word_width = text_width(word, code_page);
            let needed = if fresh {
                word_width
            } else {
                line_width + 1 + word_width
            };

            if needed <= width {
                if !fresh {
                    line.push(' ');
                    line_width += 1;
                }
                line.push_str(word);
                line_width += word_width;
                fresh = false;
                continue;
            }

            if !fresh {
                let done = std::mem::take(&mut line);
                lines.push(done.trim_end().to_string());
                line_width = 0;
                fresh = true;
                broken = true;
            }
            if word.is_empty() {
                continue;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
            } else {
                for c in word.chars() {
                    let w = char_width(c, code_page);
                    if line_width + w > width && line_width > 0 {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(c);
                    line_width += w;
                }
            }
            fresh = false;
        }

        lines.push(line);
    }

    lines
}
