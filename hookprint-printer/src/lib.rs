//! # hookprint-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Print primitives ([`Command`]) collected into a [`Receipt`]
//! - ESC/POS command building
//! - Code page encoding (WPC1252, GBK) and column-aware word wrapping
//! - Device file printing (`/dev/usb/lp0`) and network printing (TCP port 9100)
//! - Image/logo processing
//!
//! Business logic (WHAT to print) stays in application code:
//! - GitHub event receipts → hookprint-server
//!
//! ## Example
//!
//! ```ignore
//! use hookprint_printer::{CodePage, CutMode, FilePrinter, Justify, Printer, Receipt};
//!
//! let mut receipt = Receipt::new();
//! receipt.justify(Justify::Center);
//! receipt.text_size(2, 2);
//! receipt.line("New Issue");
//! receipt.text_size(1, 1);
//! receipt.justify(Justify::Left);
//! receipt.line("Repo: octo/hello");
//! receipt.cut(CutMode::Partial, 3);
//!
//! let printer = FilePrinter::new("/dev/usb/lp0");
//! printer.print(&receipt.encode(CodePage::Wpc1252)).await?;
//! ```

mod command;
mod encoding;
mod error;
mod escpos;
mod printer;
mod raster;

// Re-exports
pub use command::{Command, CutMode, Justify, Receipt};
pub use encoding::{CodePage, char_width, encode_text, text_width, wrap_text};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{DevicePrinter, FilePrinter, NetworkPrinter, Printer};
pub use raster::RasterImage;
