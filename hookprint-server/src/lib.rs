//! Hookprint server - GitHub webhooks on a thermal receipt printer
//!
//! # Module structure
//!
//! ```text
//! hookprint-server/src/
//! ├── core/          # config, state, errors, server
//! ├── api/           # HTTP routes and handlers
//! ├── receipt/       # event payloads and receipt formatters
//! └── utils/         # logging
//! ```
//!
//! A request flows through [`api::webhook::handle_webhook`]: the body is
//! parsed into a [`WebhookEvent`], [`ReceiptRenderer`] turns it into a
//! command list, and the encoded ESC/POS job goes to the configured printer.

pub mod api;
pub mod core;
pub mod receipt;
pub mod utils;

pub use core::{Config, Result, Server, ServerError, ServerState};
pub use receipt::{GithubEvent, ReceiptRenderer, ReceiptSettings, WebhookEvent};
pub use utils::init_logger;

pub fn print_banner() {
    println!(
        r#"
    __                __              _       __
   / /_  ____  ____  / /______  _____(_)___  / /_
  / __ \/ __ \/ __ \/ //_/ __ \/ ___/ / __ \/ __/
 / / / / /_/ / /_/ / ,< / /_/ / /  / / / / / /_
/_/ /_/\____/\____/_/|_/ .___/_/  /_/_/ /_/\__/
                      /_/
    "#
    );
}
