//! Server state shared by handlers
//!
//! Holds configuration only. The printer adapter stores an address, not a
//! connection, so nothing mutable is shared between requests.

use std::sync::Arc;
use std::time::Duration;

use hookprint_printer::{DevicePrinter, FilePrinter, NetworkPrinter};

use crate::core::{Config, Result, ServerError};
use crate::receipt::{ReceiptRenderer, ReceiptSettings};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub printer: DevicePrinter,
    pub renderer: Arc<ReceiptRenderer>,
}

impl ServerState {
    /// Build state from configuration
    pub fn new(config: Config) -> Result<Self> {
        let printer = match &config.printer_addr {
            Some(addr) => DevicePrinter::Network(
                NetworkPrinter::from_addr(addr)
                    .map_err(|e| ServerError::Config(e.to_string()))?
                    .with_timeout(Duration::from_millis(config.printer_timeout_ms)),
            ),
            None => DevicePrinter::File(FilePrinter::new(&config.printer_device)),
        };

        let renderer = ReceiptRenderer::new(ReceiptSettings::from(&config));

        Ok(Self {
            config: Arc::new(config),
            printer,
            renderer: Arc::new(renderer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn state_from(vars: &[(&str, &str)]) -> Result<ServerState> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerState::new(Config::from_lookup(|key| map.get(key).cloned())?)
    }

    #[test]
    fn file_printer_by_default() {
        let state = state_from(&[("PRINTER_DEVICE", "/tmp/lp0")]).unwrap();
        assert_eq!(state.printer.to_string(), "file:/tmp/lp0");
    }

    #[test]
    fn printer_addr_accepts_host_names() {
        let state = state_from(&[("PRINTER_ADDR", "localhost:9100")]).unwrap();
        assert_eq!(state.printer.to_string(), "tcp:localhost:9100");
    }

    #[test]
    fn malformed_printer_addr_is_rejected() {
        assert!(matches!(
            state_from(&[("PRINTER_ADDR", "localhost")]),
            Err(ServerError::Config(_))
        ));
    }
}
