//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Device files (e.g. `/dev/usb/lp0`)
//! - Network printers (TCP port 9100)
//!
//! Every adapter opens its connection inside [`Printer::print`] and drops it
//! before returning, on success and on error alike.

use crate::error::{PrintError, PrintResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// File-backed printer (USB line printer device or plain file)
#[derive(Debug, Clone)]
pub struct FilePrinter {
    path: PathBuf,
}

impl FilePrinter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the device path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Printer for FilePrinter {
    #[instrument(skip(data), fields(path = %self.path.display(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Open {} failed: {}", self.path.display(), e),
                ))
            })?;

        file.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        file.flush().await?;

        info!("Print job written to device");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Printer device unavailable");
                false
            }
        }
    }
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100. The host is
/// resolved on every connect, so names like `printer.local` work.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: String,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create from a `host:port` string (e.g. "192.168.1.100:9100", "printer.local:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let invalid = || PrintError::InvalidConfig(format!("Invalid address: {}", addr));
        let (host, port) = addr.trim().rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() || port.parse::<u16>().is_err() {
            return Err(invalid());
        }

        Ok(Self {
            addr: addr.trim().to_string(),
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let connect = TcpStream::connect(self.addr.as_str());
        let mut stream = tokio::time::timeout(self.timeout, connect)
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        info!("Connected, sending {} bytes", data.len());

        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        stream.flush().await?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        let connect = TcpStream::connect(self.addr.as_str());

        match tokio::time::timeout(check_timeout, connect).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// Printer selected at runtime from configuration
#[derive(Debug, Clone)]
pub enum DevicePrinter {
    File(FilePrinter),
    Network(NetworkPrinter),
}

impl Printer for DevicePrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        match self {
            DevicePrinter::File(p) => p.print(data).await,
            DevicePrinter::Network(p) => p.print(data).await,
        }
    }

    async fn is_online(&self) -> bool {
        match self {
            DevicePrinter::File(p) => p.is_online().await,
            DevicePrinter::Network(p) => p.is_online().await,
        }
    }
}

impl fmt::Display for DevicePrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePrinter::File(p) => write!(f, "file:{}", p.path().display()),
            DevicePrinter::Network(p) => write!(f, "tcp:{}", p.addr()),
        }
    }
}
