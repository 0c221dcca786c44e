use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;
use hookprint_printer::CodePage;

use super::error::{Result, ServerError};

const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_WEBHOOK_PATH: &str = "/";
const DEFAULT_PRINTER_DEVICE: &str = "/dev/usb/lp0";
const DEFAULT_PRINTER_TIMEOUT_MS: u64 = 5000;
/// 80mm paper, font A
const DEFAULT_PAPER_WIDTH: usize = 48;
const DEFAULT_LOGO_MAX_WIDTH: u32 = 384;
const DEFAULT_QR_MODULE_SIZE: u8 = 6;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30000;
/// Reserved for the health route
const HEALTH_PATH: &str = "/health";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_HOST | 0.0.0.0 | Bind address |
/// | HTTP_PORT | 8080 | Bind port |
/// | WEBHOOK_PATH | / | Route that accepts webhooks |
/// | PRINTER_DEVICE | /dev/usb/lp0 | Printer device file |
/// | PRINTER_ADDR | - | `host:port` of a network printer, overrides PRINTER_DEVICE |
/// | PRINTER_TIMEOUT_MS | 5000 | Network printer connect timeout |
/// | PAPER_WIDTH | 48 | Characters per line (32 for 58mm paper) |
/// | CODE_PAGE | wpc1252 | `wpc1252` or `gbk` |
/// | LOGO_PATH | - | Logo printed at the top of every receipt |
/// | LOGO_MAX_WIDTH | 384 | Logo width limit in dots |
/// | PRINT_QR_CODE | false | Print a QR code linking to the event |
/// | QR_MODULE_SIZE | 6 | QR module size in dots (1-16) |
/// | TIMEZONE | UTC | IANA time zone for printed timestamps |
/// | MAX_BODY_BYTES | 1048576 | Request body limit |
/// | REQUEST_TIMEOUT_MS | 30000 | Request timeout |
/// | LOG_LEVEL | info | Log filter, `RUST_LOG` takes precedence |
/// | LOG_JSON | false | JSON log output |
/// | LOG_DIR | - | Directory for daily rotated log files |
///
/// Invalid numbers fall back to their defaults. An unknown code page or
/// time zone is rejected.
#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub webhook_path: String,
    pub printer_device: PathBuf,
    pub printer_addr: Option<String>,
    pub printer_timeout_ms: u64,
    pub paper_width: usize,
    pub code_page: CodePage,
    pub logo_path: Option<PathBuf>,
    pub logo_max_width: u32,
    pub print_qr_code: bool,
    pub qr_module_size: u8,
    pub timezone: Tz,
    pub max_body_bytes: usize,
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        let var = |key: &str| vars.get(key);

        let code_page = match var("CODE_PAGE") {
            Some(v) => v
                .parse::<CodePage>()
                .map_err(|e| ServerError::Config(e.to_string()))?,
            None => CodePage::default(),
        };

        let timezone = match var("TIMEZONE") {
            Some(v) => v
                .trim()
                .parse::<Tz>()
                .map_err(|_| ServerError::Config(format!("Unknown time zone: {}", v)))?,
            None => Tz::UTC,
        };

        let mut webhook_path = var("WEBHOOK_PATH").unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.into());
        if !webhook_path.starts_with('/') {
            webhook_path.insert(0, '/');
        }
        if webhook_path == HEALTH_PATH {
            return Err(ServerError::Config(format!(
                "WEBHOOK_PATH cannot be {}",
                HEALTH_PATH
            )));
        }

        Ok(Self {
            http_host: var("HTTP_HOST").unwrap_or_else(|| DEFAULT_HTTP_HOST.into()),
            http_port: vars.parse("HTTP_PORT").unwrap_or(DEFAULT_HTTP_PORT),
            webhook_path,
            printer_device: var("PRINTER_DEVICE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PRINTER_DEVICE)),
            printer_addr: var("PRINTER_ADDR"),
            printer_timeout_ms: vars
                .parse("PRINTER_TIMEOUT_MS")
                .unwrap_or(DEFAULT_PRINTER_TIMEOUT_MS),
            paper_width: vars
                .parse("PAPER_WIDTH")
                .filter(|w: &usize| *w > 0)
                .unwrap_or(DEFAULT_PAPER_WIDTH),
            code_page,
            logo_path: var("LOGO_PATH").map(PathBuf::from),
            logo_max_width: vars
                .parse("LOGO_MAX_WIDTH")
                .unwrap_or(DEFAULT_LOGO_MAX_WIDTH),
            print_qr_code: vars.parse("PRINT_QR_CODE").unwrap_or(false),
            qr_module_size: vars
                .parse("QR_MODULE_SIZE")
                .unwrap_or(DEFAULT_QR_MODULE_SIZE),
            timezone,
            max_body_bytes: vars
                .parse("MAX_BODY_BYTES")
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            request_timeout_ms: vars
                .parse("REQUEST_TIMEOUT_MS")
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: vars.parse("LOG_JSON").unwrap_or(false),
            log_dir: var("LOG_DIR"),
        })
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Environment lookup that ignores blank values
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }
}
