//! # Order Export
//!
//! The two ways a finalized order leaves the counter.
//!
//! ```text
//! FinalizedOrder
//!      │
//!      ├── OrderFormatter::message_text ──► ChatExporter::chat_link
//!      │                                    https://wa.me/<phone>?text=<msg>
//!      │
//!      └── OrderFormatter::receipt_lines ─► ReceiptPrinter::print
//!                                           spool file, or the terminal
//! ```

use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use url::form_urlencoded::byte_serialize;
use url::Url;

use crate::error::{AppError, AppResult};

const CHAT_BASE: &str = "https://wa.me/";

// =============================================================================
// Chat Exporter
// =============================================================================

/// Builds chat deep links.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatExporter;

impl ChatExporter {
    /// Link that opens a chat with `phone` and `message` pre-filled.
    ///
    /// The message is percent-encoded with spaces as `%20`.
    ///
    /// ## Example
    /// ```rust
    /// use slice_counter_lib::export::ChatExporter;
    ///
    /// let link = ChatExporter::chat_link("5491155550000", "2x Napolitana").unwrap();
    /// assert_eq!(link.as_str(), "https://wa.me/5491155550000?text=2x%20Napolitana");
    /// ```
    pub fn chat_link(phone: &str, message: &str) -> AppResult<Url> {
        let mut url = Url::parse(CHAT_BASE)
            .and_then(|base| base.join(phone))
            .map_err(|e| AppError::validation(format!("Invalid chat phone '{}': {}", phone, e)))?;

        let encoded: String = byte_serialize(message.as_bytes()).collect();
        // form encoding writes spaces as '+' and a literal '+' as %2B
        url.set_query(Some(&format!("text={}", encoded.replace('+', "%20"))));
        Ok(url)
    }
}

// =============================================================================
// Receipt Printer
// =============================================================================

/// Where receipts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintTarget {
    Terminal,
    Spool(PathBuf),
}

/// Sends receipt lines to the configured printer.
#[derive(Debug, Clone)]
pub struct ReceiptPrinter {
    target: PrintTarget,
}

impl ReceiptPrinter {
    pub fn new(spool_path: Option<PathBuf>) -> Self {
        let target = match spool_path {
            Some(path) => PrintTarget::Spool(path),
            None => PrintTarget::Terminal,
        };
        ReceiptPrinter { target }
    }

    pub fn target(&self) -> &PrintTarget {
        &self.target
    }

    /// Prints `lines`. Each print replaces the spool file.
    pub fn print<W: Write>(&self, lines: &[String], terminal: &mut W) -> AppResult<()> {
        match &self.target {
            PrintTarget::Terminal => {
                for line in lines {
                    writeln!(terminal, "{}", line)?;
                }
            }
            PrintTarget::Spool(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let mut contents = lines.join("\n");
                contents.push('\n');
                std::fs::write(path, contents)?;
                info!(path = %path.display(), lines = lines.len(), "Receipt spooled");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_link_encoding() {
        let link = ChatExporter::chat_link("5490000000000", "🍕 *Total: $9900*\n1+1").unwrap();
        let text = link.as_str();

        assert!(text.starts_with("https://wa.me/5490000000000?text="));
        assert!(text.contains("%20"));
        assert!(text.contains("%0A"));
        assert!(text.contains("1%2B1"));
        assert!(!text.contains(' '));
    }

    #[test]
    fn test_terminal_printer() {
        let printer = ReceiptPrinter::new(None);
        let mut out = Vec::new();
        printer
            .print(&["TICKET".to_string(), "TOTAL: $10".to_string()], &mut out)
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "TICKET\nTOTAL: $10\n");
    }

    #[test]
    fn test_spool_printer_replaces_file() {
        let dir = std::env::temp_dir().join(format!("slice-spool-{}", std::process::id()));
        let path = dir.join("ticket.txt");
        let printer = ReceiptPrinter::new(Some(path.clone()));
        let mut out = Vec::new();

        printer.print(&["first".to_string()], &mut out).unwrap();
        printer.print(&["second".to_string()], &mut out).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
        assert!(out.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
