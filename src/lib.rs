//! # Alfa-Bank SBP client
//!
//! A typed client for the Alfa-Bank API of the Russian Faster Payments System
//! (SBP): dynamic QR codes, payment status and refunds.
//!
//! ## Features
//!
//! - **Dynamic QR codes**: `GetQRCd` with every optional field the bank accepts
//! - **Status polling**: bounded polling that respects the bank's 10-second rate limit
//! - **Refunds**: eligibility check, refund, refund status and refund history
//! - **Signed requests**: RSA PKCS#1 v1.5 / SHA-256 over the exact transmitted bytes
//! - **Mutual TLS**: client certificate and CA bundle via `reqwest` + rustls
//! - **Local validation**: missing identifiers are rejected before any network call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alfabank_sbp::types::{ClientConfig, QrCodeRequest, TlsConfig};
//! use alfabank_sbp::SbpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new(
//!         "https://sbp.example.com/fsCryptoProxy",
//!         "TR0000000000000001",
//!         "merchant-sign",
//!         "/etc/sbp/signing.key",
//!     )
//!     .with_tls(TlsConfig::new("/etc/sbp/client.crt", "/etc/sbp/client.key"));
//!
//!     let client = SbpClient::new(config)?;
//!     let qr = client.get_qr_code(&QrCodeRequest::new(10000)).await?;
//!     println!("Pay here: {:?}", qr.get_str("payload"));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`types`**: Configuration, command envelope, request parameters and responses
//! - **`crypto`**: Request signing
//! - **`transport`**: HTTP transport abstraction and the `reqwest` implementation
//! - **`client`**: One method per bank command
//! - **`poller`**: Bounded status polling
//! - **`error`**: Error handling
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber; that is
//! left to the application.

pub mod client;
pub mod crypto;
pub mod error;
pub mod poller;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::SbpClient;
pub use crypto::RequestSigner;
pub use error::{Result, SbpError};
pub use poller::{PollPolicy, Sleeper, StatusPoller, TokioSleeper, MIN_POLL_INTERVAL};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
