//! Core types for the SBP client
//!
//! # Architecture
//!
//! The types module is organized as follows:
//! - [`config`] - Client and mutual TLS configuration
//! - [`envelope`] - Command names and the signed JSON envelope
//! - [`requests`] - Per-operation parameters and their local validation
//! - [`response`] - Parsed responses and payment status
//! - [`constants`] - Wire field names, defaults and status codes
//!
//! # Examples
//!
//! ```
//! use alfabank_sbp::types::{QrCodeRequest, SbpRequest};
//!
//! let request = QrCodeRequest::new(10000)
//!     .with_payment_purpose("Order 42")
//!     .with_notification_url("https://shop.example/sbp/notify");
//!
//! let envelope = request.to_envelope("TR0000000000000001");
//! assert_eq!(envelope.command().as_str(), "GetQRCd");
//! ```

pub mod config;
pub mod constants;
pub mod envelope;
pub mod requests;
pub mod response;

pub use config::{ClientConfig, TlsConfig, DEFAULT_TIMEOUT};
pub use constants::{fields, statuses, DEFAULT_CURRENCY, DEFAULT_QRC_TYPE};
pub use envelope::{Command, CommandEnvelope};
pub use requests::{
    format_trx_datetime, new_message_id, QrCodeRequest, QrStatusQuery, ReversalDataQuery,
    ReversalHistoryQuery, ReversalRequest, ReversalStatusQuery, SbpRequest,
};
pub use response::{ApiResult, QrStatus};
