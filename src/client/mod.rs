//! SBP API client
//!
//! [`SbpClient`] exposes one method per bank command. Each call validates
//! its identifiers locally, builds a [`CommandEnvelope`], signs the exact
//! serialized bytes and POSTs them to the bank.
//!
//! # Examples
//!
//! ```no_run
//! use alfabank_sbp::types::{ClientConfig, QrCodeRequest, QrStatusQuery, TlsConfig};
//! use alfabank_sbp::{PollPolicy, SbpClient};
//!
//! # async fn example() -> alfabank_sbp::Result<()> {
//! let config = ClientConfig::new(
//!     "https://sbp.example.com/fsCryptoProxy",
//!     "TR0000000000000001",
//!     "merchant-sign",
//!     "/etc/sbp/signing.key",
//! )
//! .with_tls(TlsConfig::new("/etc/sbp/client.crt", "/etc/sbp/client.key").with_ca("/etc/sbp/ca.pem"));
//!
//! let client = SbpClient::new(config)?;
//!
//! let qr = client
//!     .get_qr_code(&QrCodeRequest::new(10000).with_payment_purpose("Order 42"))
//!     .await?;
//!
//! if let Some(qrc_id) = qr.get_str("qrcId") {
//!     let status = client
//!         .poll_qr_status(&QrStatusQuery::by_qrc_id(qrc_id), PollPolicy::default())
//!         .await?;
//!     println!("Final status: {:?}", status.and_then(|s| s.status()));
//! }
//! # Ok(())
//! # }
//! ```

use crate::crypto::RequestSigner;
use crate::poller::{PollPolicy, StatusPoller};
use crate::transport::{HttpTransport, Transport, TransportRequest};
use crate::types::constants::headers;
use crate::types::{
    ApiResult, ClientConfig, CommandEnvelope, QrCodeRequest, QrStatusQuery, ReversalDataQuery,
    ReversalHistoryQuery, ReversalRequest, ReversalStatusQuery, SbpRequest,
};
use crate::{Result, SbpError};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use std::sync::Arc;


/// Client for the bank's SBP QR-code API
#[derive(Clone)]
pub struct SbpClient {
    config: ClientConfig,
    signer: RequestSigner,
    transport: Arc<dyn Transport>,
    key_name: HeaderValue,
}

impl std::fmt::Debug for SbpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SbpClient")
            .field("base_url", &self.config.base_url)
            .field("term_no", &self.config.term_no)
            .field("cert_alias", &self.config.cert_alias)
            .field("transport", &"<transport>")
            .finish()
    }
}

impl SbpClient {
    /// Create a client: loads the signing key and builds the mTLS transport.
    ///
    /// A bad key fails here, never on a later request.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let signer = RequestSigner::from_file(&config.signing_key_path)?;
        let transport = HttpTransport::new(&config)?;

        Self::from_parts(config, signer, Arc::new(transport))
    }

    /// Create a client from a loaded signer and any transport
    pub fn from_parts(
        config: ClientConfig,
        signer: RequestSigner,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        config.validate()?;

        let key_name = HeaderValue::from_str(&config.cert_alias)
            .map_err(|_| SbpError::config("Certificate alias is not a valid header value"))?;

        Ok(Self {
            config,
            signer,
            transport,
            key_name,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Sign and send an envelope to `<base_url>/<path>`.
    ///
    /// Non-2xx statuses become [`SbpError::HttpStatus`]; a missing or
    /// non-zero `ErrorCode` becomes [`SbpError::Api`].
    pub async fn send_request(&self, envelope: &CommandEnvelope, path: &str) -> Result<ApiResult> {
        let body = envelope.to_bytes()?;
        let signature = self.signer.sign(&body);
        let url = self.config.endpoint(path);

        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(headers::CONTENT_TYPE_VALUE),
        );
        request_headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&signature)
                .map_err(|_| SbpError::key("Signature is not a valid header value"))?,
        );
        request_headers.insert(headers::KEY_NAME, self.key_name.clone());

        tracing::debug!(
            command = %envelope.command(),
            url = %url,
            body_len = body.len(),
            "Sending SBP request"
        );

        let response = self
            .transport
            .post(TransportRequest {
                url,
                headers: request_headers,
                body,
            })
            .await?;

        if !response.status.is_success() {
            tracing::debug!(
                command = %envelope.command(),
                status = %response.status,
                "SBP request failed"
            );
            return Err(SbpError::HttpStatus {
                status: response.status,
                body: response.text(),
            });
        }

        ApiResult::from_slice(&response.body)
    }

    /// Validate, build and send any request
    pub async fn execute<R: SbpRequest + Sync>(&self, request: &R) -> Result<ApiResult> {
        request.validate()?;
        let envelope = request.to_envelope(&self.config.term_no);
        self.send_request(&envelope, envelope.command().path()).await
    }

    /// Generate a dynamic QR code (`GetQRCd`)
    pub async fn get_qr_code(&self, request: &QrCodeRequest) -> Result<ApiResult> {
        self.execute(request).await
    }

    /// Query QR payment status (`GetQRCstatus`)
    pub async fn get_qr_status(&self, query: &QrStatusQuery) -> Result<ApiResult> {
        self.execute(query).await
    }

    /// Check whether a payment can be refunded (`GetQRCreversalData`)
    pub async fn get_reversal_data(&self, query: &ReversalDataQuery) -> Result<ApiResult> {
        self.execute(query).await
    }

    /// Refund a paid QR code (`QRCreversal`)
    pub async fn perform_reversal(&self, request: &ReversalRequest) -> Result<ApiResult> {
        self.execute(request).await
    }

    /// Query refund status (`GetQRCreversalStatus`)
    pub async fn get_reversal_status(&self, query: &ReversalStatusQuery) -> Result<ApiResult> {
        self.execute(query).await
    }

    /// List refunds of a payment (`GetQRCreversalHistory`)
    pub async fn get_reversal_history(&self, payrrn: &str) -> Result<ApiResult> {
        self.execute(&ReversalHistoryQuery::new(payrrn)).await
    }

    /// Poll `GetQRCstatus` until `ACWP`/`RJCT` or the attempt budget runs out.
    ///
    /// Returns `Ok(None)` when no terminal status was seen.
    pub async fn poll_qr_status(
        &self,
        query: &QrStatusQuery,
        policy: PollPolicy,
    ) -> Result<Option<ApiResult>> {
        StatusPoller::new(policy).poll(self, query).await
    }
}
