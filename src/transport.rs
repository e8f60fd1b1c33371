//! HTTP transport
//!
//! The client hands every signed request to a [`Transport`]. [`HttpTransport`]
//! is the production implementation on top of `reqwest` with mutual TLS;
//! tests substitute their own.

use crate::types::{ClientConfig, TlsConfig};
use crate::{Result, SbpError};
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use reqwest::{Certificate, Client, Identity};
use std::path::Path;

/// A fully prepared POST
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub headers: HeaderMap,
    /// Exact bytes that were signed
    pub body: Vec<u8>,
}

/// Raw HTTP response
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text, lossy
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one POST and returns the raw response.
///
/// Implementations report connection failures as errors and leave HTTP
/// status handling to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// `reqwest` transport with optional mutual TLS
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the transport described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut client_builder = Client::builder().use_rustls_tls();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(tls) = &config.tls {
            let identity = load_identity(tls)?;
            client_builder = client_builder.identity(identity);

            if let Some(ca_path) = &tls.ca_path {
                let bundle = read_pem(ca_path)?;
                let certificates = Certificate::from_pem_bundle(&bundle)
                    .map_err(|e| SbpError::config(format!("Invalid CA bundle: {e}")))?;
                for certificate in certificates {
                    client_builder = client_builder.add_root_certificate(certificate);
                }
            }
        }

        if config.accept_invalid_certs {
            tracing::warn!(
                "Server certificate verification is disabled for {}",
                config.base_url
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| SbpError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| SbpError::config(format!("Failed to read {}: {e}", path.display())))
}

fn load_identity(tls: &TlsConfig) -> Result<Identity> {
    let mut pem = read_pem(&tls.client_cert_path)?;
    pem.push(b'\n');
    pem.extend(read_pem(&tls.client_key_path)?);

    Identity::from_pem(&pem)
        .map_err(|e| SbpError::config(format!("Invalid client certificate or key: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_keys::{CLIENT_CERT_PEM, PKCS8_PEM};
    use mockito::Server;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pem_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config(url: &str) -> ClientConfig {
        ClientConfig::new(url, "TR0000000000000001", "sbp-test", "unused.key")
    }

    #[test]
    fn test_build_with_mutual_tls() {
        let cert = pem_file(CLIENT_CERT_PEM);
        let key = pem_file(PKCS8_PEM);
        let ca = pem_file(CLIENT_CERT_PEM);

        let config = config("https://sbp.example.com")
            .with_tls(TlsConfig::new(cert.path(), key.path()).with_ca(ca.path()));
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[test]
    fn test_missing_tls_material_is_config_error() {
        let config = config("https://sbp.example.com")
            .with_tls(TlsConfig::new("/nonexistent/client.crt", "/nonexistent/client.key"));
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, SbpError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/client.crt"));
    }

    #[tokio::test]
    async fn test_post_returns_status_and_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_header("key-name", "sbp-test")
            .match_body("{\"command\":\"GetQRCstatus\"}")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let transport = HttpTransport::new(&config(&server.url())).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("key-name", "sbp-test".parse().unwrap());

        let response = transport
            .post(TransportRequest {
                url: format!("{}/", server.url()),
                headers,
                body: b"{\"command\":\"GetQRCstatus\"}".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.text(), "maintenance");
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let transport = HttpTransport::new(&config("http://127.0.0.1:1")).unwrap();
        let err = transport
            .post(TransportRequest {
                url: "http://127.0.0.1:1/".to_string(),
                headers: HeaderMap::new(),
                body: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SbpError::Transport(_)));
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted responses and records every request it receives
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<TransportResponse>>>,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond_json(self, status: StatusCode, body: serde_json::Value) -> Self {
            self.respond(Ok(TransportResponse::new(status, body.to_string())))
        }

        pub fn respond(self, response: Result<TransportResponse>) -> Self {
            self.responses.lock().unwrap().push_back(response);
            self
        }

        pub fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SbpError::config("no scripted response left")))
        }
    }
}
