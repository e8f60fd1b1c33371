//! Cryptographic utilities for signing bank requests
//!
//! Every request body is signed with the terminal's RSA key (PKCS#1 v1.5,
//! SHA-256) and the base64 signature is sent in the `Authorization` header.
//! The signature covers the exact bytes placed in the request body.
//!
//! # Examples
//!
//! ```no_run
//! use alfabank_sbp::crypto::RequestSigner;
//!
//! # fn example() -> alfabank_sbp::Result<()> {
//! let signer = RequestSigner::from_file("/etc/sbp/signing.key")?;
//! let header = signer.sign(br#"{"command":"GetQRCstatus"}"#);
//! println!("Authorization: {}", header);
//! # Ok(())
//! # }
//! ```

pub mod signature;

#[cfg(test)]
mod tests;

pub use signature::RequestSigner;

#[cfg(test)]
pub(crate) mod test_keys {
    use super::RequestSigner;

    pub const PKCS8_PEM: &str = include_str!("../../tests/fixtures/test_signing_key.pem");
    pub const PKCS1_PEM: &str = include_str!("../../tests/fixtures/test_signing_key_pkcs1.pem");
    pub const CLIENT_CERT_PEM: &str = include_str!("../../tests/fixtures/test_client_cert.pem");

    pub fn signer() -> RequestSigner {
        RequestSigner::from_pem(PKCS8_PEM.as_bytes()).unwrap()
    }
}
