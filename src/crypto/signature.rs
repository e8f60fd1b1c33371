//! Request signing

use crate::{Result, SbpError};
use base64::{engine::general_purpose, Engine as _};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt;
use std::path::Path;

/// Signs request bodies with RSA PKCS#1 v1.5 over SHA-256.
///
/// The key is parsed once at construction and never re-read.
#[derive(Clone)]
pub struct RequestSigner {
    signing_key: SigningKey<Sha256>,
    public_key: RsaPublicKey,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl RequestSigner {
    /// Load an unencrypted RSA private key from PEM (PKCS#8 or PKCS#1)
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = std::str::from_utf8(pem)
            .map_err(|_| SbpError::key("Signing key is not valid UTF-8 PEM"))?;

        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| SbpError::key(format!("Unsupported or malformed RSA private key: {e}")))?;

        Ok(Self::from_private_key(private_key))
    }

    /// Load the signing key from a PEM file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|e| {
            SbpError::key(format!(
                "Failed to read signing key {}: {e}",
                path.display()
            ))
        })?;
        Self::from_pem(&pem)
    }

    /// Wrap an already parsed key
    pub fn from_private_key(private_key: RsaPrivateKey) -> Self {
        let public_key = private_key.to_public_key();
        Self {
            signing_key: SigningKey::<Sha256>::new(private_key),
            public_key,
        }
    }

    /// Sign `data` and return the base64 (standard alphabet) signature
    pub fn sign(&self, data: &[u8]) -> String {
        let signature = self.signing_key.sign(data);
        general_purpose::STANDARD.encode(signature.to_bytes())
    }

    /// Key for verifying signatures produced by this signer
    pub fn verifying_key(&self) -> VerifyingKey<Sha256> {
        VerifyingKey::<Sha256>::new(self.public_key.clone())
    }

    /// Check a base64 signature over `data`
    pub fn verify(&self, data: &[u8], signature: &str) -> Result<bool> {
        let raw = general_purpose::STANDARD
            .decode(signature)
            .map_err(|_| SbpError::validation("Signature is not valid base64"))?;
        let signature = Signature::try_from(raw.as_slice())
            .map_err(|_| SbpError::validation("Invalid signature length"))?;
        Ok(self.verifying_key().verify(data, &signature).is_ok())
    }
}
