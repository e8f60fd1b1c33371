//! Parsed API responses

use super::constants::{fields, statuses};
use crate::error::UNKNOWN_ERROR_MESSAGE;
use crate::{Result, SbpError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Successful response body: the JSON object returned by the bank
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApiResult(Map<String, Value>);

impl ApiResult {
    /// Parse a response body.
    ///
    /// Fails with [`SbpError::Api`] unless `ErrorCode` is the number zero.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_slice(body)?;
        Self::from_map(map)
    }

    /// Check the error code of an already parsed body
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        let result = Self(map);
        if result.is_success() {
            return Ok(result);
        }
        Err(SbpError::api(
            result.error_code().cloned(),
            result.message().unwrap_or(UNKNOWN_ERROR_MESSAGE),
        ))
    }

    /// Raw `ErrorCode` value
    pub fn error_code(&self) -> Option<&Value> {
        self.0.get(fields::ERROR_CODE)
    }

    /// `ErrorCode` is the JSON number `0`; the string `"0"` is a failure
    pub fn is_success(&self) -> bool {
        self.error_code().and_then(Value::as_i64) == Some(0)
    }

    /// Human-readable message, if any
    pub fn message(&self) -> Option<&str> {
        self.get_str(fields::MESSAGE)
    }

    /// Raw `status` field
    pub fn status_code(&self) -> Option<&str> {
        self.get_str(fields::STATUS)
    }

    /// Payment status, if the response carries one
    pub fn status(&self) -> Option<QrStatus> {
        self.status_code().map(QrStatus::from_code)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// QR payment status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrStatus {
    /// `ACWP`: paid
    Accepted,
    /// `RJCT`: rejected
    Rejected,
    /// Any other code; the payment may still change state
    Pending(String),
}

impl QrStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            statuses::ACCEPTED => QrStatus::Accepted,
            statuses::REJECTED => QrStatus::Rejected,
            other => QrStatus::Pending(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            QrStatus::Accepted => statuses::ACCEPTED,
            QrStatus::Rejected => statuses::REJECTED,
            QrStatus::Pending(code) => code,
        }
    }

    /// No further state change follows a terminal status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, QrStatus::Pending(_))
    }
}

impl fmt::Display for QrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
