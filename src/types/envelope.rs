//! Command envelope: the JSON object sent for every API call

use super::constants::fields;
use crate::Result;
use serde_json::{Map, Value};
use std::fmt;

/// Commands understood by the bank API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Generate a dynamic QR code
    GetQrCode,
    /// Query QR payment status
    GetQrStatus,
    /// Check whether a payment can be refunded
    GetReversalData,
    /// Refund a payment
    Reversal,
    /// Query refund status
    GetReversalStatus,
    /// List refunds of a payment
    GetReversalHistory,
}

impl Command {
    /// Wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::GetQrCode => "GetQRCd",
            Command::GetQrStatus => "GetQRCstatus",
            Command::GetReversalData => "GetQRCreversalData",
            Command::Reversal => "QRCreversal",
            Command::GetReversalStatus => "GetQRCreversalStatus",
            Command::GetReversalHistory => "GetQRCreversalHistory",
        }
    }

    /// Path suffix appended to the base URL. Every command uses the base URL.
    pub fn path(&self) -> &'static str {
        ""
    }

    /// All commands
    pub fn all() -> [Command; 6] {
        [
            Command::GetQrCode,
            Command::GetQrStatus,
            Command::GetReversalData,
            Command::Reversal,
            Command::GetReversalStatus,
            Command::GetReversalHistory,
        ]
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API call: `command`, `TermNo` and the operation's optional fields.
///
/// Fields keep insertion order. Unset optional values are never inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEnvelope {
    command: Command,
    fields: Map<String, Value>,
}

impl CommandEnvelope {
    /// Start an envelope for `command` on terminal `term_no`
    pub fn new(command: Command, term_no: &str) -> Self {
        let mut map = Map::new();
        map.insert(fields::COMMAND.to_string(), command.as_str().into());
        map.insert(fields::TERM_NO.to_string(), term_no.into());
        Self {
            command,
            fields: map,
        }
    }

    /// Insert a string field if it is set
    pub fn field<S: AsRef<str>>(mut self, name: &str, value: Option<S>) -> Self {
        if let Some(value) = value {
            self.fields
                .insert(name.to_string(), Value::String(value.as_ref().to_string()));
        }
        self
    }

    /// Insert a numeric field as its decimal string if it is set
    pub fn number_field(self, name: &str, value: Option<u64>) -> Self {
        self.field(name, value.map(|v| v.to_string()))
    }

    /// Insert a boolean field as `"true"`/`"false"` if it is set
    pub fn bool_field(self, name: &str, value: Option<bool>) -> Self {
        self.field(name, value.map(|v| v.to_string()))
    }

    /// Insert a nested object if it has at least one field
    pub fn nested(mut self, name: &str, nested: Map<String, Value>) -> Self {
        if !nested.is_empty() {
            self.fields.insert(name.to_string(), Value::Object(nested));
        }
        self
    }

    /// Command carried by this envelope
    pub fn command(&self) -> Command {
        self.command
    }

    /// Look up a top-level field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All fields, in wire order
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Compact UTF-8 JSON. Non-ASCII characters are written as-is.
    ///
    /// These exact bytes are both signed and sent.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.fields)?)
    }
}

/// Builder for nested `queryData` objects
#[derive(Debug, Default)]
pub(crate) struct NestedFields(Map<String, Value>);

impl NestedFields {
    pub(crate) fn field<S: AsRef<str>>(mut self, name: &str, value: Option<S>) -> Self {
        if let Some(value) = value {
            self.0
                .insert(name.to_string(), Value::String(value.as_ref().to_string()));
        }
        self
    }

    pub(crate) fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
