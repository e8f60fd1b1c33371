//! Per-operation request parameters
//!
//! Each request knows its [`Command`], checks its identifier preconditions
//! locally and maps itself onto a [`CommandEnvelope`]. Unset fields never
//! reach the wire.

use super::constants::{fields, DEFAULT_CURRENCY, DEFAULT_QRC_TYPE, TRX_DT_FORMAT};
use super::envelope::{Command, CommandEnvelope, NestedFields};
use crate::{Result, SbpError};
use chrono::{DateTime, Utc};

/// A request that can be sent through [`crate::SbpClient::execute`]
pub trait SbpRequest {
    /// Command this request maps to
    fn command(&self) -> Command;

    /// Check identifier preconditions. Runs before any network activity.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Build the envelope for terminal `term_no`
    fn to_envelope(&self, term_no: &str) -> CommandEnvelope;
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Generate a fresh `messageID` (GUID)
pub fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Format a payment timestamp for `trxDT`
pub fn format_trx_datetime(at: DateTime<Utc>) -> String {
    at.format(TRX_DT_FORMAT).to_string()
}

/// Parameters of `GetQRCd`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCodeRequest {
    /// Amount in kopecks
    pub amount: u64,
    pub currency: String,
    pub qrc_type: String,
    pub payment_purpose: Option<String>,
    /// Link lifetime in minutes
    pub qr_ttl: Option<u32>,
    pub notification_url: Option<String>,
    pub redirect_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub order_number: Option<String>,
    pub message_id: Option<String>,
    /// Payer name as `Last|First|Middle`
    pub sender_fio: Option<String>,
    /// Payer phone number
    pub sender_id: Option<String>,
    pub sender_bank_bic: Option<String>,
    pub subscription_service_id: Option<String>,
    pub subscription_service_name: Option<String>,
}

impl QrCodeRequest {
    /// Create a request for `amount` kopecks in RUB
    pub fn new(amount: u64) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            qrc_type: DEFAULT_QRC_TYPE.to_string(),
            payment_purpose: None,
            qr_ttl: None,
            notification_url: None,
            redirect_url: None,
            width: None,
            height: None,
            order_number: None,
            message_id: None,
            sender_fio: None,
            sender_id: None,
            sender_bank_bic: None,
            subscription_service_id: None,
            subscription_service_name: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_qrc_type(mut self, qrc_type: impl Into<String>) -> Self {
        self.qrc_type = qrc_type.into();
        self
    }

    pub fn with_payment_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.payment_purpose = Some(purpose.into());
        self
    }

    pub fn with_qr_ttl(mut self, minutes: u32) -> Self {
        self.qr_ttl = Some(minutes);
        self
    }

    pub fn with_notification_url(mut self, url: impl Into<String>) -> Self {
        self.notification_url = Some(url.into());
        self
    }

    pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// Set the QR image size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Set the payer details shown to the bank
    pub fn with_sender(
        mut self,
        fio: Option<String>,
        phone: Option<String>,
        bank_bic: Option<String>,
    ) -> Self {
        self.sender_fio = fio;
        self.sender_id = phone;
        self.sender_bank_bic = bank_bic;
        self
    }

    /// Bind the payment to a subscription. Both values travel together.
    pub fn with_subscription(
        mut self,
        service_id: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        self.subscription_service_id = Some(service_id.into());
        self.subscription_service_name = Some(service_name.into());
        self
    }

    fn has_query_data(&self) -> bool {
        [
            &self.notification_url,
            &self.sender_fio,
            &self.sender_id,
            &self.sender_bank_bic,
        ]
        .into_iter()
        .any(is_set)
    }
}

impl SbpRequest for QrCodeRequest {
    fn command(&self) -> Command {
        Command::GetQrCode
    }

    fn validate(&self) -> Result<()> {
        if is_set(&self.subscription_service_id) != is_set(&self.subscription_service_name) {
            return Err(SbpError::validation(
                "subscriptionServiceId and subscriptionServiceName must be set together",
            ));
        }
        Ok(())
    }

    fn to_envelope(&self, term_no: &str) -> CommandEnvelope {
        let envelope = CommandEnvelope::new(self.command(), term_no)
            .field(fields::QRC_TYPE, Some(&self.qrc_type))
            .number_field(fields::AMOUNT, Some(self.amount))
            .field(fields::CURRENCY, Some(&self.currency))
            .field(fields::PAYMENT_PURPOSE, self.payment_purpose.as_ref())
            .number_field(fields::QR_TTL, self.qr_ttl.map(u64::from))
            .field(fields::REDIRECT_URL, self.redirect_url.as_ref())
            .number_field(fields::WIDTH, self.width.map(u64::from))
            .number_field(fields::HEIGHT, self.height.map(u64::from))
            .field(fields::ORDER_NUMBER, self.order_number.as_ref())
            .field(fields::MESSAGE_ID, self.message_id.as_ref())
            .field(
                fields::SUBSCRIPTION_SERVICE_ID,
                self.subscription_service_id.as_ref(),
            )
            .field(
                fields::SUBSCRIPTION_SERVICE_NAME,
                self.subscription_service_name.as_ref(),
            );

        if !self.has_query_data() {
            return envelope;
        }

        let query_data = NestedFields::default()
            .field(fields::NOTIFICATION_URL, self.notification_url.as_ref())
            .field(fields::SENDER_FIO, self.sender_fio.as_ref())
            .field(fields::SENDER_ID, self.sender_id.as_ref())
            .field(fields::SENDER_BANK_BIC, self.sender_bank_bic.as_ref());
        envelope.nested(fields::QUERY_DATA, query_data.into_map())
    }
}

/// Parameters of `GetQRCstatus`. Needs `qrcId` or `payrrn`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrStatusQuery {
    pub qrc_id: Option<String>,
    pub payrrn: Option<String>,
    pub message_id: Option<String>,
}

impl QrStatusQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_qrc_id(qrc_id: impl Into<String>) -> Self {
        Self::new().with_qrc_id(qrc_id)
    }

    pub fn by_payrrn(payrrn: impl Into<String>) -> Self {
        Self::new().with_payrrn(payrrn)
    }

    pub fn with_qrc_id(mut self, qrc_id: impl Into<String>) -> Self {
        self.qrc_id = Some(qrc_id.into());
        self
    }

    pub fn with_payrrn(mut self, payrrn: impl Into<String>) -> Self {
        self.payrrn = Some(payrrn.into());
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }
}

impl SbpRequest for QrStatusQuery {
    fn command(&self) -> Command {
        Command::GetQrStatus
    }

    fn validate(&self) -> Result<()> {
        if !(is_set(&self.qrc_id) || is_set(&self.payrrn)) {
            return Err(SbpError::validation("qrcId or payrrn is required"));
        }
        Ok(())
    }

    fn to_envelope(&self, term_no: &str) -> CommandEnvelope {
        CommandEnvelope::new(self.command(), term_no)
            .field(fields::QRC_ID, self.qrc_id.as_ref())
            .field(fields::PAYRRN, self.payrrn.as_ref())
            .field(fields::MESSAGE_ID, self.message_id.as_ref())
    }
}

/// Parameters of `GetQRCreversalData`. Needs `qrcId`, `payrrn` or `trxId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReversalDataQuery {
    pub qrc_id: Option<String>,
    pub payrrn: Option<String>,
    /// Payment identifier at the scheme operator
    pub trx_id: Option<String>,
    /// Payment time as YYYYMMDDhhmmss
    pub trx_dt: Option<String>,
    /// Refund amount in kopecks. The bank defaults to the remaining amount.
    pub amount: Option<u64>,
    pub currency: Option<String>,
    pub message_id: Option<String>,
    pub return_rest_amount: Option<bool>,
}

impl ReversalDataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_qrc_id(mut self, qrc_id: impl Into<String>) -> Self {
        self.qrc_id = Some(qrc_id.into());
        self
    }

    pub fn with_payrrn(mut self, payrrn: impl Into<String>) -> Self {
        self.payrrn = Some(payrrn.into());
        self
    }

    pub fn with_trx_id(mut self, trx_id: impl Into<String>) -> Self {
        self.trx_id = Some(trx_id.into());
        self
    }

    pub fn with_trx_dt(mut self, trx_dt: impl Into<String>) -> Self {
        self.trx_dt = Some(trx_dt.into());
        self
    }

    /// Set `trxDT` from a timestamp
    pub fn with_trx_time(self, at: DateTime<Utc>) -> Self {
        self.with_trx_dt(format_trx_datetime(at))
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_return_rest_amount(mut self, value: bool) -> Self {
        self.return_rest_amount = Some(value);
        self
    }

    fn check_identifiers(&self) -> Result<()> {
        if !(is_set(&self.qrc_id) || is_set(&self.payrrn) || is_set(&self.trx_id)) {
            return Err(SbpError::validation("qrcId, payrrn or trxId is required"));
        }
        Ok(())
    }

    fn envelope(&self, command: Command, term_no: &str) -> CommandEnvelope {
        CommandEnvelope::new(command, term_no)
            .field(fields::QRC_ID, self.qrc_id.as_ref())
            .field(fields::PAYRRN, self.payrrn.as_ref())
            .field(fields::TRX_ID, self.trx_id.as_ref())
            .field(fields::TRX_DT, self.trx_dt.as_ref())
            .number_field(fields::AMOUNT, self.amount)
            .field(fields::CURRENCY, self.currency.as_ref())
            .field(fields::MESSAGE_ID, self.message_id.as_ref())
            .bool_field(fields::RETURN_REST_AMOUNT, self.return_rest_amount)
    }
}

impl SbpRequest for ReversalDataQuery {
    fn command(&self) -> Command {
        Command::GetReversalData
    }

    fn validate(&self) -> Result<()> {
        self.check_identifiers()
    }

    fn to_envelope(&self, term_no: &str) -> CommandEnvelope {
        self.envelope(self.command(), term_no)
    }
}

/// Parameters of `QRCreversal`: the eligibility query plus a notification URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReversalRequest {
    pub query: ReversalDataQuery,
    pub notification_url: Option<String>,
}

impl ReversalRequest {
    pub fn new(query: ReversalDataQuery) -> Self {
        Self {
            query,
            notification_url: None,
        }
    }

    pub fn with_notification_url(mut self, url: impl Into<String>) -> Self {
        self.notification_url = Some(url.into());
        self
    }
}

impl From<ReversalDataQuery> for ReversalRequest {
    fn from(query: ReversalDataQuery) -> Self {
        Self::new(query)
    }
}

impl SbpRequest for ReversalRequest {
    fn command(&self) -> Command {
        Command::Reversal
    }

    fn validate(&self) -> Result<()> {
        self.query.check_identifiers()
    }

    fn to_envelope(&self, term_no: &str) -> CommandEnvelope {
        let query_data =
            NestedFields::default().field(fields::NOTIFICATION_URL, self.notification_url.as_ref());
        self.query
            .envelope(self.command(), term_no)
            .nested(fields::QUERY_DATA, query_data.into_map())
    }
}

/// Parameters of `GetQRCreversalStatus`.
///
/// Needs (`payrrn` or `originalTrxId`) and (`trxId` or `messageID`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReversalStatusQuery {
    pub payrrn: Option<String>,
    pub original_trx_id: Option<String>,
    /// Refund identifier
    pub trx_id: Option<String>,
    pub message_id: Option<String>,
}

impl ReversalStatusQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payrrn(mut self, payrrn: impl Into<String>) -> Self {
        self.payrrn = Some(payrrn.into());
        self
    }

    pub fn with_original_trx_id(mut self, trx_id: impl Into<String>) -> Self {
        self.original_trx_id = Some(trx_id.into());
        self
    }

    pub fn with_trx_id(mut self, trx_id: impl Into<String>) -> Self {
        self.trx_id = Some(trx_id.into());
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }
}

impl SbpRequest for ReversalStatusQuery {
    fn command(&self) -> Command {
        Command::GetReversalStatus
    }

    fn validate(&self) -> Result<()> {
        if !(is_set(&self.payrrn) || is_set(&self.original_trx_id)) {
            return Err(SbpError::validation("payrrn or originalTrxId is required"));
        }
        if !(is_set(&self.trx_id) || is_set(&self.message_id)) {
            return Err(SbpError::validation("trxId or messageID is required"));
        }
        Ok(())
    }

    fn to_envelope(&self, term_no: &str) -> CommandEnvelope {
        CommandEnvelope::new(self.command(), term_no)
            .field(fields::PAYRRN, self.payrrn.as_ref())
            .field(fields::ORIGINAL_TRX_ID, self.original_trx_id.as_ref())
            .field(fields::TRX_ID, self.trx_id.as_ref())
            .field(fields::MESSAGE_ID, self.message_id.as_ref())
    }
}

/// Parameters of `GetQRCreversalHistory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalHistoryQuery {
    pub payrrn: String,
}

impl ReversalHistoryQuery {
    pub fn new(payrrn: impl Into<String>) -> Self {
        Self {
            payrrn: payrrn.into(),
        }
    }
}

impl SbpRequest for ReversalHistoryQuery {
    fn command(&self) -> Command {
        Command::GetReversalHistory
    }

    fn validate(&self) -> Result<()> {
        if self.payrrn.is_empty() {
            return Err(SbpError::validation("payrrn is required"));
        }
        Ok(())
    }

    fn to_envelope(&self, term_no: &str) -> CommandEnvelope {
        CommandEnvelope::new(self.command(), term_no).field(fields::PAYRRN, Some(&self.payrrn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    const TERM: &str = "TR0000000000000001";

    fn wire(request: &impl SbpRequest) -> Value {
        serde_json::from_slice(&request.to_envelope(TERM).to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_qr_code_minimal_envelope() {
        let value = wire(&QrCodeRequest::new(10000));
        assert_eq!(
            value,
            json!({
                "command": "GetQRCd",
                "TermNo": TERM,
                "qrcType": "02",
                "amount": "10000",
                "currency": "RUB",
            })
        );
        assert!(value.get("queryData").is_none());
    }

    #[test]
    fn test_qr_code_notification_url_goes_to_query_data() {
        let value = wire(&QrCodeRequest::new(10000).with_notification_url("https://x"));
        assert_eq!(value["queryData"], json!({ "notificationUrl": "https://x" }));
        assert!(value.get("notificationUrl").is_none());
    }

    #[test]
    fn test_qr_code_sender_fields() {
        let request = QrCodeRequest::new(500)
            .with_sender(
                Some("Иванов|Иван|Иванович".to_string()),
                Some("0079123456789".to_string()),
                None,
            )
            .with_size(300, 300)
            .with_qr_ttl(60);
        let value = wire(&request);
        assert_eq!(
            value["queryData"],
            json!({ "SenderFIO": "Иванов|Иван|Иванович", "SenderID": "0079123456789" })
        );
        assert_eq!(value["width"], "300");
        assert_eq!(value["height"], "300");
        assert_eq!(value["qrTtl"], "60");
    }

    #[test]
    fn test_qr_code_subscription_pair() {
        let mut request = QrCodeRequest::new(100).with_subscription("sub-1", "Coffee");
        assert!(request.validate().is_ok());
        request.subscription_service_name = None;
        assert!(request.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_qr_status_requires_identifier() {
        let err = QrStatusQuery::new().validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("qrcId or payrrn"));

        let empty = QrStatusQuery::new().with_qrc_id("");
        assert!(empty.validate().is_err());

        assert!(QrStatusQuery::by_payrrn("123456789012").validate().is_ok());
    }

    #[test]
    fn test_reversal_data_identifiers() {
        assert!(ReversalDataQuery::new().with_amount(100).validate().is_err());
        assert!(ReversalDataQuery::new().with_trx_id("T1").validate().is_ok());

        let value = wire(
            &ReversalDataQuery::new()
                .with_payrrn("123456789012")
                .with_amount(2500)
                .with_return_rest_amount(true),
        );
        assert_eq!(
            value,
            json!({
                "command": "GetQRCreversalData",
                "TermNo": TERM,
                "payrrn": "123456789012",
                "amount": "2500",
                "ReturnRestAmount": "true",
            })
        );
    }

    #[test]
    fn test_reversal_request_nests_notification_url() {
        let request = ReversalRequest::new(ReversalDataQuery::new().with_qrc_id("Q1"))
            .with_notification_url("https://shop.example/refunds");
        let value = wire(&request);
        assert_eq!(value["command"], "QRCreversal");
        assert_eq!(
            value["queryData"]["notificationUrl"],
            "https://shop.example/refunds"
        );

        let bare: ReversalRequest = ReversalDataQuery::new().with_qrc_id("Q1").into();
        assert!(wire(&bare).get("queryData").is_none());
        assert!(ReversalRequest::default().validate().is_err());
    }

    #[test]
    fn test_reversal_status_needs_both_pairs() {
        let only_first = ReversalStatusQuery::new().with_payrrn("123456789012");
        assert!(only_first
            .validate()
            .unwrap_err()
            .to_string()
            .contains("trxId or messageID"));

        let only_second = ReversalStatusQuery::new().with_message_id("m-1");
        assert!(only_second
            .validate()
            .unwrap_err()
            .to_string()
            .contains("payrrn or originalTrxId"));

        let complete = ReversalStatusQuery::new()
            .with_original_trx_id("A1")
            .with_trx_id("R1");
        assert!(complete.validate().is_ok());
    }

    #[test]
    fn test_reversal_history() {
        assert!(ReversalHistoryQuery::new("").validate().is_err());
        let value = wire(&ReversalHistoryQuery::new("123456789012"));
        assert_eq!(value["command"], "GetQRCreversalHistory");
        assert_eq!(value["payrrn"], "123456789012");
    }

    #[test]
    fn test_helpers() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(format_trx_datetime(at), "20250307140509");
        assert_eq!(
            ReversalDataQuery::new().with_trx_time(at).trx_dt.as_deref(),
            Some("20250307140509")
        );

        let id = new_message_id();
        assert_eq!(id.len(), 36);
        assert_ne!(id, new_message_id());
    }
}
