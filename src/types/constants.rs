//! Wire constants: field names, defaults and status codes

/// JSON field names dictated by the bank API
pub mod fields {
    pub const COMMAND: &str = "command";
    pub const TERM_NO: &str = "TermNo";
    pub const ERROR_CODE: &str = "ErrorCode";
    pub const MESSAGE: &str = "message";
    pub const STATUS: &str = "status";

    pub const QRC_ID: &str = "qrcId";
    pub const PAYRRN: &str = "payrrn";
    pub const TRX_ID: &str = "trxId";
    pub const ORIGINAL_TRX_ID: &str = "originalTrxId";
    pub const TRX_DT: &str = "trxDT";
    pub const MESSAGE_ID: &str = "messageID";

    pub const QRC_TYPE: &str = "qrcType";
    pub const AMOUNT: &str = "amount";
    pub const CURRENCY: &str = "currency";
    pub const PAYMENT_PURPOSE: &str = "paymentPurpose";
    pub const QR_TTL: &str = "qrTtl";
    pub const REDIRECT_URL: &str = "redirectUrl";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const ORDER_NUMBER: &str = "orderNumber";
    pub const SUBSCRIPTION_SERVICE_ID: &str = "subscriptionServiceId";
    pub const SUBSCRIPTION_SERVICE_NAME: &str = "subscriptionServiceName";
    pub const RETURN_REST_AMOUNT: &str = "ReturnRestAmount";

    pub const QUERY_DATA: &str = "queryData";
    pub const NOTIFICATION_URL: &str = "notificationUrl";
    pub const SENDER_FIO: &str = "SenderFIO";
    pub const SENDER_ID: &str = "SenderID";
    pub const SENDER_BANK_BIC: &str = "SenderBankBIC";
}

/// HTTP header names used on every request
pub mod headers {
    pub const CONTENT_TYPE_VALUE: &str = "application/x-www-form-urlencoded";
    pub const KEY_NAME: &str = "key-name";
}

/// QR payment status codes
pub mod statuses {
    /// Payment accepted and completed
    pub const ACCEPTED: &str = "ACWP";
    /// Payment rejected
    pub const REJECTED: &str = "RJCT";

    /// Whether no further state change can follow this status
    pub fn is_terminal(status: &str) -> bool {
        matches!(status, ACCEPTED | REJECTED)
    }
}

/// Default currency for QR codes and reversals
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Default QR-code type ("02" is a dynamic QR code)
pub const DEFAULT_QRC_TYPE: &str = "02";

/// `trxDT` format: YYYYMMDDhhmmss
pub const TRX_DT_FORMAT: &str = "%Y%m%d%H%M%S";
