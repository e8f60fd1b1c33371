//! SBP command-line client
//!
//! Reads its configuration from `SBP_*` environment variables and runs one
//! bank command per invocation, printing the JSON response.

use alfabank_sbp::types::{
    ClientConfig, QrCodeRequest, QrStatusQuery, ReversalDataQuery, ReversalRequest,
    ReversalStatusQuery,
};
use alfabank_sbp::{PollPolicy, Result, SbpClient, SbpError};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: sbp <command> [args]

Commands:
   qr <amount-kopecks> [purpose]          Generate a dynamic QR code
   status <qrcId>                         Query QR payment status
   poll <qrcId> [attempts] [interval-s]   Poll until ACWP/RJCT
   refund-check <payrrn> [amount]         Check refund eligibility
   refund <payrrn> <amount> <messageID>   Refund a payment
   refund-status <payrrn> <messageID>     Query refund status
   history <payrrn>                       List refunds of a payment

Environment variables:
   SBP_BASE_URL, SBP_TERM_NO, SBP_CERT_ALIAS, SBP_SIGNING_KEY (required)
   SBP_TLS_CERT, SBP_TLS_KEY, SBP_TLS_CA, SBP_ACCEPT_INVALID_CERTS, SBP_TIMEOUT_SECS
   RUST_LOG - log filter (default: info)";

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    let client = SbpClient::new(ClientConfig::from_env()?)?;
    let output = run(&client, command, &args[1..]).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

async fn run(client: &SbpClient, command: &str, args: &[String]) -> Result<serde_json::Value> {
    let result = match command {
        "qr" => {
            let mut request = QrCodeRequest::new(parse_number(arg(args, 0, "amount")?)?);
            if let Some(purpose) = args.get(1) {
                request = request.with_payment_purpose(purpose.as_str());
            }
            client.get_qr_code(&request).await?
        }
        "status" => {
            let query = QrStatusQuery::by_qrc_id(arg(args, 0, "qrcId")?);
            client.get_qr_status(&query).await?
        }
        "poll" => {
            let query = QrStatusQuery::by_qrc_id(arg(args, 0, "qrcId")?);
            let mut policy = PollPolicy::default();
            if let Some(attempts) = args.get(1) {
                policy.max_attempts = parse_number(attempts)?;
            }
            if let Some(interval) = args.get(2) {
                policy.interval = Duration::from_secs(parse_number(interval)?);
            }
            match client.poll_qr_status(&query, policy).await? {
                Some(result) => result,
                None => {
                    tracing::warn!("No final status after {} attempts", policy.max_attempts);
                    return Ok(serde_json::Value::Null);
                }
            }
        }
        "refund-check" => {
            let mut query = ReversalDataQuery::new().with_payrrn(arg(args, 0, "payrrn")?);
            if let Some(amount) = args.get(1) {
                query = query.with_amount(parse_number(amount)?);
            }
            client.get_reversal_data(&query).await?
        }
        "refund" => {
            let query = ReversalDataQuery::new()
                .with_payrrn(arg(args, 0, "payrrn")?)
                .with_amount(parse_number(arg(args, 1, "amount")?)?)
                .with_message_id(arg(args, 2, "messageID")?);
            client.perform_reversal(&ReversalRequest::new(query)).await?
        }
        "refund-status" => {
            let query = ReversalStatusQuery::new()
                .with_payrrn(arg(args, 0, "payrrn")?)
                .with_message_id(arg(args, 1, "messageID")?);
            client.get_reversal_status(&query).await?
        }
        "history" => client.get_reversal_history(arg(args, 0, "payrrn")?).await?,
        other => {
            return Err(SbpError::validation(format!(
                "Unknown command '{other}'\n\n{USAGE}"
            )))
        }
    };

    Ok(serde_json::to_value(result)?)
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| SbpError::validation(format!("Missing argument <{name}>\n\n{USAGE}")))
}

fn parse_number<T: FromStr>(value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SbpError::validation(format!("Not a number: {value}")))
}
