use lazy_static::lazy_static;
use regex::Regex;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};
use tracing::info;

use super::{
    dto::{AmountInput, CreateTransactionRequest},
    repo::TransactionStore,
    repo_types::{NewTransaction, Transaction, STATUS_MAX_LEN},
};
use crate::error::AppError;

/// Plain digits, or 3-digit groups split by one consistent separator
/// (`1.000.000`, `1,000`, `1_000`, `1 000`).
fn is_whole_amount(raw: &str) -> bool {
    lazy_static! {
        static ref AMOUNT_RE: Regex = Regex::new(
            r"^-?(?:\d+|\d{1,3}(?:\.\d{3})+|\d{1,3}(?:,\d{3})+|\d{1,3}(?:_\d{3})+|\d{1,3}(?: \d{3})+)$"
        )
        .unwrap();
    }
    AMOUNT_RE.is_match(raw)
}

/// Parses a nominal amount. Separators are dropped only when they split
/// the number into thousands; decimal-looking input is rejected.
pub fn parse_amount(input: Option<&AmountInput>) -> Result<i64, AppError> {
    let required = || AppError::validation("Amount is required");
    match input {
        None => Err(required()),
        Some(AmountInput::Number(n)) => Ok(*n),
        Some(AmountInput::Text(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(required());
            }
            if !is_whole_amount(raw) {
                return Err(AppError::validation("Amount must be a whole number"));
            }
            raw.chars()
                .filter(|c| c.is_ascii_digit() || *c == '-')
                .collect::<String>()
                .parse::<i64>()
                .map_err(|_| AppError::validation("Amount is out of range"))
        }
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
/// Missing or blank input falls back to `now`.
pub fn parse_date(raw: Option<&str>, now: OffsetDateTime) -> Result<OffsetDateTime, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(now);
    };
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(dt);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| AppError::validation("Date must be YYYY-MM-DD or an RFC 3339 timestamp"))
}

pub fn validate(req: &CreateTransactionRequest, now: OffsetDateTime) -> Result<NewTransaction, AppError> {
    let amount = parse_amount(req.amount.as_ref())?;
    let date = parse_date(req.date.as_deref(), now)?;
    let status = req
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("Status is required"))?
        .to_string();
    if status.chars().count() > STATUS_MAX_LEN {
        return Err(AppError::validation(format!(
            "Status must be at most {} characters",
            STATUS_MAX_LEN
        )));
    }
    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok(NewTransaction {
        amount,
        date,
        status,
        description,
    })
}

pub async fn create_transaction(
    transactions: &dyn TransactionStore,
    owner_id: i64,
    req: &CreateTransactionRequest,
) -> Result<Transaction, AppError> {
    let new = validate(req, OffsetDateTime::now_utc())?;
    let tx = transactions.create(owner_id, new).await?;
    info!(user_id = owner_id, transaction_id = tx.id, amount = tx.amount, "transaction created");
    Ok(tx)
}
