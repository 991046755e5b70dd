//! Request extractors.
//!
//! [`CalculationPayload`] performs the structural checks (body present, valid
//! JSON, JSON object) and the per-field checks before any business rule runs.
//! Field violations are collected and reported together, keyed by field name.

use std::collections::BTreeMap;

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::warn;
use tripcover_core::pricing::CalculationRequest;
use tripcover_shared::AppError;

use crate::error::ApiError;

/// Wire name of the insured amount.
pub const INSURANCE_AMOUNT: &str = "insuranceAmount";
/// Accepted alternative wire name of the insured amount.
pub const INSURED_AMOUNT_ALIAS: &str = "insuredAmount";
/// Wire name of the trip start date.
pub const START_DATE: &str = "startDate";
/// Wire name of the trip end date.
pub const END_DATE: &str = "endDate";
/// Wire name of the currency code.
pub const CURRENCY_CODE: &str = "currencyCode";

const KNOWN_FIELDS: [&str; 5] = [
    INSURANCE_AMOUNT,
    INSURED_AMOUNT_ALIAS,
    START_DATE,
    END_DATE,
    CURRENCY_CODE,
];

const MISSING: &str = "This field is missing.";
const BLANK: &str = "This value should not be blank.";
const NOT_AN_INT: &str = "This value should be of type int.";
const NOT_A_STRING: &str = "This value should be of type string.";
const INVALID_DATE: &str = "This value is not a valid date.";
const WRONG_CODE_LENGTH: &str = "This value should have exactly 3 characters.";
const UNEXPECTED: &str = "This field was not expected.";

/// Why a calculation payload was rejected before reaching the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadRejection {
    /// The request body is empty.
    #[error("Empty request body")]
    EmptyBody,

    /// The request body is not valid JSON.
    #[error("Invalid JSON")]
    InvalidJson,

    /// The request body is JSON but not an object.
    #[error("JSON must be an object")]
    NotAnObject,

    /// The request body could not be read.
    #[error("Invalid request body")]
    Unreadable,

    /// One or more fields failed validation (field name to message).
    #[error("Field validation failed")]
    InvalidFields(BTreeMap<String, String>),
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidFields(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            malformed => ApiError(AppError::Validation(malformed.to_string())).into_response(),
        }
    }
}

/// A calculation request that passed structural and field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationPayload {
    /// Insured amount as sent by the client.
    pub insurance_amount: i64,
    /// Trip start date.
    pub start_date: NaiveDate,
    /// Trip end date.
    pub end_date: NaiveDate,
    /// Three character currency code, case as sent.
    pub currency_code: String,
}

impl CalculationPayload {
    /// Parses and validates a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, PayloadRejection> {
        if body.is_empty() {
            return Err(PayloadRejection::EmptyBody);
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|_| PayloadRejection::InvalidJson)?;

        let Value::Object(object) = value else {
            return Err(PayloadRejection::NotAnObject);
        };

        Self::from_object(&object)
    }

    /// Converts into the engine request; the currency code is upper-cased.
    #[must_use]
    pub fn into_request(self) -> CalculationRequest {
        CalculationRequest::new(
            self.insurance_amount,
            self.start_date,
            self.end_date,
            &self.currency_code,
        )
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, PayloadRejection> {
        let mut violations = BTreeMap::new();

        for key in object.keys() {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                violations.insert(key.clone(), UNEXPECTED.to_string());
            }
        }

        let amount_value = object
            .get(INSURANCE_AMOUNT)
            .or_else(|| object.get(INSURED_AMOUNT_ALIAS));

        let insurance_amount =
            check_field(&mut violations, INSURANCE_AMOUNT, amount_value, parse_amount);
        let start_date = check_field(&mut violations, START_DATE, object.get(START_DATE), parse_date);
        let end_date = check_field(&mut violations, END_DATE, object.get(END_DATE), parse_date);
        let currency_code = check_field(
            &mut violations,
            CURRENCY_CODE,
            object.get(CURRENCY_CODE),
            parse_currency_code,
        );

        match (insurance_amount, start_date, end_date, currency_code) {
            (Some(insurance_amount), Some(start_date), Some(end_date), Some(currency_code))
                if violations.is_empty() =>
            {
                Ok(Self {
                    insurance_amount,
                    start_date,
                    end_date,
                    currency_code,
                })
            }
            _ => Err(PayloadRejection::InvalidFields(violations)),
        }
    }
}

impl<S> FromRequest<S> for CalculationPayload
where
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            warn!(error = %rejection, "Failed to read request body");
            PayloadRejection::Unreadable
        })?;

        Self::from_slice(&body).inspect_err(|rejection| {
            warn!(error = %rejection, "Calculation payload rejected");
        })
    }
}

/// Runs the presence checks shared by all fields, then the field's own parser.
fn check_field<T>(
    violations: &mut BTreeMap<String, String>,
    name: &str,
    value: Option<&Value>,
    parse: fn(&Value) -> Result<T, &'static str>,
) -> Option<T> {
    let outcome = match value {
        None => Err(MISSING),
        Some(Value::Null) => Err(BLANK),
        Some(Value::String(s)) if s.is_empty() => Err(BLANK),
        Some(value) => parse(value),
    };

    match outcome {
        Ok(parsed) => Some(parsed),
        Err(message) => {
            violations.insert(name.to_string(), message.to_string());
            None
        }
    }
}

fn parse_amount(value: &Value) -> Result<i64, &'static str> {
    value.as_i64().ok_or(NOT_AN_INT)
}

fn parse_date(value: &Value) -> Result<NaiveDate, &'static str> {
    value
        .as_str()
        .ok_or(INVALID_DATE)
        .and_then(parse_iso_date)
}

/// Accepts exactly `YYYY-MM-DD` naming a real calendar day.
fn parse_iso_date(s: &str) -> Result<NaiveDate, &'static str> {
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| {
            if i == 4 || i == 7 {
                *b == b'-'
            } else {
                b.is_ascii_digit()
            }
        });

    if !well_formed {
        return Err(INVALID_DATE);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| INVALID_DATE)
}

fn parse_currency_code(value: &Value) -> Result<String, &'static str> {
    let code = value.as_str().ok_or(NOT_A_STRING)?;
    if code.chars().count() == 3 {
        Ok(code.to_string())
    } else {
        Err(WRONG_CODE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn violations(body: &str) -> BTreeMap<String, String> {
        match CalculationPayload::from_slice(body.as_bytes()) {
            Err(PayloadRejection::InvalidFields(errors)) => errors,
            other => panic!("expected field violations, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_payload() {
        let payload = CalculationPayload::from_slice(
            br#"{"insuranceAmount":30000,"startDate":"2025-10-01","endDate":"2025-10-03","currencyCode":"eur"}"#,
        )
        .unwrap();

        assert_eq!(payload.insurance_amount, 30_000);
        assert_eq!(payload.currency_code, "eur");

        let request = payload.into_request();
        assert_eq!(request.currency_code, "EUR");
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2025, 10, 3).unwrap());
    }

    #[test]
    fn test_alias_for_insured_amount() {
        let payload = CalculationPayload::from_slice(
            br#"{"insuredAmount":50000,"startDate":"2025-10-01","endDate":"2025-10-02","currencyCode":"USD"}"#,
        )
        .unwrap();

        assert_eq!(payload.insurance_amount, 50_000);
    }

    #[rstest]
    #[case("", PayloadRejection::EmptyBody)]
    #[case("invalid json", PayloadRejection::InvalidJson)]
    #[case("   ", PayloadRejection::InvalidJson)]
    #[case("[1, 2]", PayloadRejection::NotAnObject)]
    #[case("\"text\"", PayloadRejection::NotAnObject)]
    #[case("42", PayloadRejection::NotAnObject)]
    fn test_malformed_bodies(#[case] body: &str, #[case] expected: PayloadRejection) {
        assert_eq!(CalculationPayload::from_slice(body.as_bytes()), Err(expected));
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = violations(r#"{"insuranceAmount":30000}"#);

        assert_eq!(errors.len(), 3);
        assert_eq!(errors[START_DATE], MISSING);
        assert_eq!(errors[END_DATE], MISSING);
        assert_eq!(errors[CURRENCY_CODE], MISSING);
    }

    #[test]
    fn test_blank_values() {
        let errors = violations(
            r#"{"insuranceAmount":null,"startDate":"","endDate":"2025-10-03","currencyCode":"EUR"}"#,
        );

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[INSURANCE_AMOUNT], BLANK);
        assert_eq!(errors[START_DATE], BLANK);
    }

    #[rstest]
    #[case(r#""30000""#)]
    #[case("30000.5")]
    #[case("true")]
    #[case("[30000]")]
    fn test_insurance_amount_must_be_int(#[case] amount: &str) {
        let body = format!(
            r#"{{"insuranceAmount":{amount},"startDate":"2025-10-01","endDate":"2025-10-03","currencyCode":"EUR"}}"#
        );
        let errors = violations(&body);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[INSURANCE_AMOUNT], NOT_AN_INT);
    }

    #[rstest]
    #[case(r#""2025-13-01""#)]
    #[case(r#""2025-02-30""#)]
    #[case(r#""2025-1-01""#)]
    #[case(r#""01.10.2025""#)]
    #[case(r#""2025-10-01T00:00:00""#)]
    #[case("20251001")]
    fn test_invalid_dates(#[case] start: &str) {
        let body = format!(
            r#"{{"insuranceAmount":30000,"startDate":{start},"endDate":"2025-10-03","currencyCode":"EUR"}}"#
        );
        let errors = violations(&body);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[START_DATE], INVALID_DATE);
    }

    #[rstest]
    #[case(r#""EURO""#, WRONG_CODE_LENGTH)]
    #[case(r#""EU""#, WRONG_CODE_LENGTH)]
    #[case("978", NOT_A_STRING)]
    fn test_invalid_currency_code(#[case] code: &str, #[case] message: &str) {
        let body = format!(
            r#"{{"insuranceAmount":30000,"startDate":"2025-10-01","endDate":"2025-10-03","currencyCode":{code}}}"#
        );
        let errors = violations(&body);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[CURRENCY_CODE], message);
    }

    #[test]
    fn test_unexpected_field() {
        let errors = violations(
            r#"{"insuranceAmount":30000,"startDate":"2025-10-01","endDate":"2025-10-03","currencyCode":"EUR","promo":"X"}"#,
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["promo"], UNEXPECTED);
    }

    #[test]
    fn test_business_rules_are_not_checked_here() {
        // Unknown tier, unknown currency and reversed dates are left to the engine.
        let payload = CalculationPayload::from_slice(
            br#"{"insuranceAmount":40000,"startDate":"2025-10-03","endDate":"2025-10-01","currencyCode":"GBP"}"#,
        );

        assert!(payload.is_ok());
    }
}
