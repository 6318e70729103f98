//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path and query values arrive as strings; these helpers turn them into
//! domain types and report failures as `invalid_request` errors whose
//! details name the offending field.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, ProposalStatus, Slug};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidStatus,
    InvalidSlug,
    InvalidField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidSlug => "invalid_slug",
            ErrorCode::InvalidField => "invalid_field",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Report a domain validation failure against a request body field.
pub(crate) fn invalid_field_error(field: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": ErrorCode::InvalidField.as_str(),
    }))
}

/// Parse one of the UUID identifier newtypes.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| {
        invalid(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<ProposalStatus, Error> {
    value.parse().map_err(|_| {
        let allowed: Vec<&str> = ProposalStatus::ALL.iter().map(|s| s.as_str()).collect();
        invalid(
            field,
            ErrorCode::InvalidStatus,
            format!("{} must be one of: {}", field.as_str(), allowed.join(", ")),
            value,
        )
    })
}

pub(crate) fn parse_optional_status(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<ProposalStatus>, Error> {
    value.map(|raw| parse_status(raw, field)).transpose()
}

pub(crate) fn parse_slug(value: &str, field: FieldName) -> Result<Slug, Error> {
    Slug::new(value).map_err(|err| {
        invalid(
            field,
            ErrorCode::InvalidSlug,
            format!("{}: {err}", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_optional_slug(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<Slug>, Error> {
    value.map(|raw| parse_slug(raw, field)).transpose()
}
