//! Request parameter defaults and permissive extraction
//!
//! All optional numeric parameters resolve through [`Param`], so the defaults
//! live in one table instead of being scattered across handlers.

use std::collections::HashMap;

use crate::error::ApiError;

/// Optional numeric parameters accepted by the REST surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    MinConfirmations,
    MaxConfirmations,
    Verbosity,
    Count,
    Skip,
    NBlocks,
}

impl Param {
    #[cfg(test)]
    pub const ALL: [Param; 6] = [
        Param::MinConfirmations,
        Param::MaxConfirmations,
        Param::Verbosity,
        Param::Count,
        Param::Skip,
        Param::NBlocks,
    ];

    /// Name as it appears in the query string and in echoed response fields
    pub const fn name(self) -> &'static str {
        match self {
            Param::MinConfirmations => "minConfirmations",
            Param::MaxConfirmations => "maxConfirmations",
            Param::Verbosity => "verbosity",
            Param::Count => "count",
            Param::Skip => "skip",
            Param::NBlocks => "nblocks",
        }
    }

    pub const fn default_value(self) -> i64 {
        match self {
            Param::MinConfirmations => 1,
            Param::MaxConfirmations => 9_999_999,
            Param::Verbosity => 1,
            Param::Count => 10,
            Param::Skip => 0,
            Param::NBlocks => 6,
        }
    }
}

/// Parse an integer query parameter; absent or malformed values use the default.
pub fn int_or_default(query: &HashMap<String, String>, param: Param) -> i64 {
    query
        .get(param.name())
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(param.default_value())
}

/// `true` or `1` (any case) enable the flag; anything else, including absence, disables it.
pub fn bool_flag(query: &HashMap<String, String>, name: &str) -> bool {
    query
        .get(name)
        .map(|raw| {
            let raw = raw.trim();
            raw.eq_ignore_ascii_case("true") || raw == "1"
        })
        .unwrap_or(false)
}

/// Reject absent or blank required fields before any RPC call is made.
pub fn required_str<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("{} is required", field))),
    }
}
