// SPDX-License-Identifier: GPL-3.0-or-later

//! Response envelope parsing and classification.
//!
//! Every Melograph response wraps its payload in an envelope:
//! `{ "response": { "status": { "code": <int>, "message": <str> }, ... } }`.
//! The service reports both transient and permanent failures through the
//! envelope's status code, not the HTTP status line, so classification must
//! parse the body. The code is the only signal consulted; payload shape
//! never influences the branch taken.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{MelographError, Result};

/// The `response` member of an envelope, returned verbatim to callers on
/// success (status sub-object included).
pub type Payload = Map<String, Value>;

/// Status code reported for a successful call.
pub const STATUS_SUCCESS: i64 = 0;
/// Status code reported when the API key is over its rate limit.
pub const STATUS_RATE_LIMITED: i64 = 3;

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Payload,
}

#[derive(Debug, Deserialize)]
struct EnvelopeStatus {
    code: i64,
}

/// Per-attempt classification of a response body.
#[derive(Debug)]
pub enum Outcome {
    /// Code 0: the whole `response` mapping, verbatim.
    Success(Payload),
    /// Code 3: the identical request must be replayed after a pause.
    RateLimited,
    /// Any other code: carries the code and the raw body. Never retried.
    Fatal { code: i64, raw: String },
}

/// Parses a response body and classifies it by `response.status.code`.
///
/// A body that is not valid JSON, or that lacks the envelope members, is an
/// [`MelographError::InvalidResponse`]; only a well-formed envelope can
/// trigger the rate-limit replay.
pub fn classify(body: &str) -> Result<Outcome> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| MelographError::InvalidResponse(format!("failed to parse envelope: {}", e)))?;

    let status = envelope
        .response
        .get("status")
        .cloned()
        .ok_or_else(|| MelographError::InvalidResponse("envelope has no status member".into()))?;
    let status: EnvelopeStatus = serde_json::from_value(status)
        .map_err(|e| MelographError::InvalidResponse(format!("malformed status member: {}", e)))?;

    match status.code {
        STATUS_SUCCESS => Ok(Outcome::Success(envelope.response)),
        STATUS_RATE_LIMITED => Ok(Outcome::RateLimited),
        code => Ok(Outcome::Fatal {
            code,
            raw: body.to_string(),
        }),
    }
}
