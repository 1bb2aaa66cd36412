// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MelographError>;

#[derive(Debug, Error)]
pub enum MelographError {
    /// Network, connection, or timeout failure below the envelope layer.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not a well-formed response envelope.
    #[error("invalid response from the Melograph API: {0}")]
    InvalidResponse(String),

    /// The envelope carried an error status. Holds the numeric code and the
    /// raw response body it arrived in.
    #[error("Melograph API error code {code}: {raw}")]
    Api { code: i64, raw: String },

    /// A required argument was missing or empty; raised by resource
    /// wrappers before any request is made.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// The upload file could not be opened or sized.
    #[error("failed to read upload file {path}: {source}")]
    Upload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
