// SPDX-License-Identifier: GPL-3.0-or-later

//! Audio summary normalization.

use serde_json::{Map, Value};

/// Normalizes a track's audio summary mapping.
///
/// Some tracks come back with no `speechiness` value at all, presumably
/// because the track contains no speech. Downstream arithmetic expects the
/// field, so an absent (or null) value becomes 0. Everything else passes
/// through untouched, and an absent summary stays absent.
pub fn cleaned_audio_summary(summary: Option<Map<String, Value>>) -> Option<Map<String, Value>> {
    let mut summary = summary?;
    match summary.get("speechiness") {
        Some(value) if !value.is_null() => {}
        _ => {
            summary.insert("speechiness".to_string(), Value::from(0));
        }
    }
    Some(summary)
}
