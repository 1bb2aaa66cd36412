//! Artist entity.

use serde::Deserialize;

/// An artist as it appears inside listing payloads: a `{name, id}` pair.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Artist {
    pub id: String,
    pub name: String,
}
