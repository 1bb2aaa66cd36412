//! Resource wrappers over the Melograph API client.
//!
//! Each wrapper owns one API entity, validates its required arguments
//! before any request is made, and reshapes envelope payloads into
//! entity-oriented results.

pub mod artist;
pub mod genre;
pub mod track;

pub use artist::Artist;
pub use genre::Genre;
pub use track::{Track, TrackProfile, TrackUpload};
