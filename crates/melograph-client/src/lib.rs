// SPDX-License-Identifier: GPL-3.0-or-later

//! Client for the Melograph music-intelligence API.
//!
//! This crate provides the request/response core shared by every resource
//! wrapper: endpoint path resolution, GET/POST transport with credential
//! and format injection, envelope classification with automatic replay of
//! rate-limited requests, and normalization of track audio summaries.

pub mod audio;
pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod error;

pub use audio::cleaned_audio_summary;
pub use client::{Client, ClientBuilder};
pub use endpoint::endpoint;
pub use envelope::{Outcome, Payload};
pub use error::{MelographError, Result};
