//! scribe-cli library - command-line client for the Sensory Scribe service
//!
//! HTTP client for the service endpoints plus terminal rendering of
//! results. Drafts and the usage quota are kept locally through
//! `scribe_common::ClientStore`.

pub mod client;
pub mod report;

pub use client::{ClientError, ScribeClient};
