//! # Sensory Scribe Common Library
//!
//! Shared code for the Sensory Scribe service and its command-line client:
//! - Sense taxonomy and per-sense score/phrase maps
//! - Analysis, rewrite and research request/response types
//! - Configuration loading and root folder resolution
//! - Client storage port and the draft/usage-quota store
//! - Plain text and Markdown report export

pub mod client_store;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod senses;
pub mod storage;

pub use client_store::{ClientStore, Draft, NewDraft};
pub use error::{Error, Result};
pub use senses::{Sense, SenseMap, SenseScores};
pub use storage::{FileStorage, MemoryStorage, StoragePort, UnavailableStorage};
