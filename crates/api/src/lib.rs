//! StudyHub backend client.
//!
//! Thin REST client for authentication, quizzes, notes and resources, plus
//! client-side filtering of fetched collections.

#![warn(missing_docs)]

pub mod client;
pub mod filter;

pub use client::{StudyHubClient, ApiError, Result, error_message, FALLBACK_MESSAGE};
pub use filter::NoteFilter;
