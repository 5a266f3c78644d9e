//! Client for the remote AI medication analysis service.
//!
//! The service returns a free-text safety narrative for a pet's regimen. When
//! it fails or times out, callers get a fixed fallback payload flagged as
//! degraded instead of an error.

pub mod analysis;
pub mod prompts;

#[cfg(feature = "http")]
pub mod client;

pub use analysis::*;
#[cfg(feature = "http")]
pub use client::*;
pub use prompts::*;
