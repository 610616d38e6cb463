//! vkgraph-api: HTTP gateway for the VK social graph API.
//!
//! One POST per method call, form-encoded body carrying the access token
//! and API version, JSON response envelope (`response` on success, `error`
//! on failure). Envelope validation and typed decoding live in
//! [`decode`] as pure functions so they stay testable without a network.

pub mod client;
pub mod decode;

pub use client::{ApiConfig, ApiError, VkClient, API_VERSION};
