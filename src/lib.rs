//! Rust client for the Mandrill transactional email HTTP API.
//!
//! The crate is split into a domain layer (the registry of known calls, API key
//! handling and key resolution), a transport layer for wire-format details, and
//! a small client layer that validates a call, attaches the key and performs a
//! single JSON `POST`.
//!
//! ```rust,no_run
//! use mandrill::MandrillClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mandrill::MandrillError> {
//!     let client = MandrillClient::new();
//!     client.set_api_key("...")?;
//!     let info = client.call(json!({ "type": "users", "call": "info" })).await?;
//!     println!("{info:?}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    API_KEY_ENV, DEFAULT_ENDPOINT, MandrillClient, MandrillClientBuilder, MandrillError,
};
pub use domain::{
    ApiCall, ApiKey, ApiResponse, CallSpec, KeySource, Registry, SenderSummary, UserInfo,
    ValidationError,
};

/// Library version reported by [`MandrillClient::version`].
pub const VERSION: &str = "1.0";
