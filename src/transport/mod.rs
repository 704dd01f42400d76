//! Transport adapter: turns a composed request into one backend call.
//!
//! This module provides:
//! * [`ChatTransport`]: async trait over the three backend calls.
//! * [`HttpTransport`]: the `reqwest` implementation.
//! * [`ChatRequest`] / [`Endpoint`]: request shape and endpoint selection.
//! * [`answer_with_fallback`]: chat replies that degrade to an apology.
//! * [`TransportError`]: error variants for backend calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use panya_chat::config::AppConfig;
//! use panya_chat::transport::{answer_with_fallback, ChatRequest, HttpTransport};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let transport = HttpTransport::from_config(&config.server);
//!
//!     let request = ChatRequest::chat("What is PLCnext?", None);
//!     println!("{}", answer_with_fallback(&transport, &request).await);
//! }
//! ```

pub mod client;
pub mod fallback;
pub mod request;

#[cfg(test)]
pub mod testing;

pub use client::{ChatTransport, HttpTransport, TransportError};
pub use fallback::{
    answer_with_fallback, fallback_message, CONNECTION_FALLBACK, IMAGE_FALLBACK,
    TRANSCRIPTION_FALLBACK,
};
pub use request::{ChatRequest, Endpoint};
