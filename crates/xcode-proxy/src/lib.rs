//! Xcode Proxy - local OpenAI-compatible proxy for Xcode's AI assistant.
//!
//! Xcode talks to a single OpenAI-style endpoint. This crate routes each chat
//! request to one of several configured upstream providers by model id,
//! falling back to the default model when the requested id is unknown, and
//! relays either the upstream JSON or its raw SSE byte stream back.
//!
//! Design goals:
//! - Settings are resolved once at startup and never mutated.
//! - Streams are relayed chunk-for-chunk without re-framing.
//! - Upstream failures keep their status code on the non-streaming path.

pub mod cli;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod server;

pub use cli::Cli;
pub use error::ProxyError;
pub use server::{configure, serve, AppState};
