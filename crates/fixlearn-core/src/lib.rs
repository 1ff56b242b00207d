//! Core types and trait definitions for the Fix&Learn service.
//!
//! This crate is free of HTTP and database dependencies. The model provider
//! and the message store are expressed as traits ([`model::ModelClient`],
//! [`store::SessionStore`]) so the request pipeline can run against
//! deterministic fakes.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod fix;
pub mod message;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod store;

pub use error::{Error, ParseError, Result};
