//! PostgREST backend for the Fix&Learn message log.
//!
//! Targets a `messages` table exposed through PostgREST, such as a Supabase
//! project's `/rest/v1` endpoint. The expected table definition lives in
//! `sql/messages.sql`.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::PostgrestStore;

#[cfg(test)]
mod tests;
