//! Route handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/fix-and-learn` | Bearer auth; body [`fixlearn_core::fix::FixRequest`] |
//! | `GET`  | `/api/sessions/{session_id}/messages` | Bearer auth; optional `?limit=` |
//! | `GET`  | `/health` | No auth |

pub mod fix;
pub mod health;
pub mod sessions;
