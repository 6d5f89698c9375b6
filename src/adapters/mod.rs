//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - sqlx-backed store and reader
//! - `memory` - in-memory store and reader for tests and development
//! - `http` - axum routes, DTOs, and error mapping

pub mod http;
pub mod memory;
pub mod postgres;
