//! HTTP adapter.

pub mod document;
