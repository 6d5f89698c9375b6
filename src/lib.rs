//! MaxDoc - Versioned Document Management Service
//!
//! This crate manages documents grouped into acronym families, each carrying
//! a lifecycle phase (DRAFT -> ACTIVE -> OBSOLETE) and a version number that
//! is unique within its family.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
