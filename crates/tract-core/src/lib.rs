//! Core types, validation and trait definitions for the Tract project store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod area;
pub mod date;
pub mod error;
pub mod geometry;
pub mod project;
pub mod store;
pub mod validate;

pub use error::{Error, GeometryError, IntegrityViolation, Result, ValidationError};
