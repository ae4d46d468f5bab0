//! Vetrina Core - Shared types library.
//!
//! This crate provides common types used across the Vetrina components:
//! - `storefront` - Client-side storefront state and catalog access
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
