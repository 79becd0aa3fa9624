//! Core traits and error types for the BLAKE2 workspace.
//!
//! This crate provides the foundational vocabulary the implementation crates
//! conform to. It is `no_std` compatible and has zero dependencies.
//!
//! # Contents
//!
//! - [`Digest`] - Streaming hash computation: update, non-consuming finalize,
//!   reset, and one-shot helpers.
//! - [`Error`] - The error taxonomy for engine construction and misuse.
//! - [`io`] - std-gated reader/writer adapters that hash bytes as they pass
//!   through.
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to ensure
//! all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod digest;
pub mod error;
#[cfg(feature = "std")]
pub mod io;

pub use digest::Digest;
pub use error::Error;
