//! Incremental BLAKE2 hashing: BLAKE2b, BLAKE2s, BLAKE2bp, and BLAKE2sp.
//!
//! This crate is `no_std` compatible; the `alloc` feature gates the textual
//! digest encodings and `std` gates nothing further on its own. Runtime
//! dependencies are limited to the encoding crates the `alloc` surface uses.
//!
//! # Quick Start
//!
//! ```
//! use hashes::Digest as _;
//! use hashes::crypto::{Algorithm, Blake2, Blake2b512};
//!
//! // Fixed-parameter one-shot.
//! let digest = Blake2b512::digest(b"hello world");
//! assert_eq!(digest.len(), 64);
//!
//! // Configurable engine: keyed, 16-byte output, incremental updates.
//! let mut hasher = Blake2::keyed_with_digest_len(Algorithm::Blake2bp, b"secret", 16)?;
//! hasher.update(b"hello ")?;
//! hasher.update(b"world")?;
//! let out = hasher.digest()?;
//! assert_eq!(out.len(), 16);
//! # Ok::<(), hashes::Error>(())
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | I/O adapters on the `traits` crate |
//! | `alloc` | Yes (via `std`) | Textual digest encodings (hex, base64, binary) |
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod crypto;

pub use traits::{Digest, Error};

pub use crypto::{Algorithm, Blake2, Output};
