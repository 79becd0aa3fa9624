//! BLAKE2 hash functions.
//!
//! Fixed-parameter digests ([`Blake2b512`], [`Blake2s256`], [`Blake2bp512`],
//! [`Blake2sp256`]) implement [`traits::Digest`]; the runtime-configurable
//! [`Blake2`] engine adds algorithm selection by name, keying, variable
//! digest length, and finalize-once semantics.

pub mod blake2b;
pub mod blake2bp;
pub mod blake2s;
pub mod blake2sp;
#[cfg(feature = "alloc")]
mod encode;
mod engine;

pub use blake2b::Blake2b512;
pub use blake2bp::Blake2bp512;
pub use blake2s::Blake2s256;
pub use blake2sp::Blake2sp256;
#[cfg(feature = "alloc")]
pub use encode::Encoding;
pub use engine::{Algorithm, Blake2, Output};
