//! Runtime-configurable BLAKE2 engine.
//!
//! [`Blake2`] selects one of the four variants at construction time and
//! layers the caller-facing contract on top of the inner engines: key and
//! digest-length validation, and strict finalize-once semantics. Once
//! [`digest`](Blake2::digest) succeeds, every further `update` or `digest`
//! fails with [`Error::InvalidState`]; cloning is the supported way to
//! branch a computation that should be finalized more than once.

use core::fmt;
use core::str::FromStr;

use traits::Error;

use super::blake2b::Blake2b;
use super::blake2bp::Blake2bp;
use super::blake2s::Blake2s;
use super::blake2sp::Blake2sp;
use super::{blake2b, blake2bp, blake2s, blake2sp};

/// The BLAKE2 variants, a closed enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
  /// BLAKE2b: 64-bit words, up to 64-byte digests.
  Blake2b,
  /// BLAKE2s: 32-bit words, up to 32-byte digests.
  Blake2s,
  /// BLAKE2bp: 4-way parallel BLAKE2b.
  Blake2bp,
  /// BLAKE2sp: 8-way parallel BLAKE2s.
  Blake2sp,
}

impl Algorithm {
  /// Maximum digest length in bytes, which is also the default.
  #[must_use]
  pub const fn max_digest_len(self) -> usize {
    match self {
      Self::Blake2b | Self::Blake2bp => blake2b::OUT_LEN,
      Self::Blake2s | Self::Blake2sp => blake2s::OUT_LEN,
    }
  }

  /// Maximum key length in bytes.
  #[must_use]
  pub const fn max_key_len(self) -> usize {
    match self {
      Self::Blake2b | Self::Blake2bp => blake2b::KEY_LEN,
      Self::Blake2s | Self::Blake2sp => blake2s::KEY_LEN,
    }
  }

  /// Message block length in bytes.
  #[must_use]
  pub const fn block_len(self) -> usize {
    match self {
      Self::Blake2b | Self::Blake2bp => blake2b::BLOCK_LEN,
      Self::Blake2s | Self::Blake2sp => blake2s::BLOCK_LEN,
    }
  }

  /// Tree fan-out: leaf count for the parallel variants, 1 otherwise.
  #[must_use]
  pub const fn fanout(self) -> usize {
    match self {
      Self::Blake2b | Self::Blake2s => 1,
      Self::Blake2bp => blake2bp::DEGREE,
      Self::Blake2sp => blake2sp::DEGREE,
    }
  }

  /// Canonical lowercase name.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Blake2b => "blake2b",
      Self::Blake2s => "blake2s",
      Self::Blake2bp => "blake2bp",
      Self::Blake2sp => "blake2sp",
    }
  }
}

impl fmt::Display for Algorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Algorithm {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "blake2b" => Ok(Self::Blake2b),
      "blake2s" => Ok(Self::Blake2s),
      "blake2bp" => Ok(Self::Blake2bp),
      "blake2sp" => Ok(Self::Blake2sp),
      _ => Err(Error::UnsupportedAlgorithm),
    }
  }
}

#[derive(Clone)]
enum State {
  Blake2b(Blake2b),
  Blake2s(Blake2s),
  Blake2bp(Blake2bp),
  Blake2sp(Blake2sp),
}

/// A finalized digest: up to 64 bytes plus the actual length.
///
/// Comparison only considers the `len` leading bytes, so truncated digests
/// of different lengths never compare equal to each other's prefixes.
#[derive(Clone, Copy)]
pub struct Output {
  bytes: [u8; 64],
  len: u8,
}

impl Output {
  pub(crate) fn new(raw: &[u8], len: usize) -> Self {
    debug_assert!(len >= 1 && len <= raw.len() && raw.len() <= 64);
    let mut bytes = [0u8; 64];
    if let (Some(dst), Some(src)) = (bytes.get_mut(..len), raw.get(..len)) {
      dst.copy_from_slice(src);
    }
    Self { bytes, len: len as u8 }
  }

  /// The digest bytes, exactly the configured digest length.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    self.bytes.get(..self.len as usize).unwrap_or(&self.bytes)
  }

  /// Digest length in bytes.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.len as usize
  }

  /// A digest is never empty; present for clippy's `len` convention.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    false
  }
}

impl AsRef<[u8]> for Output {
  #[inline]
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl PartialEq for Output {
  fn eq(&self, other: &Self) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<[u8]> for Output {
  fn eq(&self, other: &[u8]) -> bool {
    self.as_bytes() == other
  }
}

impl Eq for Output {}

impl fmt::Debug for Output {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Output(")?;
    for b in self.as_bytes() {
      write!(f, "{b:02x}")?;
    }
    f.write_str(")")
  }
}

/// Incremental BLAKE2 hash engine with runtime algorithm selection.
///
/// # Example
///
/// ```
/// use hashes::crypto::{Algorithm, Blake2};
///
/// let mut hasher = Blake2::with_digest_len(Algorithm::Blake2b, 16)?;
/// hasher.update(b"test")?;
/// let out = hasher.digest()?;
/// assert_eq!(out.len(), 16);
/// # Ok::<(), traits::Error>(())
/// ```
#[derive(Clone)]
pub struct Blake2 {
  state: State,
  algorithm: Algorithm,
  digest_len: usize,
  finalized: bool,
}

impl fmt::Debug for Blake2 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Blake2")
      .field("algorithm", &self.algorithm)
      .field("digest_len", &self.digest_len)
      .field("finalized", &self.finalized)
      .finish()
  }
}

impl Blake2 {
  /// Create an unkeyed engine with the variant's default digest length.
  #[must_use]
  pub fn new(algorithm: Algorithm) -> Self {
    // Default parameters cannot fail validation.
    match Self::build(algorithm, &[], algorithm.max_digest_len()) {
      Ok(engine) => engine,
      Err(_) => unreachable!(),
    }
  }

  /// Create an unkeyed engine producing `digest_len` bytes.
  pub fn with_digest_len(algorithm: Algorithm, digest_len: usize) -> Result<Self, Error> {
    Self::build(algorithm, &[], digest_len)
  }

  /// Create a keyed engine (MAC mode) with the default digest length.
  ///
  /// An empty key is equivalent to no key at all.
  pub fn keyed(algorithm: Algorithm, key: &[u8]) -> Result<Self, Error> {
    Self::build(algorithm, key, algorithm.max_digest_len())
  }

  /// Create a keyed engine producing `digest_len` bytes.
  pub fn keyed_with_digest_len(algorithm: Algorithm, key: &[u8], digest_len: usize) -> Result<Self, Error> {
    Self::build(algorithm, key, digest_len)
  }

  /// Validate everything up front; no engine state exists on failure.
  fn build(algorithm: Algorithm, key: &[u8], digest_len: usize) -> Result<Self, Error> {
    if key.len() > algorithm.max_key_len() {
      return Err(Error::KeyTooLong {
        len: key.len(),
        max: algorithm.max_key_len(),
      });
    }
    if digest_len < 1 || digest_len > algorithm.max_digest_len() {
      return Err(Error::InvalidDigestLength {
        len: digest_len,
        max: algorithm.max_digest_len(),
      });
    }

    let out = digest_len as u8;
    let key_len = key.len() as u8;
    let state = match algorithm {
      Algorithm::Blake2b => State::Blake2b(Blake2b::with_params(&blake2b::Params::sequential(out, key_len), key)),
      Algorithm::Blake2s => State::Blake2s(Blake2s::with_params(&blake2s::Params::sequential(out, key_len), key)),
      Algorithm::Blake2bp => State::Blake2bp(Blake2bp::with_params(out, key)),
      Algorithm::Blake2sp => State::Blake2sp(Blake2sp::with_params(out, key)),
    };
    Ok(Self {
      state,
      algorithm,
      digest_len,
      finalized: false,
    })
  }

  /// The variant selected at construction time.
  #[inline]
  #[must_use]
  pub fn algorithm(&self) -> Algorithm {
    self.algorithm
  }

  /// The digest length this engine produces, in bytes.
  #[inline]
  #[must_use]
  pub fn digest_len(&self) -> usize {
    self.digest_len
  }

  /// Absorb more input.
  ///
  /// Fails with [`Error::InvalidState`] once the engine has been finalized.
  pub fn update(&mut self, data: &[u8]) -> Result<(), Error> {
    if self.finalized {
      return Err(Error::InvalidState);
    }
    match &mut self.state {
      State::Blake2b(h) => h.update(data),
      State::Blake2s(h) => h.update(data),
      State::Blake2bp(h) => h.update(data),
      State::Blake2sp(h) => h.update(data),
    }
    Ok(())
  }

  /// Finalize and return the digest.
  ///
  /// Permitted exactly once: padding and counter state are consumed by
  /// finalization, so a second call fails with [`Error::InvalidState`]
  /// rather than silently repeating.
  pub fn digest(&mut self) -> Result<Output, Error> {
    if self.finalized {
      return Err(Error::InvalidState);
    }
    self.finalized = true;
    let out = match &self.state {
      State::Blake2b(h) => Output::new(&h.finalize_raw(), self.digest_len),
      State::Blake2s(h) => Output::new(&h.finalize_raw(), self.digest_len),
      State::Blake2bp(h) => Output::new(&h.finalize_raw(), self.digest_len),
      State::Blake2sp(h) => Output::new(&h.finalize_raw(), self.digest_len),
    };
    Ok(out)
  }
}
