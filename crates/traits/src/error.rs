//! Error types for hash-engine construction and misuse.
//!
//! All of these conditions are synchronous caller errors, not transient
//! failures: there is no recovery path and retrying is meaningless for a
//! deterministic computation. Constructors that fail return before any
//! engine state exists, so a failed call never leaves a half-initialized
//! hasher behind.

use core::fmt;

/// Caller error raised by engine construction or use.
///
/// # Examples
///
/// ```
/// use traits::Error;
///
/// fn check_key(len: usize, max: usize) -> Result<(), Error> {
///   if len > max {
///     return Err(Error::KeyTooLong { len, max });
///   }
///   Ok(())
/// }
///
/// assert!(check_key(65, 64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
  /// The algorithm name is not one of the four BLAKE2 variants.
  UnsupportedAlgorithm,
  /// The key exceeds the variant's maximum key length.
  KeyTooLong {
    /// Length of the supplied key in bytes.
    len: usize,
    /// Maximum key length for the selected variant.
    max: usize,
  },
  /// The requested digest length is zero or exceeds the variant maximum.
  InvalidDigestLength {
    /// Requested digest length in bytes.
    len: usize,
    /// Maximum digest length for the selected variant.
    max: usize,
  },
  /// The engine was already finalized; no further `update` or `digest` is
  /// permitted.
  InvalidState,
  /// The digest output encoding name is not recognized.
  UnsupportedEncoding,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::UnsupportedAlgorithm => f.write_str("algorithm must be blake2b, blake2s, blake2bp, or blake2sp"),
      Self::KeyTooLong { len, max } => write!(f, "key is {len} bytes; must be {max} bytes or smaller"),
      Self::InvalidDigestLength { len, max } => {
        write!(f, "digest length is {len}; must be between 1 and {max} bytes")
      }
      // Wording kept from the original engine's observable contract.
      Self::InvalidState => f.write_str("not initialized"),
      Self::UnsupportedEncoding => f.write_str("unsupported output encoding"),
    }
  }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::string::ToString;

  use super::*;

  #[test]
  fn display_messages() {
    assert_eq!(
      Error::UnsupportedAlgorithm.to_string(),
      "algorithm must be blake2b, blake2s, blake2bp, or blake2sp"
    );
    assert_eq!(
      Error::KeyTooLong { len: 65, max: 64 }.to_string(),
      "key is 65 bytes; must be 64 bytes or smaller"
    );
    assert_eq!(
      Error::InvalidDigestLength { len: 0, max: 32 }.to_string(),
      "digest length is 0; must be between 1 and 32 bytes"
    );
    assert_eq!(Error::InvalidState.to_string(), "not initialized");
    assert_eq!(Error::UnsupportedEncoding.to_string(), "unsupported output encoding");
  }

  #[test]
  fn equality_carries_context() {
    assert_eq!(Error::KeyTooLong { len: 65, max: 64 }, Error::KeyTooLong { len: 65, max: 64 });
    assert_ne!(Error::KeyTooLong { len: 65, max: 64 }, Error::KeyTooLong { len: 33, max: 32 });
  }

  #[test]
  fn trait_bounds() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    assert_send::<Error>();
    assert_sync::<Error>();
  }

  #[test]
  fn error_trait_impl() {
    use core::error::Error as _;

    let err = Error::InvalidState;
    assert!(err.source().is_none());
  }
}
