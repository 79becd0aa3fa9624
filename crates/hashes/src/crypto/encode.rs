//! Digest output encodings.
//!
//! The engine hands back raw bytes; callers wanting text ask for one of the
//! encodings the original byte-stream interface recognized: lowercase hex,
//! padded standard base64, or the legacy "binary" rendering where every
//! digest byte becomes one char. The last is latin-1 in disguise and is not
//! safe to feed to consumers expecting UTF-8-encodable ASCII; it exists for
//! callers that round-trip digests through text-only channels.

use core::str::FromStr;

use alloc::string::String;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use traits::Error;

use super::engine::{Blake2, Output};

/// Textual renderings of a digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
  /// Lowercase hexadecimal, two characters per byte.
  Hex,
  /// Standard-alphabet base64 with padding.
  Base64,
  /// One char per byte (latin-1); a lossy legacy text encoding.
  Binary,
}

impl FromStr for Encoding {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "hex" => Ok(Self::Hex),
      "base64" => Ok(Self::Base64),
      "binary" => Ok(Self::Binary),
      _ => Err(Error::UnsupportedEncoding),
    }
  }
}

impl Output {
  /// Render the digest in the requested encoding.
  #[must_use]
  pub fn encode(&self, encoding: Encoding) -> String {
    match encoding {
      Encoding::Hex => hex::encode(self.as_bytes()),
      Encoding::Base64 => STANDARD.encode(self.as_bytes()),
      Encoding::Binary => self.as_bytes().iter().map(|&b| char::from(b)).collect(),
    }
  }

  /// Lowercase hex rendering, the dominant textual form.
  #[must_use]
  pub fn to_hex(&self) -> String {
    self.encode(Encoding::Hex)
  }
}

impl Blake2 {
  /// Finalize and render the digest in `encoding`.
  ///
  /// Same finalize-once contract as [`Blake2::digest`].
  pub fn digest_encoded(&mut self, encoding: Encoding) -> Result<String, Error> {
    Ok(self.digest()?.encode(encoding))
  }
}

#[cfg(test)]
mod tests {
  use alloc::string::ToString;

  use super::*;

  #[test]
  fn encoding_names() {
    assert_eq!("hex".parse::<Encoding>(), Ok(Encoding::Hex));
    assert_eq!("base64".parse::<Encoding>(), Ok(Encoding::Base64));
    assert_eq!("binary".parse::<Encoding>(), Ok(Encoding::Binary));
    assert_eq!("utf16le".parse::<Encoding>(), Err(Error::UnsupportedEncoding));
  }

  #[test]
  fn renderings() {
    let out = Output::new(&[0x00, 0xFF, 0x41, 0x7A], 4);
    assert_eq!(out.to_hex(), "00ff417a");
    assert_eq!(out.encode(Encoding::Base64), "AP9Beg==");
    assert_eq!(out.encode(Encoding::Binary), "\u{0}\u{ff}Az".to_string());
  }
}
