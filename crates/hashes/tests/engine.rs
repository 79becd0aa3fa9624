//! Engine facade contract: construction validation, the finalize-once state
//! machine, clone branching, and digest encodings.

use hashes::Digest as _;
use hashes::crypto::{Algorithm, Blake2, Blake2b512, Encoding};
use traits::Error;

const ALL: [Algorithm; 4] = [
  Algorithm::Blake2b,
  Algorithm::Blake2s,
  Algorithm::Blake2bp,
  Algorithm::Blake2sp,
];

#[test]
fn digest_length_equals_request_for_every_variant() {
  for algorithm in ALL {
    for len in 1..=algorithm.max_digest_len() {
      let mut h = Blake2::with_digest_len(algorithm, len).unwrap();
      h.update(b"input").unwrap();
      let out = h.digest().unwrap();
      assert_eq!(out.len(), len, "{algorithm} digest length {len}");
      assert_eq!(out.as_bytes().len(), len);
    }
  }
}

#[test]
fn second_digest_fails_with_invalid_state() {
  for algorithm in ALL {
    let mut h = Blake2::new(algorithm);
    h.update(b"data").unwrap();
    let first = h.digest().unwrap();
    assert_eq!(h.digest(), Err(Error::InvalidState), "{algorithm}");
    // And a third time, for good measure.
    assert_eq!(h.digest(), Err(Error::InvalidState), "{algorithm}");
    assert_eq!(first.len(), algorithm.max_digest_len());
  }
}

#[test]
fn update_after_digest_fails_with_invalid_state() {
  for algorithm in ALL {
    let mut h = Blake2::new(algorithm);
    h.digest().unwrap();
    assert_eq!(h.update(b"more"), Err(Error::InvalidState), "{algorithm}");
  }
}

#[test]
fn clone_branches_are_independent() {
  // E.update(X); C = E.clone(); C.update(Y); E.update(Z)
  // => E == hash(X || Z), C == hash(X || Y).
  let (x, y, z) = (&b"common prefix "[..], &b"left branch"[..], &b"right branch"[..]);
  for algorithm in ALL {
    let mut e = Blake2::new(algorithm);
    e.update(x).unwrap();
    let mut c = e.clone();
    c.update(y).unwrap();
    e.update(z).unwrap();

    let one_shot = |parts: &[&[u8]]| {
      let mut h = Blake2::new(algorithm);
      for part in parts {
        h.update(part).unwrap();
      }
      h.digest().unwrap()
    };

    assert_eq!(e.digest().unwrap(), one_shot(&[x, z]), "{algorithm} original branch");
    assert_eq!(c.digest().unwrap(), one_shot(&[x, y]), "{algorithm} cloned branch");
  }
}

#[test]
fn clone_carries_the_finalized_flag() {
  let mut h = Blake2::new(Algorithm::Blake2b);
  h.digest().unwrap();
  let mut copy = h.clone();
  assert_eq!(copy.digest(), Err(Error::InvalidState));
}

#[test]
fn clone_preserves_key_and_digest_len() {
  let mut h = Blake2::keyed_with_digest_len(Algorithm::Blake2sp, b"secret", 20).unwrap();
  h.update(b"abc").unwrap();
  let mut copy = h.clone();
  assert_eq!(copy.algorithm(), Algorithm::Blake2sp);
  assert_eq!(copy.digest_len(), 20);
  assert_eq!(copy.digest().unwrap(), h.digest().unwrap());
}

#[test]
fn key_too_long_is_rejected() {
  for algorithm in ALL {
    let max = algorithm.max_key_len();
    assert!(Blake2::keyed(algorithm, &vec![0u8; max]).is_ok(), "{algorithm}");
    assert_eq!(
      Blake2::keyed(algorithm, &vec![0u8; max + 1]).unwrap_err(),
      Error::KeyTooLong { len: max + 1, max },
      "{algorithm}"
    );
  }
}

#[test]
fn out_of_range_digest_length_is_rejected() {
  for algorithm in ALL {
    let max = algorithm.max_digest_len();
    assert_eq!(
      Blake2::with_digest_len(algorithm, 0).unwrap_err(),
      Error::InvalidDigestLength { len: 0, max },
      "{algorithm}"
    );
    assert_eq!(
      Blake2::with_digest_len(algorithm, max + 1).unwrap_err(),
      Error::InvalidDigestLength { len: max + 1, max },
      "{algorithm}"
    );
  }
}

#[test]
fn unknown_algorithm_names_are_rejected() {
  for name in ["blake3", "sha256", "", "blake2", "blake2bp "] {
    assert_eq!(name.parse::<Algorithm>(), Err(Error::UnsupportedAlgorithm), "{name:?}");
  }
}

#[test]
fn construction_by_parsed_name() {
  let algorithm: Algorithm = "blake2bp".parse().unwrap();
  let mut h = Blake2::new(algorithm);
  h.update(b"test").unwrap();
  assert_eq!(h.digest().unwrap().len(), 64);
}

#[test]
fn empty_key_behaves_as_unkeyed() {
  for algorithm in ALL {
    let mut keyed = Blake2::keyed(algorithm, b"").unwrap();
    keyed.update(b"payload").unwrap();
    let mut plain = Blake2::new(algorithm);
    plain.update(b"payload").unwrap();
    assert_eq!(keyed.digest().unwrap(), plain.digest().unwrap(), "{algorithm}");
  }
}

#[test]
fn digest_encodings() {
  let mut h = Blake2::with_digest_len(Algorithm::Blake2b, 16).unwrap();
  h.update(b"test").unwrap();
  let out = h.digest().unwrap();

  assert_eq!(out.to_hex(), "44a8995dd50b6657a037a7839304535b");
  assert_eq!(out.encode(Encoding::Hex), "44a8995dd50b6657a037a7839304535b");
  assert_eq!(out.encode(Encoding::Base64), "RKiZXdULZlegN6eDkwRTWw==");
  // The binary rendering maps each byte to the same-numbered code point.
  let binary = out.encode(Encoding::Binary);
  assert_eq!(binary.chars().count(), 16);
  assert!(binary.chars().all(|c| (c as u32) < 256));
}

#[test]
fn digest_encoded_is_finalize_once_too() {
  let mut h = Blake2::new(Algorithm::Blake2s);
  h.update(b"test").unwrap();
  assert!(h.digest_encoded(Encoding::Hex).is_ok());
  assert_eq!(h.digest_encoded(Encoding::Hex), Err(Error::InvalidState));
  assert_eq!(h.digest(), Err(Error::InvalidState));
}

#[test]
fn reader_adapter_hashes_the_stream() {
  use std::io::Read as _;

  let data = vec![0xA7u8; 3000];
  let mut reader = Blake2b512::reader(&data[..]);
  let mut sink = Vec::new();
  reader.read_to_end(&mut sink).unwrap();
  assert_eq!(sink, data);
  assert_eq!(reader.digest(), Blake2b512::digest(&data));
}

#[test]
fn writer_adapter_hashes_the_stream() {
  use std::io::Write as _;

  let data = b"streamed through a pipeline";
  let mut writer = Blake2b512::writer(Vec::new());
  writer.write_all(data).unwrap();
  let (out, digest) = writer.into_parts();
  assert_eq!(out, data);
  assert_eq!(digest, Blake2b512::digest(data));
}
