//! Fuzz target comparing every variant against an independent implementation
//! across arbitrary keys and digest lengths.

#![no_main]

use arbitrary::Arbitrary;
use hashes::crypto::{Algorithm, Blake2};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  key: Vec<u8>,
  digest_len: u8,
}

fuzz_target!(|input: Input| {
  test_blake2b(&input);
  test_blake2s(&input);
  test_blake2bp(&input);
  test_blake2sp(&input);
});

fn ours(algorithm: Algorithm, key: &[u8], digest_len: usize, data: &[u8]) -> Vec<u8> {
  let mut hasher = Blake2::keyed_with_digest_len(algorithm, key, digest_len).unwrap();
  hasher.update(data).unwrap();
  hasher.digest().unwrap().as_bytes().to_vec()
}

fn test_blake2b(input: &Input) {
  let digest_len = (input.digest_len as usize % 64) + 1;
  let key = &input.key[..input.key.len().min(64)];
  let expected = blake2b_simd::Params::new()
    .hash_length(digest_len)
    .key(key)
    .hash(&input.data);
  assert_eq!(
    ours(Algorithm::Blake2b, key, digest_len, &input.data),
    expected.as_bytes(),
    "blake2b mismatch"
  );
}

fn test_blake2s(input: &Input) {
  let digest_len = (input.digest_len as usize % 32) + 1;
  let key = &input.key[..input.key.len().min(32)];
  let expected = blake2s_simd::Params::new()
    .hash_length(digest_len)
    .key(key)
    .hash(&input.data);
  assert_eq!(
    ours(Algorithm::Blake2s, key, digest_len, &input.data),
    expected.as_bytes(),
    "blake2s mismatch"
  );
}

fn test_blake2bp(input: &Input) {
  let digest_len = (input.digest_len as usize % 64) + 1;
  let key = &input.key[..input.key.len().min(64)];
  let expected = blake2b_simd::blake2bp::Params::new()
    .hash_length(digest_len)
    .key(key)
    .hash(&input.data);
  assert_eq!(
    ours(Algorithm::Blake2bp, key, digest_len, &input.data),
    expected.as_bytes(),
    "blake2bp mismatch"
  );
}

fn test_blake2sp(input: &Input) {
  let digest_len = (input.digest_len as usize % 32) + 1;
  let key = &input.key[..input.key.len().min(32)];
  let expected = blake2s_simd::blake2sp::Params::new()
    .hash_length(digest_len)
    .key(key)
    .hash(&input.data);
  assert_eq!(
    ours(Algorithm::Blake2sp, key, digest_len, &input.data),
    expected.as_bytes(),
    "blake2sp mismatch"
  );
}
