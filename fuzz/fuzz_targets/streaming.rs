//! Fuzz target for the streaming engine API.
//!
//! Tests that arbitrary sequences of update calls produce the same digest as
//! a single one-shot call, for every variant.

#![no_main]

use arbitrary::Arbitrary;
use hashes::crypto::{Algorithm, Blake2};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  /// Chunk sizes for streaming updates
  chunk_sizes: Vec<usize>,
}

fuzz_target!(|input: Input| {
  for algorithm in [Algorithm::Blake2b, Algorithm::Blake2s, Algorithm::Blake2bp, Algorithm::Blake2sp] {
    test_streaming(algorithm, &input.data, &input.chunk_sizes);
  }
});

fn test_streaming(algorithm: Algorithm, data: &[u8], chunk_sizes: &[usize]) {
  let mut whole = Blake2::new(algorithm);
  whole.update(data).unwrap();
  let expected = whole.digest().unwrap();

  let mut hasher = Blake2::new(algorithm);
  let mut offset = 0;
  let mut chunk_idx = 0;

  while offset < data.len() {
    let chunk_size = if chunk_sizes.is_empty() {
      1
    } else {
      (chunk_sizes[chunk_idx % chunk_sizes.len()] % 256).max(1)
    };

    let end = (offset + chunk_size).min(data.len());
    hasher.update(&data[offset..end]).unwrap();
    offset = end;
    chunk_idx += 1;
  }

  assert_eq!(hasher.digest().unwrap(), expected, "{algorithm} streaming mismatch");
}
