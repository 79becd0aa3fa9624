//! BLAKE2sp: 8-way parallel BLAKE2s.
//!
//! The 32-bit sibling of [`blake2bp`](crate::crypto::blake2bp) with the
//! reference parameterization of eight leaves. Input block `n` belongs to
//! leaf `n % 8`; one root instance hashes the concatenated leaf outputs.

#![allow(clippy::indexing_slicing)] // Leaf index is always reduced modulo the fan-out

use traits::Digest;

use super::blake2s::{BLOCK_LEN, Blake2s, OUT_LEN, Params};

/// Number of leaf instances (the tree fan-out).
pub(crate) const DEGREE: usize = 8;

/// Incremental BLAKE2sp engine.
///
/// A key, when present, is absorbed by every leaf; the root only records
/// the key length in its parameter block.
#[derive(Clone)]
pub(crate) struct Blake2sp {
  leaves: [Blake2s; DEGREE],
  root: Blake2s,
  bytes_fed: u64,
}

impl Blake2sp {
  /// Build an engine producing `digest_len`-byte output (recorded in every
  /// parameter block as associated data; leaves still emit their full inner
  /// hash). The caller validates `digest_len` and `key`.
  pub(crate) fn with_params(digest_len: u8, key: &[u8]) -> Self {
    let key_len = key.len() as u8;
    let leaf = |i: usize| Params {
      digest_len,
      key_len,
      fanout: DEGREE as u8,
      depth: 2,
      node_offset: i as u64,
      node_depth: 0,
      inner_len: OUT_LEN as u8,
      last_node: i == DEGREE - 1,
    };
    let root = Params {
      digest_len,
      key_len,
      fanout: DEGREE as u8,
      depth: 2,
      node_offset: 0,
      node_depth: 1,
      inner_len: OUT_LEN as u8,
      last_node: true,
    };
    Self {
      leaves: core::array::from_fn(|i| Blake2s::with_params(&leaf(i), key)),
      root: Blake2s::with_params(&root, &[]),
      bytes_fed: 0,
    }
  }

  /// Route each input byte to the leaf owning its absolute block offset.
  pub(crate) fn update(&mut self, mut data: &[u8]) {
    while !data.is_empty() {
      let block = (self.bytes_fed / BLOCK_LEN as u64) as usize;
      let within = (self.bytes_fed % BLOCK_LEN as u64) as usize;
      let take = core::cmp::min(BLOCK_LEN - within, data.len());
      let (chunk, rest) = data.split_at(take);
      self.leaves[block % DEGREE].update(chunk);
      self.bytes_fed = self.bytes_fed.wrapping_add(take as u64);
      data = rest;
    }
  }

  /// Finalize all eight leaves and feed their outputs, in leaf order, to
  /// the root.
  pub(crate) fn finalize_raw(&self) -> [u8; OUT_LEN] {
    let mut root = self.root.clone();
    for leaf in &self.leaves {
      root.update(&leaf.finalize_raw());
    }
    root.finalize_raw()
  }
}

/// BLAKE2sp-256: unkeyed, fixed 32-byte output.
#[derive(Clone)]
pub struct Blake2sp256(Blake2sp);

impl Default for Blake2sp256 {
  #[inline]
  fn default() -> Self {
    Self(Blake2sp::with_params(OUT_LEN as u8, &[]))
  }
}

impl Digest for Blake2sp256 {
  const OUTPUT_SIZE: usize = OUT_LEN;
  type Output = [u8; OUT_LEN];

  #[inline]
  fn new() -> Self {
    Self::default()
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.0.update(data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    self.0.finalize_raw()
  }

  #[inline]
  fn reset(&mut self) {
    *self = Self::default();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input_digest() {
    let expected = "dd0e891776933f43c7d032b08a917e25741f8aa9a12c12e1cac8801500f2ca4f";
    assert_eq!(hex::encode(Blake2sp256::digest(b"")), expected);
  }

  #[test]
  fn block_routing_is_round_robin() {
    let mut h = Blake2sp256::new();
    // Nine blocks: leaf 0 receives blocks 0 and 8, leaves 1-7 one block each.
    h.update(&[0xCD; 9 * BLOCK_LEN]);
    assert_eq!(h.0.leaves[0].count(), 2 * BLOCK_LEN as u64);
    assert_eq!(h.0.leaves[7].count(), BLOCK_LEN as u64);
  }

  #[test]
  fn split_updates_match_one_shot() {
    let data = [0xA5u8; 700];
    let mut split = Blake2sp256::new();
    for chunk in data.chunks(7) {
      split.update(chunk);
    }
    assert_eq!(split.finalize(), Blake2sp256::digest(&data));
  }
}
