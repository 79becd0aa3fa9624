//! BLAKE2bp: 4-way parallel BLAKE2b.
//!
//! A fixed two-level tree over the sequential BLAKE2b engine: four leaf
//! instances hash interleaved input blocks, and one root instance hashes the
//! concatenated leaf outputs. Note that BLAKE2bp is a different hash function
//! from BLAKE2b and produces unrelated digests for the same input.

#![allow(clippy::indexing_slicing)] // Leaf index is always reduced modulo the fan-out

use traits::Digest;

use super::blake2b::{BLOCK_LEN, Blake2b, OUT_LEN, Params};

/// Number of leaf instances (the tree fan-out).
pub(crate) const DEGREE: usize = 4;

/// Incremental BLAKE2bp engine.
///
/// Input block `n` belongs to leaf `n % 4`; each leaf buffers its own
/// pending block, so no buffering happens at the tree level. A key, when
/// present, is absorbed by every leaf; the root only records the key length
/// in its parameter block.
#[derive(Clone)]
pub(crate) struct Blake2bp {
  leaves: [Blake2b; DEGREE],
  root: Blake2b,
  bytes_fed: u128,
}

impl Blake2bp {
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
      leaves: core::array::from_fn(|i| Blake2b::with_params(&leaf(i), key)),
      root: Blake2b::with_params(&root, &[]),
      bytes_fed: 0,
    }
  }

  /// Route each input byte to the leaf owning its absolute block offset.
  pub(crate) fn update(&mut self, mut data: &[u8]) {
    while !data.is_empty() {
      let block = (self.bytes_fed / BLOCK_LEN as u128) as usize;
      let within = (self.bytes_fed % BLOCK_LEN as u128) as usize;
      let take = core::cmp::min(BLOCK_LEN - within, data.len());
      let (chunk, rest) = data.split_at(take);
      self.leaves[block % DEGREE].update(chunk);
      self.bytes_fed = self.bytes_fed.wrapping_add(take as u128);
      data = rest;
    }
  }

  /// Finalize all four leaves and feed their outputs, in leaf order, to the
  /// root. Borrows the live state; the snapshots keep the engine reusable
  /// for further updates by callers that allow it.
  pub(crate) fn finalize_raw(&self) -> [u8; OUT_LEN] {
    let mut root = self.root.clone();
    for leaf in &self.leaves {
      root.update(&leaf.finalize_raw());
    }
    root.finalize_raw()
  }
}

/// BLAKE2bp-512: unkeyed, fixed 64-byte output.
#[derive(Clone)]
pub struct Blake2bp512(Blake2bp);

impl Default for Blake2bp512 {
  #[inline]
  fn default() -> Self {
    Self(Blake2bp::with_params(OUT_LEN as u8, &[]))
  }
}

impl Digest for Blake2bp512 {
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
    let expected = "b5ef811a8038f70b628fa8b294daae7492b1ebe343a80eaabbf1f6ae664dd67b\
                    9d90b0120791eab81dc96985f28849f6a305186a85501b405114bfa678df9380";
    assert_eq!(hex::encode(Blake2bp512::digest(b"")), expected);
  }

  #[test]
  fn block_routing_is_round_robin() {
    let mut h = Blake2bp512::new();
    // Five blocks: leaf 0 receives blocks 0 and 4, leaves 1-3 one block each.
    h.update(&[0xAB; 5 * BLOCK_LEN]);
    assert_eq!(h.0.leaves[0].count(), 2 * BLOCK_LEN as u128);
    assert_eq!(h.0.leaves[1].count(), BLOCK_LEN as u128);
    assert_eq!(h.0.leaves[3].count(), BLOCK_LEN as u128);
  }

  #[test]
  fn split_updates_match_one_shot() {
    let data = [0x5Au8; 700];
    let mut split = Blake2bp512::new();
    for chunk in data.chunks(13) {
      split.update(chunk);
    }
    assert_eq!(split.finalize(), Blake2bp512::digest(&data));
  }
}
