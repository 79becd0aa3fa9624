//! BLAKE2s (RFC 7693).
//!
//! Portable, `no_std`, pure Rust implementation: 32-bit sibling of
//! [`blake2b`](crate::crypto::blake2b) with a 64-byte block, 10 rounds, and
//! a 64-bit byte counter.

#![allow(clippy::indexing_slicing)] // Compression schedule uses fixed indices

use traits::Digest;

pub(crate) const BLOCK_LEN: usize = 64;
pub(crate) const OUT_LEN: usize = 32;
pub(crate) const KEY_LEN: usize = 32;

const IV: [u32; 8] = [
  0x6A09_E667,
  0xBB67_AE85,
  0x3C6E_F372,
  0xA54F_F53A,
  0x510E_527F,
  0x9B05_688C,
  0x1F83_D9AB,
  0x5BE0_CD19,
];

const SIGMA: [[usize; 16]; 10] = [
  [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
  [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
  [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
  [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
  [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
  [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
  [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
  [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
  [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
  [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

#[inline(always)]
fn rotr32(x: u32, n: u32) -> u32 {
  x.rotate_right(n)
}

#[inline(always)]
fn g(a: &mut u32, b: &mut u32, c: &mut u32, d: &mut u32, x: u32, y: u32) {
  *a = a.wrapping_add(*b).wrapping_add(x);
  *d = rotr32(*d ^ *a, 16);
  *c = c.wrapping_add(*d);
  *b = rotr32(*b ^ *c, 12);
  *a = a.wrapping_add(*b).wrapping_add(y);
  *d = rotr32(*d ^ *a, 8);
  *c = c.wrapping_add(*d);
  *b = rotr32(*b ^ *c, 7);
}

#[inline(always)]
fn compress(h: &mut [u32; 8], block: &[u8; BLOCK_LEN], t: u64, last_block: bool, last_node: bool) {
  let (chunks, _) = block.as_chunks::<4>();
  let mut m = [0u32; 16];
  for (i, c) in chunks.iter().enumerate() {
    m[i] = u32::from_le_bytes(*c);
  }

  let mut v0 = h[0];
  let mut v1 = h[1];
  let mut v2 = h[2];
  let mut v3 = h[3];
  let mut v4 = h[4];
  let mut v5 = h[5];
  let mut v6 = h[6];
  let mut v7 = h[7];

  let mut v8 = IV[0];
  let mut v9 = IV[1];
  let mut v10 = IV[2];
  let mut v11 = IV[3];
  let mut v12 = IV[4] ^ (t as u32);
  let mut v13 = IV[5] ^ ((t >> 32) as u32);
  let mut v14 = IV[6] ^ if last_block { u32::MAX } else { 0 };
  let mut v15 = IV[7] ^ if last_block && last_node { u32::MAX } else { 0 };

  macro_rules! round {
    ($r:expr) => {{
      let s = &SIGMA[$r];

      g(&mut v0, &mut v4, &mut v8, &mut v12, m[s[0]], m[s[1]]);
      g(&mut v1, &mut v5, &mut v9, &mut v13, m[s[2]], m[s[3]]);
      g(&mut v2, &mut v6, &mut v10, &mut v14, m[s[4]], m[s[5]]);
      g(&mut v3, &mut v7, &mut v11, &mut v15, m[s[6]], m[s[7]]);

      g(&mut v0, &mut v5, &mut v10, &mut v15, m[s[8]], m[s[9]]);
      g(&mut v1, &mut v6, &mut v11, &mut v12, m[s[10]], m[s[11]]);
      g(&mut v2, &mut v7, &mut v8, &mut v13, m[s[12]], m[s[13]]);
      g(&mut v3, &mut v4, &mut v9, &mut v14, m[s[14]], m[s[15]]);
    }};
  }

  round!(0);
  round!(1);
  round!(2);
  round!(3);
  round!(4);
  round!(5);
  round!(6);
  round!(7);
  round!(8);
  round!(9);

  h[0] ^= v0 ^ v8;
  h[1] ^= v1 ^ v9;
  h[2] ^= v2 ^ v10;
  h[3] ^= v3 ^ v11;
  h[4] ^= v4 ^ v12;
  h[5] ^= v5 ^ v13;
  h[6] ^= v6 ^ v14;
  h[7] ^= v7 ^ v15;
}

/// BLAKE2s parameter block (RFC 7693 §2.5). The node offset is 48 bits wide
/// in this family; salt, personalization, and leaf length stay zero.
#[derive(Clone, Copy)]
pub(crate) struct Params {
  pub digest_len: u8,
  pub key_len: u8,
  pub fanout: u8,
  pub depth: u8,
  pub node_offset: u64,
  pub node_depth: u8,
  pub inner_len: u8,
  pub last_node: bool,
}

impl Params {
  /// Parameters for a standalone sequential hash.
  pub(crate) fn sequential(digest_len: u8, key_len: u8) -> Self {
    Self {
      digest_len,
      key_len,
      fanout: 1,
      depth: 1,
      node_offset: 0,
      node_depth: 0,
      inner_len: 0,
      last_node: false,
    }
  }

  /// The first four 32-bit words of the parameter block; the salt and
  /// personalization words are zero and XOR away.
  fn words(&self) -> [u32; 4] {
    debug_assert!(self.node_offset < 1 << 48);
    let w0 = u32::from(self.digest_len)
      | u32::from(self.key_len) << 8
      | u32::from(self.fanout) << 16
      | u32::from(self.depth) << 24;
    let w2 = self.node_offset as u32;
    let w3 = (self.node_offset >> 32) as u32 | u32::from(self.node_depth) << 16 | u32::from(self.inner_len) << 24;
    [w0, 0, w2, w3]
  }
}

/// Incremental BLAKE2s engine parameterized by a full parameter block.
///
/// Buffering follows the same discipline as the BLAKE2b engine: at least one
/// full block is retained until finalization so the final-block flag can be
/// applied.
#[derive(Clone)]
pub(crate) struct Blake2s {
  h: [u32; 8],
  buf: [u8; BLOCK_LEN],
  buf_len: usize,
  bytes_hashed: u64,
  last_node: bool,
}

impl Blake2s {
  /// Build an engine from a parameter block, absorbing the key as the first
  /// block when one is present. A tree root records the key length in its
  /// parameter block while absorbing no key bytes, so `key` may be empty
  /// even when `params.key_len` is not.
  pub(crate) fn with_params(params: &Params, key: &[u8]) -> Self {
    debug_assert!(key.is_empty() || params.key_len as usize == key.len());
    debug_assert!(key.len() <= KEY_LEN);

    let mut h = IV;
    for (word, p) in h.iter_mut().zip(params.words()) {
      *word ^= p;
    }
    let mut engine = Self {
      h,
      buf: [0u8; BLOCK_LEN],
      buf_len: 0,
      bytes_hashed: 0,
      last_node: params.last_node,
    };
    if !key.is_empty() {
      let mut block = [0u8; BLOCK_LEN];
      block[..key.len()].copy_from_slice(key);
      engine.update(&block);
    }
    engine
  }

  pub(crate) fn update(&mut self, mut data: &[u8]) {
    if data.is_empty() {
      return;
    }

    if self.buf_len != 0 {
      let take = core::cmp::min(BLOCK_LEN - self.buf_len, data.len());
      self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&data[..take]);
      self.buf_len += take;
      data = &data[take..];

      // Keep a full block buffered until we know there is more input, so the
      // final block can be marked with the finalization flag.
      if self.buf_len == BLOCK_LEN && !data.is_empty() {
        self.bytes_hashed = self.bytes_hashed.wrapping_add(BLOCK_LEN as u64);
        compress(&mut self.h, &self.buf, self.bytes_hashed, false, false);
        self.buf_len = 0;
      }
    }

    let full_len = data.len() - (data.len() % BLOCK_LEN);
    if full_len != 0 {
      let (full, rest) = data.split_at(full_len);
      // Hold back the last full block for finalization when nothing trails it.
      let hold_back = if rest.is_empty() { BLOCK_LEN } else { 0 };
      let (to_compress, last_full) = full.split_at(full_len - hold_back);

      let (blocks, _) = to_compress.as_chunks::<BLOCK_LEN>();
      for block in blocks {
        self.bytes_hashed = self.bytes_hashed.wrapping_add(BLOCK_LEN as u64);
        compress(&mut self.h, block, self.bytes_hashed, false, false);
      }

      if !last_full.is_empty() {
        self.buf.copy_from_slice(last_full);
        self.buf_len = BLOCK_LEN;
      }
      data = rest;
    }

    if !data.is_empty() {
      self.buf[..data.len()].copy_from_slice(data);
      self.buf_len = data.len();
    }
  }

  /// Pad the tail block, compress it with the finalization flag, and
  /// serialize the full chaining value little-endian.
  pub(crate) fn finalize_raw(&self) -> [u8; OUT_LEN] {
    let mut h = self.h;
    let mut buf = self.buf;
    let len = self.buf_len;

    buf[len..].fill(0);
    let t = self.bytes_hashed.wrapping_add(len as u64);
    compress(&mut h, &buf, t, true, self.last_node);

    let mut out = [0u8; OUT_LEN];
    for (i, word) in h.iter().copied().enumerate() {
      out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    out
  }

  #[cfg(test)]
  pub(crate) fn count(&self) -> u64 {
    self.bytes_hashed.wrapping_add(self.buf_len as u64)
  }
}

/// BLAKE2s-256: unkeyed, fixed 32-byte output.
#[derive(Clone)]
pub struct Blake2s256(Blake2s);

impl Default for Blake2s256 {
  #[inline]
  fn default() -> Self {
    Self(Blake2s::with_params(&Params::sequential(OUT_LEN as u8, 0), &[]))
  }
}

impl Digest for Blake2s256 {
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
  fn sequential_param_word_matches_rfc_example() {
    // outlen=32, keylen=0, fanout=1, depth=1 -> 0x0101_0020.
    assert_eq!(Params::sequential(32, 0).words()[0], 0x0101_0020);
  }

  #[test]
  fn empty_input_digest() {
    let expected = "69217a3079908094e11121d042354a7c1f55b6482ca1a51e1b250dfd1ed0eef9";
    assert_eq!(hex::encode(Blake2s256::digest(b"")), expected);
  }

  #[test]
  fn counter_tracks_compressed_plus_buffered() {
    let mut h = Blake2s::with_params(&Params::sequential(32, 0), &[]);
    h.update(&[0u8; 150]);
    assert_eq!(h.count(), 150);
    assert_eq!(h.count(), h.bytes_hashed + h.buf_len as u64);
  }
}
