//! Stable hashing of unique keys into 64-bit seeds.
//!
//! The seed derived here is the only piece of state shared between a decision and its
//! later replay, so the function is pinned bit-for-bit:
//! - a key made only of ASCII digits hashes to its decimal value (wrapping in `u64`)
//! - any other key is hashed with MurmurHash3 (x86, 32-bit), seed 0, over its UTF-8 bytes
//!
//! This is **not** a cryptographic hash; it only has to be cheap, portable and identical
//! across implementations.

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// MurmurHash3 x86_32 over `bytes` with the given `seed`.
///
/// Blocks are read little-endian regardless of the host byte order.
#[must_use]
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut blocks = bytes.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_k(k);
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k: u32 = 0;
        for (i, b) in tail.iter().enumerate() {
            k ^= u32::from(*b) << (8 * i);
        }
        h ^= mix_k(k);
    }

    // Length is mixed in modulo 2^32, like the reference.
    h ^= bytes.len() as u32;
    fmix32(h)
}

#[inline]
fn mix_k(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// Hash a unique key (or an application id) into a 64-bit seed.
///
/// The empty key hashes to 0. Never fails.
///
/// ```rust
/// use mwt_explore::stable_id_hash;
///
/// assert_eq!(stable_id_hash("12345"), 12345);
/// assert_eq!(stable_id_hash("hello"), 0x248b_fa47);
/// assert_eq!(stable_id_hash("hello"), stable_id_hash("hello"));
/// ```
#[must_use]
pub fn stable_id_hash(key: &str) -> u64 {
    let bytes = key.as_bytes();
    if bytes.iter().all(u8::is_ascii_digit) {
        return bytes.iter().fold(0u64, |acc, b| {
            acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0'))
        });
    }
    u64::from(murmur3_32(bytes, 0))
}
