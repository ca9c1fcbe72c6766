//! Splitting helpers shared by the unit tests and the fuzz crate.
//!
//! The parser works on bytes, so splits may fall anywhere, including inside
//! a UTF-8 sequence.

use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Return a sequence of prefixes converging to `payload`.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_prefixes(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    let mut end = 0;
    produce_chunks(payload, parts)
        .into_iter()
        .map(|chunk| {
            end += chunk.len();
            &payload[..end]
        })
        .collect()
}

/// Split `payload` at sizes derived from arbitrary `seeds`: each seed picks
/// a chunk of `1 + seed % remaining` bytes. Whatever the seeds leave over
/// becomes the last chunk.
#[must_use]
pub fn split_by_seeds<'a>(payload: &'a [u8], seeds: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(seeds.len() + 1);
    let mut rest = payload;
    for &seed in seeds {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(1 + seed % rest.len());
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
