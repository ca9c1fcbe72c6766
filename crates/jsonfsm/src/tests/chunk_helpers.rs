use std::{vec, vec::Vec};

use crate::chunk_utils::{produce_chunks, produce_prefixes, split_by_seeds};

#[test]
fn produce_helpers_example() {
    let payload = br#"["foo","bar"]"#;
    let chunks = produce_chunks(payload, 5);
    assert_eq!(
        chunks,
        vec![
            &b"[\"f"[..],
            &b"oo\""[..],
            &b",\"b"[..],
            &b"ar\""[..],
            &b"]"[..],
        ]
    );
    let prefixes = produce_prefixes(payload, 5);
    assert_eq!(prefixes.last().copied(), Some(&payload[..]));
    assert_eq!(prefixes[1], b"[\"foo\"");
}

#[test]
fn chunks_may_split_multibyte_sequences() {
    let payload = "[\"f\u{1F60A}o\"]".as_bytes();
    let chunks = produce_chunks(payload, 4);
    assert_eq!(chunks.concat(), payload);
    assert!(chunks.iter().any(|c| core::str::from_utf8(c).is_err()));
}

#[test]
fn seeds_pick_chunk_sizes() {
    let payload = b"abcdefgh";
    assert_eq!(
        split_by_seeds(payload, &[0, 1, 100]),
        vec![&b"a"[..], &b"bc"[..], &b"d"[..], &b"efgh"[..]]
    );
    assert_eq!(split_by_seeds(payload, &[]), vec![&payload[..]]);
    assert!(split_by_seeds(b"", &[3]).is_empty());
}

#[quickcheck_macros::quickcheck]
fn seeded_chunks_cover_the_payload(payload: Vec<u8>, seeds: Vec<usize>) -> bool {
    let chunks = split_by_seeds(&payload, &seeds);
    chunks.iter().all(|chunk| !chunk.is_empty())
        && chunks.len() <= seeds.len() + 1
        && chunks.concat() == payload
}
