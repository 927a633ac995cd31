//! Unit tests for the binary log format

use hcensus::logformat::{write_record, write_sentinel, BlockReader, HeaderSet};
use proptest::prelude::*;

use crate::helpers::{encode, header_set};

fn decode(bytes: &[u8], chunk_size: usize) -> Vec<HeaderSet> {
    BlockReader::with_chunk_size(bytes, chunk_size)
        .collect::<Result<Vec<_>, _>>()
        .expect("in-memory reads do not fail")
}

fn arb_name() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(prop_oneof![b'a'..=b'z', Just(b'-'), Just(b':')], 1..24)
}

fn arb_header_set() -> impl Strategy<Value = HeaderSet> {
    proptest::collection::vec(
        (arb_name(), proptest::collection::vec(any::<u8>(), 0..64)),
        0..12,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn encode_then_decode_preserves_sets(sets in proptest::collection::vec(arb_header_set(), 0..8)) {
        let bytes = encode(&sets);
        prop_assert_eq!(decode(&bytes, 1 << 20), sets);
    }

    #[test]
    fn chunk_size_does_not_change_result(
        sets in proptest::collection::vec(arb_header_set(), 1..8),
        chunk_size in 1usize..64,
    ) {
        let bytes = encode(&sets);
        let small = decode(&bytes, chunk_size);
        let large = decode(&bytes, 1 << 20);
        prop_assert_eq!(small.len(), sets.len());
        prop_assert_eq!(small, large);
    }
}

#[test]
fn k_sentinels_make_k_sets() {
    let mut bytes = Vec::new();
    for _ in 0..5 {
        write_record(&mut bytes, b"age", b"1").unwrap();
        write_sentinel(&mut bytes).unwrap();
    }
    write_sentinel(&mut bytes).unwrap();

    let sets = decode(&bytes, 3);
    assert_eq!(sets.len(), 6);
    assert!(sets[5].is_empty());
}

#[test]
fn truncated_tail_is_dropped_silently() {
    let mut bytes = encode(&[header_set(&[("age", "1")])]);
    write_record(&mut bytes, b"cache-control", b"max-age=60").unwrap();
    bytes.truncate(bytes.len() - 4);

    let mut reader = BlockReader::with_chunk_size(&bytes[..], 7);
    let mut sets = Vec::new();
    while let Some(set) = reader.next_set().unwrap() {
        sets.push(set);
    }
    assert_eq!(sets, vec![header_set(&[("age", "1")])]);
    assert!(reader.stats().truncated_bytes > 0);
    assert_eq!(reader.stats().blocks, 1);
}

#[test]
fn unterminated_records_are_counted() {
    let mut bytes = encode(&[header_set(&[("age", "1")])]);
    write_record(&mut bytes, b"vary", b"accept").unwrap();
    write_record(&mut bytes, b"etag", b"\"x\"").unwrap();

    let mut reader = BlockReader::new(&bytes[..]);
    let sets: Vec<HeaderSet> = reader.by_ref().map(Result::unwrap).collect();
    assert_eq!(sets.len(), 1);
    assert_eq!(reader.stats().unterminated_records, 2);
    assert_eq!(reader.stats().truncated_bytes, 0);
}

#[test]
fn latin1_values_survive() {
    let mut set = HeaderSet::new();
    set.insert("x-name", vec![0xe9, 0xff, 0x00]);
    let sets = decode(&encode(&[set.clone()]), 2);
    assert_eq!(sets, vec![set]);
}
