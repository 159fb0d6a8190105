// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::float_cmp)] // Test assertions with constants

//! Round-trip and failure-path tests for the transcoding engine.

use columns::{
    decode, encode, encode_to_vec, Column, ColumnTable, Element, Object, ObjectBuilder,
    SchemaError, TranscodeError, UnionBuilder, WidthClass,
};
use std::sync::Arc;

fn put<const N: usize>(block: &mut [u8], at: usize, bytes: [u8; N]) {
    block[at..at + N].copy_from_slice(&bytes);
}

// typedef struct { uint64_t f_type, f_bsize, f_blocks, f_bfree, f_bavail,
//                  f_files, f_ffree; uint64_t f_spare[4]; } uv_statfs_t;
fn statfs_object() -> Object {
    ObjectBuilder::new("uv_statfs_s", 88)
        .type_name("uv_statfs_t")
        .number("f_type", 0, WidthClass::UInt64)
        .number("f_bsize", 8, WidthClass::UInt64)
        .number("f_blocks", 16, WidthClass::UInt64)
        .number("f_bfree", 24, WidthClass::UInt64)
        .number("f_bavail", 32, WidthClass::UInt64)
        .number("f_files", 40, WidthClass::UInt64)
        .number("f_ffree", 48, WidthClass::UInt64)
        .fixed_array("f_spare", 56, WidthClass::UInt64, 4)
        .build()
        .expect("statfs schema")
}

// union stJsonUnion { int64_t i64; uint64_t u64; double f64; };
// struct stJson { uint8_t kind; union stJsonUnion via; };
fn json_object() -> Object {
    let via = UnionBuilder::new("stJsonUnion")
        .number("i64", WidthClass::Int64)
        .number("u64", WidthClass::UInt64)
        .number("f64", WidthClass::Float64)
        .build()
        .expect("union");
    ObjectBuilder::new("stJson", 16)
        .number("kind", 0, WidthClass::UInt8)
        .union("via", 8, Arc::new(via))
        .build()
        .expect("stJson schema")
}

// struct Bag { uint32_t itemCount; uint16_t items[8]; };
fn bag_object() -> Object {
    ObjectBuilder::new("Bag", 20)
        .number("itemCount", 0, WidthClass::UInt32)
        .flexible_array("items", 4, WidthClass::UInt16, 8)
        .build()
        .expect("bag schema")
}

#[test]
fn test_statfs_zero_and_populated_roundtrip() {
    let schema = statfs_object();
    let zero = [0u8; 88];
    let mut populated = [0u8; 88];
    for (i, value) in (1u64..=11).enumerate() {
        put(&mut populated, i * 8, value.to_ne_bytes());
    }

    for source in [zero, populated] {
        let mut wire = [0u8; 256];
        let written = encode(&schema, &source, &mut wire).expect("encode");

        let mut copy = [0xAAu8; 88];
        let consumed = decode(&schema, &mut copy, &wire).expect("decode");
        assert_eq!(consumed, written);
        assert_eq!(copy, source);
    }
}

#[test]
fn test_statfs_wire_layout() {
    let schema = statfs_object();
    let mut source = [0u8; 88];
    for (i, value) in (1u64..=11).enumerate() {
        put(&mut source, i * 8, value.to_ne_bytes());
    }

    let wire = encode_to_vec(&schema, &source).expect("encode");
    assert_eq!(
        wire,
        [0x98, 1, 2, 3, 4, 5, 6, 7, 0x94, 8, 9, 10, 11],
        "eight columns, the last a composite of four"
    );
}

#[test]
fn test_union_float_bits_preserved() {
    let schema = json_object();
    let pi = 3.14159265358979323846_f64;
    let mut source = [0u8; 16];
    source[0] = 3;
    put(&mut source, 8, pi.to_ne_bytes());

    let wire = encode_to_vec(&schema, &source).expect("encode");
    assert_eq!(wire[0], 0x94, "kind plus three spliced union members");
    assert_eq!(wire.len(), 2 + 9 + 9 + 9);

    let mut copy = [0u8; 16];
    assert_eq!(decode(&schema, &mut copy, &wire), Ok(wire.len()));
    assert_eq!(copy[0], 3);
    let decoded = f64::from_ne_bytes(copy[8..16].try_into().expect("8 bytes"));
    assert_eq!(decoded.to_bits(), pi.to_bits());
}

#[test]
fn test_flexible_length_written_back() {
    let schema = bag_object();
    let wire = [0x92, 0x09, 0x93, 0x0a, 0x0b, 0x0c];
    let mut dest = [0u8; 20];
    assert_eq!(decode(&schema, &mut dest, &wire), Ok(wire.len()));

    // the count in the wire scalar is overwritten by the composite arity
    assert_eq!(u32::from_ne_bytes(dest[0..4].try_into().expect("4 bytes")), 3);
    assert_eq!(u16::from_ne_bytes([dest[4], dest[5]]), 10);
    assert_eq!(u16::from_ne_bytes([dest[6], dest[7]]), 11);
    assert_eq!(u16::from_ne_bytes([dest[8], dest[9]]), 12);
    assert!(dest[10..].iter().all(|b| *b == 0));
}

#[test]
fn test_flexible_roundtrip_uses_memory_count() {
    let schema = bag_object();
    let mut source = [0u8; 20];
    put(&mut source, 0, 2u32.to_ne_bytes());
    put(&mut source, 4, 0x1234u16.to_ne_bytes());
    put(&mut source, 6, 0x5678u16.to_ne_bytes());

    let wire = encode_to_vec(&schema, &source).expect("encode");
    assert_eq!(wire, [0x92, 0x02, 0x92, 0xcd, 0x12, 0x34, 0xcd, 0x56, 0x78]);

    let mut copy = [0u8; 20];
    decode(&schema, &mut copy, &wire).expect("decode");
    assert_eq!(copy, source);
}

#[test]
fn test_negative_length_clamps_to_empty() {
    let schema = ObjectBuilder::new("Signed", 6)
        .number("len", 0, WidthClass::Int16)
        .flexible_array("data", 2, WidthClass::UInt8, 4)
        .build()
        .expect("schema");
    let mut source = [0xEEu8; 6];
    put(&mut source, 0, (-4i16).to_ne_bytes());

    let wire = encode_to_vec(&schema, &source).expect("encode");
    assert_eq!(wire, [0x92, 0xfc, 0x90]);

    let mut copy = [0u8; 6];
    decode(&schema, &mut copy, &wire).expect("decode");
    assert_eq!(i16::from_ne_bytes([copy[0], copy[1]]), 0);
}

#[test]
fn test_count_beyond_capacity_fails_encode() {
    let schema = bag_object();
    let mut source = [0u8; 20];
    put(&mut source, 0, 9u32.to_ne_bytes());

    let mut wire = [0u8; 64];
    let err = encode(&schema, &source, &mut wire).unwrap_err();
    assert_eq!(
        err,
        TranscodeError::CountExceedsCapacity {
            column: "items".into(),
            count: 9,
            capacity: 8,
        }
    );
}

#[test]
fn test_flexible_arity_beyond_capacity_fails_decode() {
    let schema = ObjectBuilder::new("Tiny", 3)
        .number("size", 0, WidthClass::UInt8)
        .flexible_array("data", 1, WidthClass::UInt8, 2)
        .build()
        .expect("schema");
    let wire = [0x92, 0x03, 0x93, 0x01, 0x02, 0x03];
    let mut dest = [0u8; 3];
    assert!(matches!(
        decode(&schema, &mut dest, &wire),
        Err(TranscodeError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_flexible_capacity_bounded_by_length_width() {
    let err = ObjectBuilder::new("Bytes", 301)
        .number("len", 0, WidthClass::UInt8)
        .flexible_array("data", 1, WidthClass::UInt8, 300)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::LengthFieldTooNarrow { max: 255, .. }));

    let err = ObjectBuilder::new("Signed", 201)
        .number("len", 0, WidthClass::Int8)
        .flexible_array("data", 1, WidthClass::UInt8, 200)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::LengthFieldTooNarrow { max: 127, .. }));

    // a full UInt8-counted array round-trips with its length intact
    let schema = ObjectBuilder::new("Bytes", 256)
        .number("len", 0, WidthClass::UInt8)
        .flexible_array("data", 1, WidthClass::UInt8, 255)
        .build()
        .expect("schema");
    let mut wire = vec![0x92, 0xcc, 0xff, 0xdc, 0x00, 0xff];
    wire.extend((0..255u32).flat_map(|i| {
        let b = (i * 7) as u8;
        if b < 0x80 {
            vec![b]
        } else {
            vec![0xcc, b]
        }
    }));
    let mut dest = [0u8; 256];
    assert_eq!(decode(&schema, &mut dest, &wire), Ok(wire.len()));
    assert_eq!(dest[0], 255);
    assert_eq!(encode_to_vec(&schema, &dest), Ok(wire));
}

#[test]
fn test_fixed_array_arity_enforced() {
    let schema = statfs_object();
    let mut wire = vec![0x98, 1, 2, 3, 4, 5, 6, 7, 0x93, 8, 9, 10];
    let mut dest = [0u8; 88];
    let err = decode(&schema, &mut dest, &wire).unwrap_err();
    assert_eq!(
        err,
        TranscodeError::ShapeMismatch {
            expected: "composite of 4".into(),
            found: "composite of 3".into(),
        }
    );

    wire[8] = 0x94;
    wire.push(11);
    assert_eq!(decode(&schema, &mut dest, &wire), Ok(wire.len()));
}

#[test]
fn test_object_arity_enforced() {
    let schema = json_object();
    // stJson expects four children: kind and three union members
    let wire = [0x92, 0x03, 0x00];
    let mut dest = [0u8; 16];
    assert!(matches!(
        decode(&schema, &mut dest, &wire),
        Err(TranscodeError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_scalar_where_composite_expected() {
    let schema = statfs_object();
    let wire = [0x98, 1, 2, 3, 4, 5, 6, 7, 0x08];
    let mut dest = [0u8; 88];
    assert_eq!(
        decode(&schema, &mut dest, &wire),
        Err(TranscodeError::ShapeMismatch {
            expected: "composite of 4".into(),
            found: "scalar".into(),
        })
    );
}

#[test]
fn test_string_where_scalar_expected() {
    let schema = bag_object();
    let wire = [0x92, 0xa1, b'x', 0x90];
    let mut dest = [0u8; 20];
    assert_eq!(
        decode(&schema, &mut dest, &wire),
        Err(TranscodeError::ShapeMismatch {
            expected: "uint32 scalar".into(),
            found: "string".into(),
        })
    );
}

#[test]
fn test_truncated_and_malformed_input() {
    let schema = statfs_object();
    let source = [0x11u8; 88];
    let wire = encode_to_vec(&schema, &source).expect("encode");

    let mut dest = [0u8; 88];
    for cut in [0, 1, wire.len() / 2, wire.len() - 1] {
        assert!(
            matches!(
                decode(&schema, &mut dest, &wire[..cut]),
                Err(TranscodeError::Truncated { .. })
            ),
            "cut at {}",
            cut
        );
    }

    let mut broken = wire.clone();
    broken[1] = 0xc1;
    assert_eq!(
        decode(&schema, &mut dest, &broken),
        Err(TranscodeError::Malformed {
            offset: 1,
            marker: 0xc1
        })
    );
}

#[test]
fn test_buffer_exhausted_then_retry() {
    let schema = statfs_object();
    let mut source = [0u8; 88];
    put(&mut source, 0, u64::MAX.to_ne_bytes());

    let mut small = [0u8; 8];
    assert!(matches!(
        encode(&schema, &source, &mut small),
        Err(TranscodeError::BufferExhausted { .. })
    ));

    let wire = encode_to_vec(&schema, &source).expect("retry with growth");
    let mut copy = [0u8; 88];
    assert_eq!(decode(&schema, &mut copy, &wire), Ok(wire.len()));
    assert_eq!(copy, source);
}

#[test]
fn test_object_arrays_fixed_and_flexible() {
    let point = Arc::new(
        ObjectBuilder::new("Point", 8)
            .number("x", 0, WidthClass::Int32)
            .number("y", 4, WidthClass::Float32)
            .build()
            .expect("point"),
    );
    // struct Path { struct Point corners[2]; uint8_t num; struct Point pts[3]; };
    let path = ObjectBuilder::new("Path", 44)
        .object_fixed_array("corners", 0, point.clone(), 2)
        .number("num", 16, WidthClass::UInt8)
        .object_flexible_array("pts", 20, point, 3)
        .build()
        .expect("path");

    let mut source = [0u8; 44];
    put(&mut source, 0, (-1i32).to_ne_bytes());
    put(&mut source, 4, 0.5f32.to_ne_bytes());
    put(&mut source, 8, 7i32.to_ne_bytes());
    put(&mut source, 12, (-2.25f32).to_ne_bytes());
    source[16] = 2;
    put(&mut source, 20, 100i32.to_ne_bytes());
    put(&mut source, 24, 1.0f32.to_ne_bytes());
    put(&mut source, 28, (-100i32).to_ne_bytes());
    put(&mut source, 32, 2.0f32.to_ne_bytes());

    let wire = encode_to_vec(&path, &source).expect("encode");
    assert_eq!(&wire[..3], &[0x93, 0x92, 0x92], "path, corners, first point");

    let mut copy = [0u8; 44];
    assert_eq!(decode(&path, &mut copy, &wire), Ok(wire.len()));
    assert_eq!(copy, source);
}

#[test]
fn test_randomized_roundtrip_is_bit_exact() {
    // packed layout, no padding and no bools so every byte is significant
    let schema = ObjectBuilder::new("Telemetry", 54)
        .number("a", 0, WidthClass::Int8)
        .number("b", 1, WidthClass::UInt8)
        .number("c", 2, WidthClass::Int16)
        .number("d", 4, WidthClass::UInt16)
        .number("e", 6, WidthClass::Int32)
        .number("f", 10, WidthClass::UInt32)
        .number("g", 14, WidthClass::Float32)
        .number("h", 18, WidthClass::Int64)
        .number("i", 26, WidthClass::UInt64)
        .number("j", 34, WidthClass::Float64)
        .fixed_array("k", 42, WidthClass::Int32, 3)
        .build()
        .expect("telemetry");

    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..500 {
        let mut source = [0u8; 54];
        rng.fill(&mut source);

        let wire = encode_to_vec(&schema, &source).expect("encode");
        let mut copy = [0u8; 54];
        assert_eq!(decode(&schema, &mut copy, &wire), Ok(wire.len()));
        assert_eq!(copy, source);
    }
}

#[test]
fn test_schema_shared_across_threads() {
    let schema = Arc::new(statfs_object());
    std::thread::scope(|scope| {
        for seed in 0..4u64 {
            let schema = Arc::clone(&schema);
            scope.spawn(move || {
                let mut source = [0u8; 88];
                for i in 0..11 {
                    put(&mut source, i * 8, (seed * 100 + i as u64).to_ne_bytes());
                }
                let wire = encode_to_vec(&schema, &source).expect("encode");
                let mut copy = [0u8; 88];
                decode(&schema, &mut copy, &wire).expect("decode");
                assert_eq!(copy, source);
            });
        }
    });
}

#[test]
fn test_hand_built_table_matches_builder() {
    let table = ColumnTable::new(
        "Bag",
        vec![
            Column::number("itemCount", 0, WidthClass::UInt32),
            Column::flexible_array("items", 4, 8, Element::Number(WidthClass::UInt16)),
        ],
    )
    .expect("table");
    let object = Object::new("Bag", "struct Bag", 20, Arc::new(table)).expect("object");
    assert_eq!(object, bag_object());
}
