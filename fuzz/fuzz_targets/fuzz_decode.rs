// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use columns::{decode, encode_to_vec, ObjectBuilder, UnionBuilder, WidthClass};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let via = UnionBuilder::new("Via")
        .number("i", WidthClass::Int64)
        .number("f", WidthClass::Float64)
        .build()
        .expect("union");
    let schema = ObjectBuilder::new("Fuzz", 40)
        .number("tag", 0, WidthClass::Bool)
        .union("via", 8, Arc::new(via))
        .number("len", 16, WidthClass::Int8)
        .flexible_array("items", 18, WidthClass::UInt16, 8)
        .fixed_array("tail", 34, WidthClass::UInt8, 6)
        .build()
        .expect("schema");

    let mut native = [0u8; 40];
    if let Ok(consumed) = decode(&schema, &mut native, data) {
        assert!(consumed <= data.len());
        // whatever decoded must encode again
        let _ = encode_to_vec(&schema, &native).expect("re-encode");
    }
});
