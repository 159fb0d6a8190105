// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use columns::wire::WireReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = WireReader::new(data);
    loop {
        let before = reader.position();
        let step = if data.get(before).is_some_and(|b| *b & 0xf0 == 0x90) {
            reader.read_array_len().map(|_| ())
        } else {
            reader.read_scalar().map(|_| ())
        };
        if step.is_err() || reader.position() == before {
            break;
        }
    }
});
