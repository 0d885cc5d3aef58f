// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC GlobalId codec
//!
//! IFC stores 128-bit identifiers as 22 characters drawn from a 64-symbol
//! alphabet. The leading character carries the top 2 bits, each of the
//! remaining 21 characters carries 6 bits.

use crate::error::{Error, Result};
use uuid::Uuid;

/// Length of a compact GlobalId
pub const COMPACT_LEN: usize = 22;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

#[inline]
fn symbol_value(byte: u8) -> Option<u128> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'A'..=b'Z' => byte - b'A' + 10,
        b'a'..=b'z' => byte - b'a' + 36,
        b'_' => 62,
        b'$' => 63,
        _ => return None,
    };
    Some(value as u128)
}

/// Decode a compact GlobalId into its UUID
pub fn decode(compact: &str) -> Result<Uuid> {
    let bytes = compact.as_bytes();
    if bytes.len() != COMPACT_LEN {
        return Err(Error::invalid_guid(compact, "expected 22 characters"));
    }

    let mut value: u128 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let digit = symbol_value(byte)
            .ok_or_else(|| Error::invalid_guid(compact, "character outside the GlobalId alphabet"))?;
        // Only 2 bits fit in the first position
        if i == 0 && digit > 3 {
            return Err(Error::invalid_guid(compact, "leading character out of range"));
        }
        value = (value << 6) | digit;
    }

    Ok(Uuid::from_u128(value))
}

/// Expand a compact GlobalId into canonical 36-character UUID text
pub fn expand(compact: &str) -> Result<String> {
    Ok(decode(compact)?.hyphenated().to_string())
}

/// Compress a UUID into a compact GlobalId
pub fn compress(uuid: &Uuid) -> String {
    let value = uuid.as_u128();
    let mut out = String::with_capacity(COMPACT_LEN);
    out.push(ALPHABET[(value >> 126) as usize] as char);
    for i in 1..COMPACT_LEN {
        let shift = 6 * (COMPACT_LEN - 1 - i);
        out.push(ALPHABET[((value >> shift) & 0x3f) as usize] as char);
    }
    out
}

/// Generate a fresh random GlobalId
pub fn new_global_id() -> String {
    compress(&Uuid::new_v4())
}
