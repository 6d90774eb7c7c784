//! # GUID Utilities
//!
//! GUID/UUID handling for UUID-scoped firmware methods such as `_DSM`.

use crate::{HalError, HalResult};
use core::fmt;

// =============================================================================
// GUID STRUCTURE
// =============================================================================

/// GUID (Globally Unique Identifier)
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid {
    /// Data 1 (time-low)
    pub data1: u32,
    /// Data 2 (time-mid)
    pub data2: u16,
    /// Data 3 (time-hi-and-version)
    pub data3: u16,
    /// Data 4 (clock-seq-hi-and-reserved, clock-seq-low, node)
    pub data4: [u8; 8],
}

static_assertions::assert_eq_size!(Guid, [u8; 16]);

impl Guid {
    /// Parse a GUID string, mapping failure to [`HalError::InvalidGuid`]
    pub fn parse(s: &str) -> HalResult<Self> {
        parse_guid(s).ok_or(HalError::InvalidGuid)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0], self.data4[1],
            self.data4[2], self.data4[3], self.data4[4], self.data4[5], self.data4[6], self.data4[7])
    }
}

// =============================================================================
// GUID PARSING
// =============================================================================

/// Parse GUID from string
///
/// Accepts `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`, optionally wrapped in
/// curly braces. Hex digits may be either case.
pub fn parse_guid(s: &str) -> Option<Guid> {
    let s = s.trim();

    let s = s
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(s);

    if s.len() != 36 || !s.is_ascii() {
        return None;
    }

    let bytes = s.as_bytes();
    if bytes[8] != b'-' || bytes[13] != b'-' || bytes[18] != b'-' || bytes[23] != b'-' {
        return None;
    }

    let data1 = parse_hex_u32(&s[0..8])?;
    let data2 = parse_hex_u16(&s[9..13])?;
    let data3 = parse_hex_u16(&s[14..18])?;

    let mut data4 = [0u8; 8];
    let tail = [19, 21, 24, 26, 28, 30, 32, 34];
    for (slot, &start) in data4.iter_mut().zip(tail.iter()) {
        *slot = parse_hex_u8(&s[start..start + 2])?;
    }

    Some(Guid { data1, data2, data3, data4 })
}

fn parse_hex_u32(s: &str) -> Option<u32> {
    let mut result = 0u32;
    for c in s.chars() {
        let digit = c.to_digit(16)?;
        result = result.checked_mul(16)?.checked_add(digit)?;
    }
    Some(result)
}

fn parse_hex_u16(s: &str) -> Option<u16> {
    parse_hex_u32(s).and_then(|v| u16::try_from(v).ok())
}

fn parse_hex_u8(s: &str) -> Option<u8> {
    parse_hex_u32(s).and_then(|v| u8::try_from(v).ok())
}

// =============================================================================
// TESTS
// =============================================================================
