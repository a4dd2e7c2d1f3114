//! Color token decoding.
//!
//! Tokens are hex (`RRGGBB`, `RRGGBBAA`, optionally `#`-prefixed, short forms
//! left-padded to six digits) or already-packed decimal values of more than
//! eight digits. The packed layout places alpha in the most significant byte
//! and red in the least: `(A << 24) | (B << 16) | (G << 8) | R`. This is the
//! value the remote color sources expect on the wire.

use thiserror::Error;

/// Packed value for the `"0"` shorthand: opaque black.
pub const OPAQUE_BLACK: u32 = 0xFF00_0000;

/// Decimal tokens longer than this are treated as already packed.
const PACKED_DECIMAL_MIN_DIGITS: usize = 9;

/// A token that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{token}': {reason}")]
pub struct InvalidColor {
    /// The token as given.
    pub token: String,
    /// Which rule rejected it.
    pub reason: &'static str,
}

/// Decode a color token into its packed 32-bit value.
pub fn decode(token: &str) -> Result<u32, InvalidColor> {
    let invalid = |reason| InvalidColor {
        token: token.to_string(),
        reason,
    };

    let t = unquote(token.trim()).trim();
    if t.is_empty() {
        return Err(invalid("empty"));
    }

    if t.len() >= PACKED_DECIMAL_MIN_DIGITS && t.bytes().all(|b| b.is_ascii_digit()) {
        return t
            .parse::<u64>()
            .ok()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid("decimal value out of 32-bit range"));
    }

    if t == "0" {
        return Ok(OPAQUE_BLACK);
    }

    let hex = t.strip_prefix('#').unwrap_or(t);
    if hex.is_empty() {
        return Err(invalid("no hex digits"));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("not a hex string"));
    }

    let mut digits = format!("{:0>6}", hex.to_ascii_uppercase());
    if digits.len() == 6 {
        digits.push_str("FF");
    }
    if digits.len() != 8 {
        return Err(invalid("expected 6 or 8 hex digits"));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid("bad hex digit"))
    };
    let (r, g, b, a) = (channel(0)?, channel(1)?, channel(2)?, channel(3)?);
    Ok(pack(r, g, b, a))
}

/// Pack channel bytes into the remote's color layout.
pub fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (u32::from(a) << 24) | (u32::from(b) << 16) | (u32::from(g) << 8) | u32::from(r)
}

/// Strip one layer of matching single or double quotes.
fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2
            && let Some(inner) = s.strip_prefix(q).and_then(|rest| rest.strip_suffix(q))
        {
            return inner;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_red_low_alpha_high() {
        assert_eq!(decode("FF5733"), Ok(0xFF33_57FF));
        assert_eq!(decode("#ff5733"), Ok(0xFF33_57FF));
        assert_eq!(decode("CFAA4C"), Ok(pack(0xCF, 0xAA, 0x4C, 0xFF)));
    }

    #[test]
    fn rgb_equals_rgb_with_full_alpha() {
        for t in ["000000", "FFFFFF", "123abc", "CFAA4C", "00ff00", "7F7F7F"] {
            assert_eq!(decode(t), decode(&format!("{t}FF")), "{t}");
        }
    }

    #[test]
    fn rgba_keeps_alpha() {
        assert_eq!(decode("#FF5733CC"), Ok(0xCC33_57FF));
        assert_eq!(decode("00000000"), Ok(0));
    }

    #[test]
    fn short_hex_is_left_padded() {
        assert_eq!(decode("FF"), decode("0000FF"));
        assert_eq!(decode("33550"), decode("033550"));
        // Short all-digit tokens are hex, not decimal.
        assert_eq!(decode("255"), Ok(pack(0x00, 0x02, 0x55, 0xFF)));
    }

    #[test]
    fn zero_is_opaque_black() {
        assert_eq!(decode("0"), Ok(OPAQUE_BLACK));
        assert_eq!(decode(" '0' "), Ok(OPAQUE_BLACK));
    }

    #[test]
    fn long_decimal_passes_through() {
        assert_eq!(decode("4294924083"), Ok(4_294_924_083));
        assert_eq!(decode("3439286067"), Ok(3_439_286_067));
        assert_eq!(decode("\"4294967295\""), Ok(u32::MAX));
        assert!(decode("4294967296").is_err());
        assert!(decode("99999999999999999999999").is_err());
    }

    #[test]
    fn whitespace_and_quotes_are_trimmed() {
        assert_eq!(decode("  \"#FF5733\"  "), decode("FF5733"));
        assert_eq!(decode("'CFAA4C'"), decode("CFAA4C"));
        // Only one layer, and only when matching.
        assert!(decode("\"'FF5733'\"").is_err());
        assert!(decode("\"FF5733'").is_err());
    }

    #[test]
    fn rejects_invalid_tokens() {
        for t in ["", "   ", "\"\"", "GGGGGG", "INVALID", "0.0", "#", "##FF5733", "1234567", "123456789A"] {
            assert!(decode(t).is_err(), "{t:?} should be invalid");
        }
    }

    #[test]
    fn error_names_the_token() {
        let err = decode("GGGGGG").unwrap_err();
        assert_eq!(err.token, "GGGGGG");
        assert!(err.to_string().contains("GGGGGG"));
    }
}
