//! Keyword sanitization for the Google Ads volume endpoints.
//!
//! # Design
//! The remote volume endpoints reject keywords containing certain symbols
//! and punctuation. The denylist is kept as a data table of inclusive code
//! point ranges rather than inline match arms, so the set can be adjusted
//! without touching request-building code. Only the search-volume builder
//! consults it; the SERP and site endpoints accept raw input, matching the
//! remote API's own asymmetry.

/// Disallowed code point ranges, inclusive on both ends, sorted by start.
///
/// Letters, digits, spaces, apostrophes, hyphens, periods, slashes and
/// underscores stay allowed; everything here has been observed to fail
/// remote-side validation.
const DISALLOWED_RANGES: &[(u32, u32)] = &[
    (0x0000, 0x001F), // C0 controls
    (0x0021, 0x0026), // ! " # $ % &
    (0x0028, 0x002C), // ( ) * + ,
    (0x003A, 0x0040), // : ; < = > ? @
    (0x005B, 0x005E), // [ \ ] ^
    (0x0060, 0x0060), // `
    (0x007B, 0x009F), // { | } ~ DEL, C1 controls
    (0x00A1, 0x00BF), // Latin-1 punctuation and symbols
    (0x2000, 0x206F), // general punctuation
    (0x2E00, 0x2E7F), // supplemental punctuation
    (0x3000, 0x303F), // CJK symbols and punctuation
    (0xFE30, 0xFE6F), // CJK compatibility forms, small form variants
    (0xFF01, 0xFF0F), // fullwidth ! through /
    (0xFF1A, 0xFF20), // fullwidth : through @
    (0xFF3B, 0xFF40), // fullwidth [ through `
    (0xFF5B, 0xFF65), // fullwidth { through halfwidth middle dot
];

/// Returns true if `keyword` contains any disallowed code point.
///
/// Pure and deterministic; used by the search-volume builder to drop
/// keywords the remote endpoint would reject.
pub fn is_invalid(keyword: &str) -> bool {
    keyword.chars().any(is_disallowed)
}

fn is_disallowed(c: char) -> bool {
    let cp = c as u32;
    let idx = DISALLOWED_RANGES.partition_point(|&(start, _)| start <= cp);
    idx > 0 && cp <= DISALLOWED_RANGES[idx - 1].1
}
