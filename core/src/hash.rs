//! Deterministic lookup codes shared by the lexicon builder and the engine.
//!
//! The store is keyed by integer codes rather than strings. Both sides must
//! agree on the function bit-for-bit, so it is a fixed 64-bit FNV-1a over the
//! UTF-8 bytes, reinterpreted as `i64` (the width of an SQLite integer column).
//! A lexicon built with a different function has to be rebuilt.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash an arbitrary string. The empty string maps to 0, which is never a
/// valid key.
pub fn code(text: &str) -> i64 {
    if text.is_empty() {
        return 0;
    }
    let mut hash = FNV_OFFSET_BASIS;
    for byte in text.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash as i64
}

/// Code for a toneless, space-free romanization such as "gwongwan".
pub fn ping_code(ping: &str) -> i64 {
    code(ping)
}

/// Jyutping spells the same initial as `j` while users commonly type `y`;
/// abbreviations collapse the two.
pub fn normalized_shortcut(text: &str) -> String {
    text.chars().map(|c| if c == 'y' { 'j' } else { c }).collect()
}

/// Code for an abbreviation such as "gw" (one letter per syllable).
pub fn shortcut_code(abbreviation: &str) -> i64 {
    code(&normalized_shortcut(abbreviation))
}

/// Abbreviation of a canonical romanization: first letter of every syllable.
pub fn abbreviation(romanization: &str) -> String {
    romanization
        .split(' ')
        .filter_map(|syllable| syllable.chars().next())
        .collect()
}
