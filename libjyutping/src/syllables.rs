//! Jyutping syllable inventory.
//!
//! A syllable is an optional initial followed by a final, or one of the
//! syllabic nasals `m` / `ng`. Tones are not part of the inventory.

use phf::phf_set;

/// The nineteen Jyutping initials.
pub static INITIALS: phf::Set<&'static str> = phf_set! {
    "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "ng", "h", "gw", "kw", "w", "z", "c", "s", "j",
};

/// Finals, including the ones that only follow an initial.
pub static FINALS: phf::Set<&'static str> = phf_set! {
    "aa", "aai", "aau", "aam", "aan", "aang", "aap", "aat", "aak",
    "a", "ai", "au", "am", "an", "ang", "ap", "at", "ak",
    "e", "ei", "eu", "em", "en", "eng", "ep", "et", "ek",
    "i", "iu", "im", "in", "ing", "ip", "it", "ik",
    "o", "oi", "ou", "on", "ong", "ot", "ok",
    "u", "ui", "un", "ung", "ut", "uk",
    "oe", "oeng", "oet", "oek",
    "eoi", "eon", "eot",
    "yu", "yun", "yut",
};

/// Syllables made of a nasal alone.
pub static NASALS: phf::Set<&'static str> = phf_set! { "m", "ng" };

/// Finals that form a syllable without an initial, e.g. "aa" or "ou".
fn standalone(final_: &str) -> bool {
    final_.starts_with(&['a', 'e', 'o'][..]) && !final_.starts_with("eo") && !final_.starts_with("oe")
}

/// Whether `text` is a toneless Jyutping syllable.
pub fn is_syllable(text: &str) -> bool {
    if NASALS.contains(text) || (FINALS.contains(text) && standalone(text)) {
        return true;
    }
    text.char_indices()
        .skip(1)
        .any(|(i, _)| INITIALS.contains(&text[..i]) && FINALS.contains(&text[i..]))
}

/// Every syllable the inventory can spell, sorted.
pub fn inventory() -> Vec<String> {
    let mut out: Vec<String> = NASALS.iter().map(|s| s.to_string()).collect();
    out.extend(FINALS.iter().filter(|f| standalone(f)).map(|f| f.to_string()));
    for initial in INITIALS.iter() {
        out.extend(FINALS.iter().map(|f| format!("{}{}", initial, f)));
    }
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_syllables_are_valid() {
        for s in ["nei", "hou", "gwong", "jyut", "jyu", "ngo", "m", "ng", "aa", "oi", "hoeng", "seoi"] {
            assert!(is_syllable(s), "{}", s);
        }
    }

    #[test]
    fn non_syllables_are_rejected() {
        for s in ["", "x", "i", "u", "yu", "eoi", "gwx", "hh"] {
            assert!(!is_syllable(s), "{}", s);
        }
    }

    #[test]
    fn inventory_is_consistent() {
        let all = inventory();
        assert!(all.iter().all(|s| is_syllable(s)));
        assert!(all.contains(&"gwong".to_string()));
        assert!(!all.contains(&"yu".to_string()));
    }
}
