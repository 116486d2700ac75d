//! Ten-key letter groups.

use serde::{Deserialize, Serialize};

/// One physical key of a ten-key pad. A press stands for any of its letters.
///
/// Letters that never occur in Jyutping (q, r, v, x) are left out, so `PQRS`
/// only carries p and s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combo {
    ABC,
    DEF,
    GHI,
    JKL,
    MNO,
    PQRS,
    TUV,
    WXYZ,
}

impl Combo {
    pub const ALL: [Combo; 8] = [
        Combo::ABC,
        Combo::DEF,
        Combo::GHI,
        Combo::JKL,
        Combo::MNO,
        Combo::PQRS,
        Combo::TUV,
        Combo::WXYZ,
    ];

    /// Key label.
    pub fn text(&self) -> &'static str {
        match self {
            Combo::ABC => "ABC",
            Combo::DEF => "DEF",
            Combo::GHI => "GHI",
            Combo::JKL => "JKL",
            Combo::MNO => "MNO",
            Combo::PQRS => "PQRS",
            Combo::TUV => "TUV",
            Combo::WXYZ => "WXYZ",
        }
    }

    /// Every letter the press may stand for.
    pub fn letters(&self) -> &'static [char] {
        match self {
            Combo::ABC => &['a', 'b', 'c'],
            Combo::DEF => &['d', 'e', 'f'],
            Combo::GHI => &['g', 'h', 'i'],
            Combo::JKL => &['j', 'k', 'l'],
            Combo::MNO => &['m', 'n', 'o'],
            Combo::PQRS => &['p', 's'],
            Combo::TUV => &['t', 'u'],
            Combo::WXYZ => &['w', 'y', 'z'],
        }
    }

    /// The consonant letters of the key, the ones that can open a syllable
    /// inside a word.
    pub fn anchors(&self) -> &'static [char] {
        match self {
            Combo::ABC => &['b', 'c'],
            Combo::DEF => &['d', 'f'],
            Combo::GHI => &['g', 'h'],
            Combo::JKL => &['j', 'k', 'l'],
            Combo::MNO => &['m', 'n'],
            Combo::PQRS => &['p', 's'],
            Combo::TUV => &['t'],
            Combo::WXYZ => &['w', 'y', 'z'],
        }
    }

    /// The key a letter lives on.
    pub fn of(letter: char) -> Option<Combo> {
        let letter = letter.to_ascii_lowercase();
        Combo::ALL.into_iter().find(|c| c.letters().contains(&letter))
    }

    /// Keys for a letter sequence; `None` if any letter has no key.
    pub fn sequence(letters: &str) -> Option<Vec<Combo>> {
        letters.chars().map(Combo::of).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_consonant_letters() {
        for combo in Combo::ALL {
            assert!((2..=4).contains(&combo.letters().len()));
            assert!(combo.anchors().iter().all(|a| combo.letters().contains(a)));
            assert!(combo.anchors().iter().all(|a| !"aeiou".contains(*a)));
        }
    }

    #[test]
    fn letter_lookup() {
        assert_eq!(Combo::of('h'), Some(Combo::GHI));
        assert_eq!(Combo::of('Y'), Some(Combo::WXYZ));
        assert_eq!(Combo::of('q'), None);
        assert_eq!(Combo::sequence("ho"), Some(vec![Combo::GHI, Combo::MNO]));
        assert_eq!(Combo::sequence("hq"), None);
    }
}
