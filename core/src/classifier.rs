//! Input shape classification and romanization string helpers.
//!
//! Raw keystrokes may carry explicit tone digits (`1`..=`6`) and syllable
//! separators (`'`). The dispatcher branches on the product of the two flags.

/// Syllable boundary marker typed by the user.
pub const SEPARATOR: char = '\'';

/// True for the six Cantonese tone digits.
pub fn is_tone(ch: char) -> bool {
    matches!(ch, '1'..='6')
}

pub fn is_separator(ch: char) -> bool {
    ch == SEPARATOR
}

/// Two independent facts about the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputShape {
    pub has_separators: bool,
    pub has_tones: bool,
}

impl InputShape {
    pub fn classify(text: &str) -> Self {
        Self {
            has_separators: text.chars().any(is_separator),
            has_tones: text.chars().any(is_tone),
        }
    }
}

/// The tone digits of `text`, in order.
pub fn tones(text: &str) -> String {
    text.chars().filter(|c| is_tone(*c)).collect()
}

pub fn removed_tones(text: &str) -> String {
    text.chars().filter(|c| !is_tone(*c)).collect()
}

pub fn removed_separators(text: &str) -> String {
    text.chars().filter(|c| !is_separator(*c)).collect()
}

pub fn removed_spaces(text: &str) -> String {
    text.chars().filter(|c| *c != ' ').collect()
}

pub fn removed_separators_tones(text: &str) -> String {
    text.chars()
        .filter(|c| !is_separator(*c) && !is_tone(*c))
        .collect()
}

/// Toneless, space-free spelling: the text the ping code is computed from.
pub fn removed_spaces_tones(text: &str) -> String {
    text.chars().filter(|c| *c != ' ' && !is_tone(*c)).collect()
}

/// First `count` characters of `text`.
pub fn char_prefix(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// `text` without its first `count` characters.
pub fn char_suffix(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// The character at char position `index`, if any.
pub fn char_at(text: &str, index: usize) -> Option<char> {
    text.chars().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_all_four_shapes() {
        assert_eq!(
            InputShape::classify("neihou"),
            InputShape { has_separators: false, has_tones: false }
        );
        assert_eq!(
            InputShape::classify("nei5hou"),
            InputShape { has_separators: false, has_tones: true }
        );
        assert_eq!(
            InputShape::classify("nei'hou"),
            InputShape { has_separators: true, has_tones: false }
        );
        assert_eq!(
            InputShape::classify("nei5'hou2"),
            InputShape { has_separators: true, has_tones: true }
        );
    }

    #[test]
    fn digits_outside_tone_range_are_not_tones() {
        assert!(!InputShape::classify("nei7").has_tones);
        assert!(!InputShape::classify("nei0").has_tones);
    }

    #[test]
    fn stripping_helpers() {
        assert_eq!(tones("gwong2 wan3"), "23");
        assert_eq!(removed_tones("gwong2 wan3"), "gwong wan");
        assert_eq!(removed_spaces_tones("gwong2 wan3"), "gwongwan");
        assert_eq!(removed_separators_tones("nei5'hou2"), "neihou");
    }

    #[test]
    fn char_slicing() {
        assert_eq!(char_prefix("gwongwan", 5), "gwong");
        assert_eq!(char_suffix("gwongwan", 5), "wan");
        assert_eq!(char_suffix("abc", 10), "");
        assert_eq!(char_prefix("abc", 10), "abc");
        assert_eq!(char_at("nei5", 3), Some('5'));
    }
}
