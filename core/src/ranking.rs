//! Candidate ordering rules.
//!
//! All sorts here are stable, so candidates that compare equal keep the
//! order the matcher produced them in. The row-order window of `ordered` is
//! not transitive, so it is applied by insertion rather than `sort_by`.

use std::cmp::Reverse;

use crate::candidate::Candidate;
use crate::classifier::removed_spaces_tones;

/// Longest consumption first, then shortest word. Candidates whose toneless
/// romanization spells `text` exactly are then moved to the front.
pub fn preferred(mut candidates: Vec<Candidate>, text: &str) -> Vec<Candidate> {
    candidates.sort_by_key(|c| (Reverse(c.input_len()), c.text_len()));
    let (mut exact, rest): (Vec<Candidate>, Vec<Candidate>) = candidates
        .into_iter()
        .partition(|c| removed_spaces_tones(&c.romanization) == text);
    exact.extend(rest);
    exact
}

/// Full consumers first. Otherwise a row more than `tolerance` positions
/// ahead wins, and rows inside the window tie on longer consumption.
pub fn ordered(candidates: Vec<Candidate>, text_count: usize, tolerance: i64) -> Vec<Candidate> {
    insertion_sorted(candidates, |a, b| precedes(a, b, text_count, tolerance))
}

fn precedes(a: &Candidate, b: &Candidate, text_count: usize, tolerance: i64) -> bool {
    let (a_len, b_len) = (a.input_len(), b.input_len());
    let (a_full, b_full) = (a_len == text_count, b_len == text_count);
    if a_full != b_full {
        return a_full;
    }
    let tolerance = tolerance.max(0);
    if a.order < b.order.saturating_sub(tolerance) {
        true
    } else if b.order < a.order.saturating_sub(tolerance) {
        false
    } else {
        a_len > b_len
    }
}

/// Stable insertion: each item moves ahead of every neighbour it strictly
/// precedes. Well defined for comparators that are not total orders.
fn insertion_sorted<T, F>(items: Vec<T>, precedes: F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let mut at = out.len();
        while at > 0 && precedes(&item, &out[at - 1]) {
            at -= 1;
        }
        out.insert(at, item);
    }
    out
}

/// Ten-key ordering: longer consumption, shorter word, lower row.
pub fn ten_key_sorted(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| (Reverse(c.input_len()), c.text_len(), c.order));
    candidates
}

/// A matcher hit remembered together with whether its scheme spans the
/// whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCandidate {
    pub candidate: Candidate,
    pub is_exactly_match: bool,
}

impl RowCandidate {
    pub fn new(candidate: Candidate, is_exactly_match: bool) -> Self {
        Self {
            candidate,
            is_exactly_match,
        }
    }
}

/// Exact matches first; the rest falls back to the `ordered` rules.
pub fn rank_rows(rows: Vec<RowCandidate>, text_count: usize, tolerance: i64) -> Vec<Candidate> {
    let (exact, rest): (Vec<RowCandidate>, Vec<RowCandidate>) =
        rows.into_iter().partition(|r| r.is_exactly_match);
    let mut out = ordered(exact.into_iter().map(|r| r.candidate).collect(), text_count, tolerance);
    out.extend(ordered(rest.into_iter().map(|r| r.candidate).collect(), text_count, tolerance));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(text: &str, rom: &str, input: &str, order: i64) -> Candidate {
        Candidate::new(text, rom, input, input, order)
    }

    #[test]
    fn preferred_sorts_by_consumption_then_text_length() {
        let out = preferred(
            vec![
                cand("你", "nei5", "nei", 1),
                cand("你好嗎", "nei5 hou2 maa3", "neihou", 3),
                cand("你好", "nei5 hou2", "neihou", 2),
            ],
            "neihoum",
        );
        let words: Vec<&str> = out.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(words, vec!["你好", "你好嗎", "你"]);
    }

    #[test]
    fn preferred_promotes_verbatim_spellings() {
        let out = preferred(
            vec![
                cand("你好", "nei5 hou2", "neihou", 2),
                cand("你", "nei5", "nei", 1),
            ],
            "nei",
        );
        assert_eq!(out[0].text, "你");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn ordered_puts_full_consumers_first() {
        let out = ordered(
            vec![
                cand("廣", "gwong2", "gwong", 1),
                cand("廣韻", "gwong2 wan5", "gwongwan", 90_000),
            ],
            8,
            50_000,
        );
        assert_eq!(out[0].text, "廣韻");
    }

    #[test]
    fn ordered_ties_rows_inside_the_window() {
        // inside the window: longer consumption wins
        let out = ordered(
            vec![cand("甲", "gaap3", "g", 10), cand("乙", "jyut3", "ga", 20)],
            5,
            50_000,
        );
        assert_eq!(out[0].text, "乙");

        // two rows apart across a multiple of the window still tie
        let out = ordered(
            vec![cand("甲", "gaap3", "g", 49_999), cand("乙", "jyut3", "ga", 50_001)],
            5,
            50_000,
        );
        assert_eq!(out[0].text, "乙");

        // just inside the window: still a tie
        let out = ordered(
            vec![cand("甲", "gaap3", "g", 0), cand("乙", "jyut3", "ga", 50_000)],
            5,
            50_000,
        );
        assert_eq!(out[0].text, "乙");

        // outside the window: lower row wins
        let out = ordered(
            vec![cand("甲", "gaap3", "g", 10), cand("乙", "jyut3", "ga", 60_000)],
            5,
            50_000,
        );
        assert_eq!(out[0].text, "甲");
    }

    #[test]
    fn ten_key_order() {
        let out = ten_key_sorted(vec![
            cand("海", "hoi2", "h", 5),
            cand("好", "hou2", "h", 2),
            cand("香港", "hoeng1 gong2", "hg", 9),
            cand("開心", "hoi1 sam1", "hs", 3),
        ]);
        let words: Vec<&str> = out.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(words, vec!["開心", "香港", "好", "海"]);
    }

    #[test]
    fn exact_rows_come_first() {
        let out = rank_rows(
            vec![
                RowCandidate::new(cand("廣", "gwong2", "gwong", 1), false),
                RowCandidate::new(cand("廣韻", "gwong2 wan5", "gwongwan", 200_000), true),
            ],
            8,
            50_000,
        );
        assert_eq!(out[0].text, "廣韻");
    }

    #[test]
    fn ranked_rows_use_the_distance_window() {
        let out = rank_rows(
            vec![
                RowCandidate::new(cand("甲", "gaap3", "g", 49_999), false),
                RowCandidate::new(cand("乙", "jyut3", "ga", 50_001), false),
                RowCandidate::new(cand("丙", "bing2", "gaa", 150_000), true),
            ],
            5,
            50_000,
        );
        let words: Vec<&str> = out.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(words, vec!["丙", "乙", "甲"]);
    }
}
