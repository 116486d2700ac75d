// Segmentation vectors for the full Jyutping inventory.
//
// Every case runs the default `Segmentor` so the expectations double as a
// check on the syllable table.

use libjyutping::{canonical, Segmentor, Segmenter};

fn best(text: &str) -> Vec<String> {
    Segmentor::new()
        .segment_texts(text)
        .into_iter()
        .next()
        .unwrap_or_default()
}

#[test]
fn neihou() {
    assert_eq!(best("neihou"), vec!["nei", "hou"]);
}

#[test]
fn hoenggong_prefers_fewer_syllables() {
    assert_eq!(best("hoenggong"), vec!["hoeng", "gong"]);
}

#[test]
fn gwongzauwaa() {
    assert_eq!(best("gwongzauwaa"), vec!["gwong", "zau", "waa"]);
}

#[test]
fn jyutping() {
    assert_eq!(best("jyutping"), vec!["jyut", "ping"]);
}

#[test]
fn ngo_is_one_syllable() {
    assert_eq!(best("ngo"), vec!["ngo"]);
}

#[test]
fn nasal_syllables() {
    assert_eq!(best("m"), vec!["m"]);
    assert_eq!(best("ng"), vec!["ng"]);
}

#[test]
fn trailing_letters_are_left_uncovered() {
    let schemes = Segmentor::new().segment_texts("neihoux");
    assert_eq!(schemes[0], vec!["nei", "hou"]);
    assert!(schemes.iter().all(|s| s.concat().len() < 7));
}

#[test]
fn unknown_letters_give_nothing() {
    assert!(Segmentor::new().segment("xq").is_empty());
}

#[test]
fn schemes_are_ranked_by_coverage() {
    let seg = Segmentor::new().segment("neihou");
    let lengths: Vec<usize> = seg.iter().map(|s| s.length()).collect();
    assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(lengths[0], 6);
}

#[test]
fn yu_spellings() {
    let seg = Segmentor::new().segment("yut");
    let scheme = seg.best().unwrap();
    assert_eq!(scheme.input_text(), "yut");
    assert_eq!(scheme.ping_text(), "jyut");

    // only a bare yu gains the j
    assert_eq!(canonical("zyu"), "zyu");
    assert_eq!(canonical("yuk"), "yuk");
    assert_eq!(canonical("yun"), "jyun");
}
