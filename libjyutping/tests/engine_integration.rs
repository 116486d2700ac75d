//! `JyutpingEngine` end to end: real segmentation over a fixture lexicon.

use libjyutping::{Combo, Config, JyutpingEngine, Lexicon, LexiconHandle, RedbStore};

fn fixture() -> Lexicon {
    Lexicon::from_entries(
        [
            ("你", "nei5"),
            ("你好", "nei5 hou2"),
            ("好", "hou2"),
            ("粵", "jyut6"),
            ("粵語", "jyut6 jyu5"),
            ("廣州", "gwong2 zau1"),
            ("廣州話", "gwong2 zau1 waa2"),
            ("香港", "hoeng1 gong2"),
        ],
        true,
    )
}

fn engine() -> JyutpingEngine {
    JyutpingEngine::new(LexiconHandle::with_store(fixture()), Config::default())
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("libjyutping_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn whole_word_comes_first() {
    let out = engine().suggest("gwongzauwaa");
    assert_eq!(out[0].text, "廣州話");
    assert_eq!(out[0].input, "gwongzauwaa");
}

#[test]
fn abbreviation() {
    let out = engine().suggest("hg");
    assert_eq!(out[0].text, "香港");
    assert_eq!(out[0].input, "hg");
}

#[test]
fn toned_input() {
    let out = engine().suggest("nei5");
    assert_eq!(out[0].text, "你");
    assert_eq!(out[0].romanization, "nei5");
}

#[test]
fn bare_yu_finds_jyu_words() {
    let out = engine().suggest("yut");
    assert_eq!(out[0].text, "粵");
    assert_eq!(out[0].input, "yut");
}

#[test]
fn uppercase_and_padding_are_normalized() {
    let e = engine();
    assert_eq!(e.suggest("  NeiHou "), e.suggest("neihou"));
}

#[test]
fn ten_key_finds_words() {
    // h-o-u
    let out = engine().ten_key(&[Combo::GHI, Combo::MNO, Combo::TUV]);
    assert_eq!(out[0].text, "好");
    // h-g as an abbreviation
    let out = engine().ten_key(&[Combo::GHI, Combo::GHI]);
    assert!(out.iter().any(|c| c.text == "香港"));
}

#[test]
fn data_dir_prefers_redb() {
    let dir = temp_dir("redb");
    RedbStore::create(dir.join("lexicon.redb"), &fixture(), true).unwrap();
    let e = JyutpingEngine::from_data_dir(&dir).unwrap();
    assert_eq!(e.suggest("neihou")[0].text, "你好");
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn data_dir_reads_bincode_and_config() {
    let dir = temp_dir("bincode");
    fixture().save_bincode(dir.join("lexicon.bincode")).unwrap();
    let mut config = Config::default();
    config.shortcut_limit = 1;
    config.save_toml(dir.join("config.toml")).unwrap();

    let e = JyutpingEngine::from_data_dir(&dir).unwrap();
    assert_eq!(e.config().shortcut_limit, 1);
    assert_eq!(e.suggest("neihou")[0].text, "你好");
    let _ = std::fs::remove_dir_all(dir);
}
