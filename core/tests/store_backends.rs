//! The engine answers the same whether the lexicon lives in memory, in a
//! bincode file, or in a redb database.

use libjyutping_core::{
    Config, Engine, Lexicon, LexiconHandle, NoSegmenter, RedbStore, Segmentation, SuggestOptions,
};

fn fixture() -> Lexicon {
    Lexicon::from_entries(
        [
            ("你", "nei5"),
            ("你好", "nei5 hou2"),
            ("好", "hou2"),
            ("廣", "gwong2"),
            ("廣韻", "gwong2 wan3"),
            ("香港", "hoeng1 gong2"),
        ],
        true,
    )
}

fn temp_path(name: &str, ext: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("libjyutping_it_{}_{}.{}", name, std::process::id(), ext))
}

fn answers(handle: LexiconHandle) -> Vec<Vec<String>> {
    let engine = Engine::new(handle, NoSegmenter, Config::default());
    let inputs: [(&str, Segmentation); 4] = [
        ("neihou", Segmentation::from_texts(&[&["nei", "hou"]])),
        ("gwongw", Segmentation::from_texts(&[&["gwong"]])),
        ("hg", Segmentation::default()),
        ("nei5", Segmentation::default()),
    ];
    inputs
        .iter()
        .map(|(text, seg)| {
            engine
                .suggest(text, seg, SuggestOptions::default())
                .into_iter()
                .map(|c| format!("{}|{}", c.text, c.input))
                .collect()
        })
        .collect()
}

#[test]
fn redb_and_bincode_match_memory() {
    let expected = answers(LexiconHandle::with_store(fixture()));
    assert!(expected.iter().all(|a| !a.is_empty()));

    let redb_path = temp_path("parity", "redb");
    let store = RedbStore::create(&redb_path, &fixture(), true).expect("create redb");
    assert_eq!(answers(LexiconHandle::with_store(store)), expected);

    let bin_path = temp_path("parity", "bincode");
    fixture().save_bincode(&bin_path).expect("save bincode");
    let loaded = Lexicon::load_bincode(&bin_path).expect("load bincode");
    assert_eq!(answers(LexiconHandle::with_store(loaded)), expected);

    let _ = std::fs::remove_file(redb_path);
    let _ = std::fs::remove_file(bin_path);
}

#[test]
fn handle_lifecycle_through_engine() {
    let handle = LexiconHandle::new();
    let engine = Engine::new(handle.clone(), NoSegmenter, Config::default());
    let seg = Segmentation::from_texts(&[&["nei", "hou"]]);
    assert!(engine.suggest("neihou", &seg, SuggestOptions::default()).is_empty());

    assert!(handle.prepare(|| Ok(fixture())).unwrap());
    // second prepare is a no-op
    assert!(!handle.prepare(|| Ok(Lexicon::new())).unwrap());
    assert_eq!(engine.suggest("neihou", &seg, SuggestOptions::default())[0].text, "你好");

    handle.close();
    assert!(!handle.is_ready());
    assert!(engine.suggest("neihou", &seg, SuggestOptions::default()).is_empty());
}
