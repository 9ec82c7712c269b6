//! Train a model from a small corpus and tag through the public API.

use std::io::Write;

use sejong::corpus::read_corpus;
use sejong::prelude::*;
use sejong::train::train;

const CORPUS: &str = "\
뭐\t뭐/Noun
타고\t타/Verb + 고/Eomi
가\t가/Verb

나는\t나/Noun + 는/Josa
사과를\t사과/Noun + 를/Josa
먹었다\t먹/Verb + 었다/Eomi
";

/// Trains on the sample corpus, saves the artifact and loads it back.
fn trained_tagger() -> HmmTagger {
    let mut corpus_file = tempfile::NamedTempFile::new().unwrap();
    corpus_file.write_all(CORPUS.as_bytes()).unwrap();

    let corpus = read_corpus(corpus_file.path(), 0).unwrap();
    let trained = train(&corpus).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    trained.save(&model_path).unwrap();

    HmmTagger::from_path(&model_path).unwrap()
}

fn rendered(tagger: &HmmTagger, sentence: &str) -> Vec<(String, String)> {
    tagger
        .tag(sentence)
        .unwrap()
        .into_iter()
        .map(|(morph, tag)| (morph, tagger.tag_name(tag).to_string()))
        .collect()
}

#[test]
fn spaceless_sentence_decodes_to_corpus_tags() {
    let tagger = trained_tagger();
    let tagged = rendered(&tagger, "뭐타고가");

    let joined: String = tagged.iter().map(|(morph, _)| morph.as_str()).collect();
    assert_eq!(joined, "뭐타고가");
    for (_, tag) in &tagged {
        assert!(
            tag == "Noun" || tag == "Verb" || tag == "Eomi" || tag == "Josa",
            "unexpected tag {}",
            tag
        );
    }
    assert_eq!(
        tagged,
        vec![
            ("뭐".to_string(), "Noun".to_string()),
            ("타".to_string(), "Verb".to_string()),
            ("고".to_string(), "Eomi".to_string()),
            ("가".to_string(), "Verb".to_string()),
        ]
    );
}

#[test]
fn corpus_sentence_round_trips() {
    let tagger = trained_tagger();
    assert_eq!(
        rendered(&tagger, "나는 사과를 먹었다"),
        vec![
            ("나".to_string(), "Noun".to_string()),
            ("는".to_string(), "Josa".to_string()),
            ("사과".to_string(), "Noun".to_string()),
            ("를".to_string(), "Josa".to_string()),
            ("먹".to_string(), "Verb".to_string()),
            ("었다".to_string(), "Eomi".to_string()),
        ]
    );
}

#[test]
fn unknown_input_is_inferred_as_noun() {
    let tagger = trained_tagger();
    assert_eq!(
        rendered(&tagger, "abc"),
        vec![("abc".to_string(), "Noun".to_string())]
    );
}

#[test]
fn tagging_is_deterministic_across_loads() {
    let first = trained_tagger().tag("나는 사과를 먹었다").unwrap();
    let second = trained_tagger().tag("나는 사과를 먹었다").unwrap();
    assert_eq!(first, second);
}

#[test]
fn user_dictionary_overrides_the_trained_tables() {
    let mut tagger = trained_tagger();
    tagger.add_user_dictionary("타고", "Noun", 0.0);

    let tagged = rendered(&tagger, "타고");
    assert_eq!(tagged, vec![("타고".to_string(), "Noun".to_string())]);
}

#[test]
fn empty_and_blank_inputs_give_empty_output() {
    let tagger = trained_tagger();
    assert!(tagger.tag("").unwrap().is_empty());
    assert!(tagger.tag(" ").unwrap().is_empty());
}
