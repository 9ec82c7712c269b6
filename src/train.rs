//! Turns a tagged corpus into the log-probability tables of [`ModelData`].

use indexmap::IndexMap;

use crate::corpus::{as_bigram_tags, Sentence};
use crate::error::{SejongError, SejongResult};
use crate::model::{ModelData, TRANSITION_SEPARATOR};

/// Counts emission, transition and begin frequencies over `corpus` and
/// converts them to natural-log probabilities.
///
/// Emissions are normalized per tag, transitions per previous tag, and
/// begins over the number of sentences. Every sentence also contributes one
/// `last-tag -> EOS` transition.
pub fn train(corpus: &[Sentence]) -> SejongResult<ModelData> {
    let mut emission: IndexMap<String, IndexMap<String, u64>> = IndexMap::new();
    let mut transition: IndexMap<String, u64> = IndexMap::new();
    let mut begin: IndexMap<String, u64> = IndexMap::new();

    for sentence in corpus {
        let (first, last) = match (sentence.first(), sentence.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => continue,
        };

        for (word, pos) in sentence {
            *emission
                .entry(pos.clone())
                .or_insert_with(IndexMap::new)
                .entry(word.clone())
                .or_insert(0) += 1;
        }

        for (prev, next) in as_bigram_tags(sentence) {
            let key = format!("{}{}{}", prev, TRANSITION_SEPARATOR, next);
            *transition.entry(key).or_insert(0) += 1;
        }

        *begin.entry(first.1.clone()).or_insert(0) += 1;
        let eos_key = format!("{}{}EOS", last.1, TRANSITION_SEPARATOR);
        *transition.entry(eos_key).or_insert(0) += 1;
    }

    if emission.is_empty() {
        return Err(SejongError::EmptyModel("emission"));
    }

    Ok(to_log_prob(emission, transition, begin))
}

/// Converts raw counts into log probabilities so the decoder can add
/// instead of multiply.
fn to_log_prob(
    emission: IndexMap<String, IndexMap<String, u64>>,
    transition: IndexMap<String, u64>,
    begin: IndexMap<String, u64>,
) -> ModelData {
    let mut data = ModelData::default();

    for (pos, words) in emission {
        let base: u64 = words.values().sum();
        let words = words
            .into_iter()
            .map(|(word, count)| (word, (count as f64 / base as f64).ln()))
            .collect();
        data.emission.insert(pos, words);
    }

    let mut base: IndexMap<String, u64> = IndexMap::new();
    for (key, count) in &transition {
        let prev = key.splitn(2, TRANSITION_SEPARATOR).next().unwrap_or(key);
        *base.entry(prev.to_string()).or_insert(0) += count;
    }
    for (key, count) in transition {
        let total = match key.splitn(2, TRANSITION_SEPARATOR).next() {
            Some(prev) => base[prev],
            None => count,
        };
        let prob = (count as f64 / total as f64).ln();
        data.transition.insert(key, prob);
    }

    let total: u64 = begin.values().sum();
    for (pos, count) in begin {
        data.begin
            .insert(pos, (count as f64 / total as f64).ln());
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(pairs: &[(&str, &str)]) -> Sentence {
        pairs
            .iter()
            .map(|(w, p)| (w.to_string(), p.to_string()))
            .collect()
    }

    #[test]
    fn single_sentence_counts() {
        let corpus = vec![sentence(&[("나", "Noun"), ("는", "Josa")])];
        let data = train(&corpus).unwrap();

        // every count is 1 of 1, so all probabilities are ln(1) = 0
        assert_eq!(data.emission["Noun"]["나"], 0.0);
        assert_eq!(data.emission["Josa"]["는"], 0.0);
        assert_eq!(data.transition["Noun_Josa"], 0.0);
        assert_eq!(data.transition["Josa_EOS"], 0.0);
        assert_eq!(data.begin["Noun"], 0.0);
    }

    #[test]
    fn transitions_normalize_per_previous_tag() {
        let corpus = vec![
            sentence(&[("나", "Noun"), ("는", "Josa")]),
            sentence(&[("나", "Noun"), ("가", "Verb")]),
        ];
        let data = train(&corpus).unwrap();

        // Noun is followed by Josa once and by Verb once
        assert!((data.transition["Noun_Josa"] - (0.5f64).ln()).abs() < 1e-12);
        assert!((data.transition["Noun_Verb"] - (0.5f64).ln()).abs() < 1e-12);
        // Josa and Verb each end exactly one sentence
        assert_eq!(data.transition["Josa_EOS"], 0.0);
        assert_eq!(data.transition["Verb_EOS"], 0.0);
    }

    #[test]
    fn emissions_normalize_per_tag() {
        let corpus = vec![sentence(&[
            ("나", "Noun"),
            ("사과", "Noun"),
            ("나", "Noun"),
        ])];
        let data = train(&corpus).unwrap();

        assert!((data.emission["Noun"]["나"] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!((data.emission["Noun"]["사과"] - (1.0f64 / 3.0).ln()).abs() < 1e-12);
        // Noun is followed by Noun twice and by EOS once
        assert!((data.transition["Noun_Noun"] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn begins_normalize_over_sentences() {
        let corpus = vec![
            sentence(&[("나", "Noun")]),
            sentence(&[("나", "Noun")]),
            sentence(&[("가", "Verb")]),
        ];
        let data = train(&corpus).unwrap();

        assert!((data.begin["Noun"] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!((data.begin["Verb"] - (1.0f64 / 3.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = train(&[]).unwrap_err();
        assert!(matches!(err, SejongError::EmptyModel("emission")));
    }

    #[test]
    fn all_probabilities_are_non_positive() {
        let corpus = vec![
            sentence(&[("나", "Noun"), ("는", "Josa"), ("가", "Verb")]),
            sentence(&[("사과", "Noun"), ("는", "Josa")]),
        ];
        let data = train(&corpus).unwrap();
        for words in data.emission.values() {
            for &p in words.values() {
                assert!(p <= 0.0);
            }
        }
        for &p in data.transition.values() {
            assert!(p <= 0.0);
        }
        for &p in data.begin.values() {
            assert!(p <= 0.0);
        }
    }
}
