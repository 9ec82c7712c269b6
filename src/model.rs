/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Log-probability tables of a trained model.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SejongError, SejongResult};
use crate::tag::{Tag, TagTable};

/// Separator between the two tags of a transition key in the artifact.
/// Training must not produce tag names containing it.
pub const TRANSITION_SEPARATOR: char = '_';

/// Offset subtracted from the observed minimum to build the smoothing
/// floors, so unknown lookups always score strictly below any stored value.
const FLOOR_MARGIN: f64 = 0.05;

/// The trained artifact as persisted on disk.
///
/// All probabilities are natural-log values <= 0. Map order is document
/// order and is preserved through (de)serialization.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ModelData {
    pub emission: IndexMap<String, IndexMap<String, f64>>,
    pub transition: IndexMap<String, f64>,
    pub begin: IndexMap<String, f64>,
}

impl ModelData {
    pub fn from_path<P: AsRef<Path>>(path: P) -> SejongResult<ModelData> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let data = serde_json::from_reader(reader)?;
        Ok(data)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> SejongResult<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

/// Immutable log-probability tables shared by all decoding calls.
///
/// The only permitted mutation is [`Model::add_entry`], which is a
/// setup-time user-dictionary side channel.
#[derive(Debug, Clone)]
pub struct Model {
    tags: TagTable,
    /// Emission tables indexed by tag id; tags without emissions hold an
    /// empty map.
    emission: Vec<IndexMap<String, f64>>,
    transition: IndexMap<(Tag, Tag), f64>,
    begin: IndexMap<Tag, f64>,
    max_word_len: usize,
    min_emission: f64,
    min_transition: f64,
}

impl Model {
    pub fn from_path<P: AsRef<Path>>(path: P) -> SejongResult<Model> {
        Model::from_data(ModelData::from_path(path)?)
    }

    pub fn from_data(data: ModelData) -> SejongResult<Model> {
        let mut tags = TagTable::new();

        let mut emission_entries = Vec::with_capacity(data.emission.len());
        for (name, words) in data.emission {
            let tag = tags.intern(&name);
            emission_entries.push((tag, words));
        }

        let mut transition = IndexMap::with_capacity(data.transition.len());
        for (key, prob) in data.transition {
            let mut parts = key.splitn(2, TRANSITION_SEPARATOR);
            let pair = match (parts.next(), parts.next()) {
                (Some(prev), Some(next)) => (tags.intern(prev), tags.intern(next)),
                _ => return Err(SejongError::InvalidTransitionKey(key)),
            };
            transition.insert(pair, prob);
        }

        let mut begin = IndexMap::with_capacity(data.begin.len());
        for (name, prob) in data.begin {
            begin.insert(tags.intern(&name), prob);
        }

        let mut emission = vec![IndexMap::new(); tags.len()];
        for (tag, words) in emission_entries {
            emission[tag.id()] = words;
        }

        let min_emission = emission
            .iter()
            .flat_map(|words| words.values())
            .cloned()
            .fold(None, |min: Option<f64>, p| {
                Some(min.map_or(p, |m| m.min(p)))
            })
            .ok_or(SejongError::EmptyModel("emission"))?
            - FLOOR_MARGIN;

        let min_transition = transition
            .values()
            .cloned()
            .fold(None, |min: Option<f64>, p| {
                Some(min.map_or(p, |m| m.min(p)))
            })
            .ok_or(SejongError::EmptyModel("transition"))?
            - FLOOR_MARGIN;

        let max_word_len = emission
            .iter()
            .flat_map(|words| words.keys())
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(0);

        Ok(Model {
            tags,
            emission,
            transition,
            begin,
            max_word_len,
            min_emission,
            min_transition,
        })
    }

    /// P(word | tag), or `default` if the pair was never observed.
    pub fn emit(&self, tag: Tag, word: &str, default: f64) -> f64 {
        self.emission
            .get(tag.id())
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or(default)
    }

    /// P(next | prev), or `default` if the bigram was never observed.
    pub fn trans(&self, prev: Tag, next: Tag, default: f64) -> f64 {
        self.transition
            .get(&(prev, next))
            .copied()
            .unwrap_or(default)
    }

    /// P(tag | sentence start), or `default`.
    pub fn begin(&self, tag: Tag, default: f64) -> f64 {
        self.begin.get(&tag).copied().unwrap_or(default)
    }

    /// Whether `word` is in the emission table of `tag`.
    pub fn contains(&self, tag: Tag, word: &str) -> bool {
        self.emission
            .get(tag.id())
            .map(|words| words.contains_key(word))
            .unwrap_or(false)
    }

    /// All tags whose emission table contains `word`, in tag-id order.
    pub fn tags_containing(&self, word: &str) -> Vec<Tag> {
        let mut found = Vec::new();
        for (id, words) in self.emission.iter().enumerate() {
            if words.contains_key(word) {
                found.push(Tag::from_raw(id as u16));
            }
        }
        found
    }

    /// Transition entries in artifact order.
    pub fn transitions(&self) -> impl Iterator<Item = ((Tag, Tag), f64)> + '_ {
        self.transition.iter().map(|(&pair, &p)| (pair, p))
    }

    /// Begin entries in artifact order.
    pub fn begins(&self) -> impl Iterator<Item = (Tag, f64)> + '_ {
        self.begin.iter().map(|(&tag, &p)| (tag, p))
    }

    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    pub fn min_emission(&self) -> f64 {
        self.min_emission
    }

    pub fn min_transition(&self) -> f64 {
        self.min_transition
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// Inserts or overwrites a user-dictionary emission entry.
    ///
    /// The derived constants are kept consistent: `max_word_len` grows to
    /// cover the new word, and the emission floor drops below `score` when
    /// needed so the floor invariant keeps holding. Dictionary edits happen
    /// at setup, not mid-serving.
    pub fn add_entry(&mut self, word: &str, tag_name: &str, score: f64) {
        let tag = self.tags.intern(tag_name);
        if self.emission.len() <= tag.id() {
            self.emission.resize(tag.id() + 1, IndexMap::new());
        }
        self.emission[tag.id()].insert(word.to_string(), score);

        let len = word.chars().count();
        if len > self.max_word_len {
            self.max_word_len = len;
        }
        if score <= self.min_emission {
            self.min_emission = score - FLOOR_MARGIN;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(
        emission: &[(&str, &[(&str, f64)])],
        transition: &[(&str, f64)],
        begin: &[(&str, f64)],
    ) -> ModelData {
        let mut model = ModelData::default();
        for (tag, words) in emission {
            let words = words
                .iter()
                .map(|(w, p)| (w.to_string(), *p))
                .collect::<IndexMap<_, _>>();
            model.emission.insert(tag.to_string(), words);
        }
        for (key, p) in transition {
            model.transition.insert(key.to_string(), *p);
        }
        for (tag, p) in begin {
            model.begin.insert(tag.to_string(), *p);
        }
        model
    }

    fn sample() -> Model {
        Model::from_data(data(
            &[
                ("Noun", &[("사과", -1.0), ("나", -1.2)]),
                ("Josa", &[("는", -0.8)]),
                ("Verb", &[("가", -1.1)]),
            ],
            &[("Noun_Josa", -0.5), ("Josa_Verb", -0.9), ("Verb_EOS", -2.0)],
            &[("Noun", -0.6)],
        ))
        .unwrap()
    }

    #[test]
    fn derived_constants() {
        let model = sample();
        assert_eq!(model.max_word_len(), 2);
        assert!((model.min_emission() - (-1.25)).abs() < 1e-12);
        assert!((model.min_transition() - (-2.05)).abs() < 1e-12);
    }

    #[test]
    fn lookups_fall_back_to_default() {
        let model = sample();
        assert!((model.emit(Tag::NOUN, "사과", -9.0) - (-1.0)).abs() < 1e-12);
        assert!((model.emit(Tag::NOUN, "배", -9.0) - (-9.0)).abs() < 1e-12);
        let josa = model.tags().get("Josa").unwrap();
        assert!((model.trans(Tag::NOUN, josa, -9.0) - (-0.5)).abs() < 1e-12);
        assert!((model.trans(josa, Tag::NOUN, -9.0) - (-9.0)).abs() < 1e-12);
        assert!((model.begin(Tag::NOUN, -9.0) - (-0.6)).abs() < 1e-12);
        assert!((model.begin(Tag::VERB, -9.0) - (-9.0)).abs() < 1e-12);
    }

    #[test]
    fn tags_containing_is_in_id_order() {
        let model = Model::from_data(data(
            &[("Josa", &[("가", -0.8)]), ("Verb", &[("가", -1.1)])],
            &[("Josa_Verb", -0.9)],
            &[],
        ))
        .unwrap();
        let tags = model.tags_containing("가");
        // Verb is a seeded tag, Josa is interned from the artifact afterwards
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], Tag::VERB);
        assert_eq!(model.tags().name(tags[1]), "Josa");
        assert!(model.tags_containing("나").is_empty());
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = Model::from_data(data(&[], &[("A_B", -1.0)], &[])).unwrap_err();
        assert!(matches!(err, SejongError::EmptyModel("emission")));

        let err = Model::from_data(data(&[("Noun", &[("사과", -1.0)])], &[], &[])).unwrap_err();
        assert!(matches!(err, SejongError::EmptyModel("transition")));
    }

    #[test]
    fn malformed_transition_key_is_rejected() {
        let err =
            Model::from_data(data(&[("Noun", &[("사과", -1.0)])], &[("NounJosa", -0.5)], &[]))
                .unwrap_err();
        assert!(matches!(err, SejongError::InvalidTransitionKey(_)));
    }

    #[test]
    fn add_entry_updates_derived_constants() {
        let mut model = sample();
        model.add_entry("원숭이", "Noun", -3.0);
        assert_eq!(model.max_word_len(), 3);
        assert!((model.emit(Tag::NOUN, "원숭이", 0.0) - (-3.0)).abs() < 1e-12);
        // floor dropped strictly below the new minimum
        assert!((model.min_emission() - (-3.05)).abs() < 1e-12);

        // an unseen tag name is interned on the fly
        model.add_entry("героя", "Foreign", -0.5);
        let foreign = model.tags().get("Foreign").unwrap();
        assert!(model.contains(foreign, "героя"));
        assert_eq!(model.max_word_len(), 5);
    }

    #[test]
    fn artifact_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let original = data(
            &[("Noun", &[("사과", -1.0)])],
            &[("Noun_EOS", -0.5)],
            &[("Noun", 0.0)],
        );
        original.save(&path).unwrap();
        let loaded = ModelData::from_path(&path).unwrap();
        assert_eq!(loaded.emission["Noun"]["사과"], -1.0);
        assert_eq!(loaded.transition["Noun_EOS"], -0.5);
        assert_eq!(loaded.begin["Noun"], 0.0);
    }
}
