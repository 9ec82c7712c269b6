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

//! The tagging pipeline.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::SejongResult;
use crate::lattice::node::Node;
use crate::lattice::Lattice;
use crate::model::Model;
use crate::path::longest_path;
use crate::tag::Tag;

/// Decodes the most probable morpheme/tag sequence of a sentence.
///
/// The model is read-only during tagging, so a shared tagger may serve
/// concurrent calls; user-dictionary edits take `&mut self` and belong to
/// setup time.
pub struct HmmTagger {
    model: Model,
}

impl HmmTagger {
    pub fn new(model: Model) -> HmmTagger {
        HmmTagger { model }
    }

    /// Loads a trained model artifact.
    pub fn from_path<P: AsRef<Path>>(path: P) -> SejongResult<HmmTagger> {
        Ok(HmmTagger::new(Model::from_path(path)?))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Display name of a tag.
    pub fn tag_name(&self, tag: Tag) -> &str {
        self.model.tags().name(tag)
    }

    /// Tags a sentence.
    ///
    /// Builds the candidate lattice, decodes the maximum-weight path,
    /// infers concrete tags for unknown spans and strips the sentinels.
    pub fn tag(&self, sentence: &str) -> SejongResult<Vec<(String, Tag)>> {
        let lattice = Lattice::build(&self.model, sentence);
        let graph = lattice.weigh(&self.model);

        let (path, _cost) = longest_path(&graph, lattice.bos(), lattice.eos())?;

        let pos = flatten(&path);
        let pos = self.infer_unknown(pos);
        Ok(postprocess(pos))
    }

    /// Inserts a user-dictionary emission entry. Must happen before
    /// tagging starts, never mid-serving.
    pub fn add_user_dictionary(&mut self, word: &str, tag_name: &str, score: f64) {
        self.model.add_entry(word, tag_name, score);
    }

    /// Replaces Unk entries of the decoded sequence with the most likely
    /// tag given their neighbors.
    ///
    /// The score map starts from the begin table for the first real token,
    /// or from the previous tag's transition row otherwise, and adds the
    /// transition column into the successor's tag. An empty map falls back
    /// to Noun. Ties resolve to the earliest-inserted tag.
    fn infer_unknown(&self, pos: Vec<(String, Tag)>) -> Vec<(String, Tag)> {
        if pos.is_empty() {
            return pos;
        }

        let last = pos.len() - 1;
        let mut inferred = Vec::with_capacity(pos.len());
        for i in 0..last {
            if pos[i].1 != Tag::UNK {
                inferred.push(pos[i].clone());
                continue;
            }

            let mut tag_prob: IndexMap<Tag, f64> = IndexMap::new();
            if i == 1 {
                for (tag, p) in self.model.begins() {
                    tag_prob.insert(tag, p);
                }
            } else {
                for ((prev, next), p) in self.model.transitions() {
                    if prev == pos[i - 1].1 {
                        tag_prob.insert(next, p);
                    }
                }
            }

            let successor = pos[i + 1].1;
            for ((tag, next), p) in self.model.transitions() {
                if next == successor {
                    *tag_prob.entry(tag).or_insert(0.0) += p;
                }
            }

            let best = tag_prob
                .iter()
                .fold(None::<(Tag, f64)>, |best, (&tag, &p)| match best {
                    Some((_, best_p)) if best_p >= p => best,
                    _ => Some((tag, p)),
                })
                .map(|(tag, _)| tag)
                .unwrap_or(Tag::NOUN);
            inferred.push((pos[i].0.clone(), best));
        }
        inferred.push(pos[last].clone());
        inferred
    }
}

/// Expands path nodes into (morph, tag) pairs; a lemmatized node
/// contributes its stem and its ending separately.
fn flatten(path: &[Node]) -> Vec<(String, Tag)> {
    let mut pos = Vec::with_capacity(path.len());
    for node in path {
        let mut morphs = node.morphs();
        if let Some(first) = morphs.next() {
            pos.push((first.to_string(), node.tag0));
        }
        if let Some(second) = morphs.next() {
            pos.push((second.to_string(), node.tag1));
        }
    }
    pos
}

/// Strips the BOS and EOS sentinel entries.
fn postprocess(pos: Vec<(String, Tag)>) -> Vec<(String, Tag)> {
    let n = pos.len();
    pos.into_iter().skip(1).take(n.saturating_sub(2)).collect()
}
