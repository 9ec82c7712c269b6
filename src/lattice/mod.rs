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

//! Lattice construction and edge weighting.
//!
//! The lattice is the DAG of every candidate (surface, tag) span of an
//! input sentence, bracketed by BOS/EOS sentinels. Gaps not covered by any
//! emission entry are bridged with Unk nodes so the decoder always finds a
//! path.

pub mod node;

use std::collections::HashSet;

use crate::lemma::lemma_candidates;
use crate::model::Model;
use crate::tag::Tag;

use self::node::Node;

/// An edge of the decoding graph with its log-probability weight.
#[derive(Clone, Debug)]
pub struct WeightedEdge {
    pub from: Node,
    pub to: Node,
    pub weight: f64,
}

/// Candidate lattice of one sentence.
pub struct Lattice {
    edges: Vec<(Node, Node)>,
    bos: Node,
    eos: Node,
}

impl Lattice {
    /// Builds the lattice of `sentence` against `model`.
    pub fn build(model: &Model, sentence: &str) -> Lattice {
        let chars: Vec<char> = sentence.split_whitespace().flat_map(|w| w.chars()).collect();
        let eos = Node::eos(chars.len());

        // candidate nodes grouped by begin position, plus the EOS slot
        let mut starts = sentence_lookup(model, sentence);
        starts.push(vec![eos.clone()]);

        // if nothing starts at 0, bridge the prefix with an Unk node
        let first = first_nonempty(&starts, 0);
        if first > 0 {
            let surface: String = chars[..first].iter().collect();
            starts[0].push(Node::unknown(surface, 0, first));
        }

        let mut edges: Vec<(Node, Node)> = Vec::new();
        let last = starts.len() - 1;
        for position in 0..last {
            for word in &starts[position] {
                let end = word.end;
                if starts[end].is_empty() {
                    // no candidate starts at our end point; bridge the gap
                    // up to the next position that has one
                    let next = first_nonempty(&starts, end);
                    let surface: String = chars[end..next].iter().collect();
                    edges.push((word.clone(), Node::unknown(surface, end, next)));
                } else {
                    for adjacent in &starts[end] {
                        edges.push((word.clone(), adjacent.clone()));
                    }
                }
            }
        }

        // bridge Unk nodes continue to whatever starts at their end;
        // dedup in first-appearance order to keep edge order stable
        let mut seen = HashSet::new();
        let unknowns: Vec<Node> = edges
            .iter()
            .filter(|(_, to)| to.tag0 == Tag::UNK)
            .map(|(_, to)| to.clone())
            .filter(|unk| seen.insert(unk.clone()))
            .collect();
        for unk in unknowns {
            for adjacent in &starts[unk.end] {
                edges.push((unk.clone(), adjacent.clone()));
            }
        }

        let bos = Node::bos();
        for word in &starts[0] {
            edges.push((bos.clone(), word.clone()));
        }

        edges.sort_by_key(|(from, to)| (from.begin, to.end));

        Lattice { edges, bos, eos }
    }

    pub fn bos(&self) -> &Node {
        &self.bos
    }

    pub fn eos(&self) -> &Node {
        &self.eos
    }

    pub fn edges(&self) -> &[(Node, Node)] {
        &self.edges
    }

    /// Scores every edge with emission and transition log-probabilities.
    pub fn weigh(&self, model: &Model) -> Vec<WeightedEdge> {
        self.edges
            .iter()
            .map(|(from, to)| WeightedEdge {
                from: from.clone(),
                to: to.clone(),
                weight: weight(model, from, to),
            })
            .collect()
    }
}

/// Weight of one edge.
///
/// The second transition of a two-morpheme node is scored from the source
/// node's `tag1` (not from the stem's tag); the trained tables assume this.
fn weight(model: &Model, from: &Node, to: &Node) -> f64 {
    let mut morphs = to.morphs();
    let first = morphs.next().unwrap_or("");

    let mut w = model.emit(to.tag0, first, model.min_emission())
        + transition_score(model, from.tag1, to.tag0);
    if let Some(second) = morphs.next() {
        w += model.emit(to.tag1, second, model.min_emission())
            + transition_score(model, from.tag1, to.tag1);
    }
    w
}

/// Transition log-probability; edges leaving BOS read the begin table.
fn transition_score(model: &Model, prev: Tag, next: Tag) -> f64 {
    if prev == Tag::BOS {
        model.begin(next, model.min_transition())
    } else {
        model.trans(prev, next, model.min_transition())
    }
}

/// Looks up candidates for every eojeol, accumulating char offsets.
fn sentence_lookup(model: &Model, sentence: &str) -> Vec<Vec<Node>> {
    let mut starts = Vec::new();
    for eojeol in sentence.split_whitespace() {
        let offset = starts.len();
        starts.extend(eojeol_lookup(model, eojeol, offset));
    }
    starts
}

/// Enumerates candidate nodes of one eojeol, grouped by begin position.
///
/// Every substring up to `max_word_len` is looked up in the emission
/// tables, and every split of it is offered to the lemmatizer; candidate
/// (stem, ending) pairs survive only when stem and ending are known as
/// Verb/Adjective and Eomi. Lemmatizer failures skip the split.
fn eojeol_lookup(model: &Model, eojeol: &str, offset: usize) -> Vec<Vec<Node>> {
    let chars: Vec<char> = eojeol.chars().collect();
    let n = chars.len();
    let mut positions = vec![Vec::new(); n];

    for b in 0..n {
        for r in 1..=model.max_word_len() {
            let e = b + r;
            if e > n {
                break;
            }
            let surface: String = chars[b..e].iter().collect();
            for tag in model.tags_containing(&surface) {
                positions[b].push(Node::new(surface.clone(), tag, b + offset, e + offset));
            }

            for i in 1..=r {
                let stem: String = chars[b..b + i].iter().collect();
                let ending: String = chars[b + i..e].iter().collect();
                let candidates = match lemma_candidates(&stem, &ending) {
                    Ok(candidates) => candidates,
                    // splits are speculative; a failed one is just skipped
                    Err(_) => continue,
                };
                for (stem, ending) in candidates {
                    if model.contains(Tag::VERB, &stem) && model.contains(Tag::EOMI, &ending) {
                        positions[b].push(Node::lemma(
                            &stem,
                            &ending,
                            Tag::VERB,
                            Tag::EOMI,
                            b + offset,
                            e + offset,
                        ));
                    }
                    if model.contains(Tag::ADJECTIVE, &stem) && model.contains(Tag::EOMI, &ending)
                    {
                        positions[b].push(Node::lemma(
                            &stem,
                            &ending,
                            Tag::ADJECTIVE,
                            Tag::EOMI,
                            b + offset,
                            e + offset,
                        ));
                    }
                }
            }
        }
    }
    positions
}

/// First position at or after `from` that has a candidate.
fn first_nonempty(starts: &[Vec<Node>], from: usize) -> usize {
    for i in from..starts.len() {
        if !starts[i].is_empty() {
            return i;
        }
    }
    from
}
