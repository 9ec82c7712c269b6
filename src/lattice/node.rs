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

use crate::tag::Tag;

/// Separator joining the morphemes of a lemmatized surface.
pub const MORPH_SEPARATOR: &str = " + ";

/// Lattice node: one candidate morpheme span.
///
/// `begin`/`end` are char indices into the whitespace-stripped sentence.
/// A lemmatized verb/adjective carries its decomposition in `surface` as
/// `"stem + ending"`, with `tag0` the stem's POS and `tag1` the ending's;
/// for single-morpheme nodes `tag1 == tag0`.
///
/// Nodes are compared and hashed by full tuple identity; lattice dedup and
/// the unknown-node collection depend on structural equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub surface: String,
    pub tag0: Tag,
    pub tag1: Tag,
    pub begin: usize,
    pub end: usize,
}

impl Node {
    pub fn new(surface: String, tag: Tag, begin: usize, end: usize) -> Node {
        Node {
            surface,
            tag0: tag,
            tag1: tag,
            begin,
            end,
        }
    }

    /// Creates a two-morpheme node from a stem/ending decomposition.
    pub fn lemma(stem: &str, ending: &str, tag0: Tag, tag1: Tag, begin: usize, end: usize) -> Node {
        Node {
            surface: format!("{}{}{}", stem, MORPH_SEPARATOR, ending),
            tag0,
            tag1,
            begin,
            end,
        }
    }

    pub fn unknown(surface: String, begin: usize, end: usize) -> Node {
        Node::new(surface, Tag::UNK, begin, end)
    }

    /// Sentence-start sentinel.
    pub fn bos() -> Node {
        Node::new("BOS".to_string(), Tag::BOS, 0, 0)
    }

    /// Sentence-end sentinel, placed one past the last char.
    pub fn eos(n_chars: usize) -> Node {
        Node::new("EOS".to_string(), Tag::EOS, n_chars, n_chars + 1)
    }

    /// Morphemes of the surface, either one or two.
    pub fn morphs(&self) -> impl Iterator<Item = &str> {
        self.surface.split(MORPH_SEPARATOR)
    }
}
