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

//! A hidden Markov model part-of-speech tagger for Korean,
//! trained on the Sejong corpus
//!
//! The main entry point of the library is the
//! [`HmmTagger`](tagger/struct.HmmTagger.html) struct, which decodes the
//! most probable morpheme/tag sequence of a sentence over a lattice of
//! candidate analyses.

pub mod corpus;
pub mod error;
pub mod lattice;
pub mod lemma;
pub mod model;
pub mod path;
pub mod tag;
pub mod tagger;
pub mod train;

pub use error::*;

pub mod prelude {
    pub use crate::{
        model::Model,
        tag::Tag,
        tagger::HmmTagger,
        SejongError, SejongResult,
    };
}
