//! Reader for the preprocessed Sejong corpus.
//!
//! The corpus is a plain-text file of newline-separated tokens with a blank
//! line between sentences. Each token line is
//! `surface<TAB>morph1/POS1 + morph2/POS2 + ...`; only the right-hand side
//! is consumed here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{SejongError, SejongResult};

/// One sentence as a list of (morph, tag-name) pairs.
pub type Sentence = Vec<(String, String)>;

/// Reads up to `num_lines` lines of the corpus at `path`; `0` reads the
/// whole file.
pub fn read_corpus<P: AsRef<Path>>(path: P, num_lines: usize) -> SejongResult<Vec<Sentence>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut corpus = Vec::new();
    let mut sentence = Sentence::new();
    for (line_no, line) in reader.lines().enumerate() {
        if num_lines != 0 && line_no >= num_lines {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            if !sentence.is_empty() {
                corpus.push(std::mem::replace(&mut sentence, Sentence::new()));
            }
            continue;
        }
        parse_token(&line, line_no + 1, &mut sentence)?;
    }
    if !sentence.is_empty() {
        corpus.push(sentence);
    }

    Ok(corpus)
}

/// Parses one `surface<TAB>morph/POS + ...` line into `sentence`.
fn parse_token(line: &str, line_no: usize, sentence: &mut Sentence) -> SejongResult<()> {
    let tag_info = match line.splitn(2, '\t').nth(1) {
        Some(info) => info.trim_end(),
        None => return Err(SejongError::InvalidDataFormat(line_no, line.to_string())),
    };

    for piece in tag_info.split(" + ") {
        let parts: Vec<&str> = piece.split('/').collect();
        // rightmost segment is the POS, everything left of it is the morph
        let (pos, morphs) = match parts.split_last() {
            Some(split) => split,
            None => continue,
        };
        sentence.push((morphs.concat(), pos.to_string()));
    }
    Ok(())
}

/// Adjacent tag pairs of a sentence, in order.
pub fn as_bigram_tags(sentence: &[(String, String)]) -> Vec<(String, String)> {
    sentence
        .windows(2)
        .map(|pair| (pair[0].1.clone(), pair[1].1.clone()))
        .collect()
}
