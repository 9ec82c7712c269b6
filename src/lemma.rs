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

//! Lemmatization of Korean verb/adjective surface forms.
//!
//! Given a speculative split of a surface into a stem candidate and an
//! ending candidate, [`lemma_candidates`] enumerates the morphological
//! variants the pair may have been conjugated from. The caller gates the
//! results against the emission tables; candidates here are intentionally
//! overgenerated.

use std::collections::HashMap;

use lazy_static::lazy_static;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LemmaError {
    #[error("empty stem candidate")]
    EmptyStem,

    #[error("stem does not end in a hangul syllable: {0}")]
    NotHangul(char),
}

const HANGUL_BASE: u32 = 0xAC00;
const HANGUL_LAST: u32 = 0xD7A3;

const CHOSEONG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ',
    'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

const JUNGSEONG: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ',
    'ㅞ', 'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

// index 0 of the jongseong slot means "no final consonant"
const JONGSEONG: [char; 27] = [
    'ㄱ', 'ㄲ', 'ㄳ', 'ㄴ', 'ㄵ', 'ㄶ', 'ㄷ', 'ㄹ', 'ㄺ', 'ㄻ', 'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ',
    'ㅁ', 'ㅂ', 'ㅄ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

lazy_static! {
    static ref CHOSEONG_INDEX: HashMap<char, u32> = CHOSEONG
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u32))
        .collect();
    static ref JUNGSEONG_INDEX: HashMap<char, u32> = JUNGSEONG
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u32))
        .collect();
    static ref JONGSEONG_INDEX: HashMap<char, u32> = JONGSEONG
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u32))
        .collect();
}

/// Splits a hangul syllable into (choseong, jungseong, jongseong).
pub fn decompose(c: char) -> Option<(char, char, Option<char>)> {
    let code = c as u32;
    if code < HANGUL_BASE || code > HANGUL_LAST {
        return None;
    }
    let idx = code - HANGUL_BASE;
    let cho = CHOSEONG[(idx / 588) as usize];
    let jung = JUNGSEONG[((idx % 588) / 28) as usize];
    let jong = (idx % 28) as usize;
    let jong = if jong == 0 {
        None
    } else {
        Some(JONGSEONG[jong - 1])
    };
    Some((cho, jung, jong))
}

/// Builds a hangul syllable from jamo; `None` if any jamo is invalid.
pub fn compose(cho: char, jung: char, jong: Option<char>) -> Option<char> {
    let ci = *CHOSEONG_INDEX.get(&cho)?;
    let ji = *JUNGSEONG_INDEX.get(&jung)?;
    let ti = match jong {
        Some(j) => *JONGSEONG_INDEX.get(&j)? + 1,
        None => 0,
    };
    std::char::from_u32(HANGUL_BASE + ci * 588 + ji * 28 + ti)
}

fn add(candidates: &mut Vec<(String, String)>, stem: String, ending: String) {
    let candidate = (stem, ending);
    if !candidates.contains(&candidate) {
        candidates.push(candidate);
    }
}

/// Enumerates (stem, ending) variants a conjugated split may come from.
///
/// The identity split is always the first candidate. Recovery rules cover
/// the fused 았/었/였 contraction, bare-jamo endings (ㄴ/ㄹ/ㅁ/ㅂ), and the
/// ㄷ, ㅅ, ㅂ and 르 irregular conjugations. Splits whose stem does not end
/// in a hangul syllable cannot be conjugated forms and are reported as
/// errors for the caller to skip.
pub fn lemma_candidates(stem: &str, ending: &str) -> Result<Vec<(String, String)>, LemmaError> {
    let l_chars: Vec<char> = stem.chars().collect();
    let last = match l_chars.last() {
        Some(&c) => c,
        None => return Err(LemmaError::EmptyStem),
    };
    let (cho, jung, jong) = decompose(last).ok_or(LemmaError::NotHangul(last))?;
    let l_base: String = l_chars[..l_chars.len() - 1].iter().collect();
    let r_first = ending.chars().next().and_then(decompose);
    let r_rest: String = ending.chars().skip(1).collect();

    let mut candidates = Vec::new();
    candidates.push((stem.to_string(), ending.to_string()));

    // fused past-tense contraction: 갔 -> 가 + 았, 줬 -> 주 + 었, 했 -> 하 + 였
    if jong == Some('ㅆ') {
        let recovered = match jung {
            'ㅏ' | 'ㅓ' => compose(cho, jung, None).map(|s| (s, jung)),
            'ㅐ' if cho == 'ㅎ' => compose(cho, 'ㅏ', None).map(|s| (s, 'ㅕ')),
            'ㅘ' => compose(cho, 'ㅗ', None).map(|s| (s, 'ㅏ')),
            'ㅝ' => compose(cho, 'ㅜ', None).map(|s| (s, 'ㅓ')),
            _ => None,
        };
        if let Some((stem_last, ending_jung)) = recovered {
            if let Some(ending_first) = compose('ㅇ', ending_jung, Some('ㅆ')) {
                add(
                    &mut candidates,
                    format!("{}{}", l_base, stem_last),
                    format!("{}{}", ending_first, ending),
                );
            }
        }
    }

    // bare-jamo ending attached to the stem syllable: 간 -> 가 + ㄴ, 갈 -> 가 + ㄹ
    if let Some(j) = jong {
        if j == 'ㄴ' || j == 'ㄹ' || j == 'ㅁ' || j == 'ㅂ' {
            if let Some(stem_last) = compose(cho, jung, None) {
                add(
                    &mut candidates,
                    format!("{}{}", l_base, stem_last),
                    format!("{}{}", j, ending),
                );
            }
        }
    }

    // ㄷ irregular: 깨달 + 아 -> 깨닫 + 아
    if jong == Some('ㄹ') {
        if let Some(('ㅇ', _, _)) = r_first {
            if let Some(stem_last) = compose(cho, jung, Some('ㄷ')) {
                add(
                    &mut candidates,
                    format!("{}{}", l_base, stem_last),
                    ending.to_string(),
                );
            }
        }
    }

    // 르 irregular: 굴 + 러 -> 구르 + 어
    if jong == Some('ㄹ') {
        if let Some(('ㄹ', r_jung, r_jong)) = r_first {
            if r_jung == 'ㅓ' || r_jung == 'ㅏ' {
                if let (Some(stem_last), Some(ending_first)) =
                    (compose(cho, jung, None), compose('ㅇ', r_jung, r_jong))
                {
                    add(
                        &mut candidates,
                        format!("{}{}르", l_base, stem_last),
                        format!("{}{}", ending_first, r_rest),
                    );
                }
            }
        }
    }

    if jong.is_none() {
        if let Some(('ㅇ', r_jung, r_jong)) = r_first {
            // ㅅ irregular: 지 + 어 -> 짓 + 어
            if let Some(stem_last) = compose(cho, jung, Some('ㅅ')) {
                add(
                    &mut candidates,
                    format!("{}{}", l_base, stem_last),
                    ending.to_string(),
                );
            }

            // ㅂ irregular: 더러 + 워서 -> 더럽 + 어서, 고마 + 와 -> 고맙 + 아
            let recovered_jung = match r_jung {
                'ㅝ' => Some('ㅓ'),
                'ㅘ' => Some('ㅏ'),
                _ => None,
            };
            if let Some(rj) = recovered_jung {
                if let (Some(stem_last), Some(ending_first)) =
                    (compose(cho, jung, Some('ㅂ')), compose('ㅇ', rj, r_jong))
                {
                    add(
                        &mut candidates,
                        format!("{}{}", l_base, stem_last),
                        format!("{}{}", ending_first, r_rest),
                    );
                }
            }
        }
    }

    Ok(candidates)
}
