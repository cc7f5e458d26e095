//! Text normalization and scoring: stopwords, light stemming, keyword
//! frequency, and Flesch reading ease.

use std::collections::HashMap;

/// English stopwords, sorted for binary search. Includes the bare
/// contraction fragments ("aren", "didn", …) that survive punctuation
/// stripping.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "am", "an", "and", "any",
    "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "couldn", "d", "did", "didn", "do", "does", "doesn", "doing",
    "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn", "has",
    "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him", "himself",
    "his", "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll", "m",
    "ma", "me", "mightn", "more", "most", "mustn", "my", "myself", "needn", "no", "nor", "not",
    "now", "o", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "re", "s", "same", "shan", "she", "should", "shouldn", "so", "some",
    "such", "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve",
    "very", "was", "wasn", "we", "were", "weren", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "won", "wouldn", "y", "you", "your", "yours",
    "yourself", "yourselves",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Normalize text into keyword tokens: lowercase, punctuation to spaces,
/// tokens longer than two characters, stopwords removed, stemmed.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 2 && !is_stop_word(word))
        .map(stem)
        .collect()
}

/// Light suffix stemming, so inflections of a word count as one keyword:
/// plural endings, "-ing"/"-ed" participles, and a trailing silent "e"
/// are collapsed. Deliberately shallow; no dictionary.
pub fn stem(word: &str) -> String {
    let mut stem = word.to_owned();

    // Plurals.
    if let Some(base) = stem.strip_suffix("ies") {
        if base.chars().count() > 1 {
            stem = format!("{base}y");
        }
    } else if stem.ends_with("sses") {
        stem.truncate(stem.len() - 2);
    } else if !stem.ends_with("ss") && !stem.ends_with("us") && !stem.ends_with("is") {
        if let Some(base) = stem.strip_suffix('s') {
            if base.chars().count() > 2 {
                stem = base.to_owned();
            }
        }
    }

    // Participles.
    if let Some(base) = stem.strip_suffix("ing") {
        if base.chars().count() >= 3 {
            stem = undouble(base);
        }
    } else if let Some(base) = stem.strip_suffix("ed") {
        if base.chars().count() >= 3 {
            stem = undouble(base);
        }
    }

    // Silent e.
    if stem.ends_with('e') && stem.chars().count() > 3 {
        stem.truncate(stem.len() - 1);
    }

    stem
}

/// Drop one of a doubled trailing consonant ("runn" → "run").
fn undouble(stem: &str) -> String {
    let mut chars = stem.chars().rev();
    if let (Some(last), Some(prev)) = (chars.next(), chars.next())
        && last == prev
        && last.is_ascii_alphabetic()
        && !"aeiou".contains(last)
    {
        return stem[..stem.len() - last.len_utf8()].to_owned();
    }
    stem.to_owned()
}

/// The `k` most frequent tokens, ties broken by first appearance.
pub fn top_keywords(words: &[String], k: usize) -> Vec<String> {
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, word) in words.iter().enumerate() {
        let entry = tally.entry(word).or_insert((0, index));
        entry.0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> = tally
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(k)
        .map(|(word, _, _)| word.to_owned())
        .collect()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Flesch reading ease: `206.835 − 1.015·(words/sentences) −
/// 84.6·(syllables/words)`. `None` when the text has no words.
pub fn flesch_reading_ease(text: &str) -> Option<f64> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    let sentences = count_sentences(text).max(1) as f64;
    let syllables: usize = words.iter().map(|word| syllables(word)).sum();
    let word_count = words.len() as f64;
    Some(206.835 - 1.015 * (word_count / sentences) - 84.6 * (syllables as f64 / word_count))
}

/// Sentence count: segments between `.`, `!`, `?` that contain at least
/// one alphanumeric character.
fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(char::is_alphanumeric))
        .count()
}

/// Syllable heuristic: runs of vowels (y included) count one each, minus
/// a trailing silent "e"; every word gets at least one.
fn syllables(word: &str) -> usize {
    let lowered = word.to_lowercase();
    let is_vowel = |c: char| "aeiouy".contains(c);
    let mut groups = 0;
    let mut in_group = false;
    for c in lowered.chars() {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    if groups > 1 && lowered.ends_with('e') && !lowered.ends_with("le") {
        groups -= 1;
    }
    groups.max(1)
}
