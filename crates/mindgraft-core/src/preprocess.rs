//! Local heuristic structuring: raw text → key phrases → a shallow topic forest.
//!
//! This is the path used when no structuring service is available. It is deliberately coarse;
//! its failure mode is a flat or uneven tree, never an error.

use crate::topic::{Topic, follow_title_renames};
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, OnceLock};

/// Word-level spelling service. Implementations are caller-owned and passed in explicitly.
pub trait SpellChecker: Send + Sync {
    fn is_correct(&self, word: &str) -> bool;

    /// Candidate replacements, best first.
    fn suggest(&self, word: &str) -> Vec<String>;
}

/// Dictionary-backed checker with edit-distance suggestions.
///
/// Earlier words in the list win ties, so frequency-sorted lists give sensible suggestions.
#[derive(Debug, Clone, Default)]
pub struct WordListSpellChecker {
    rank: FxHashMap<String, usize>,
    words: Vec<String>,
    max_distance: usize,
}

impl WordListSpellChecker {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self {
            max_distance: 2,
            ..Default::default()
        };
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || out.rank.contains_key(&word) {
                continue;
            }
            out.rank.insert(word.clone(), out.words.len());
            out.words.push(word);
        }
        out
    }

    /// One entry per line; anything after the first whitespace (e.g. a frequency column) is
    /// ignored.
    pub fn from_text(text: &str) -> Self {
        Self::from_words(text.lines().filter_map(|line| line.split_whitespace().next()))
    }

    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SpellChecker for WordListSpellChecker {
    fn is_correct(&self, word: &str) -> bool {
        self.rank.contains_key(&word.to_lowercase())
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        let lower = word.to_lowercase();
        let target: Vec<char> = lower.chars().collect();
        let mut hits: Vec<(usize, usize, &str)> = self
            .words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.chars().count().abs_diff(target.len()) <= self.max_distance)
            .filter_map(|(rank, w)| {
                let d = edit_distance(&target, w);
                (d <= self.max_distance).then_some((d, rank, w.as_str()))
            })
            .collect();
        hits.sort_unstable();

        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        hits.into_iter()
            .map(|(_, _, w)| if capitalized { capitalize(w) } else { w.to_string() })
            .collect()
    }
}

fn edit_distance(a: &[char], b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[^\w\s.,!?;:()'"]"#).expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn symbolic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^[0-9.,!?;:()'"-]+$"#).expect("valid regex"))
}

fn sentence_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("valid regex"))
}

fn noun_phrase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:[A-Z][a-z]+\s+)+[A-Z][a-z]+\b|\b[A-Z][a-z]+\b").expect("valid regex")
    })
}

fn marker_res() -> &'static [Regex; 3] {
    static RE: OnceLock<[Regex; 3]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"\b(?:is|are|was|were)\s+[^,.!?]+").expect("valid regex"),
            Regex::new(r"\b(?:includes|contains|consists of)\s+[^,.!?]+").expect("valid regex"),
            Regex::new(r"\b(?:such as|like|especially)\s+[^,.!?]+").expect("valid regex"),
        ]
    })
}

fn standalone_i_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bi\b").expect("valid regex"))
}

fn space_before_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+([,.!?;:])").expect("valid regex"))
}

/// Replaces characters outside word characters, whitespace and `.,!?;:()'"` with spaces,
/// collapses whitespace runs and trims.
pub fn normalize_text(text: &str) -> String {
    let replaced = disallowed_re().replace_all(text, " ");
    whitespace_re()
        .replace_all(&replaced, " ")
        .trim()
        .to_string()
}

/// Replaces each misspelled word with the checker's first suggestion.
///
/// Words shorter than three characters and purely numeric/punctuation tokens are kept.
/// Punctuation around a word is preserved.
pub fn correct_words(text: &str, checker: &dyn SpellChecker) -> String {
    text.split_whitespace()
        .map(|token| correct_token(token, checker))
        .collect::<Vec<_>>()
        .join(" ")
}

fn correct_token(token: &str, checker: &dyn SpellChecker) -> String {
    if symbolic_re().is_match(token) || token.chars().count() < 3 {
        return token.to_string();
    }
    let start = token
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map_or(token.len(), |(i, _)| i);
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map_or(start, |(i, c)| i + c.len_utf8());
    let core = &token[start..end.max(start)];
    if core.chars().count() < 3 || core.chars().any(|c| c.is_ascii_digit()) {
        return token.to_string();
    }
    if checker.is_correct(core) {
        return token.to_string();
    }
    match checker.suggest(core).into_iter().next() {
        Some(suggestion) => format!("{}{}{}", &token[..start], suggestion, &token[end..]),
        None => token.to_string(),
    }
}

/// Capitalized word runs plus marker phrases (`is …`, `includes …`, `such as …`), per
/// sentence, de-duplicated in first-seen order.
pub fn extract_key_phrases(text: &str) -> Vec<String> {
    let mut phrases: IndexSet<String> = IndexSet::new();
    for sentence in sentence_split_re()
        .split(text)
        .filter(|s| !s.trim().is_empty())
    {
        for m in noun_phrase_re().find_iter(sentence) {
            phrases.insert(m.as_str().to_string());
        }
        for re in marker_res() {
            for m in re.find_iter(sentence) {
                let phrase = m.as_str().trim();
                if !phrase.is_empty() {
                    phrases.insert(phrase.to_string());
                }
            }
        }
    }
    phrases.into_iter().collect()
}

/// Groups phrases by shared significant words (longer than three characters) and turns the
/// largest groups into topics.
///
/// Groups are visited largest first (ties keep first-seen order). The first phrase of a group
/// becomes the title and the remaining unused phrases its leaf subtopics; a phrase is used at
/// most once across the forest.
pub fn build_hierarchy(phrases: &[String]) -> Vec<Topic> {
    let mut groups: IndexMap<String, Vec<&str>> = IndexMap::new();
    for phrase in phrases {
        for word in phrase.to_lowercase().split(' ') {
            if word.chars().count() > 3 {
                groups
                    .entry(word.to_string())
                    .or_default()
                    .push(phrase.as_str());
            }
        }
    }

    let mut sorted: Vec<(&String, &Vec<&str>)> = groups.iter().collect();
    sorted.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut used: FxHashSet<&str> = FxHashSet::default();
    let mut topics = Vec::new();
    for (keyword, related) in sorted {
        if related.len() < 2 {
            continue;
        }
        let main = related[0];
        if used.contains(main) {
            continue;
        }

        let mut children: Vec<&str> = Vec::new();
        for &phrase in &related[1..] {
            if phrase != main && !used.contains(phrase) && !children.contains(&phrase) {
                children.push(phrase);
            }
        }
        used.insert(main);
        used.extend(children.iter().copied());
        tracing::trace!(%keyword, title = main, children = children.len(), "heuristic topic");

        topics.push(Topic::new(main).with_subtopics(children.into_iter().map(Topic::new)));
    }
    topics
}

/// Punctuation spacing, capitalization and doubled-word cleanup.
pub fn tidy_punctuation(text: &str) -> String {
    let text = space_before_punct_re().replace_all(text, "$1");
    let spaced = space_after_punctuation(&text);
    let text = standalone_i_re().replace_all(&spaced, "I");
    let text = capitalize_sentences(&text);
    collapse_doubled_words(&text)
}

fn is_punct(c: char) -> bool {
    matches!(c, ',' | '.' | '!' | '?' | ';' | ':')
}

fn space_after_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if !is_punct(c) {
            continue;
        }
        let Some(&next) = chars.get(i + 1) else {
            continue;
        };
        let prev = i.checked_sub(1).and_then(|p| chars.get(p)).copied();
        let numeric = prev.is_some_and(|p| p.is_ascii_digit()) && next.is_ascii_digit();
        if !next.is_whitespace() && !is_punct(next) && !numeric {
            out.push(' ');
        }
    }
    out
}

fn capitalize_sentences(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let after_stop = i >= 2 && matches!(chars[i - 2], '.' | '!' | '?') && chars[i - 1].is_whitespace();
        if (i == 0 || after_stop) && c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn collapse_doubled_words(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for token in text.split_whitespace() {
        let doubled = out.last().is_some_and(|prev| {
            token.chars().all(char::is_alphanumeric)
                && prev.chars().all(char::is_alphanumeric)
                && prev.eq_ignore_ascii_case(token)
        });
        if !doubled {
            out.push(token);
        }
    }
    out.join(" ")
}

/// Text → topic forest using the heuristics above.
#[derive(Clone, Default)]
pub struct Preprocessor {
    spell_checker: Option<Arc<dyn SpellChecker>>,
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field("spell_checker", &self.spell_checker.is_some())
            .finish()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spell_checker(mut self, checker: Arc<dyn SpellChecker>) -> Self {
        self.spell_checker = Some(checker);
        self
    }

    pub fn spell_checker(&self) -> Option<&dyn SpellChecker> {
        self.spell_checker.as_deref()
    }

    /// Normalization plus word correction when a checker is configured.
    pub fn clean_text(&self, text: &str) -> String {
        let normalized = normalize_text(text);
        match self.spell_checker() {
            Some(checker) => correct_words(&normalized, checker),
            None => normalized,
        }
    }

    pub fn build_hierarchy_from_text(&self, text: &str) -> Vec<Topic> {
        let _span = tracing::debug_span!("preprocess", chars = text.len()).entered();
        let cleaned = self.clean_text(text);
        let phrases = extract_key_phrases(&cleaned);
        let topics = build_hierarchy(&phrases);
        tracing::debug!(
            phrases = phrases.len(),
            topics = topics.len(),
            "built heuristic hierarchy"
        );
        topics
    }

    /// [`correct_topic`](Self::correct_topic) over a forest, with relationship targets following
    /// the corrected titles.
    pub fn correct_forest(&self, topics: &[Topic]) -> Vec<Topic> {
        let mut out: Vec<Topic> = topics.iter().map(|t| self.correct_topic(t)).collect();
        follow_title_renames(topics, &mut out);
        out
    }

    /// Spell-corrects and tidies every title and description in a subtree.
    pub fn correct_topic(&self, topic: &Topic) -> Topic {
        let fix = |text: &str| {
            let corrected = match self.spell_checker() {
                Some(checker) => correct_words(text, checker),
                None => text.to_string(),
            };
            tidy_punctuation(&corrected)
        };
        Topic {
            title: fix(&topic.title),
            description: topic.description.as_deref().map(fix),
            subtopics: topic
                .subtopics
                .iter()
                .map(|sub| self.correct_topic(sub))
                .collect(),
            ..topic.clone()
        }
    }
}
