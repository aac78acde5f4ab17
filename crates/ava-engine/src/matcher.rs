//! Bag-of-words matcher for canned answers.
//!
//! A query is scored against every question in a [`QaTable`] by counting the
//! distinct query tokens that also appear in the question. The highest score
//! wins; ties go to the question seen first. A score of zero falls back to the
//! caller's default response.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Any run of characters outside ASCII `[0-9A-Za-z_]` separates tokens.
///
/// Non-ASCII letters are separators too, so `naïve` yields `na` and `ve`.
static TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]+").expect("token separator pattern is valid"));

/// A canned question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaEntry {
    /// Question text as written in the source document.
    #[serde(rename = "q")]
    pub question: String,
    /// Answer returned when this question wins.
    #[serde(rename = "a")]
    pub answer: String,
}

impl QaEntry {
    /// Create a new entry.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Normalize text for matching: trim surrounding whitespace and lower-case.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Split text into its set of lower-cased tokens.
///
/// Empty tokens (leading or trailing separators) are discarded.
pub fn tokenize(text: &str) -> HashSet<String> {
    let normalized = normalize(text);
    TOKEN_SEPARATOR
        .split(&normalized)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
struct TableRow {
    key: String,
    tokens: HashSet<String>,
    answer: String,
}

/// Lookup of normalized question text to answer text.
///
/// Keys are unique. When the source repeats a question the later answer wins,
/// but the key keeps the position where it was first seen, so iteration order
/// is stable for a given input sequence.
#[derive(Debug, Clone, Default)]
pub struct QaTable {
    rows: Vec<TableRow>,
    index: HashMap<String, usize>,
}

impl QaTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries, in order.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = QaEntry>,
    {
        let mut table = Self::new();
        for entry in entries {
            table.insert(&entry.question, entry.answer);
        }
        table
    }

    /// Insert a question, replacing the answer of an equal normalized key.
    ///
    /// Returns the previous answer if the key already existed.
    pub fn insert(&mut self, question: &str, answer: impl Into<String>) -> Option<String> {
        let key = normalize(question);
        let answer = answer.into();

        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.rows[pos].answer, answer));
        }

        self.index.insert(key.clone(), self.rows.len());
        self.rows.push(TableRow {
            tokens: tokenize(&key),
            key,
            answer,
        });
        None
    }

    /// Answer stored for an exact (normalized) question, if any.
    pub fn get(&self, question: &str) -> Option<&str> {
        self.index
            .get(&normalize(question))
            .map(|&pos| self.rows[pos].answer.as_str())
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate `(key, answer)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows
            .iter()
            .map(|row| (row.key.as_str(), row.answer.as_str()))
    }
}

/// The winning question for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// Normalized key that won.
    pub key: &'a str,
    /// Answer stored for that key.
    pub answer: &'a str,
    /// Number of distinct query tokens shared with the key.
    pub score: usize,
}

/// Find the best-scoring question for `query`.
///
/// Returns `None` when no key shares a token with the query.
pub fn best_match<'a>(query: &str, table: &'a QaTable) -> Option<Match<'a>> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return None;
    }

    let mut best: Option<Match<'a>> = None;
    for row in &table.rows {
        let score = query_tokens
            .iter()
            .filter(|token| row.tokens.contains(*token))
            .count();

        // Strictly greater keeps the earliest key on ties.
        if score > best.map_or(0, |m| m.score) {
            best = Some(Match {
                key: &row.key,
                answer: &row.answer,
                score,
            });
        }
    }
    best
}

/// Answer `query` from `table`, or return `default` when nothing overlaps.
pub fn find_answer<'a>(query: &str, table: &'a QaTable, default: &'a str) -> &'a str {
    best_match(query, table).map_or(default, |m| m.answer)
}
