//! Candidate list loading and format filters.

use regex::Regex;

use crate::core::types::LoadError;

/// Load-time validation predicate for a single input line.
pub trait CandidateFilter {
    fn accepts(&self, line: &str) -> bool;
}

/// Default filter: exactly six ASCII decimal digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SixDigitFilter;

impl CandidateFilter for SixDigitFilter {
    fn accepts(&self, line: &str) -> bool {
        line.len() == 6 && line.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Filter backed by a regular expression.
///
/// The pattern is matched against the whole line as given; anchor it with
/// `^...$` to reject partial matches.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    pattern: Regex,
}

impl PatternFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl CandidateFilter for PatternFilter {
    fn accepts(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

impl<F> CandidateFilter for F
where
    F: Fn(&str) -> bool,
{
    fn accepts(&self, line: &str) -> bool {
        self(line)
    }
}

/// Ordered candidates that passed the load filter. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    items: Vec<String>,
}

impl CandidateList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Build a list without filtering. Used when restoring a saved session.
    pub(crate) fn from_validated(items: Vec<String>) -> Self {
        Self { items }
    }
}

/// Keep the lines accepted by `filter`, in input order.
///
/// Fails with [`LoadError::EmptyAfterFilter`] if nothing survives.
pub fn load_candidates<I, S, F>(raw_lines: I, filter: &F) -> Result<CandidateList, LoadError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: CandidateFilter + ?Sized,
{
    let mut items = Vec::new();
    let mut dropped = 0usize;
    for line in raw_lines {
        let line = line.as_ref();
        if filter.accepts(line) {
            items.push(line.to_string());
        } else {
            dropped += 1;
        }
    }
    if items.is_empty() {
        return Err(LoadError::EmptyAfterFilter { dropped });
    }
    Ok(CandidateList { items })
}
