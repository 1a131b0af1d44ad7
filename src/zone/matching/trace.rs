//! Match trace and trace cursor
//!
//! A successful match yields a flat, ordered record of tags plus the texts
//! captured by named matchers. The trace is the sole channel between the
//! recognition pass and the semantic pass; no parse tree is materialized.
//!
//! The cursor gives the semantic pass programmer-controlled look-ahead and
//! consumption. Cursor failures mean the processor and the grammar disagree
//! about the trace shape, which is a fatal `GrammarError`, never a
//! recoverable parse error.

use crate::zone::matching::GrammarError;
use std::collections::HashMap;

/// Ordered record of what matched: tags in match order, captured texts in
/// match order per capture name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTrace {
    tags: Vec<String>,
    captures: HashMap<String, Vec<String>>,
}

impl MatchTrace {
    pub fn new() -> Self {
        MatchTrace::default()
    }

    pub(crate) fn push_tag(&mut self, tag: &str) {
        self.tags.push(tag.to_string());
    }

    pub(crate) fn push_capture(&mut self, name: &str, text: String) {
        self.captures.entry(name.to_string()).or_default().push(text);
    }

    /// Append another trace, preserving match order
    pub(crate) fn append(&mut self, other: MatchTrace) {
        self.tags.extend(other.tags);
        for (name, texts) in other.captures {
            self.captures.entry(name).or_default().extend(texts);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// All texts captured under a name, in match order
    pub fn captures(&self, name: &str) -> &[String] {
        self.captures.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cursor(&self) -> TraceCursor<'_> {
        TraceCursor {
            trace: self,
            tag_pos: 0,
            capture_pos: HashMap::new(),
        }
    }
}

/// Stateful cursor over a match trace
#[derive(Debug)]
pub struct TraceCursor<'a> {
    trace: &'a MatchTrace,
    tag_pos: usize,
    capture_pos: HashMap<&'a str, usize>,
}

impl<'a> TraceCursor<'a> {
    /// Look at the next tag without consuming it
    pub fn peek_tag(&self) -> Option<&'a str> {
        self.trace.tags.get(self.tag_pos).map(String::as_str)
    }

    /// Consume and return the next tag
    pub fn next_tag(&mut self) -> Result<&'a str, GrammarError> {
        let tag = self
            .trace
            .tags
            .get(self.tag_pos)
            .ok_or(GrammarError::TraceExhausted)?;
        self.tag_pos += 1;
        Ok(tag)
    }

    /// Consume the next tag and require it to equal `expected`
    pub fn expect_tag(&mut self, expected: &str) -> Result<(), GrammarError> {
        let got = self.next_tag()?;
        if got != expected {
            return Err(GrammarError::UnexpectedTag {
                expected: expected.to_string(),
                got: got.to_string(),
            });
        }
        Ok(())
    }

    /// Consume and return the next text captured under `name`
    pub fn next_match(&mut self, name: &'a str) -> Result<&'a str, GrammarError> {
        let position = self.capture_pos.entry(name).or_insert(0);
        let text = self
            .trace
            .captures
            .get(name)
            .and_then(|texts| texts.get(*position))
            .ok_or_else(|| GrammarError::MissingCapture(name.to_string()))?;
        *position += 1;
        Ok(text)
    }
}
