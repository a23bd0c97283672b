//! Compile tokens into a convention-agnostic, case-insensitive substring matcher.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use std::ops::Range;

use super::tokenizer::{Token, tokenize};

/// Zero or more dashes, underscores or whitespace between two tokens.
pub const SEPARATOR_CLASS: &str = r"[-_\s]*";

/// Compiled predicate shared read-only by all workers.
#[derive(Clone, Debug)]
pub struct Matcher {
    regex: Regex,
    tokens: Vec<Token>,
}

/// Join escaped tokens with [`SEPARATOR_CLASS`]. Token text is always escaped, so the
/// only possible failure is the regex engine's compiled-size limit for enormous terms.
pub fn compile(tokens: &[Token]) -> Result<Matcher> {
    let pattern = tokens
        .iter()
        .map(|t| regex::escape(t.as_str()))
        .collect::<Vec<_>>()
        .join(SEPARATOR_CLASS);
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("compile search pattern ({} tokens)", tokens.len()))?;
    Ok(Matcher {
        regex,
        tokens: tokens.to_vec(),
    })
}

impl Matcher {
    /// `compile(tokenize(term))`.
    pub fn from_term(term: &str) -> Result<Self> {
        compile(&tokenize(term))
    }

    /// True if the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte span of the leftmost match in `text`.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        self.regex.find(text).map(|m| m.range())
    }

    /// Source pattern (without the case-insensitive flag).
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// A term with no tokens compiles to the empty pattern, which matches every string.
    pub fn matches_everything(&self) -> bool {
        self.tokens.is_empty()
    }
}
