//! Split a search term into words regardless of its naming convention.
//!
//! `getValueFromSection`, `get_value_from_section`, `get-value-from-section` and
//! `get value from section` all yield the same four tokens (modulo case).

use std::fmt;

/// One word of a search term. Keeps the original case; the matcher ignores it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Characters that separate words in every supported convention.
pub fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c.is_whitespace()
}

/// Tokenize `term`. Separator runs become word boundaries, then each word is split at
/// capitalized words (`[A-Z][a-z]*`) and digit runs. Empty input yields no tokens.
pub fn tokenize(term: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for word in term.split(is_separator).filter(|w| !w.is_empty()) {
        split_word(word, &mut tokens);
    }
    tokens
}

fn split_word(word: &str, out: &mut Vec<Token>) {
    let mut rest = word;
    while let Some(first) = rest.chars().next() {
        let len = if first.is_ascii_uppercase() {
            1 + rest[1..]
                .find(|c: char| !c.is_ascii_lowercase())
                .unwrap_or(rest.len() - 1)
        } else if first.is_ascii_digit() {
            rest.find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len())
        } else {
            // Text before the next capital or digit (e.g. the leading "get" of getValue).
            rest.find(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit())
                .unwrap_or(rest.len())
        };
        let (token, tail) = rest.split_at(len);
        out.push(Token(token.to_string()));
        rest = tail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(term: &str) -> Vec<String> {
        tokenize(term).iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(
            words("getValueFromSection"),
            ["get", "Value", "From", "Section"]
        );
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(words("FooBar"), ["Foo", "Bar"]);
    }

    #[test]
    fn test_separators_collapse() {
        assert_eq!(words("foo-bar"), ["foo", "bar"]);
        assert_eq!(words("foo_bar"), ["foo", "bar"]);
        assert_eq!(words("foo bar"), ["foo", "bar"]);
        assert_eq!(words("  foo -_\t bar__"), ["foo", "bar"]);
    }

    #[test]
    fn test_digit_runs_are_tokens() {
        assert_eq!(words("v2Api"), ["v", "2", "Api"]);
        assert_eq!(words("utf8_decode16"), ["utf", "8", "decode", "16"]);
        assert_eq!(words("2024"), ["2024"]);
    }

    #[test]
    fn test_acronym_splits_per_capital() {
        assert_eq!(words("HTTPServer"), ["H", "T", "T", "P", "Server"]);
    }

    #[test]
    fn test_trailing_capital() {
        assert_eq!(words("periodiC_table"), ["periodi", "C", "table"]);
    }

    #[test]
    fn test_lowercase_word_is_single_token() {
        assert_eq!(words("foobar"), ["foobar"]);
    }

    #[test]
    fn test_punctuation_stays_inside_tokens() {
        assert_eq!(words("a.b(c)"), ["a.b(c)"]);
        assert_eq!(words("Foo.Bar"), ["Foo", ".", "Bar"]);
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(words("größeWert"), ["größe", "Wert"]);
    }

    #[test]
    fn test_empty_and_separator_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" -_ ").is_empty());
    }
}
