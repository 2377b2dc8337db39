//! Utility functions for text segmentation

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '/' | ':'
            | ','
            | '.'
            | '-'
            | '('
            | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | ';'
            | '"'
            | '\''
            | '<'
            | '>'
            | '='
            | '+'
            | '*'
            | '&'
            | '|'
            | '!'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '~'
            | '`'
            | '\\'
            | '?'
    )
}

/// Character type for word segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Alphanumeric characters (word characters)
    WordChar,
    /// Punctuation and symbols
    Punctuation,
}

/// Get the character type for word segmentation
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_punctuation(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

/// Split text into word-sized chunks whose concatenation equals the input.
///
/// A chunk is one run of non-whitespace characters together with the
/// whitespace that follows it (leading whitespace forms its own chunk).
/// This is the granularity used for paced edit application: emitting one
/// chunk per timer tick reads as text "streaming in" word by word.
pub fn split_word_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut prev_was_ws = false;

    for ch in text.chars() {
        let is_ws = char_type(ch) == CharType::Whitespace;
        if !is_ws && prev_was_ws && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev_was_ws = is_ws;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
