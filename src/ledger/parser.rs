// Raw-input identifier tokenizer
// Splits pasted text on delimiter runs and keeps digit strings within bounds.

use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiters accepted between identifiers: whitespace, comma, semicolon,
/// pipe, forward and back slash.
static DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,;|/\\]+").unwrap());

/// Split raw text into identifier tokens. Non-digit characters inside a token
/// are stripped; tokens whose digit length falls outside `[min_len, max_len]`
/// are discarded.
pub fn parse_identifiers(raw: &str, min_len: usize, max_len: usize) -> Vec<String> {
    DELIMITERS
        .split(raw)
        .map(|token| token.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|digits| digits.len() >= min_len && digits.len() <= max_len)
        .collect()
}
