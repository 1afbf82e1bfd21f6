use std::collections::BTreeSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Keyword that selects every listed playlist.
pub const SELECT_ALL: &str = "all";

/// Replacement for characters that cannot appear in a path segment.
pub const SANITIZE_REPLACEMENT: char = '_';

/// Random 20-character alphanumeric value for the OAuth `state` parameter.
///
/// A new value is generated for every authorization attempt and compared
/// with the one echoed back on the callback.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}

/// Stable, file-name safe key derived from a client id.
pub fn cache_key(client_id: &str) -> String {
    let hash = Sha256::digest(client_id.as_bytes());
    URL_SAFE_NO_PAD.encode(&hash[..12])
}

/// Parses the operator's playlist selection into zero-based indices.
///
/// Accepts the literal `all` or a comma-separated list of 1-based numbers.
/// Numbers outside `1..=option_count` and tokens that are not numbers are
/// dropped while the remaining valid numbers are kept. Duplicates collapse and
/// the result iterates in ascending order, whatever the input order was.
/// Empty input selects nothing.
pub fn parse_selection(input: &str, option_count: usize) -> BTreeSet<usize> {
    let input = input.trim();

    if input == SELECT_ALL {
        return (0..option_count).collect();
    }

    input
        .split(',')
        .filter_map(|token| token.trim().parse::<usize>().ok())
        .filter(|n| (1..=option_count).contains(n))
        .map(|n| n - 1)
        .collect()
}

/// Makes `name` usable as a single path segment.
///
/// Path separators, characters reserved on common filesystems, NUL and other
/// control characters become [`SANITIZE_REPLACEMENT`]. Trailing dots and
/// spaces are trimmed. A name that ends up empty, `.` or `..` is replaced
/// with a single replacement character.
pub fn sanitize_path_segment(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => SANITIZE_REPLACEMENT,
            c if c.is_control() => SANITIZE_REPLACEMENT,
            c => c,
        })
        .collect();

    let trimmed = replaced.trim().trim_end_matches(['.', ' ']);

    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        SANITIZE_REPLACEMENT.to_string()
    } else {
        trimmed.to_string()
    }
}
