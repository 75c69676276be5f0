//! Prefix index tokens for free-text search over entry descriptions.
//!
//! The index is biased toward the first word, which tends to name the vendor
//! or category: it gets prefixes up to 10 characters, the second word up to 5
//! and every later word up to 3. Whole words are always indexed before their
//! prefixes, and multi-word input ends with the whole normalized phrase.
//! Word and prefix tokens stop at [`MAX_INDEX_TOKENS`]; the phrase is
//! appended regardless.

use std::collections::HashSet;

use crate::constants::{MAX_INDEX_TOKENS, MIN_PREFIX_WORD_CHARS, PREFIX_CEILINGS};

/// Build the lower-cased, de-duplicated token list for `text`.
///
/// ```
/// let tokens = cashwatch_core::build_search_index("Ice  CUBES");
/// assert_eq!(tokens, ["ice", "i", "ic", "cubes", "c", "cu", "cub", "cube", "ice cubes"]);
/// ```
#[must_use]
pub fn build_search_index(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase();
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut index = TokenSet::default();
    'words: for (position, word) in words.iter().enumerate() {
        if !index.push_capped(word) {
            break;
        }

        let chars = word.chars().count();
        if position > 0 && chars < MIN_PREFIX_WORD_CHARS {
            continue;
        }

        let ceiling = chars.min(prefix_ceiling(position));
        let mut boundaries = word.char_indices().map(|(offset, _)| offset).skip(1);
        for _ in 1..=ceiling {
            let end = boundaries.next().unwrap_or(word.len());
            if !index.push_capped(&word[..end]) {
                break 'words;
            }
        }
    }

    if words.len() > 1 {
        index.push(&words.join(" "));
    }
    index.tokens
}

fn prefix_ceiling(position: usize) -> usize {
    PREFIX_CEILINGS[position.min(PREFIX_CEILINGS.len() - 1)]
}

#[derive(Default)]
struct TokenSet {
    tokens: Vec<String>,
    seen: HashSet<String>,
}

impl TokenSet {
    /// Add `token` unless it is already present. Returns false once the cap
    /// has been reached, without adding anything.
    fn push_capped(&mut self, token: &str) -> bool {
        if self.tokens.len() >= MAX_INDEX_TOKENS {
            return false;
        }
        self.push(token);
        true
    }

    fn push(&mut self, token: &str) {
        if self.seen.insert(token.to_string()) {
            self.tokens.push(token.to_string());
        }
    }
}
