use rustc_hash::FxHashSet;

/// Maximum token length to store in the term dictionary.
/// Longer runs are hashes or base64 blobs nobody searches for.
const MAX_TOKEN_LENGTH: usize = 64;

/// Tokenize plugin and owner names for indexing and querying.
///
/// No stemming is applied: names are proper nouns, so tokens are matched as
/// written. Each alphanumeric word is lowercased and additionally split at
/// camelCase boundaries, and multi-word input also yields the compacted
/// identifier so `allay essentials` still finds `AllayEssentials`.
///
/// Output order is stable and free of duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut seen = FxHashSet::default();
    let mut compact = String::new();
    let mut word_count = 0;

    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        word_count += 1;

        for part in split_camel_case(word) {
            add_token(&mut tokens, &mut seen, part.to_lowercase());
        }

        let lower = word.to_lowercase();
        compact.push_str(&lower);
        add_token(&mut tokens, &mut seen, lower);
    }

    if word_count > 1 {
        add_token(&mut tokens, &mut seen, compact);
    }

    tokens
}

/// Split a single word where an uppercase letter follows a lowercase one
fn split_camel_case(word: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev_was_lower = false;

    for (i, ch) in word.char_indices() {
        if ch.is_uppercase() && prev_was_lower {
            parts.push(&word[start..i]);
            start = i;
        }
        prev_was_lower = ch.is_lowercase();
    }
    parts.push(&word[start..]);

    parts
}

fn add_token(tokens: &mut Vec<String>, seen: &mut FxHashSet<String>, token: String) {
    if token.is_empty() || token.chars().count() > MAX_TOKEN_LENGTH {
        return;
    }
    if seen.insert(token.clone()) {
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_name() {
        let tokens = tokenize("AllayEssentials");
        assert_eq!(tokens, vec!["allay", "essentials", "allayessentials"]);
    }

    #[test]
    fn test_separators_and_compact_form() {
        let tokens = tokenize("world-edit_plus");
        assert!(tokens.contains(&"world".to_string()));
        assert!(tokens.contains(&"edit".to_string()));
        assert!(tokens.contains(&"plus".to_string()));
        assert!(tokens.contains(&"worldeditplus".to_string()));
    }

    #[test]
    fn test_no_stemming() {
        let tokens = tokenize("Economies");
        assert_eq!(tokens, vec!["economies"]);
    }

    #[test]
    fn test_empty_and_symbols() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("--- !!").is_empty());
    }

    #[test]
    fn test_overlong_tokens_dropped() {
        let blob = "a".repeat(MAX_TOKEN_LENGTH + 1);
        assert!(tokenize(&blob).is_empty());
    }
}
