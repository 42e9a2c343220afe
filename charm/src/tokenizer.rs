//! Word decomposition and initials-key derivation.
//!
//! Word boundaries follow letter-casing and punctuation heuristics, not
//! whitespace: every character belongs to exactly one word, so joining the
//! words reproduces the input byte for byte. The initials key drops word 0
//! (the leading chunk before the first boundary) and keeps one character per
//! remaining word.

/// Split `text` into words. Lossless and deterministic: the concatenation of
/// the result is `text` exactly. Empty input yields a single empty word, and
/// word 0 is empty whenever the text opens with a boundary character.
pub fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if starts_word(&chars, i) {
            words.push(current);
            current = String::new();
        }
        current.push(c);
    }
    words.push(current);
    words
}

/// Whether the character at `i` opens a new word.
fn starts_word(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    // "&" stands in for "and" and heads its own word.
    if c == '&' {
        return true;
    }
    // Stylized "10" reads as one unit; the pair starts a word at the "1".
    // No other digit sequence starts a word, so "22" stays whole.
    if c == '1' && chars.get(i + 1) == Some(&'0') {
        return true;
    }
    if !c.is_alphabetic() {
        return false;
    }
    match i.checked_sub(1).map(|p| chars[p]) {
        None => true,
        Some(prev) if is_apostrophe(prev) => {
            // "don't" continues; a quote opening after a space starts fresh
            // (" 'cause").
            i >= 2 && chars[i - 2] == ' '
        }
        Some(prev) if !prev.is_alphabetic() => true,
        // Camel-case boundary inside a word, e.g. "McGraw".
        Some(prev) => prev.is_lowercase() && c.is_uppercase(),
    }
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Derive the initials key: skip word 0, then one character per non-empty
/// word. Empty words contribute nothing, never padding.
pub fn derive_initials(words: &[String]) -> String {
    words
        .iter()
        .skip(1)
        .filter_map(|w| w.chars().next())
        .collect()
}

/// Half-open character-offset span of each word in the joined text,
/// from cumulative word lengths.
pub fn word_spans(words: &[String]) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(words.len());
    let mut offset = 0;
    for w in words {
        let len = w.chars().count();
        spans.push((offset, offset + len));
        offset += len;
    }
    spans
}
