// Reduce text to a 32-character alphabet:
// a-z, space, period, comma, question mark, apostrophe and newline

use std::collections::HashMap;
use std::sync::LazyLock;

/// The sanitizer's output alphabet
pub const ALLOWED_CHARS: [char; 32] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ' ', '.', ',', '?', '\'', '\n',
];

/// Fixed substitutions, applied after lowercasing so only lowercase keys appear
pub const SUBSTITUTIONS: &[(char, char)] = &[
    ('é', 'e'), ('è', 'e'), ('ê', 'e'), ('ë', 'e'),
    ('á', 'a'), ('à', 'a'), ('â', 'a'), ('ä', 'a'),
    ('í', 'i'), ('ì', 'i'), ('î', 'i'), ('ï', 'i'),
    ('ó', 'o'), ('ò', 'o'), ('ô', 'o'), ('ö', 'o'),
    ('ú', 'u'), ('ù', 'u'), ('û', 'u'), ('ü', 'u'),
    ('ý', 'y'), ('ÿ', 'y'),
    ('ñ', 'n'),
    ('ç', 'c'),
    ('!', '.'),
    ('"', '\''),
    ('`', '\''),
    ('\u{201C}', '\''),
    ('\u{201D}', '\''),
];

static SUBSTITUTION_MAP: LazyLock<HashMap<char, char>> =
    LazyLock::new(|| SUBSTITUTIONS.iter().copied().collect());

/// Counters for one sanitize pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    /// Characters after lowercasing (lowercasing can expand some characters)
    pub chars_in: u64,
    /// Characters rewritten through the substitution table
    pub substituted: u64,
    /// Characters outside the alphabet that became a space
    pub blanked: u64,
}

/// Mapped replacement for `ch`, if it has one
pub fn substitute(ch: char) -> Option<char> {
    SUBSTITUTION_MAP.get(&ch).copied()
}

/// WHY: single source for the output alphabet, shared by the pass and its tests
pub fn is_allowed(ch: char) -> bool {
    ALLOWED_CHARS.contains(&ch)
}

/// Lowercase `text`, then map every character onto the allowed alphabet.
///
/// Per character: table substitution first, then allowed characters pass
/// through, newlines are always kept, and anything else becomes one space.
pub fn sanitize(text: &str) -> String {
    sanitize_with_stats(text).0
}

/// [`sanitize`] plus counts of what was rewritten
pub fn sanitize_with_stats(text: &str) -> (String, SanitizeStats) {
    // WHY: the table only has lowercase keys, so case folding must finish
    // before any lookup ('Ç' has to reach 'ç' to become 'c')
    let lowered = text.to_lowercase();
    let mut stats = SanitizeStats::default();

    let sanitized: String = lowered
        .chars()
        .map(|ch| {
            stats.chars_in += 1;
            if let Some(mapped) = substitute(ch) {
                stats.substituted += 1;
                mapped
            } else if is_allowed(ch) {
                ch
            } else {
                stats.blanked += 1;
                ' '
            }
        })
        .collect();

    (sanitized, stats)
}
