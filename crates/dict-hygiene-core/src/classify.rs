//! Single-word classifiers.
//!
//! Every function here is pure and total: no state, no I/O, and an empty
//! string simply has none of the properties.

use std::collections::BTreeSet;

/// Ukrainian alphabet, lower then upper case (33 letters each).
pub const UKRAINIAN_LETTERS: &str =
    "абвгґдеєжзиіїйклмнопрстуфхцчшщьюяАБВГҐДЕЄЖЗИІЇЙКЛМНОПРСТУФХЦЧШЩЬЮЯ";

/// English alphabet, lower then upper case.
pub const ENGLISH_LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Spanish alphabet including accented vowels, `ñ` and `ü`.
pub const SPANISH_LETTERS: &str =
    "abcdefghijklmnñopqrstuvwxyzáéíóúüABCDEFGHIJKLMNÑOPQRSTUVWXYZÁÉÍÓÚÜ";

/// Characters accepted as an apostrophe in any alphabet.
pub const APOSTROPHES: &[char] = &[
    '\u{0027}', // '
    '\u{2019}', // right single quotation mark
    '\u{2018}', // left single quotation mark
    '\u{02BC}', // modifier letter apostrophe
    '\u{02B9}', // modifier letter prime
    '\u{0060}', // grave accent
    '\u{00B4}', // acute accent
    '\u{02BB}', // modifier letter turned comma
];

/// The set of letters that count as linguistic for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: BTreeSet<char>,
}

impl Alphabet {
    /// Build an alphabet from every char of `letters`.
    pub fn new(letters: &str) -> Self {
        Self {
            letters: letters.chars().collect(),
        }
    }

    /// Built-in alphabet for a language code, if one is known.
    pub fn builtin(code: &str) -> Option<Self> {
        match code {
            "uk" => Some(Self::new(UKRAINIAN_LETTERS)),
            "en" => Some(Self::new(ENGLISH_LETTERS)),
            "es" => Some(Self::new(SPANISH_LETTERS)),
            _ => None,
        }
    }

    /// Whether `c` is a letter of this alphabet.
    pub fn contains(&self, c: char) -> bool {
        self.letters.contains(&c)
    }

    /// Number of distinct letters.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Whether the alphabet has no letters.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

/// Whether `c` is one of the accepted apostrophe variants.
pub fn is_apostrophe(c: char) -> bool {
    APOSTROPHES.contains(&c)
}

/// True for a title-case word: a cased uppercase first letter followed by a
/// remainder that is not entirely uppercase.
///
/// All-caps words and single capital letters are left to [`is_all_caps`].
pub fn is_starts_with_capital(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest = chars.as_str();
    is_cased_uppercase(first) && rest.to_uppercase() != rest
}

/// True when uppercasing leaves the word unchanged and lowercasing does not.
pub fn is_all_caps(word: &str) -> bool {
    word.to_uppercase() == word && word.to_lowercase() != word
}

/// Every char of `word` that is not in `alphabet`, not an apostrophe, and not
/// a hyphen, in order and without de-duplication.
pub fn non_linguistic_chars(word: &str, alphabet: &Alphabet) -> String {
    word.chars()
        .filter(|&c| !alphabet.contains(c) && !is_apostrophe(c) && c != '-')
        .collect()
}

/// Whether the word contains a U+0020 space.
pub fn has_spaces(word: &str) -> bool {
    word.contains(' ')
}

/// Whether the word contains an ASCII decimal digit.
pub fn has_digits(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
}

/// Whether the word contains a control, format, or zero-width character.
pub fn has_invisible_chars(word: &str) -> bool {
    word.chars().any(is_invisible)
}

/// Control and invisible formatting characters.
pub const fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{0000}'..='\u{001F}'     // C0 controls
        | '\u{007F}'..='\u{009F}'   // DEL + C1 controls
        | '\u{00AD}'                // soft hyphen
        | '\u{061C}'                // Arabic letter mark
        | '\u{180E}'                // Mongolian vowel separator
        | '\u{200B}'..='\u{200F}'   // zero-width space, joiners, directional marks
        | '\u{2028}'..='\u{202F}'   // line/paragraph separators, embedding controls
        | '\u{2060}'..='\u{2064}'   // word joiner, invisible operators
        | '\u{2066}'..='\u{206F}'   // isolates, deprecated format chars
        | '\u{FEFF}'                // BOM
        | '\u{FFF0}'..='\u{FFF8}'   // specials
    )
}

fn is_cased_uppercase(c: char) -> bool {
    c.to_uppercase().eq(std::iter::once(c)) && !c.to_lowercase().eq(std::iter::once(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uk() -> Alphabet {
        Alphabet::builtin("uk").unwrap()
    }

    #[test]
    fn ukrainian_alphabet_has_33_letters_per_case() {
        assert_eq!(uk().len(), 66);
        for c in ['ґ', 'Ґ', 'є', 'Є', 'і', 'І', 'ї', 'Ї'] {
            assert!(uk().contains(c), "missing {c}");
        }
        assert!(!uk().contains('ы'));
    }

    #[test]
    fn capital_first_title_case_only() {
        assert!(is_starts_with_capital("Apple"));
        assert!(is_starts_with_capital("Київ"));
        assert!(!is_starts_with_capital("apple"));
        assert!(!is_starts_with_capital("BANANA"));
        assert!(!is_starts_with_capital("A"));
        assert!(!is_starts_with_capital("1abc"));
        assert!(!is_starts_with_capital(""));
    }

    #[test]
    fn all_caps_requires_cased_letters() {
        assert!(is_all_caps("BANANA"));
        assert!(is_all_caps("ЗСУ"));
        assert!(is_all_caps("A"));
        assert!(!is_all_caps("Apple"));
        assert!(!is_all_caps("123"));
        assert!(!is_all_caps("-"));
        assert!(!is_all_caps(""));
    }

    #[test]
    fn capital_first_and_all_caps_never_both_fire() {
        for word in ["Apple", "APPLE", "A", "Ab", "AB", "ЇЖАК", "Їжак", "X1", "Xy1"] {
            assert!(
                !(is_all_caps(word) && is_starts_with_capital(word)),
                "{word} classified both ways"
            );
        }
    }

    #[test]
    fn non_linguistic_keeps_order_and_repeats() {
        assert_eq!(non_linguistic_chars("сло.во!.", &uk()), ".!.");
        assert_eq!(non_linguistic_chars("word", &uk()), "word");
        assert_eq!(non_linguistic_chars("", &uk()), "");
    }

    #[test]
    fn apostrophes_and_hyphen_are_linguistic() {
        for word in ["м'ясо", "м’ясо", "м‘ясо", "мʼясо", "мʹясо", "м`ясо", "м´ясо", "мʻясо", "будь-який"] {
            assert_eq!(non_linguistic_chars(word, &uk()), "", "{word}");
        }
    }

    #[test]
    fn stripping_flagged_chars_leaves_only_allowed() {
        let alphabet = uk();
        for word in ["при3віт", "hello світ", "a\u{200B}б", "м'ясо-2"] {
            let flagged: Vec<char> = non_linguistic_chars(word, &alphabet).chars().collect();
            let rest: String = word.chars().filter(|c| !flagged.contains(c)).collect();
            assert!(
                rest.chars()
                    .all(|c| alphabet.contains(c) || is_apostrophe(c) || c == '-'),
                "{word} left {rest}"
            );
        }
    }

    #[test]
    fn spaces_and_digits() {
        assert!(has_spaces("два слова"));
        assert!(!has_spaces("слово\u{00A0}"));
        assert!(has_digits("a1"));
        assert!(!has_digits("abc"));
        assert!(!has_spaces("") && !has_digits(""));
    }

    #[test]
    fn invisible_ranges() {
        for c in ['\u{0000}', '\u{0009}', '\u{0085}', '\u{00AD}', '\u{061C}', '\u{180E}', '\u{200B}', '\u{200F}', '\u{2028}', '\u{202F}', '\u{2060}', '\u{2066}', '\u{206F}', '\u{FEFF}', '\u{FFF8}'] {
            assert!(is_invisible(c), "{:04X}", c as u32);
        }
        for c in ['a', ' ', '\u{2065}', '\u{2030}', '\u{FFF9}', 'ї'] {
            assert!(!is_invisible(c), "{:04X}", c as u32);
        }
        assert!(has_invisible_chars("сло\u{200B}во"));
        assert!(!has_invisible_chars(""));
    }

    #[test]
    fn classification_is_repeatable() {
        let alphabet = uk();
        for word in ["Apple", "BANANA", "при3віт", "a\u{FEFF}", ""] {
            assert_eq!(is_starts_with_capital(word), is_starts_with_capital(word));
            assert_eq!(is_all_caps(word), is_all_caps(word));
            assert_eq!(
                non_linguistic_chars(word, &alphabet),
                non_linguistic_chars(word, &alphabet)
            );
            assert_eq!(has_invisible_chars(word), has_invisible_chars(word));
        }
    }

    #[test]
    fn builtin_alphabets() {
        assert!(Alphabet::builtin("es").unwrap().contains('ñ'));
        assert!(Alphabet::builtin("en").unwrap().contains('Z'));
        assert!(Alphabet::builtin("de").is_none());
        assert!(Alphabet::new("").is_empty());
    }
}
