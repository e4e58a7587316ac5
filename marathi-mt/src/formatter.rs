//! Post-processing of raw backend output
//!
//! Seq2seq models tend to drop or invent terminal punctuation, ignore the
//! casing of the input and, for very short inputs, sometimes emit a single
//! token over and over (the "salad" artifact). [`improve_formatting`]
//! nudges the translation back towards the shape of the source:
//!
//! 1. Blank source → empty result; empty translation → trimmed source.
//! 2. Terminal punctuation of the source is mirrored onto the translation.
//! 3. Repeated-word salad is collapsed to its first word.
//! 4. Source casing (all lower, all upper, or first letter) is mirrored.
//!
//! Steps run in that order, each on the output of the previous one.

/// Characters treated as terminal punctuation
pub const PUNCTUATION_CHARS: [char; 6] = ['!', '?', '.', ',', ';', '。'];

/// Sources at least this long (in characters) never trigger salad cleanup
const SALAD_MAX_SOURCE_CHARS: usize = 20;

/// Toggles for the individual formatting passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub improve_punctuation: bool,
    pub remove_single_word_duplicates: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            improve_punctuation: true,
            remove_single_word_duplicates: true,
        }
    }
}

/// Adjust `translation` so it mirrors the punctuation and case of `source`
pub fn improve_formatting(source: &str, translation: &str, options: FormatOptions) -> String {
    let source = source.trim();

    if source.is_empty() {
        return String::new();
    }

    if translation.is_empty() {
        return source.to_string();
    }

    let mut translation = translation.to_string();

    if options.improve_punctuation {
        mirror_punctuation(source, &mut translation);
    }

    if options.remove_single_word_duplicates {
        collapse_word_salad(source, &mut translation);
    }

    mirror_case(source, translation)
}

/// [`improve_formatting`] with every pass enabled
pub fn format_translation(source: &str, translation: &str) -> String {
    improve_formatting(source, translation, FormatOptions::default())
}

fn is_punctuation(c: char) -> bool {
    PUNCTUATION_CHARS.contains(&c)
}

fn mirror_punctuation(source: &str, translation: &mut String) {
    let (Some(source_last), Some(translation_last)) =
        (source.chars().last(), translation.chars().last())
    else {
        return;
    };

    if is_punctuation(source_last) {
        if translation_last != source_last {
            if is_punctuation(translation_last) {
                translation.pop();
            }
            translation.push(source_last);
        }
    } else if is_punctuation(translation_last) {
        translation.pop();
    }
}

fn collapse_word_salad(source: &str, translation: &mut String) {
    if source.chars().count() >= SALAD_MAX_SOURCE_CHARS
        || source.contains(' ')
        || !translation.contains(' ')
    {
        return;
    }

    let words: Vec<&str> = translation.split_whitespace().collect();
    let Some(first) = words.first() else {
        return;
    };

    // Distinct words in first-seen order with their counts
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for word in &words {
        match counts.iter_mut().find(|(w, _)| w == word) {
            Some((_, count)) => *count += 1,
            None => counts.push((*word, 1)),
        }
    }

    let distinct = counts.len() as f64;
    if counts
        .iter()
        .any(|(_, count)| *count as f64 / distinct >= 2.0)
    {
        *translation = first.to_string();
    }
}

fn mirror_case(source: &str, translation: String) -> String {
    if is_all_lowercase(source) {
        return translation.to_lowercase();
    }

    if is_all_uppercase(source) {
        return translation.to_uppercase();
    }

    if translation.is_empty() {
        return source.to_string();
    }

    match source.chars().next() {
        Some(c) if c.is_lowercase() => map_first_char(&translation, char::to_lowercase),
        Some(c) if c.is_uppercase() => map_first_char(&translation, char::to_uppercase),
        _ => translation,
    }
}

fn map_first_char<I>(text: &str, f: impl Fn(char) -> I) -> String
where
    I: Iterator<Item = char>,
{
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => f(first).chain(chars).collect(),
        None => String::new(),
    }
}

/// True when `text` has at least one cased character and none upper-case
fn is_all_lowercase(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

/// True when `text` has at least one cased character and none lower-case
fn is_all_uppercase(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Early Exit Tests ==========

    #[test]
    fn test_blank_source_gives_empty_result() {
        assert_eq!(format_translation("", "anything"), "");
        assert_eq!(format_translation("   \n", "anything"), "");
    }

    #[test]
    fn test_empty_translation_returns_trimmed_source() {
        assert_eq!(format_translation("  Hello ", ""), "Hello");
    }

    // ========== Punctuation Tests ==========

    #[test]
    fn test_source_punctuation_is_appended() {
        assert_eq!(format_translation("Hello!", "नमस्कार"), "नमस्कार!");
        assert_eq!(format_translation("कसे आहात?", "How are you"), "How are you?");
    }

    #[test]
    fn test_source_punctuation_replaces_translation_punctuation() {
        assert_eq!(format_translation("Is it ready?", "ते तयार आहे."), "ते तयार आहे?");
        assert_eq!(format_translation("Done.", "झाले।"), "झाले।.");
    }

    #[test]
    fn test_matching_punctuation_is_kept() {
        assert_eq!(format_translation("Hello.", "नमस्कार."), "नमस्कार.");
    }

    #[test]
    fn test_translation_punctuation_stripped_when_source_has_none() {
        assert_eq!(format_translation("Home", "घर."), "घर");
        assert_eq!(format_translation("Home", "घर!"), "घर");
    }

    #[test]
    fn test_ideographic_full_stop() {
        assert_eq!(format_translation("Ok。", "ठीक आहे."), "ठीक आहे。");
    }

    #[test]
    fn test_punctuation_mirroring_can_be_disabled() {
        let options = FormatOptions {
            improve_punctuation: false,
            ..FormatOptions::default()
        };
        assert_eq!(improve_formatting("Home", "घर.", options), "घर.");
    }

    #[test]
    fn test_every_punctuated_source_ends_with_its_punctuation() {
        let translations = ["नमस्कार", "नमस्कार.", "नमस्कार?", "a b c", "x;"];
        for p in PUNCTUATION_CHARS {
            let source = format!("Hello there{}", p);
            for t in translations {
                let result = format_translation(&source, t);
                assert_eq!(result.chars().last(), Some(p), "{} / {}", source, t);
            }
        }
    }

    #[test]
    fn test_punctuation_is_idempotent() {
        let source = "How are you?";
        let once = format_translation(source, "तुम्ही कसे आहात?");
        let twice = format_translation(source, &once);
        assert_eq!(once, twice);
    }

    // ========== Salad Cleanup Tests ==========

    #[test]
    fn test_salad_collapses_to_first_word() {
        assert_eq!(format_translation("hi", "no no no no"), "no");
    }

    #[test]
    fn test_salad_collapse_then_case_mirroring() {
        // The collapsed word still follows the source's capitalization
        assert_eq!(format_translation("Hi", "no no no no"), "No");
    }

    #[test]
    fn test_salad_collapse_drops_mirrored_punctuation() {
        // Punctuation is mirrored before the collapse, so only the first
        // word survives and the "!" goes with the rest.
        assert_eq!(format_translation("Hi!", "no no no no no"), "No");
        assert_eq!(format_translation("ok?", "हो हो हो"), "हो");
    }

    #[test]
    fn test_salad_not_triggered_for_multi_word_source() {
        assert_eq!(format_translation("hello there", "no no no no"), "no no no no");
    }

    #[test]
    fn test_salad_not_triggered_for_long_source() {
        let source = "supercalifragilistic";
        assert_eq!(source.chars().count(), 20);
        assert_eq!(format_translation(source, "no no no no"), "no no no no");
    }

    #[test]
    fn test_salad_not_triggered_for_diverse_output() {
        assert_eq!(format_translation("hi", "good day to you"), "good day to you");
        // two distinct words, each twice: 2 / 2 < 2
        assert_eq!(format_translation("hi", "a b a b"), "a b a b");
    }

    #[test]
    fn test_salad_triggered_by_dominant_repeat() {
        // "x" appears 4 times over 2 distinct words: 4 / 2 >= 2
        assert_eq!(format_translation("hi", "x y x x x"), "x");
    }

    #[test]
    fn test_salad_cleanup_can_be_disabled() {
        let options = FormatOptions {
            remove_single_word_duplicates: false,
            ..FormatOptions::default()
        };
        assert_eq!(improve_formatting("hi", "no no no no", options), "no no no no");
    }

    #[test]
    fn test_salad_with_devanagari_source() {
        assert_eq!(format_translation("घर", "house house house"), "house");
    }

    // ========== Case Mirroring Tests ==========

    #[test]
    fn test_lowercase_source_lowercases_translation() {
        assert_eq!(format_translation("hello world", "Good Morning"), "good morning");
    }

    #[test]
    fn test_uppercase_source_uppercases_translation() {
        assert_eq!(format_translation("HELLO WORLD", "good morning"), "GOOD MORNING");
    }

    #[test]
    fn test_first_letter_case_is_mirrored() {
        assert_eq!(format_translation("Hello World", "good Morning"), "Good Morning");
        assert_eq!(format_translation("hello World", "Good Morning"), "good Morning");
    }

    #[test]
    fn test_uncased_source_leaves_translation_alone() {
        assert_eq!(format_translation("नमस्कार", "Hello"), "Hello");
        assert_eq!(format_translation("123 go", "123 Go"), "123 go");
    }

    #[test]
    fn test_emptied_translation_falls_back_to_source() {
        // "." is stripped by punctuation mirroring, leaving nothing
        assert_eq!(format_translation("Hello World", "."), "Hello World");
        // all-lowercase sources lowercase first, which keeps it empty
        assert_eq!(format_translation("hello", "."), "");
    }

    #[test]
    fn test_case_helpers() {
        assert!(is_all_lowercase("hello, world"));
        assert!(!is_all_lowercase("Hello"));
        assert!(!is_all_lowercase("१२३"));
        assert!(is_all_uppercase("OK!"));
        assert!(!is_all_uppercase("नमस्कार"));
    }
}
