//! Rule-table pluralization.
//!
//! This is a heuristic, not English morphology. Words it gets wrong belong in
//! [`IRREGULAR`].

/// Exact-match singular/plural pairs, checked before any suffix rule.
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
    ("datum", "data"),
    ("criterion", "criteria"),
    ("analysis", "analyses"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("status", "statuses"),
    ("quiz", "quizzes"),
    ("photo", "photos"),
    ("video", "videos"),
    ("radio", "radios"),
    ("sheep", "sheep"),
    ("fish", "fish"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("metadata", "metadata"),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Character before the final `suffix_len` chars, if it is a consonant.
fn consonant_before(word: &str, suffix_len: usize) -> bool {
    word.chars()
        .rev()
        .nth(suffix_len)
        .is_some_and(|c| c.is_alphabetic() && !is_vowel(c))
}

/// Split a snake_case identifier into its leading part and last word.
fn split_last(word: &str) -> (&str, &str) {
    match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    }
}

/// Pluralize a singular snake_case form.
///
/// Only the last `_`-separated word is inflected, so `blog_post` becomes
/// `blog_posts` and `grand_child` becomes `grand_children`.
pub fn pluralize(word: &str) -> String {
    let (head, last) = split_last(word);
    if last.is_empty() {
        return word.to_string();
    }
    format!("{head}{}", pluralize_word(last))
}

fn pluralize_word(word: &str) -> String {
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return (*plural).to_string();
    }

    if word.chars().count() < 2 {
        return format!("{word}s");
    }

    if ["s", "ss", "sh", "ch", "x", "z"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if word.ends_with('y') && consonant_before(word, 1) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if word.ends_with('o') && consonant_before(word, 1) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{stem}ves");
    }
    if let Some(stem) = word.strip_suffix('f') {
        return format!("{stem}ves");
    }

    format!("{word}s")
}

/// Best-effort inverse of [`pluralize`].
///
/// Guarantees `pluralize(singularize(pluralize(w))) == pluralize(w)` for the
/// irregular table and each suffix rule class; it does not guarantee
/// `singularize(pluralize(w)) == w` (`knife` -> `knives` -> `knif`).
pub fn singularize(word: &str) -> String {
    let (head, last) = split_last(word);
    if last.is_empty() {
        return word.to_string();
    }
    format!("{head}{}", singularize_word(last))
}

fn singularize_word(word: &str) -> String {
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
        return (*singular).to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("ves") {
        if !stem.is_empty() {
            return format!("{stem}f");
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        let sibilant = ["s", "sh", "ch", "x", "z"].iter().any(|s| stem.ends_with(s));
        let consonant_o = stem.ends_with('o') && consonant_before(stem, 1);
        if stem.chars().count() >= 2 && (sibilant || consonant_o) {
            return stem.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if !stem.is_empty() && !stem.ends_with('s') {
            return stem.to_string();
        }
    }

    word.to_string()
}
