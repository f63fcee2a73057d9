//! File name transliteration.
//!
//! Cyrillic letters are replaced with Latin spellings, then every character
//! outside `[A-Za-z0-9_]` becomes an underscore. Only stems are normalized;
//! callers reattach the extension themselves.

use regex::Regex;
use std::collections::HashMap;

const CYRILLIC: [char; 37] = [
    'а', 'б', 'в', 'г', 'д', 'е', 'ё', 'ж', 'з', 'и', 'й', 'к', 'л', 'м', 'н', 'о', 'п', 'р', 'с',
    'т', 'у', 'ф', 'х', 'ц', 'ч', 'ш', 'щ', 'ъ', 'ы', 'ь', 'э', 'ю', 'я', 'є', 'і', 'ї', 'ґ',
];

const LATIN: [&str; 37] = [
    "a", "b", "v", "g", "d", "e", "e", "j", "z", "i", "j", "k", "l", "m", "n", "o", "p", "r", "s",
    "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "y", "", "e", "yu", "ya", "je", "i", "ji", "g",
];

fn titlecase(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Transliterates names into a filesystem-safe ASCII form.
///
/// # Examples
///
/// ```
/// use clean_folder::normalize::Normalizer;
///
/// let normalizer = Normalizer::new();
/// assert_eq!(normalizer.normalize("Файл"), "Fajl");
/// assert_eq!(normalizer.normalize("a!!b"), "a__b");
/// assert_eq!(normalizer.normalize("Щука 2"), "Schuka_2");
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    translation: HashMap<char, String>,
    non_word: Regex,
}

impl Normalizer {
    /// Builds the normalizer from the built-in Cyrillic table.
    pub fn new() -> Self {
        Self::from_alphabet(&CYRILLIC, &LATIN)
    }

    /// Builds a normalizer from two aligned sequences.
    ///
    /// `source[i]` maps to `target[i]`, and the single-character uppercase
    /// form of `source[i]`, if it has one, maps to the titlecased `target[i]`.
    /// Only the first `min(source.len(), target.len())` entries are used.
    pub fn from_alphabet(source: &[char], target: &[&str]) -> Self {
        let mut translation = HashMap::new();
        for (&c, &latin) in source.iter().zip(target) {
            translation.insert(c, latin.to_string());
            let mut upper = c.to_uppercase();
            if let (Some(u), None) = (upper.next(), upper.next())
                && u != c
            {
                translation.insert(u, titlecase(latin));
            }
        }

        Self {
            translation,
            non_word: Regex::new(r"[^A-Za-z0-9_]").expect("Invalid non-word pattern"),
        }
    }

    /// Transliterates a name and replaces each remaining non-word character
    /// with a single underscore.
    pub fn normalize(&self, name: &str) -> String {
        let translated: String = name
            .chars()
            .fold(String::with_capacity(name.len()), |mut out, c| {
                match self.translation.get(&c) {
                    Some(latin) => out.push_str(latin),
                    None => out.push(c),
                }
                out
            });

        self.non_word.replace_all(&translated, "_").into_owned()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
