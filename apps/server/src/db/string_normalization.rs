use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Case-fold and strip combining marks, keeping every other character.
///
/// Lowercases, decomposes (NFKD) and removes combining marks, so "Évê" and
/// "eve" compare equal while punctuation is preserved.
pub fn casefold(input: &str) -> String {
    input
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Split text into case-folded words, dropping punctuation.
///
/// Mirrors the `simple` text search configuration closely enough for the
/// in-memory store: any run of alphanumeric characters is one word.
pub fn words(input: &str) -> Vec<String> {
    casefold(input)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casefold_strips_case_and_diacritics() {
        assert_eq!(casefold("  Évê "), "eve");
        assert_eq!(casefold("Éxample.Org/Dócs"), "example.org/docs");
    }

    #[test]
    fn words_split_on_punctuation_and_whitespace() {
        assert_eq!(words("Rust-ownership,  borrowing!"), vec!["rust", "ownership", "borrowing"]);
        assert_eq!(words("Carreño Quiñones"), vec!["carreno", "quinones"]);
        assert!(words(" ... ").is_empty());
    }
}
