//! Canonical projection of token names and symbols
//!
//! Names are folded to lowercase ASCII alphanumerics so that look-alike
//! spellings collapse onto the same string before any distance is taken.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Cyrillic, Greek and Latin-extended letters commonly used to spoof Latin ones.
/// Keys are lowercase; lookup happens after case folding.
static HOMOGLYPHS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    [
        // Cyrillic
        ('а', "a"), ('в', "b"), ('ь', "b"), ('с', "c"), ('ԁ', "d"), ('е', "e"),
        ('г', "r"), ('һ', "h"), ('н', "h"), ('і', "i"), ('ј', "j"), ('к', "k"),
        ('м', "m"), ('п', "n"), ('о', "o"), ('р', "p"), ('ԛ', "q"), ('ѕ', "s"),
        ('т', "t"), ('у', "y"), ('ү', "y"), ('ԝ', "w"), ('х', "x"), ('з', "3"),
        // Greek
        ('α', "a"), ('β', "b"), ('γ', "y"), ('ε', "e"), ('η', "n"), ('ι', "i"),
        ('κ', "k"), ('μ', "u"), ('ν', "v"), ('ο', "o"), ('ρ', "p"), ('τ', "t"),
        ('υ', "u"), ('χ', "x"), ('ω', "w"),
        // Latin letters without a canonical decomposition
        ('ı', "i"), ('ł', "l"), ('ø', "o"), ('đ', "d"), ('ħ', "h"),
        ('ß', "ss"), ('æ', "ae"), ('œ', "oe"),
    ]
    .into_iter()
    .collect()
});

/// Canonicalize raw name or symbol text.
///
/// Applies NFKD (fullwidth forms, ligatures), drops combining marks
/// (accents), lowercases, maps homoglyphs to Latin and finally keeps only
/// `[a-z0-9]`. The output is ASCII, so the function is idempotent.
pub fn canonicalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for ch in raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        if let Some(latin) = HOMOGLYPHS.get(&ch) {
            out.push_str(latin);
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        }
    }

    out
}

/// Canonical form of a name+symbol pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalIdentity {
    pub name: String,
    pub symbol: String,
}

impl CanonicalIdentity {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: canonicalize(name),
            symbol: canonicalize(symbol),
        }
    }

    /// Unified identity `canon(name) + canon(symbol)`, also the dedupe key
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(self.name.len() + self.symbol.len());
        key.push_str(&self.name);
        key.push_str(&self.symbol);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_case_and_punctuation() {
        assert_eq!(canonicalize("Wrapped Ether (v2)!"), "wrappedetherv2");
        assert_eq!(canonicalize("ABC"), canonicalize("abc"));
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("$$$ ---"), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["Eth3reum", "Ｂｉｔｃｏｉｎ", "Ꭼthereum", "ﬁnance", "Café Coin", "ОРТ"] {
            let once = canonicalize(raw);
            assert_eq!(canonicalize(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_folds_homoglyphs() {
        // Cyrillic Е and о
        assert_eq!(canonicalize("Еthereum"), "ethereum");
        assert_eq!(canonicalize("Bitcоin"), "bitcoin");
        // Greek capital Alpha and omicron
        assert_eq!(canonicalize("ΑLPHA"), "alpha");
        assert_eq!(canonicalize("Dοge"), "doge");
    }

    #[test]
    fn test_folds_compatibility_forms() {
        assert_eq!(canonicalize("Ｂｉｔｃｏｉｎ"), "bitcoin");
        assert_eq!(canonicalize("ﬁnance"), "finance");
        assert_eq!(canonicalize("Café"), "cafe");
        assert_eq!(canonicalize("Straße"), "strasse");
    }

    #[test]
    fn test_leetspeak_digits_survive() {
        assert_eq!(canonicalize("Eth3reum"), "eth3reum");
    }

    #[test]
    fn test_identity_key() {
        let id = CanonicalIdentity::new("Alpha Coin", "A.L.P");
        assert_eq!(id.name, "alphacoin");
        assert_eq!(id.symbol, "alp");
        assert_eq!(id.key(), "alphacoinalp");
    }
}
