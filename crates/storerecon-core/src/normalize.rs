//! Text normalization applied before every store-name comparison.
//!
//! Export files from different POS platforms spell the same merchant with
//! different casing, accents and punctuation (`"Pereña - Centro"`,
//! `"PERENA CENTRO"`). Comparisons are done on the normalized form only.

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block (U+0300..=U+036F).
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Normalize free text for store-name comparison.
///
/// Steps, in order: canonical decomposition (NFD) with combining diacritics
/// stripped, lowercasing, every run of characters outside `[a-z0-9]`
/// replaced by a single space, and leading/trailing space trimmed.
///
/// Total over all input and idempotent: `normalize(&normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    let folded = input
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .flat_map(char::to_lowercase);

    for c in folded {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_keeps_digits() {
        assert_eq!(normalize("ARMENIA 14"), "armenia 14");
    }

    #[test]
    fn strips_diacritics_before_lowercasing() {
        assert_eq!(normalize("Perñía"), "pernia");
        assert_eq!(normalize("ÁRBOL ÉXITO"), "arbol exito");
        assert_eq!(normalize("Pereña"), "perena");
    }

    #[test]
    fn collapses_punctuation_runs_to_single_space() {
        assert_eq!(
            normalize("Kan Can Jeans Colombia - Naranka"),
            "kan can jeans colombia naranka"
        );
        assert_eq!(normalize("a.-_/b"), "a b");
        assert_eq!(normalize("tienda   #5"), "tienda 5");
    }

    #[test]
    fn trims_leading_and_trailing_noise() {
        assert_eq!(normalize("  --NARANKA SAS--  "), "naranka sas");
        assert_eq!(normalize("\tcentro\n"), "centro");
    }

    #[test]
    fn empty_and_symbol_only_inputs_become_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("¿¡!?"), "");
    }

    #[test]
    fn non_latin_letters_become_separators() {
        // ß has no decomposition and stays outside [a-z0-9].
        assert_eq!(normalize("Straße 9"), "stra e 9");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "ARMENIA 14",
            "Perñía",
            "  Kan Can Jeans Colombia - Naranka ",
            "NARANKA S.A.S.",
            "Straße 9",
            "",
            "ÉÈÊË--ïî",
            "123  456",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
