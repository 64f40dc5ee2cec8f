//! Text normalization used for pattern matching.
//!
//! Policy:
//! - Canonical decomposition (NFD), so accented letters split into a base
//!   letter plus combining marks.
//! - Combining marks dropped.
//! - Lowercased.
//!
//! Pattern sources are authored against this form (lower-case, unaccented),
//! so keep this logic single-sourced. The original text is never replaced by
//! the normalized one; it is only used for matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for matching: strip accents, then lowercase.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A notice body together with its normalized form.
///
/// The normalized text is derived once and cached for the lifetime of the
/// value; the raw text is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeText<'a> {
    raw: &'a str,
    normalized: String,
}

impl<'a> NoticeText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            normalized: normalize(raw),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_lowercases() {
        assert_eq!(normalize("Não FUNCIONA"), "nao funciona");
        assert_eq!(normalize("Inscrição Genérica"), "inscricao generica");
        assert_eq!(normalize("EMERGÊNCIA às 9h"), "emergencia as 9h");
    }

    #[test]
    fn accented_and_plain_forms_agree() {
        assert_eq!(normalize("não funciona"), normalize("nao funciona"));
        assert_eq!(normalize("Relatório"), normalize("relatorio"));
    }

    #[test]
    fn decomposed_input_matches_precomposed() {
        // "é" as 'e' + U+0301 COMBINING ACUTE ACCENT
        assert_eq!(normalize("gene\u{301}rica"), "generica");
        assert_eq!(normalize("genérica"), "generica");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "SIAFERIO fora do ar desde as 9h",
            "Solicito inscrição genérica para o fornecedor X",
            "Ação – Ç ñ Ü ø ß İ Å",
            "linha 1\nlinha 2\tTAB",
            "",
            "ＡＢＣ 123 ½",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn preserves_line_breaks_and_punctuation() {
        assert_eq!(normalize("A,\nB!"), "a,\nb!");
    }

    #[test]
    fn notice_text_keeps_raw_untouched() {
        let raw = "Reunião sobre PROCEDIMENTOS";
        let text = NoticeText::new(raw);
        assert_eq!(text.raw(), raw);
        assert_eq!(text.normalized(), "reuniao sobre procedimentos");
    }
}
