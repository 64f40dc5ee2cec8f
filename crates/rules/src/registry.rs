//! Compiled pattern registries.
//!
//! A registry is an ordered list of `(concept, pattern)` rules built once at
//! startup from a literal table. Every pattern is compiled eagerly, so a
//! malformed source fails the whole registry before anything is matched.
//!
//! Patterns are written against normalized text (see [`crate::normalize`]).
//! They are still compiled case-insensitively, and `.` matches line breaks so
//! a pattern can span the lines of a notice body.

use std::collections::HashSet;
use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::normalize::normalize;

/// Errors raised while building a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A pattern source failed to compile.
    #[error("{registry} registry: pattern for '{concept}' does not compile: {source}")]
    Compile {
        registry: RegistryKind,
        concept: String,
        #[source]
        source: regex::Error,
    },

    /// The same concept name appears twice in one table.
    #[error("{registry} registry: duplicate concept '{concept}'")]
    DuplicateConcept {
        registry: RegistryKind,
        concept: String,
    },
}

/// Semantic role of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    /// A match means the notice must be forwarded.
    Priority,
    /// A match means the notice is suppressed.
    Block,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Priority => write!(f, "priority"),
            RegistryKind::Block => write!(f, "block"),
        }
    }
}

/// One named pattern.
#[derive(Debug, Clone)]
pub struct PatternRule {
    concept: String,
    pattern: Regex,
}

impl PatternRule {
    pub fn concept(&self) -> &str {
        &self.concept
    }

    pub fn source(&self) -> &str {
        self.pattern.as_str()
    }

    /// First matched substring of `text`, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

/// The concept and substring that satisfied a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'r, 't> {
    pub concept: &'r str,
    pub span: &'t str,
}

/// Ordered, immutable collection of compiled rules.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    kind: RegistryKind,
    rules: Vec<PatternRule>,
}

impl PatternRegistry {
    /// Compile a literal `(concept, pattern source)` table, keeping its order.
    pub fn compile(kind: RegistryKind, table: &[(&str, &str)]) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(table.len());

        for (concept, source) in table {
            if !seen.insert(*concept) {
                return Err(RegistryError::DuplicateConcept {
                    registry: kind,
                    concept: concept.to_string(),
                });
            }
            let pattern = build_pattern(source).map_err(|source| RegistryError::Compile {
                registry: kind,
                concept: concept.to_string(),
                source,
            })?;
            rules.push(PatternRule {
                concept: concept.to_string(),
                pattern,
            });
        }

        tracing::debug!(registry = %kind, rules = rules.len(), "pattern registry compiled");
        Ok(Self { kind, rules })
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Scan rules in table order; the first rule that matches wins.
    pub fn first_match<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.rules.iter().find_map(|rule| {
            rule.find(text).map(|span| RuleMatch {
                concept: rule.concept(),
                span,
            })
        })
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn concepts(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(PatternRule::concept)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Plain keywords matched as whole words.
///
/// Older configurations listed forwarding triggers as bare words rather than
/// patterns; they are checked after the priority registry misses.
#[derive(Debug, Clone)]
pub struct KeywordList {
    entries: Vec<(String, Regex)>,
}

impl KeywordList {
    pub fn compile(keywords: &[&str]) -> Result<Self, RegistryError> {
        let entries = keywords
            .iter()
            .map(|kw| {
                let source = format!(r"\b{}\b", regex::escape(&normalize(kw)));
                build_pattern(&source)
                    .map(|re| (kw.to_string(), re))
                    .map_err(|source| RegistryError::Compile {
                        registry: RegistryKind::Priority,
                        concept: kw.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// First keyword present in `text`, as originally written.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(kw, _)| kw.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_pattern(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_keeps_table_order() {
        let reg = PatternRegistry::compile(
            RegistryKind::Block,
            &[("b", r"\bbeta\b"), ("a", r"\balpha\b"), ("c", r"\bgamma\b")],
        )
        .unwrap();
        assert_eq!(reg.concepts().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(reg.kind(), RegistryKind::Block);
    }

    #[test]
    fn first_match_wins_in_table_order() {
        let reg = PatternRegistry::compile(
            RegistryKind::Block,
            &[("generic", r"\bcredor(?:es)?\b"), ("specific", r"\bcredor generico\b")],
        )
        .unwrap();
        let m = reg.first_match("favor criar credor generico").unwrap();
        assert_eq!(m.concept, "generic");
        assert_eq!(m.span, "credor");
    }

    #[test]
    fn malformed_pattern_fails_whole_registry() {
        let err = PatternRegistry::compile(
            RegistryKind::Priority,
            &[("ok", r"\bfine\b"), ("broken", r"(unclosed")],
        )
        .unwrap_err();
        match err {
            RegistryError::Compile { registry, concept, .. } => {
                assert_eq!(registry, RegistryKind::Priority);
                assert_eq!(concept, "broken");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_concept_rejected() {
        let err = PatternRegistry::compile(
            RegistryKind::Block,
            &[("dup", "a"), ("dup", "b")],
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateConcept { .. }));
        assert!(err.to_string().contains("dup"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let reg =
            PatternRegistry::compile(RegistryKind::Priority, &[("u", r"\burgente\b")]).unwrap();
        assert!(reg.first_match("URGENTE").is_some());
    }

    #[test]
    fn dot_spans_line_breaks() {
        let reg = PatternRegistry::compile(
            RegistryKind::Block,
            &[("acesso", r"\bacesso\b.{0,25}\bsiafem\b")],
        )
        .unwrap();
        let m = reg.first_match("pedido de acesso\nao siafem").unwrap();
        assert_eq!(m.span, "acesso\nao siafem");
    }

    #[test]
    fn no_match_returns_none() {
        let reg = PatternRegistry::compile(RegistryKind::Block, &[("x", r"\bxyz\b")]).unwrap();
        assert!(reg.first_match("nada aqui").is_none());
    }

    #[test]
    fn keywords_match_whole_words_after_normalizing() {
        let kws = KeywordList::compile(&["FlexVision", "Ação"]).unwrap();
        assert_eq!(kws.len(), 2);
        assert_eq!(kws.first_match("o flexvision caiu"), Some("FlexVision"));
        assert_eq!(kws.first_match("nova acao pendente"), Some("Ação"));
        assert_eq!(kws.first_match("flexvisions"), None);
    }

    #[test]
    fn keyword_metacharacters_are_escaped() {
        let kws = KeywordList::compile(&["c.d"]).unwrap();
        assert!(kws.first_match("cxd").is_none());
        assert!(kws.first_match("o c.d venceu").is_some());
    }
}
