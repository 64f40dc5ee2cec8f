//! Three-tier classification of a notice body.
//!
//! Stages run in a fixed order and stop on the first hit:
//! priority patterns, then priority keywords, then block patterns, then the
//! default. Block patterns are never consulted once anything in the
//! priority tier has matched.

use std::fmt;

use serde::Serialize;

use crate::normalize::NoticeText;
use crate::patterns;
use crate::registry::{KeywordList, PatternRegistry, RegistryError, RegistryKind};

/// What happens to a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// A priority concept matched; forward.
    Send,
    /// A block concept matched; do not forward.
    Block,
    /// Nothing matched; forward for manual triage.
    SendDefault,
}

impl Outcome {
    /// Whether the notice goes to the distribution list.
    pub fn forwards(self) -> bool {
        !matches!(self, Outcome::Block)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Send => write!(f, "SEND"),
            Outcome::Block => write!(f, "BLOCK"),
            Outcome::SendDefault => write!(f, "SEND_DEFAULT"),
        }
    }
}

/// The explainable result of classifying one notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub outcome: Outcome,
    pub matched_concept: Option<String>,
    /// Substring of the normalized text that matched.
    pub matched_span: Option<String>,
    /// Report-log line describing the decision.
    pub reason: String,
}

impl Decision {
    fn priority(concept: &str, span: &str) -> Self {
        Self {
            outcome: Outcome::Send,
            matched_concept: Some(concept.to_string()),
            matched_span: Some(span.to_string()),
            reason: format!("[ENVIO PRIORITÁRIO] {concept} detectado (trecho: \"{span}\")."),
        }
    }

    fn keyword(keyword: &str) -> Self {
        Self {
            outcome: Outcome::Send,
            matched_concept: Some(keyword.to_string()),
            matched_span: None,
            reason: format!("[ENVIO PRIORITÁRIO] Palavra-chave '{keyword}' encontrada."),
        }
    }

    fn block(concept: &str, span: &str) -> Self {
        Self {
            outcome: Outcome::Block,
            matched_concept: Some(concept.to_string()),
            matched_span: Some(span.to_string()),
            reason: format!("[BLOQUEADO] Assunto impeditivo: '{concept}' (trecho: \"{span}\")."),
        }
    }

    fn default_send() -> Self {
        Self {
            outcome: Outcome::SendDefault,
            matched_concept: None,
            matched_span: None,
            reason: "[ENVIO DE EMAIL PARA ANALISE] Nenhuma palavra impeditiva encontrada."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    ScanningPriority,
    ScanningKeywords,
    ScanningBlock,
    Default,
}

/// Applies the tiered policy using two registries and a keyword list.
///
/// Immutable after construction; share it by reference across runs.
#[derive(Debug, Clone)]
pub struct DecisionResolver {
    priority: PatternRegistry,
    keywords: KeywordList,
    block: PatternRegistry,
}

impl DecisionResolver {
    pub fn new(priority: PatternRegistry, keywords: KeywordList, block: PatternRegistry) -> Self {
        debug_assert_eq!(priority.kind(), RegistryKind::Priority);
        debug_assert_eq!(block.kind(), RegistryKind::Block);
        Self {
            priority,
            keywords,
            block,
        }
    }

    /// Resolver built from the bundled pattern tables.
    pub fn standard() -> Result<Self, RegistryError> {
        let priority = PatternRegistry::compile(RegistryKind::Priority, patterns::PRIORITY)?;
        let keywords = KeywordList::compile(patterns::PRIORITY_KEYWORDS)?;
        let block = PatternRegistry::compile(RegistryKind::Block, patterns::BLOCK)?;
        tracing::info!(
            priority = priority.len(),
            keywords = keywords.len(),
            block = block.len(),
            "decision resolver ready"
        );
        Ok(Self::new(priority, keywords, block))
    }

    pub fn priority(&self) -> &PatternRegistry {
        &self.priority
    }

    pub fn block(&self) -> &PatternRegistry {
        &self.block
    }

    /// Classify raw notice text.
    pub fn resolve(&self, raw: &str) -> Decision {
        self.resolve_text(&NoticeText::new(raw))
    }

    pub fn resolve_text(&self, text: &NoticeText<'_>) -> Decision {
        let normalized = text.normalized();
        let mut stage = Stage::ScanningPriority;
        loop {
            stage = match stage {
                Stage::ScanningPriority => match self.priority.first_match(normalized) {
                    Some(m) => return Decision::priority(m.concept, m.span),
                    None => Stage::ScanningKeywords,
                },
                Stage::ScanningKeywords => match self.keywords.first_match(normalized) {
                    Some(kw) => return Decision::keyword(kw),
                    None => Stage::ScanningBlock,
                },
                Stage::ScanningBlock => match self.block.first_match(normalized) {
                    Some(m) => return Decision::block(m.concept, m.span),
                    None => Stage::Default,
                },
                Stage::Default => return Decision::default_send(),
            };
        }
    }
}
