//! Literal pattern tables.
//!
//! Sources are written against normalized text (lower-case, no accents).
//! Table order is the tie-break order: the first concept that matches wins.

// Shared fragments for "programa de trabalho" phrasing.
macro_rules! prep {
    () => {
        r"(?:de|do|da|dos|das|no|na|nos|nas)"
    };
}

macro_rules! pt_obj {
    () => {
        r"programa(?:s)?\s*(?:de|-)?\s*trabalho(?:s)?"
    };
}

macro_rules! registration_verbs {
    () => {
        r"(?:cadastr(?:o(?:s)?|ar|ado(?:s)?|amento|ou)|libera(?:cao|r|do(?:s)?)|inativa(?:cao|r|do(?:s)?))"
    };
}

/// Concepts that force a notice to be forwarded.
pub const PRIORITY: &[(&str, &str)] = &[
    (
        "Problemas SIAFERIO",
        concat!(
            r"\b(?:problema(?:s)?|erro(?:s)?|falha(?:s)?|indisponibilidade|instabilidade|lentidao)",
            r"(?:\s+(?:no|do|com|em))?\s+(?:siaferio|siafe[-\s]*rio|siaf[-\s]*e[-\s]*rio)\b",
            r"|\bsiaferio\s+(?:fora\s+do\s+ar|inoperante|com\s+problema(?:s)?|nao\s+(?:funciona|carrega|abre))\b",
        ),
    ),
    ("FlexVision", r"\bflexvision\b|\bflex[-\s]*vision\b"),
    (
        "Sistemas Fora do Ar",
        concat!(
            r"\b(?:sistema(?:s)?|servico(?:s)?|aplicacao(?:oes)?)\s+(?:fora\s+do\s+ar|indisponivel(?:eis)?|inoperante(?:s)?)\b",
            r"|\b(?:sem\s+acesso|nao\s+(?:acessa|conecta|funciona))\s+(?:ao\s+)?(?:sistema(?:s)?|siaferio|siafem)\b",
            r"|\b(?:siaferio|siafe[-\s]*rio|siaf[-\s]*e[-\s]*rio|siafem|siaf[-\s]*em)\s+fora\s+do\s+ar\b",
        ),
    ),
    (
        "Urgente",
        concat!(
            r"\burgent(?:e|es?|issim[ao])\b|\bpriorit[aá]ri[ao](?:s)?\b|\bemerg[eê]ncia\b",
            r"|\basap\b|\bcom\s+urg[eê]ncia\b|\bpara\s+hoje\b|\bimediato\b",
        ),
    ),
    (
        "Erro Crítico",
        concat!(
            r"\b(?:erro\s+(?:critico|grave|fatal|sistema)|falha\s+(?:critica|grave|geral))\b",
            r"|\b(?:nao\s+(?:consegue|consigo)|impossivel)\s+(?:acessar|executar|processar|finalizar)\b",
            r"|\bsistema\s+(?:travado|congelado|nao\s+responde)\b",
        ),
    ),
    (
        "Fechamento",
        concat!(
            r"\b(?:fechamento|encerramento)\s+(?:do\s+)?(?:mes|periodo|exercicio|balanco)\b",
            r"|\bfim\s+do\s+(?:mes|ano|exercicio|periodo)\b",
            r"|\b(?:prestacao|envio)\s+de\s+contas?\b",
        ),
    ),
    (
        "Relatório Urgente",
        concat!(
            r"\b(?:relatorio(?:s)?|demonstrativo(?:s)?)\s+(?:urgente(?:s)?|prioritario(?:s)?|para\s+(?:hoje|amanh[aã]))\b",
            r"|\b(?:balancete|dre|demonstracao)\s+(?:urgente|prioritari[ao])\b",
        ),
    ),
];

/// Bare words still honoured as forwarding triggers when no priority pattern fires.
pub const PRIORITY_KEYWORDS: &[&str] = &["flexvision"];

/// Concepts that suppress a notice.
pub const BLOCK: &[(&str, &str)] = &[
    (
        "Inscrição Genérica",
        r"\binscri(?:cao|coes)\s+generica(?:s)?\b|\bigs\b",
    ),
    ("Credor Genérico", r"\bcredor(?:es)?\s+generic(?:o|os)\b|\bcgs\b"),
    (
        "Bloqueio Judicial",
        r"\bbloqueio(?:s)?\s+judicia(?:l|is)\b|\bcriaca(?:o|oes)\s+de\s+bj\b|\bbj\b",
    ),
    (
        "Código de Barras",
        concat!(
            r"\b(?:cod(?:\.|\s*)barras?|codigo(?:s)?\s+de\s+barras?)\b",
            r"|\balterac(?:ao|oes)\s+de\s+cnpj\s+em\s+(?:cod(?:\.|\s*)barras?|codigo\s+de\s+barras?)\b",
        ),
    ),
    (
        "Dados Bancários",
        concat!(
            r"\bdados\s+bancari(?:o|os)\b",
            r"|\bdomicilio\s+bancari(?:o|os)\b",
            r"|\b(alterac(?:ao|oes)|cadastro|atualizac(?:ao|oes))\s+(?:de\s+)?",
            r"(?:banco(?:s)?|agencia(?:s)?|conta(?:s)?\s+corrent(?:e|es))\b",
        ),
    ),
    ("Boleto/Credor", r"\bboletos?\b|\bcredor(?:es)?\b"),
    (
        "Cadastro em Geral",
        concat!(
            r"\binformac(?:oes)?\s+cadastrais\b",
            r"|\brequisic(?:ao|oes)\s+de\s+pequeno(?:s)?\s+valor(?:es)?\b",
        ),
    ),
    (
        "Cadastro de Convênio",
        concat!(
            r"\bcadastro(?:s)?\s+(?:de\s+)?conta(?:s)?\s+(?:de\s+)?convenio(?:s)?\b",
            r"|\bconta(?:s)?\s+(?:de\s+)?convenio(?:s)?\s+cadastrad(?:a|as|o|os)\b",
        ),
    ),
    (
        "Atualização de Dados",
        concat!(
            r"\batualizac(?:ao|oes)\s+(?:de\s+)?dados?\b",
            r"|\bnomeac(?:ao|oes)\s+de\s+contador(?:es)?\b",
            r"|\balterar?\s+nome(?:s)?\s+(?:de|das|nas)\s+unidade(?:s)?\s+gestora(?:s)?\b",
        ),
    ),
    // verb -> object or object -> verb
    (
        "Programa de Trabalho",
        concat!(
            r"\b(?:",
            r"(?:",
            registration_verbs!(),
            r"(?:\s+(?:o|a|os|as))?\s*(?:\s+no\s+sistema)?(?:\s+",
            prep!(),
            r")?\s+",
            pt_obj!(),
            r")",
            r"|",
            r"(?:",
            pt_obj!(),
            r"(?:\s+no\s+sistema)?(?:\s+(?:foi|foram|esta(?:o)?|sera(?:o)?))?\s*(?:\w+\s+){0,6}",
            registration_verbs!(),
            r")",
            r")\b",
        ),
    ),
    (
        "Detalhamento de Fonte",
        concat!(
            r"\bcadastro(?:s)?\s+(?:de\s+)?detalhamento(?:s)?\s+(?:de\s+)?fonte(?:s)?\b",
            r"|\bdetalhamento(?:s)?\s+(?:da|de)\s+fonte(?:s)?\b",
            r"|\bfonte(?:s)?\s+detalhad(?:a|as|o|os)\b",
        ),
    ),
    (
        "Acesso ou Senha",
        r"(?:(?:\bacesso(?:s)?\b|\bsenha(?:s)?\b).{0,25}\b(?:siafem|siaferio)\b|\bsiafem\b|\bsiaferio\b)",
    ),
    (
        "Reativação",
        concat!(
            r"\breativ(?:ar|acao|acoes|ado(?:s)?|ada(?:s)?)\b",
            r"|\bdesbloqueio(?:s)?\s+de\s+usuario(?:s)?\b",
            r"|\breativac(?:ao|oes)\s+de\s+perfil\b",
        ),
    ),
    (
        "Perfil ou Gestor de Usuários",
        concat!(
            r"\bgestor(?:es)?\s+de\s+usuario(?:s)?\b",
            r"|\bperfil(?:es)?\s+de\s+usuario(?:s)?\b",
            r"|\btroca\s+de\s+gestor\b",
        ),
    ),
    ("LISCONTIR", r"\bliscontir\b|\bdesbloqueio\s+de\s+empenho(?:s)?\b"),
    ("Desconsiderar", r"\bdesconsiderar\b"),
];
