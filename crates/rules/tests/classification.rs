//! End-to-end classification against the bundled pattern tables.

use comunica_rules::{normalize, DecisionResolver, Outcome};

fn resolver() -> DecisionResolver {
    DecisionResolver::standard().expect("bundled tables compile")
}

fn assert_case(r: &DecisionResolver, text: &str, outcome: Outcome, concept: Option<&str>, span: Option<&str>) {
    let d = r.resolve(text);
    assert_eq!(d.outcome, outcome, "outcome for {text:?}");
    assert_eq!(d.matched_concept.as_deref(), concept, "concept for {text:?}");
    assert_eq!(d.matched_span.as_deref(), span, "span for {text:?}");
}

#[test]
fn priority_concepts() {
    let r = resolver();
    let cases = [
        ("SIAFERIO fora do ar desde as 9h", "Problemas SIAFERIO", "siaferio fora do ar"),
        ("Problemas no SIAFE-RIO hoje pela manhã", "Problemas SIAFERIO", "problemas no siafe-rio"),
        ("Flex Vision apresentando lentidão", "FlexVision", "flex vision"),
        ("Serviço indisponível para todos", "Sistemas Fora do Ar", "servico indisponivel"),
        ("SIAFEM fora do ar", "Sistemas Fora do Ar", "siafem fora do ar"),
        ("Demanda urgentíssima da secretaria", "Urgente", "urgentissima"),
        ("Erro crítico ao gerar empenho", "Erro Crítico", "erro critico"),
        ("Não consigo acessar o módulo", "Erro Crítico", "nao consigo acessar"),
        ("Fechamento do mês de junho", "Fechamento", "fechamento do mes"),
        ("Envio de contas anual", "Fechamento", "envio de contas"),
        ("Relatório para amanhã", "Relatório Urgente", "relatorio para amanha"),
    ];
    for (text, concept, span) in cases {
        assert_case(&r, text, Outcome::Send, Some(concept), Some(span));
    }
}

#[test]
fn block_concepts() {
    let r = resolver();
    let cases = [
        ("Solicito inscrição genérica para o fornecedor X", "Inscrição Genérica", "inscricao generica"),
        ("Comunicado sobre IGS", "Inscrição Genérica", "igs"),
        ("Credor genérico CGS", "Credor Genérico", "credor generico"),
        ("Bloqueio judicial na conta", "Bloqueio Judicial", "bloqueio judicial"),
        (
            "Alteração de CNPJ em código de barras",
            "Código de Barras",
            "alteracao de cnpj em codigo de barras",
        ),
        ("Atualização de dados bancários do fornecedor", "Dados Bancários", "dados bancarios"),
        ("Alteração de agência bancária", "Dados Bancários", "alteracao de agencia"),
        ("Boleto vencido", "Boleto/Credor", "boleto"),
        ("Requisição de pequeno valor", "Cadastro em Geral", "requisicao de pequeno valor"),
        ("Informações cadastrais do órgão", "Cadastro em Geral", "informacoes cadastrais"),
        ("Cadastro de conta de convênio", "Cadastro de Convênio", "cadastro de conta de convenio"),
        ("Nomeação de contador", "Atualização de Dados", "nomeacao de contador"),
        (
            "Liberação do programa de trabalho 123",
            "Programa de Trabalho",
            "liberacao do programa de trabalho",
        ),
        (
            "Cadastro de detalhamento de fonte",
            "Detalhamento de Fonte",
            "cadastro de detalhamento de fonte",
        ),
        ("Senha do SIAFERIO foi esquecida", "Acesso ou Senha", "senha do siaferio"),
        ("Reativação de usuário", "Reativação", "reativacao"),
        ("Perfil de usuário alterado", "Perfil ou Gestor de Usuários", "perfil de usuario"),
        ("Troca de gestor", "Perfil ou Gestor de Usuários", "troca de gestor"),
        ("LISCONTIR pendente", "LISCONTIR", "liscontir"),
        ("Desbloqueio de empenho 2025NE0001", "LISCONTIR", "desbloqueio de empenho"),
        ("Favor desconsiderar o comunicado anterior", "Desconsiderar", "desconsiderar"),
    ];
    for (text, concept, span) in cases {
        assert_case(&r, text, Outcome::Block, Some(concept), Some(span));
    }
}

#[test]
fn unmatched_notices_default_to_send() {
    let r = resolver();
    for text in [
        "Reunião sobre novos procedimentos",
        "Nova versão do manual disponível",
        "",
    ] {
        assert_case(&r, text, Outcome::SendDefault, None, None);
    }
}

#[test]
fn outage_wins_over_broad_block_words() {
    let r = resolver();
    // "credor" alone is a block concept.
    assert_case(
        &r,
        "Credor com problema no SIAFERIO",
        Outcome::Send,
        Some("Problemas SIAFERIO"),
        Some("problema no siaferio"),
    );
    // "acesso ... siafem" is a block concept.
    assert_case(&r, "Preciso do acesso ao SIAFEM urgente", Outcome::Send, Some("Urgente"), Some("urgente"));
}

#[test]
fn block_pattern_spans_line_break() {
    assert_case(
        &resolver(),
        "Pedido de acesso\nao SIAFEM",
        Outcome::Block,
        Some("Acesso ou Senha"),
        Some("acesso\nao siafem"),
    );
}

#[test]
fn accented_and_plain_text_classify_alike() {
    let r = resolver();
    assert_eq!(
        r.resolve("Não consigo acessar o módulo"),
        r.resolve("nao consigo acessar o modulo")
    );
    assert_eq!(normalize("não funciona"), normalize("nao funciona"));
}
