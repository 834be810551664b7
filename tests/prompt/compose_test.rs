//! Grounding prompt composition rules.

use maricabot::prompt::{compose, CONTEXT_BEGIN, CONTEXT_END, SYSTEM_INSTRUCTION};

#[test]
fn compose_is_pure_and_deterministic() {
    let first = compose("qual o horário da praia central?", "contexto aqui");
    let second = compose("qual o horário da praia central?", "contexto aqui");
    assert_eq!(first, second);
}

#[test]
fn question_is_embedded_verbatim_even_with_markup() {
    let question = "o que é <b>isso</b> & aquilo? \"aspas\" e 100%";
    let built = compose(question, "contexto");
    assert!(built.contains(question));
}

#[test]
fn context_sits_between_begin_and_end_markers() {
    let built = compose("pergunta", "DADOS LOCAIS DE MARICÁ");
    let begin = built.find(CONTEXT_BEGIN).expect("begin marker present");
    let data = built.find("DADOS LOCAIS DE MARICÁ").expect("context present");
    let end = built.find(CONTEXT_END).expect("end marker present");
    assert!(begin < data);
    assert!(data < end);
}

#[test]
fn sections_appear_in_fixed_order() {
    let built = compose("pergunta aqui", "contexto");
    let rule = built.find("**Regra:**").expect("rule present");
    let question = built
        .find("**Pergunta do Usuário:**")
        .expect("question label present");
    let format = built.find("**Formato:**").expect("format directive present");
    let answer = built.find("**Resposta:**").expect("answer cue present");
    assert!(rule < question);
    assert!(question < format);
    assert!(format < answer);
}

#[test]
fn format_directive_names_the_allowed_tags() {
    let built = compose("pergunta", "contexto");
    for tag in ["<b>", "<i>", "<u>", "<code>", "<a>"] {
        assert!(built.contains(tag), "directive should mention {tag}");
    }
}

#[test]
fn empty_question_passes_through_unvalidated() {
    let built = compose("", "contexto");
    assert!(built.contains("**Pergunta do Usuário:** \n"));
}

#[test]
fn whitespace_question_passes_through_unchanged() {
    let built = compose("   ", "contexto");
    assert!(built.contains("**Pergunta do Usuário:**    \n"));
}

#[test]
fn persona_is_not_restated_inside_the_prompt() {
    let built = compose("pergunta", "contexto");
    assert!(!built.contains(SYSTEM_INSTRUCTION));
    assert!(!built.contains("MaricáBot"));
}
