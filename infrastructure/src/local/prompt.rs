//! Prompt rendering for the stateless local model.

use negotia_domain::{Role, Turn};

/// Instructions used when no system prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Você é ANA, uma assistente de negociação de dívidas. \
Responda de forma cordial e objetiva. Quando sua resposta se basear em produtos do catálogo, \
termine a mensagem com [LOG: produto_id=<ids separados por vírgula>]; \
se nenhum produto foi usado, termine com [LOG: produto_id=nenhum].";

const USER_LABEL: &str = "Cliente";
const ASSISTANT_LABEL: &str = "ANA";

/// Render the system prompt and full history into one completion prompt.
///
/// The result ends with the assistant cue so the model continues as ANA.
pub fn render_prompt(system_prompt: &str, history: &[Turn]) -> String {
    let mut prompt = String::with_capacity(
        system_prompt.len() + history.iter().map(|t| t.content().len() + 10).sum::<usize>() + 8,
    );
    prompt.push_str(system_prompt);
    prompt.push_str("\n\n");

    for turn in history {
        let label = match turn.role() {
            Role::User => USER_LABEL,
            Role::Assistant => ASSISTANT_LABEL,
        };
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(turn.content());
        prompt.push('\n');
    }

    prompt.push_str(ASSISTANT_LABEL);
    prompt.push(':');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_labels_and_trailing_cue() {
        let history = vec![
            Turn::user("Oi"),
            Turn::assistant("Olá! Como posso ajudar?"),
            Turn::user("Quero parcelar"),
        ];

        let prompt = render_prompt("SYS", &history);

        assert_eq!(
            prompt,
            "SYS\n\nCliente: Oi\nANA: Olá! Como posso ajudar?\nCliente: Quero parcelar\nANA:"
        );
    }

    #[test]
    fn test_empty_history_is_just_the_cue() {
        assert_eq!(render_prompt("SYS", &[]), "SYS\n\nANA:");
    }

    #[test]
    fn test_default_prompt_mentions_the_tag() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("[LOG: produto_id="));
    }
}
