use super::window::recent_turns;
use crate::core::config::AssistantConfig;
use crate::history::{SpeakerLabels, Turn};

/// Fixed answer when the material has nothing on the question. The prompt also
/// instructs the model to reply with exactly this sentence.
pub const NOT_FOUND_ANSWER: &str = "Não encontrei essa informação no material.";

/// Builds the grounded instruction sent to the generation backend.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    assistant_name: String,
    domain: String,
    labels: SpeakerLabels,
    history_window: usize,
}

impl PromptAssembler {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            assistant_name: config.name.clone(),
            domain: config.domain.clone(),
            labels: SpeakerLabels::new(config.user_label.clone(), config.name.clone()),
            history_window: config.history_window,
        }
    }

    pub fn labels(&self) -> &SpeakerLabels {
        &self.labels
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Sent as the system message alongside [`PromptAssembler::assemble`].
    pub fn system_preamble(&self) -> String {
        format!(
            "Você é {}, um assistente especializado em {}.",
            self.assistant_name, self.domain
        )
    }

    /// Persona, windowed history, retrieved context, the query, then the
    /// grounding instructions. Pure: equal inputs give equal output.
    pub fn assemble(&self, query: &str, retrieved: &[String], history: &[Turn]) -> String {
        let history_text = recent_turns(history, self.history_window)
            .iter()
            .map(|turn| turn.render(&self.labels))
            .collect::<Vec<_>>()
            .join("\n");
        let context = retrieved.join("\n");
        let domain = &self.domain;

        format!(
            "Você é {name}, um especialista em {domain}.\n\
             \n\
             **Histórico da Conversa:**\n\
             {history_text}\n\
             \n\
             **Contexto relevante extraído da base de conhecimento:**\n\
             {context}\n\
             \n\
             **Pergunta do usuário:**\n\
             \"{query}\"\n\
             \n\
             **Instruções importantes**:\n\
             - Se a solicitação for uma pergunta sobre o conteúdo, explique de forma clara e objetiva.\n\
             - Se o usuário fornecer um código e solicitar uma melhoria, análise crítica ou refatoração, forneça uma versão otimizada seguindo as melhores práticas do {domain}.\n\
             - Sempre explique as melhorias feitas ao código, se aplicável.\n\
             - Se a solicitação do usuário não puder ser respondida com base no contexto, responda apenas: \"{not_found}\"\n\
             - Nunca invente informações que não estejam no contexto.\n\
             \n\
             **Resposta:**\n",
            name = self.assistant_name,
            not_found = NOT_FOUND_ANSWER,
        )
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(&AssistantConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_pos(prompt: &str, needle: &str) -> usize {
        prompt
            .find(needle)
            .unwrap_or_else(|| panic!("missing section: {}", needle))
    }

    fn conversation(exchanges: usize) -> Vec<Turn> {
        (0..exchanges)
            .flat_map(|i| {
                [
                    Turn::user(format!("pergunta {}", i)),
                    Turn::assistant(format!("resposta {}", i)),
                ]
            })
            .collect()
    }

    #[test]
    fn sections_appear_in_order() {
        let assembler = PromptAssembler::default();
        let prompt = assembler.assemble(
            "What is rule X?",
            &["Rule X does Y.".to_string(), "Rule X runs first.".to_string()],
            &conversation(1),
        );

        let persona = section_pos(&prompt, "Você é Nova, um especialista em FICO Blaze Advisor.");
        let history = section_pos(&prompt, "Usuário: pergunta 0\nNova: resposta 0");
        let context = section_pos(&prompt, "Rule X does Y.\nRule X runs first.");
        let query = section_pos(&prompt, "\"What is rule X?\"");
        let instructions = section_pos(&prompt, "**Instruções importantes**");

        assert!(persona < history);
        assert!(history < context);
        assert!(context < query);
        assert!(query < instructions);
    }

    #[test]
    fn instructions_carry_grounding_rules() {
        let prompt = PromptAssembler::default().assemble("q", &["c".to_string()], &[]);
        assert!(prompt.contains(
            "responda apenas: \"Não encontrei essa informação no material.\""
        ));
        assert!(prompt.contains("Nunca invente informações que não estejam no contexto."));
        assert!(prompt.contains("Sempre explique as melhorias feitas ao código"));
    }

    #[test]
    fn history_is_windowed_to_last_ten_turns() {
        let assembler = PromptAssembler::default();
        // 7 exchanges = 14 turns; only turns 4..14 survive.
        let prompt = assembler.assemble("q", &["c".to_string()], &conversation(7));

        assert!(!prompt.contains("pergunta 0"));
        assert!(!prompt.contains("resposta 1\n"));
        assert!(prompt.contains("Usuário: pergunta 2\nNova: resposta 2"));
        assert!(prompt.contains("Nova: resposta 6"));
        assert!(section_pos(&prompt, "pergunta 2") < section_pos(&prompt, "pergunta 6"));

        let rendered = prompt.matches("Usuário: ").count() + prompt.matches("Nova: ").count();
        assert_eq!(rendered, 10);
    }

    #[test]
    fn assembly_is_deterministic() {
        let assembler = PromptAssembler::default();
        let history = conversation(2);
        let chunks = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            assembler.assemble("q", &chunks, &history),
            assembler.assemble("q", &chunks, &history)
        );
    }

    #[test]
    fn persona_follows_config() {
        let assembler = PromptAssembler::new(&AssistantConfig {
            name: "Atlas".to_string(),
            domain: "Drools".to_string(),
            user_label: "User".to_string(),
            history_window: 2,
        });
        assert_eq!(
            assembler.system_preamble(),
            "Você é Atlas, um assistente especializado em Drools."
        );
        let prompt = assembler.assemble("q", &["c".to_string()], &conversation(2));
        assert!(prompt.contains("User: pergunta 1\nAtlas: resposta 1"));
        assert!(!prompt.contains("pergunta 0"));
    }
}
