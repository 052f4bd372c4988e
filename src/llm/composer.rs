use std::sync::Arc;

use tracing::debug;

use crate::core::error::Result;
use crate::retrieval::models::ScoredCandidate;

use super::providers::LlmProvider;

const SYSTEM_PROMPT: &str = "You are a careful medical information assistant.";

/// Turns the engine's ranked concept list into patient-facing prose through
/// a chat model. The model is instructed to stay inside the supplied context
/// and to always point the user at a doctor.
pub struct ResponseComposer {
    provider: Arc<dyn LlmProvider>,
}

impl ResponseComposer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn compose(&self, ranked: &[ScoredCandidate]) -> Result<String> {
        let prompt = build_prompt(ranked);
        debug!("Composing response for {} conditions", ranked.len());
        let (content, metadata) = self.provider.generate(SYSTEM_PROMPT, &prompt).await?;
        debug!(
            "Response composed via {} ({} tokens)",
            metadata.provider,
            metadata.tokens_total.unwrap_or_default()
        );
        Ok(content)
    }
}

fn build_prompt(ranked: &[ScoredCandidate]) -> String {
    let mut context = String::from(
        "Possible diseases and treatments based on the symptoms provided:\n",
    );
    for (i, candidate) in ranked.iter().enumerate() {
        context.push_str(&format!("{}. {}\n", i + 1, candidate.description));
    }

    format!(
        "{context}\n\
         Using only the information above, craft a message for the user. \
         Do not add any extra information or make any assumptions. \
         Follow this format:\n\
         Possible Conditions: [List the conditions]\n\
         Recommended Actions: [List the actions based on the treatments provided]\n\
         Final Advice: [Encourage consulting a doctor if symptoms persist]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_numbers_conditions_in_rank_order() {
        let ranked = vec![
            ScoredCandidate::new(0.9, "COVID-19"),
            ScoredCandidate::new(0.7, "Common Cold"),
        ];
        let prompt = build_prompt(&ranked);
        assert!(prompt.contains("1. COVID-19"));
        assert!(prompt.contains("2. Common Cold"));
        let covid_pos = prompt.find("COVID-19").unwrap();
        let cold_pos = prompt.find("Common Cold").unwrap();
        assert!(covid_pos < cold_pos);
    }

    #[test]
    fn test_prompt_keeps_fixed_instructions() {
        let prompt = build_prompt(&[]);
        assert!(prompt.contains("Possible Conditions:"));
        assert!(prompt.contains("Recommended Actions:"));
        assert!(prompt.contains("Final Advice:"));
    }
}
