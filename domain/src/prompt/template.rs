//! Prompt templates for the three council stages and title generation

use crate::council::ranking::RANKING_MARKER;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for council members in the collect stage
    pub fn council_system() -> &'static str {
        r#"You are a senior advisor on a council of independent experts.
Provide a direct, well-reasoned answer to the question. Lead with the answer,
follow with supporting analysis, and end with concrete recommendations.
No filler, no restating the question, no meta-commentary about your nature.
Your response will be evaluated by your peers."#
    }

    /// User prompt asking each council member to rank anonymized answers.
    ///
    /// Sent without a system message. `labeled` pairs each anonymized label
    /// with the answer text, in label order.
    pub fn ranking_prompt(question: &str, labeled: &[(String, String)]) -> String {
        let responses_text = labeled
            .iter()
            .map(|(label, content)| format!("{label}:\n{content}"))
            .collect::<Vec<_>>()
            .join("\n\n");

        let placeholder_lines = (1..=labeled.len())
            .map(|i| format!("{i}. Response X"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"PEER EVALUATION REQUEST

Evaluate these responses from your fellow council members.

QUESTION UNDER ANALYSIS:
{question}

RESPONSES:
{responses_text}

EVALUATION CRITERIA (in order of importance):
1. DIRECTNESS: Does it answer immediately without preamble or hedging?
2. ACTIONABILITY: Does it provide specific, implementable recommendations?
3. COMPLETENESS: Does it fully address the question?
4. EVIDENCE: Does it cite frameworks, data, or precedents?

Provide brief evaluation notes, then your ranking from best to worst.

{RANKING_MARKER}
{placeholder_lines}"#
        )
    }

    /// System prompt for the chairman in the synthesize stage
    pub fn chairman_system() -> &'static str {
        r#"You are the chairman of a council of independent experts.
You are synthesizing input from multiple senior advisors into one definitive
decision. Address every substantive point from the council, integrate
conflicting viewpoints into a coherent recommendation, and deliver the full
analysis without hedging or meta-commentary. End with numbered, actionable
recommendations."#
    }

    /// User prompt for the chairman, embedding all stage-1 answers and
    /// stage-2 rankings attributed by real model name.
    pub fn synthesis_prompt(
        question: &str,
        responses: &[(String, String)],
        rankings: &[(String, String)],
    ) -> String {
        let stage1_text = responses
            .iter()
            .map(|(model, content)| format!("Model: {model}\nResponse: {content}"))
            .collect::<Vec<_>>()
            .join("\n\n");

        let stage2_text = rankings
            .iter()
            .map(|(model, content)| format!("Model: {model}\nRanking: {content}"))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"CHAIRMAN SYNTHESIS REQUEST

ORIGINAL QUESTION:
{question}

COUNCIL MEMBER RESPONSES:
{stage1_text}

PEER EVALUATIONS:
{stage2_text}

CHAIRMAN DIRECTIVE:
Synthesize all council input into a definitive decision. Reference the
specific council insights that inform your synthesis, and end with numbered,
implementable recommendations.

Deliver your synthesis:"#
        )
    }

    /// User prompt for the best-effort conversation title task.
    pub fn title_prompt(question: &str) -> String {
        format!(
            r#"Generate a very short title (3-5 words maximum) for this question. No quotes or punctuation.

Question: {question}

Title:"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_prompt_embeds_labels_and_marker() {
        let labeled = vec![
            ("Response A".to_string(), "First answer.".to_string()),
            ("Response B".to_string(), "Second answer.".to_string()),
        ];
        let prompt = PromptTemplate::ranking_prompt("What is Rust?", &labeled);
        assert!(prompt.contains("What is Rust?"));
        assert!(prompt.contains("Response A:\nFirst answer."));
        assert!(prompt.contains("FINAL RANKING:"));
        assert!(prompt.contains("1. Response X"));
        assert!(prompt.contains("2. Response X"));
        assert!(!prompt.contains("3. Response X"));
    }

    #[test]
    fn test_synthesis_prompt_uses_real_model_names() {
        let responses = vec![("GPT-4".to_string(), "Rust is fast.".to_string())];
        let rankings = vec![("Gemini Pro".to_string(), "1. Response A".to_string())];
        let prompt = PromptTemplate::synthesis_prompt("What is Rust?", &responses, &rankings);
        assert!(prompt.contains("Model: GPT-4"));
        assert!(prompt.contains("Model: Gemini Pro"));
        assert!(prompt.contains("ORIGINAL QUESTION"));
    }

    #[test]
    fn test_title_prompt_contains_question() {
        let prompt = PromptTemplate::title_prompt("How do I test async Rust?");
        assert!(prompt.contains("How do I test async Rust?"));
        assert!(prompt.contains("3-5 words"));
    }
}
