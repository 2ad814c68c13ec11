//! Console output formatter for council outcomes

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::CouncilOutcome;
use serde_json::json;

/// Formats council outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete council outcome
    pub fn format(question: &str, outcome: &CouncilOutcome) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("LLM Council Results"));
        output.push('\n');

        // Question
        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));

        // Stage 1: Collected Responses
        output.push_str(&Self::section_header("Stage 1: Collected Responses"));
        if outcome.stage1.is_empty() {
            output.push_str(&format!("\n{}\n", outcome.stage3.red()));
            output.push_str(&Self::footer());
            return output;
        }
        for result in &outcome.stage1 {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", result.model).yellow().bold(),
                result.response
            ));
        }

        // Stage 2: Peer Rankings
        if !outcome.stage2.is_empty() {
            output.push_str(&Self::section_header("Stage 2: Peer Rankings"));
            for result in &outcome.stage2 {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", result.model).yellow().bold(),
                    result.ranking
                ));
            }
        }

        // Aggregate standings
        let standings = Self::aggregate_standings(outcome);
        if !standings.is_empty() {
            output.push_str(&format!("\n{}\n", "Aggregate Ranking:".cyan().bold()));
            for (position, (model, mean)) in standings.iter().enumerate() {
                output.push_str(&format!("  {}. {} (avg rank {:.2})\n", position + 1, model, mean));
            }
        }

        // Stage 3: Synthesis
        output.push_str(&Self::section_header("Stage 3: Final Synthesis"));
        output.push_str(&format!("\n{}\n", outcome.stage3));

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(question: &str, outcome: &CouncilOutcome) -> String {
        let value = json!({
            "question": question,
            "stage1": outcome.stage1,
            "stage2": outcome.stage2,
            "stage3": outcome.stage3,
            "metadata": outcome.metadata,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format synthesis only (concise output)
    pub fn format_synthesis_only(question: &str, outcome: &CouncilOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== LLM Council Conclusion ===".cyan().bold()
        ));

        output.push_str(&format!("{} {}\n\n", "Q:".bold(), question));

        let models: Vec<&str> = outcome.stage1.iter().map(|r| r.model.as_str()).collect();
        if !models.is_empty() {
            output.push_str(&format!(
                "{} {}\n\n",
                "Models consulted:".dimmed(),
                models.join(", ")
            ));
        }

        output.push_str(&outcome.stage3);
        output.push('\n');

        output
    }

    /// Aggregate rankings as a sorted standing: best mean rank first,
    /// ties broken by model name for stable output.
    fn aggregate_standings(outcome: &CouncilOutcome) -> Vec<(String, f64)> {
        let mut standings: Vec<(String, f64)> = outcome
            .metadata
            .aggregate_rankings
            .iter()
            .map(|(model, mean)| (model.clone(), *mean))
            .collect();
        standings.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        standings
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, question: &str, outcome: &CouncilOutcome) -> String {
        Self::format(question, outcome)
    }

    fn format_json(&self, question: &str, outcome: &CouncilOutcome) -> String {
        Self::format_json(question, outcome)
    }

    fn format_synthesis_only(&self, question: &str, outcome: &CouncilOutcome) -> String {
        Self::format_synthesis_only(question, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{CouncilMetadata, Stage1Result, Stage2Result, TokenUsage};
    use std::collections::HashMap;

    fn outcome() -> CouncilOutcome {
        let mut aggregate = HashMap::new();
        aggregate.insert("GPT-4".to_string(), 1.5);
        aggregate.insert("Gemini Pro".to_string(), 1.5);
        CouncilOutcome::new(
            vec![
                Stage1Result::new("GPT-4", "answer one", TokenUsage::default()),
                Stage1Result::new("Gemini Pro", "answer two", TokenUsage::default()),
            ],
            vec![Stage2Result::new(
                "GPT-4",
                "FINAL RANKING:\n1. Response B",
                vec!["Response B".to_string()],
            )],
            "the final word",
            CouncilMetadata {
                label_to_model: HashMap::new(),
                aggregate_rankings: aggregate,
            },
        )
    }

    #[test]
    fn test_full_format_includes_all_stages() {
        let text = ConsoleFormatter::format("why rust", &outcome());
        assert!(text.contains("why rust"));
        assert!(text.contains("answer one"));
        assert!(text.contains("FINAL RANKING"));
        assert!(text.contains("the final word"));
    }

    #[test]
    fn test_aggregate_ties_break_by_name() {
        let text = ConsoleFormatter::format("q", &outcome());
        let gemini = text.find("1. Gemini Pro").unwrap();
        let gpt = text.find("2. GPT-4").unwrap();
        assert!(gemini < gpt);
    }

    #[test]
    fn test_total_failure_shows_sentinel_only() {
        let text = ConsoleFormatter::format("q", &CouncilOutcome::total_failure());
        assert!(text.contains("Error: All models failed to respond."));
        assert!(!text.contains("Stage 3"));
    }

    #[test]
    fn test_json_format_wraps_question_and_outcome() {
        let text = ConsoleFormatter::format_json("why rust", &outcome());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["question"], "why rust");
        assert_eq!(value["stage1"][0]["model"], "GPT-4");
        assert_eq!(value["stage3"], "the final word");
    }

    #[test]
    fn test_synthesis_only_lists_models() {
        let text = ConsoleFormatter::format_synthesis_only("q", &outcome());
        assert!(text.contains("GPT-4, Gemini Pro"));
        assert!(text.contains("the final word"));
        assert!(!text.contains("answer one"));
    }
}
