//! Council stage result types - immutable outputs of each stage.
//!
//! These types represent the outputs of the three-stage pipeline:
//! - [`Stage1Result`] - Individual model's answer from the collect stage
//! - [`Stage2Result`] - One model's peer ranking from the rank stage
//! - [`CouncilMetadata`] - Label mapping and aggregate rankings
//! - [`CouncilOutcome`] - Complete result of one council run

use crate::council::message::TokenUsage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stage-3 text returned when every council member failed in stage 1.
pub const ALL_FAILED_SENTINEL: &str = "Error: All models failed to respond.";

/// Stage-3 text returned when the chairman call failed.
pub const SYNTHESIS_FAILED_SENTINEL: &str = "Error: Unable to generate final synthesis.";

/// Title used when title generation fails or is not configured.
pub const TITLE_FALLBACK: &str = "New Conversation";

/// Stage of a council run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Collect stage - all members answer the question
    Collect,
    /// Rank stage - members rank the anonymized answers
    Rank,
    /// Synthesize stage - the chairman produces the final decision
    Synthesize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Collect => "collect",
            Stage::Rank => "rank",
            Stage::Synthesize => "synthesize",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Collect => "Stage 1: Collect Responses",
            Stage::Rank => "Stage 2: Peer Ranking",
            Stage::Synthesize => "Stage 3: Synthesis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One council member's answer from stage 1
///
/// Only members that responded successfully produce an entry. Entries are
/// ordered by roster declaration, not completion - label assignment in
/// stage 2 depends on this ordering being stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage1Result {
    /// Name of the responding model
    pub model: String,
    /// The model's answer
    pub response: String,
    /// Token accounting for the call
    #[serde(default)]
    pub usage: TokenUsage,
}

impl Stage1Result {
    pub fn new(model: impl Into<String>, response: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            model: model.into(),
            response: response.into(),
            usage,
        }
    }
}

/// One council member's peer ranking from stage 2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage2Result {
    /// Name of the ranking model
    pub model: String,
    /// Full free-text ranking output
    pub ranking: String,
    /// Labels extracted from the text, best first. May be shorter than the
    /// label set when parsing partially fails; never padded or invented.
    pub parsed_ranking: Vec<String>,
}

impl Stage2Result {
    pub fn new(
        model: impl Into<String>,
        ranking: impl Into<String>,
        parsed_ranking: Vec<String>,
    ) -> Self {
        Self {
            model: model.into(),
            ranking: ranking.into(),
            parsed_ranking,
        }
    }
}

/// Metadata accompanying a council outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouncilMetadata {
    /// Bijection from anonymized label ("Response A", ...) to model name,
    /// fixed for the lifetime of one run.
    pub label_to_model: HashMap<String, String>,
    /// Mean rank position per model, averaged over every peer ranking that
    /// mentions it. Models absent from all rankings are absent here.
    pub aggregate_rankings: HashMap<String, f64>,
}

/// Complete result of one council run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilOutcome {
    /// Stage 1: answers in roster declaration order
    pub stage1: Vec<Stage1Result>,
    /// Stage 2: peer rankings in roster declaration order
    pub stage2: Vec<Stage2Result>,
    /// Stage 3: synthesized text, or a failure sentinel
    pub stage3: String,
    /// Label mapping and aggregate rankings
    pub metadata: CouncilMetadata,
}

impl CouncilOutcome {
    pub fn new(
        stage1: Vec<Stage1Result>,
        stage2: Vec<Stage2Result>,
        stage3: impl Into<String>,
        metadata: CouncilMetadata,
    ) -> Self {
        Self {
            stage1,
            stage2,
            stage3: stage3.into(),
            metadata,
        }
    }

    /// Outcome of a run where every council member failed in stage 1.
    pub fn total_failure() -> Self {
        Self {
            stage1: Vec::new(),
            stage2: Vec::new(),
            stage3: ALL_FAILED_SENTINEL.to_string(),
            metadata: CouncilMetadata::default(),
        }
    }

    /// True when the run reached no council member at all.
    pub fn is_total_failure(&self) -> bool {
        self.stage1.is_empty() && self.stage3 == ALL_FAILED_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_names() {
        assert_eq!(Stage::Collect.as_str(), "collect");
        assert_eq!(Stage::Rank.display_name(), "Stage 2: Peer Ranking");
        assert_eq!(Stage::Synthesize.to_string(), "Stage 3: Synthesis");
    }

    #[test]
    fn test_total_failure_outcome_shape() {
        let outcome = CouncilOutcome::total_failure();
        assert!(outcome.stage1.is_empty());
        assert!(outcome.stage2.is_empty());
        assert_eq!(outcome.stage3, "Error: All models failed to respond.");
        assert!(outcome.metadata.label_to_model.is_empty());
        assert!(outcome.metadata.aggregate_rankings.is_empty());
        assert!(outcome.is_total_failure());
    }

    #[test]
    fn test_stage2_result_serializes_ranking_field() {
        let result = Stage2Result::new("GPT-4", "FINAL RANKING:\n1. Response A", vec![
            "Response A".to_string(),
        ]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["model"], "GPT-4");
        assert!(json["ranking"].as_str().unwrap().contains("FINAL RANKING"));
        assert_eq!(json["parsed_ranking"][0], "Response A");
    }
}
