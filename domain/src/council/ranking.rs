//! Ranking label assignment, extraction, and aggregation.
//!
//! These functions turn free-form LLM ranking output into structured data.
//! They are pure domain logic - no I/O, no session management, just text
//! pattern matching over a completion that may or may not follow the
//! requested format.
//!
//! # Functions
//!
//! | Function | Use Case |
//! |----------|----------|
//! | [`assign_labels`] | Anonymize stage-1 answers as "Response A".. |
//! | [`parse_ranking`] | Extract an ordered label list from ranking text |
//! | [`aggregate_rankings`] | Mean rank position per model across peers |

use crate::council::results::{Stage1Result, Stage2Result};
use regex::Regex;
use std::collections::HashMap;

/// Section marker models are instructed to emit before their ordered list.
pub const RANKING_MARKER: &str = "FINAL RANKING:";

/// Assign anonymized labels to stage-1 answers in their fixed order.
///
/// Labels run "Response A", "Response B", ... following stage-1 result
/// order, which itself follows roster declaration order. The returned
/// pairs form a bijection of exactly `stage1.len()` entries (one label per
/// successful respondent, never per configured member).
///
/// The label alphabet is single uppercase letters, so at most 26 answers
/// can be labeled. Configuration validation rejects larger councils, but a
/// roster built directly in code bypasses that check; answers past the
/// alphabet are left unlabeled rather than overflowing the letter range.
pub fn assign_labels(stage1: &[Stage1Result]) -> Vec<(String, String)> {
    stage1
        .iter()
        .take(26)
        .enumerate()
        .map(|(i, result)| {
            let label = format!("Response {}", (b'A' + i as u8) as char);
            (label, result.model.clone())
        })
        .collect()
}

/// Extract an ordered list of labels from free-text ranking output.
///
/// `label_count` is the number of stage-1 respondents in this run; only
/// labels within that alphabet ("Response A" through the corresponding
/// letter) are recognized. The valid set is derived per run, never a
/// hardcoded ceiling.
///
/// Extraction is tiered, because completions do not reliably follow the
/// requested format:
///
/// 1. Locate the literal `FINAL RANKING:` marker and scan only the text
///    after it; if the marker is absent, scan the whole text.
/// 2. Within that section, prefer numbered-list entries
///    (`1. Response A`). If none exist, fall back to bare label
///    occurrences in document order, duplicates kept as-is.
///
/// Never errors: text with no recognizable labels yields an empty vec.
pub fn parse_ranking(text: &str, label_count: usize) -> Vec<String> {
    if label_count == 0 {
        return Vec::new();
    }
    let last = (b'A' + (label_count.min(26) - 1) as u8) as char;

    let section = match text.split_once(RANKING_MARKER) {
        Some((_, after)) => after,
        None => text,
    };

    // Regex::new only fails on invalid patterns; `last` is always A-Z here.
    let numbered = Regex::new(&format!(r"\d+\.\s*(Response [A-{last}])")).unwrap();
    let captured: Vec<String> = numbered
        .captures_iter(section)
        .map(|c| c[1].to_string())
        .collect();
    if !captured.is_empty() {
        return captured;
    }

    let bare = Regex::new(&format!(r"Response [A-{last}]")).unwrap();
    bare.find_iter(section).map(|m| m.as_str().to_string()).collect()
}

/// Compute the mean rank position per model across all peer rankings.
///
/// For every ranking, every recognized label at 1-indexed position `p` in
/// its `parsed_ranking` records `p` under the resolved model name. Labels
/// missing from `label_to_model` are skipped, not errored. The score per
/// model is the arithmetic mean of its recorded positions; models with no
/// recorded positions do not appear in the output at all.
///
/// Only `parsed_ranking` is consulted - the free text is never re-parsed
/// here.
pub fn aggregate_rankings(
    stage2: &[Stage2Result],
    label_to_model: &HashMap<String, String>,
) -> HashMap<String, f64> {
    let mut positions: HashMap<String, Vec<usize>> = HashMap::new();

    for ranking in stage2 {
        for (index, label) in ranking.parsed_ranking.iter().enumerate() {
            if let Some(model) = label_to_model.get(label) {
                positions.entry(model.clone()).or_default().push(index + 1);
            }
        }
    }

    positions
        .into_iter()
        .map(|(model, recorded)| {
            let mean = recorded.iter().sum::<usize>() as f64 / recorded.len() as f64;
            (model, mean)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::message::TokenUsage;

    fn stage1(models: &[&str]) -> Vec<Stage1Result> {
        models
            .iter()
            .map(|m| Stage1Result::new(*m, format!("{m} answer"), TokenUsage::default()))
            .collect()
    }

    fn ranking(model: &str, parsed: &[&str]) -> Stage2Result {
        Stage2Result::new(
            model,
            String::new(),
            parsed.iter().map(|s| s.to_string()).collect(),
        )
    }

    // ==================== assign_labels Tests ====================

    #[test]
    fn test_labels_follow_stage1_order() {
        let labels = assign_labels(&stage1(&["X", "Y", "Z"]));
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], ("Response A".to_string(), "X".to_string()));
        assert_eq!(labels[1], ("Response B".to_string(), "Y".to_string()));
        assert_eq!(labels[2], ("Response C".to_string(), "Z".to_string()));
    }

    #[test]
    fn test_labels_capped_at_the_alphabet() {
        // 27 respondents: the 27th gets no label instead of a letter past Z.
        let names: Vec<String> = (0..27).map(|i| format!("M{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let labels = assign_labels(&stage1(&name_refs));
        assert_eq!(labels.len(), 26);
        assert_eq!(labels[25].0, "Response Z");
    }

    #[test]
    fn test_label_set_sized_by_respondents_not_council() {
        // Two respondents out of a four-member council: two labels.
        let labels = assign_labels(&stage1(&["X", "Y"]));
        assert_eq!(labels.len(), 2);
        let map: HashMap<_, _> = labels.into_iter().collect();
        assert_eq!(map.len(), 2, "labels must be a bijection");
    }

    // ==================== parse_ranking Tests ====================

    #[test]
    fn test_parse_numbered_list_after_marker() {
        let text = "Some evaluation notes.\n\nFINAL RANKING:\n1. Response A\n2. Response B";
        assert_eq!(
            parse_ranking(text, 2),
            vec!["Response A".to_string(), "Response B".to_string()]
        );
    }

    #[test]
    fn test_parse_is_idempotent_on_well_formed_input() {
        let text = "FINAL RANKING:\n1. Response A\n2. Response B";
        let first = parse_ranking(text, 2);
        let second = parse_ranking(text, 2);
        assert_eq!(first, second);
        assert_eq!(first, vec!["Response A", "Response B"]);
    }

    #[test]
    fn test_parse_falls_back_to_bare_labels_in_section() {
        let text = "FINAL RANKING:\nI prefer Response B, then Response A.";
        assert_eq!(parse_ranking(text, 2), vec!["Response B", "Response A"]);
    }

    #[test]
    fn test_parse_without_marker_scans_whole_text() {
        let text = "My order would be Response C first, Response A second.";
        assert_eq!(parse_ranking(text, 3), vec!["Response C", "Response A"]);
    }

    #[test]
    fn test_parse_unrecognizable_text_returns_empty() {
        assert!(parse_ranking("no labels anywhere", 4).is_empty());
        assert!(parse_ranking("", 4).is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let text = "FINAL RANKING:\nResponse A beats Response B, but Response A only barely.";
        assert_eq!(
            parse_ranking(text, 2),
            vec!["Response A", "Response B", "Response A"]
        );
    }

    #[test]
    fn test_parse_rejects_labels_outside_alphabet() {
        // Only two respondents this run: "Response E" is not a valid label.
        let text = "FINAL RANKING:\n1. Response A\n2. Response E";
        assert_eq!(parse_ranking(text, 2), vec!["Response A"]);
    }

    #[test]
    fn test_parse_alphabet_derived_from_count_beyond_four() {
        // Larger councils must work; the alphabet is not capped at A-D.
        let text = "FINAL RANKING:\n1. Response F\n2. Response A";
        assert_eq!(parse_ranking(text, 6), vec!["Response F", "Response A"]);
    }

    #[test]
    fn test_parse_marker_before_numbered_ignores_earlier_mentions() {
        let text = "Response B looked weak early on.\nFINAL RANKING:\n1. Response A\n2. Response B";
        assert_eq!(parse_ranking(text, 2), vec!["Response A", "Response B"]);
    }

    #[test]
    fn test_parse_zero_respondents() {
        assert!(parse_ranking("FINAL RANKING:\n1. Response A", 0).is_empty());
    }

    // ==================== aggregate_rankings Tests ====================

    fn label_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(l, m)| (l.to_string(), m.to_string()))
            .collect()
    }

    #[test]
    fn test_aggregate_symmetric_rankings() {
        let stage2 = vec![
            ranking("X", &["Response A", "Response B"]),
            ranking("Y", &["Response B", "Response A"]),
        ];
        let labels = label_map(&[("Response A", "X"), ("Response B", "Y")]);
        let aggregate = aggregate_rankings(&stage2, &labels);
        assert_eq!(aggregate["X"], 1.5);
        assert_eq!(aggregate["Y"], 1.5);
    }

    #[test]
    fn test_aggregate_skips_unknown_labels() {
        let stage2 = vec![ranking("X", &["Response A", "Response Z"])];
        let labels = label_map(&[("Response A", "X")]);
        let aggregate = aggregate_rankings(&stage2, &labels);
        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate["X"], 1.0);
    }

    #[test]
    fn test_model_absent_from_all_rankings_is_absent() {
        let stage2 = vec![ranking("X", &["Response A"])];
        let labels = label_map(&[("Response A", "X"), ("Response B", "Y")]);
        let aggregate = aggregate_rankings(&stage2, &labels);
        assert!(!aggregate.contains_key("Y"));
    }

    #[test]
    fn test_aggregate_empty_stage2() {
        let labels = label_map(&[("Response A", "X")]);
        assert!(aggregate_rankings(&[], &labels).is_empty());
    }

    #[test]
    fn test_aggregate_uneven_mentions() {
        let stage2 = vec![
            ranking("X", &["Response A", "Response B"]),
            ranking("Y", &["Response A"]),
        ];
        let labels = label_map(&[("Response A", "X"), ("Response B", "Y")]);
        let aggregate = aggregate_rankings(&stage2, &labels);
        assert_eq!(aggregate["X"], 1.0);
        assert_eq!(aggregate["Y"], 2.0);
    }
}
