//! Progress events emitted during a council run.
//!
//! [`CouncilEvent`] is the unit of the orchestrator's streaming interface:
//! a lazy, ordered, single-pass sequence consumed as the stages complete.
//! Events serialize to the tagged JSON shape a server-sent-events front
//! door forwards verbatim, e.g. `{"type":"stage1_start"}`.

use crate::council::results::{CouncilMetadata, Stage1Result, Stage2Result};
use serde::{Deserialize, Serialize};

/// One discrete, ordered progress event from a council run.
///
/// A successful run emits, in this exact order:
/// `Stage1Start`, `Stage1Complete`, `Stage2Start`, `Stage2Complete`,
/// `Stage3Start`, `Stage3Complete`, optionally `TitleComplete` (only when
/// a title task was started), then `Complete`. `Error` may replace the
/// remainder of the sequence at any point and terminates the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CouncilEvent {
    Stage1Start,
    Stage1Complete {
        data: Vec<Stage1Result>,
    },
    Stage2Start,
    Stage2Complete {
        data: Vec<Stage2Result>,
        metadata: CouncilMetadata,
    },
    Stage3Start,
    Stage3Complete {
        data: String,
    },
    TitleComplete {
        data: TitleData,
    },
    Complete,
    Error {
        message: String,
    },
}

/// Payload of a [`CouncilEvent::TitleComplete`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleData {
    pub title: String,
}

impl CouncilEvent {
    pub fn title_complete(title: impl Into<String>) -> Self {
        CouncilEvent::TitleComplete {
            data: TitleData {
                title: title.into(),
            },
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        CouncilEvent::Error {
            message: message.into(),
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CouncilEvent::Complete | CouncilEvent::Error { .. })
    }

    /// The wire name of this event's type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            CouncilEvent::Stage1Start => "stage1_start",
            CouncilEvent::Stage1Complete { .. } => "stage1_complete",
            CouncilEvent::Stage2Start => "stage2_start",
            CouncilEvent::Stage2Complete { .. } => "stage2_complete",
            CouncilEvent::Stage3Start => "stage3_start",
            CouncilEvent::Stage3Complete { .. } => "stage3_complete",
            CouncilEvent::TitleComplete { .. } => "title_complete",
            CouncilEvent::Complete => "complete",
            CouncilEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_events_serialize_to_type_tag_only() {
        let json = serde_json::to_value(&CouncilEvent::Stage1Start).unwrap();
        assert_eq!(json, serde_json::json!({"type": "stage1_start"}));
        let json = serde_json::to_value(&CouncilEvent::Complete).unwrap();
        assert_eq!(json, serde_json::json!({"type": "complete"}));
    }

    #[test]
    fn test_title_complete_payload_shape() {
        let json = serde_json::to_value(CouncilEvent::title_complete("Rust Errors")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "title_complete", "data": {"title": "Rust Errors"}})
        );
    }

    #[test]
    fn test_stage3_complete_carries_text() {
        let json =
            serde_json::to_value(CouncilEvent::Stage3Complete { data: "final".into() }).unwrap();
        assert_eq!(json["type"], "stage3_complete");
        assert_eq!(json["data"], "final");
    }

    #[test]
    fn test_terminal_events() {
        assert!(CouncilEvent::Complete.is_terminal());
        assert!(CouncilEvent::error("boom").is_terminal());
        assert!(!CouncilEvent::Stage3Start.is_terminal());
    }
}
