//! Domain layer for llm-council
//!
//! This crate contains the core business logic, entities, and value objects
//! for the three-stage council deliberation. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council run asks the same question to several independent models, then
//! has each model rank the anonymized answers of its peers, and finally has
//! a designated chairman model synthesize everything into one decision:
//!
//! - **Stage 1 (Collect)**: every council member answers the question
//! - **Stage 2 (Rank)**: every member ranks the anonymized stage-1 answers
//! - **Stage 3 (Synthesize)**: the chairman produces the final response

pub mod conversation;
pub mod core;
pub mod council;
pub mod prompt;

// Re-export commonly used types
pub use conversation::{Conversation, ConversationMessage, ConversationSummary};
pub use core::error::DomainError;
pub use council::{
    event::CouncilEvent,
    message::{Message, ModelReply, Role, TokenUsage},
    ranking::{aggregate_rankings, assign_labels, parse_ranking},
    results::{
        CouncilMetadata, CouncilOutcome, Stage, Stage1Result, Stage2Result, ALL_FAILED_SENTINEL,
        SYNTHESIS_FAILED_SENTINEL, TITLE_FALLBACK,
    },
    spec::{CouncilRoster, ModelSpec, Provider},
};
pub use prompt::PromptTemplate;
