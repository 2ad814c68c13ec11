//! Application layer for llm-council
//!
//! This crate contains use cases and port definitions for the three-stage
//! council orchestration. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_store::{ConversationStore, NoConversationStore},
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::generate_title::GenerateTitleUseCase;
pub use use_cases::run_council::{
    CouncilStream, ExecutionParams, RunCouncilError, RunCouncilUseCase,
};
