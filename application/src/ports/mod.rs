//! Port definitions
//!
//! Ports are the interfaces through which the application layer talks to
//! the outside world. Implementations live in infrastructure (gateway,
//! store) and presentation (progress).

pub mod conversation_store;
pub mod llm_gateway;
pub mod progress;
