//! Council domain types and logic
//!
//! Everything needed to describe a council run: who participates
//! ([`spec`]), what flows over the wire ([`message`]), what each stage
//! produces ([`results`]), how rankings are parsed and aggregated
//! ([`ranking`]), and how progress is reported ([`event`]).

pub mod event;
pub mod message;
pub mod ranking;
pub mod results;
pub mod spec;
