//! Application use cases

pub mod generate_title;
pub mod run_council;
