//! CLI interface

pub mod commands;
