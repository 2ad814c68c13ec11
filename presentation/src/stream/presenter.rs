//! Live presenter for the council event stream
//!
//! Consumes [`CouncilEvent`]s one at a time and prints each stage's output
//! as soon as it lands, instead of waiting for the whole run. The presenter
//! also accumulates the stage payloads so the caller can persist or
//! re-format the complete outcome after the stream ends.

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use council_domain::{CouncilEvent, CouncilMetadata, CouncilOutcome};

/// Prints council events as they arrive and accumulates the outcome.
pub struct StreamPresenter {
    question: String,
    format: OutputFormat,
    quiet: bool,
    outcome: CouncilOutcome,
}

impl StreamPresenter {
    pub fn new(question: impl Into<String>, format: OutputFormat, quiet: bool) -> Self {
        Self {
            question: question.into(),
            format,
            quiet,
            outcome: CouncilOutcome::new(Vec::new(), Vec::new(), "", CouncilMetadata::default()),
        }
    }

    /// Handle one event from the stream.
    pub fn on_event(&mut self, event: &CouncilEvent) {
        match event {
            CouncilEvent::Stage1Start => self.announce("Stage 1: Collect Responses"),
            CouncilEvent::Stage1Complete { data } => {
                self.outcome.stage1 = data.clone();
                if self.show_stage_detail() {
                    for result in data {
                        println!(
                            "\n{}\n{}",
                            format!("── {} ──", result.model).yellow().bold(),
                            result.response
                        );
                    }
                }
            }
            CouncilEvent::Stage2Start => self.announce("Stage 2: Peer Ranking"),
            CouncilEvent::Stage2Complete { data, metadata } => {
                self.outcome.stage2 = data.clone();
                self.outcome.metadata = metadata.clone();
                if self.show_stage_detail() {
                    for result in data {
                        println!(
                            "\n{}\n{}",
                            format!("── {} ──", result.model).yellow().bold(),
                            result.ranking
                        );
                    }
                }
            }
            CouncilEvent::Stage3Start => self.announce("Stage 3: Synthesis"),
            CouncilEvent::Stage3Complete { data } => {
                self.outcome.stage3 = data.clone();
                match self.format {
                    OutputFormat::Full => {
                        println!("\n{}", "Final Synthesis:".cyan().bold());
                        println!("{data}");
                    }
                    OutputFormat::Synthesis => println!("{data}"),
                    OutputFormat::Json => {}
                }
            }
            CouncilEvent::TitleComplete { data } => {
                if !self.quiet && !matches!(self.format, OutputFormat::Json) {
                    println!("{}", format!("Title: {}", data.title).dimmed());
                }
            }
            CouncilEvent::Complete => {
                if matches!(self.format, OutputFormat::Json) {
                    println!(
                        "{}",
                        ConsoleFormatter::format_json(&self.question, &self.outcome)
                    );
                }
            }
            CouncilEvent::Error { message } => {
                self.outcome.stage3 = message.clone();
                eprintln!("{}", message.red());
            }
        }
    }

    /// The outcome assembled so far.
    pub fn outcome(&self) -> &CouncilOutcome {
        &self.outcome
    }

    fn announce(&self, name: &str) {
        if !self.quiet && !matches!(self.format, OutputFormat::Json) {
            println!("{} {}", "->".cyan(), name.bold());
        }
    }

    fn show_stage_detail(&self) -> bool {
        matches!(self.format, OutputFormat::Full)
    }
}
