//! CLI entrypoint for llm-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{bail, Result};
use clap::Parser;
use council_application::ports::conversation_store::ConversationStore;
use council_application::{GenerateTitleUseCase, RunCouncilUseCase};
use council_domain::CouncilEvent;
use council_infrastructure::{ConfigLoader, FileConfig, HttpLlmGateway, JsonFileStore};
use council_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, StreamPresenter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    info!("Starting llm-council");

    // clap enforces this unless --show-config was given, which returned above
    let question = match &cli.question {
        Some(question) => question.clone(),
        None => bail!("Question is required."),
    };

    // Load configuration
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    let roster = config.to_roster()?;
    let params = config.to_params();

    // === Dependency Injection ===
    let gateway = Arc::new(HttpLlmGateway::new(config.to_registry()));
    let store = JsonFileStore::new(JsonFileStore::default_dir());

    // Print header
    if !cli.quiet && !matches!(cli.output, OutputFormat::Json) {
        println!();
        println!("+============================================================+");
        println!("|                       LLM Council                          |");
        println!("+============================================================+");
        println!();
        println!("Question: {}", question);
        println!("Council: {}", roster.member_names().join(", "));
        println!("Chairman: {}", roster.chairman.name);
        println!();
    }

    // Conversation bookkeeping: load or create, note whether this is the
    // first exchange (the title trigger), and record the question.
    let mut generate_title = false;
    if let Some(id) = &cli.conversation {
        let conversation = match store.get(id).await {
            Some(conversation) => Some(conversation),
            None => store.create(id).await,
        };
        generate_title = conversation.as_ref().is_some_and(|c| c.is_empty());
        store.append_user_message(id, &question).await;
    }

    let use_case = RunCouncilUseCase::new(gateway.clone(), roster.clone()).with_params(params);

    if cli.no_stream {
        run_batch(&cli, &question, &use_case, gateway, &roster, params, &store, generate_title)
            .await
    } else {
        run_streaming(&cli, &question, &use_case, &store, generate_title).await
    }
}

/// Default path: consume the event stream, printing stages as they land.
async fn run_streaming(
    cli: &Cli,
    question: &str,
    use_case: &RunCouncilUseCase<HttpLlmGateway>,
    store: &JsonFileStore,
    generate_title: bool,
) -> Result<()> {
    let mut stream = use_case.execute_streaming(question, generate_title);
    let mut presenter = StreamPresenter::new(question, cli.output, cli.quiet);
    let mut synthesized = false;

    while let Some(event) = stream.recv().await {
        match &event {
            CouncilEvent::Stage3Complete { .. } => synthesized = true,
            CouncilEvent::TitleComplete { data } => {
                if let Some(id) = &cli.conversation {
                    store.set_title(id, &data.title).await;
                }
            }
            _ => {}
        }
        presenter.on_event(&event);
    }

    if synthesized {
        if let Some(id) = &cli.conversation {
            let outcome = presenter.outcome();
            store
                .append_assistant_message(id, &outcome.stage1, &outcome.stage2, &outcome.stage3)
                .await;
        }
    }

    Ok(())
}

/// `--no-stream`: wait for the full outcome, then format once.
async fn run_batch(
    cli: &Cli,
    question: &str,
    use_case: &RunCouncilUseCase<HttpLlmGateway>,
    gateway: Arc<HttpLlmGateway>,
    roster: &council_domain::CouncilRoster,
    params: council_application::ExecutionParams,
    store: &JsonFileStore,
    generate_title: bool,
) -> Result<()> {
    let outcome = if cli.quiet {
        use_case.execute(question).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(question, &progress).await?
    };

    if let Some(id) = &cli.conversation {
        if generate_title {
            let titler =
                GenerateTitleUseCase::new(gateway, roster.title_model.clone(), params.title_timeout);
            let title = titler.execute(question).await;
            store.set_title(id, &title).await;
        }
        if !outcome.is_total_failure() {
            store
                .append_assistant_message(id, &outcome.stage1, &outcome.stage2, &outcome.stage3)
                .await;
        }
    }

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(question, &outcome),
        OutputFormat::Synthesis => ConsoleFormatter::format_synthesis_only(question, &outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(question, &outcome),
    };

    println!("{}", output);

    Ok(())
}
