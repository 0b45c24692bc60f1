//! Tech News & Learning Assistant.
//!
//! Runs a scripted demo by default, or an interactive chat with
//! `--interactive`. Reads the API key from `GEMINI_API_KEY` or `--api-key`.
//!
//! ```sh
//! techmate --interactive --demo-fallback
//! RUST_LOG=techmate_rs=debug techmate
//! ```

use std::io::Write;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use techmate_chat::demo::{DemoError, run_scripted};
use techmate_chat::repl::run_interactive;
use techmate_chat::{AppConfig, AppError, CliEventHandler, resolve_api_key};
use techmate_rs::GeminiClient;
use techmate_rs::agent::{Agent, CompositeEventHandler, LoggingHandler};

/// Tech News & Learning Assistant powered by Gemini.
#[derive(Parser)]
#[command(name = "techmate", version)]
struct Cli {
    /// Chat interactively instead of running the scripted demo.
    #[arg(long, conflicts_with_all = ["list_models", "check"])]
    interactive: bool,

    /// List models that support generateContent and exit.
    #[arg(long, conflicts_with = "check")]
    list_models: bool,

    /// Send one greeting to verify the API key and exit.
    #[arg(long)]
    check: bool,

    /// Gemini model to use.
    #[arg(long, default_value = techmate_rs::DEFAULT_MODEL)]
    model: String,

    /// Maximum search results passed to the model.
    #[arg(long, default_value_t = techmate_rs::tools::web_search::DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Use canned demo results when web search is empty or unavailable.
    #[arg(long)]
    demo_fallback: bool,

    /// Answer each message without prior conversation context.
    #[arg(long)]
    no_memory: bool,

    /// Do not offer the web_search tool to the model.
    #[arg(long)]
    no_tools: bool,

    /// Debug-level logging to stderr (RUST_LOG takes precedence).
    #[arg(long, short)]
    verbose: bool,

    /// API key. Falls back to the GEMINI_API_KEY environment variable.
    #[arg(long)]
    api_key: Option<String>,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            model: self.model.clone(),
            max_results: self.max_results,
            demo_fallback: self.demo_fallback,
            memory: !self.no_memory,
            tools_enabled: !self.no_tools,
            ..Default::default()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = cli.app_config();
    let api_key = resolve_api_key(cli.api_key.clone())?;
    let client = config.build_client(&api_key)?;
    debug!("Using model {}", client.model());

    if cli.list_models {
        return list_models(&client).await;
    }
    if cli.check {
        return check_connection(&client).await;
    }

    let tools = config.build_tools()?;
    let handler = CompositeEventHandler::new()
        .with(LoggingHandler)
        .with(CliEventHandler);
    let mut agent =
        Agent::new(&client, &tools, config.build_agent_config()).with_event_handler(&handler);

    let mut stdout = std::io::stdout();
    if cli.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        run_interactive(&mut agent, stdin, &mut stdout).await?;
    } else {
        println!("\nRunning scripted demo...");
        println!("(Use 'techmate --interactive' for interactive mode)\n");
        match run_scripted(&mut agent, &mut stdout).await {
            Ok(()) => {}
            Err(DemoError::Agent(e)) => eprintln!("Error: {e}"),
            Err(DemoError::Io(e)) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn list_models(client: &GeminiClient) -> Result<(), AppError> {
    let models = client.list_models().await?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "Available models:\n")?;
    for model in models.iter().filter(|m| m.supports_generate_content()) {
        writeln!(out, "- {}", model.name)?;
        if let Some(display) = &model.display_name {
            writeln!(out, "  Display name: {display}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

async fn check_connection(client: &GeminiClient) -> Result<(), AppError> {
    println!("Testing Gemini API connection...");
    let reply = client.check_connection().await?;
    println!("Gemini says: {reply}");
    println!("\n✓ Success! API is working.");
    Ok(())
}
