//! Call a templated completion function once from the shell.
//!
//! # Examples
//!
//! ```sh
//! # Summarize a blog post read from a file
//! simplebot --system "You are an expert blogger. Summarize the post." \
//!   --input-file post.md
//!
//! # Pipe input through stdin, with an explicit model
//! cat post.md | simplebot --system "Suggest five titles." --model gpt-4o
//!
//! # Provider settings from a YAML file
//! simplebot --config bot.yaml --system "Reply in JSON." --json --input "hi"
//! ```
//!
//! Without `--config`, provider settings come from the `SIMPLEBOT_*`
//! environment variables (API key: `SIMPLEBOT_API_KEY` or `OPENAI_API_KEY`).

use anyhow::{bail, Context};
use clap::Parser;
use simplebot::{ProviderConfig, SimpleBot};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Send one message under a fixed system prompt and print the response.
#[derive(Parser, Debug)]
#[command(name = "simplebot", version)]
struct Cli {
    /// System prompt bound to the bot
    #[arg(long, short = 's')]
    system: String,

    /// Message to send
    #[arg(long, short = 'i', conflicts_with = "input_file")]
    input: Option<String>,

    /// Read the message from a file
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// YAML file with provider settings (otherwise read from the environment)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Model name override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Sampling temperature override (0.0 - 2.0)
    #[arg(long, short = 't')]
    temperature: Option<f64>,

    /// Ask the provider for a JSON object response
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "simplebot=debug",
        _ => "simplebot=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let input = read_input(&cli)?;

    let bot = SimpleBot::builder()
        .system_prompt(cli.system)
        .config(config)
        .build()
        .context("failed to construct bot")?;

    let response = bot.call(&input).context("completion failed")?;
    println!("{}", response);
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<ProviderConfig> {
    let mut config = match &cli.config {
        Some(path) => ProviderConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ProviderConfig::from_env().context("invalid environment configuration")?,
    };
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(t) = cli.temperature {
        config.temperature = t;
    }
    if cli.json {
        config.json_mode = true;
    }
    Ok(config)
}

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some(text) = &cli.input {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.input_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no input given: use --input, --input-file, or pipe text on stdin");
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}
