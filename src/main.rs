mod config;
mod dictionary;
mod encoding;
mod error;
mod server;
mod store;
mod validation;
mod worker;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, LogConfig};
use dictionary::Dictionary;
use server::Server;

/// Word/definition store served over HTTP
#[derive(Debug, Parser)]
#[command(name = "worddb", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the HTTP listening address
    #[arg(long)]
    addr: Option<String>,

    /// Override the dictionary file
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Add or replace a word
    Add { word: String, definition: String },
    /// Print the definition of a word
    Get { word: String },
    /// Remove a word
    Remove { word: String },
    /// Print every word, sorted
    List,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(addr) = &self.addr {
            config.server_addr = addr.clone();
        }
        if let Some(data) = &self.data {
            config.dictionary_file = data.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Trim and validate a pair from the command line, then add it
async fn add_validated(
    dictionary: &Dictionary,
    word: &str,
    definition: &str,
) -> anyhow::Result<String> {
    let word = word.trim();
    let definition = definition.trim();
    validation::validate_entry(word, definition)
        .with_context(|| format!("Error validating data for '{}'", word))?;
    Ok(dictionary.add(word, definition).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging(&config.log)?;

    let dictionary = Dictionary::open(&config.dictionary_file)
        .await
        .with_context(|| {
            format!(
                "Error loading data from '{}'",
                config.dictionary_file.display()
            )
        })?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting WordDB - word/definition store");
            info!("Version: {}", env!("CARGO_PKG_VERSION"));
            if dictionary.is_empty() {
                info!("Dictionary file: {} (empty)", dictionary.path().display());
            } else {
                info!(
                    "Dictionary file: {} ({} words)",
                    dictionary.path().display(),
                    dictionary.len()
                );
            }

            let server = Server::bind(&config, Arc::new(dictionary)).await?;
            info!("Server listening on: {}", server.local_addr());
            server.run().await?;
        }
        Command::Add { word, definition } => {
            println!("{}", add_validated(&dictionary, &word, &definition).await?);
        }
        Command::Get { word } => {
            let entry = dictionary.get(&word)?;
            println!("{}: {}", word, entry);
        }
        Command::Remove { word } => {
            println!("{}", dictionary.remove(&word).await?);
        }
        Command::List => {
            let (mut words, _) = dictionary.list();
            words.sort();
            for word in words {
                println!("{}", word);
            }
        }
    }

    Ok(())
}
