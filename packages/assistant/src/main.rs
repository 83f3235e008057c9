mod config;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use placement_knowledge::{
    DocumentStore, MemoryStore, MultiSourceScraper, QueryOrchestrator,
    QueryResponse, ResponseSource, SqliteStore, StoreOutcome,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "placement-assistant", version, about = "Placement assistant chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one question and print the JSON response
    Ask {
        #[arg(long, default_value = "cli")]
        user: String,
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Interactive chat on stdin
    Chat {
        #[arg(long, default_value = "cli")]
        user: String,
    },
    /// Show a user's recent messages
    History {
        #[arg(long, default_value = "cli")]
        user: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show the stored knowledge record for a company
    Show {
        #[arg(required = true)]
        company: Vec<String>,
    },
    /// Scrape a company and store the result if it passes the quality gate
    Scrape {
        #[arg(required = true)]
        company: Vec<String>,
        /// Official website to scrape instead of discovering one
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,placement_knowledge=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let store = open_store(&config).await?;
    let scraper = MultiSourceScraper::from_config(config.scraper_config());
    let pipeline = QueryOrchestrator::new(store, scraper);

    match cli.command {
        Command::Ask { user, message } => {
            let answer = pipeline.handle(&user, &message.join(" ")).await;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        Command::Chat { user } => chat(&pipeline, &user).await?,
        Command::History { user, limit } => {
            let entries = pipeline.chat_logs().history(&user, limit).await?;
            if entries.is_empty() {
                println!("{}", "No history yet.".dimmed());
            }
            for entry in entries {
                println!(
                    "{} {} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    format!("[{}]", entry.source).cyan(),
                    entry.message.bold()
                );
            }
        }
        Command::Show { company } => {
            let company = company.join(" ");
            match pipeline.knowledge().find(&company).await? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("{} {}", "No stored record for".yellow(), company.bold()),
            }
        }
        Command::Scrape { company, url } => {
            let company = company.join(" ");
            let report = pipeline
                .scraper()
                .scrape_and_store(pipeline.knowledge(), &company, url.as_deref())
                .await;
            println!("{}", serde_json::to_string_pretty(&report.fields)?);
            match report.outcome {
                StoreOutcome::Stored => println!("{}", "✓ Stored".green().bold()),
                StoreOutcome::Rejected(reason) => {
                    println!("{} {}", "✗ Not stored:".yellow().bold(), reason)
                }
                StoreOutcome::Failed(e) => {
                    return Err(e).context(format!("Failed to store record for {company}"))
                }
            }
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let store = SqliteStore::new(url)
                .await
                .with_context(|| format!("Failed to open database at {url}"))?;
            tracing::info!(url = %url, "Using SQLite store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn chat(pipeline: &QueryOrchestrator, user: &str) -> Result<()> {
    println!(
        "{}",
        "Ask about a company's skills, eligibility, interviews or salary. Ctrl-D to quit."
            .bright_cyan()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", "you>".bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let answer = pipeline.handle(user, &line).await;
        print_answer(&answer);
    }
    Ok(())
}

fn print_answer(answer: &QueryResponse) {
    let tag = format!("[{}]", answer.source);
    let tag = match answer.source {
        ResponseSource::KnowledgeBase => tag.green(),
        ResponseSource::Scraped => tag.blue(),
        ResponseSource::Ai => tag.magenta(),
        ResponseSource::Error => tag.red(),
    };
    println!("{} {}\n", tag, answer.response);
}
