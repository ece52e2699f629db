use std::io::BufRead;

use anyhow::{bail, Context};
use clap::Parser;

mod app;
mod catalog;
mod cli;
mod config;
mod llm;
mod prompt;
mod retriever;
mod semantic;
#[cfg(test)]
mod tests;
mod web;

use app::AppFactory;
use config::Config;
use prompt::ItineraryRequest;
use semantic::{Embedder, IndexStorage, LabelStorage};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")
}

fn build_index(config: &Config, show_progress: bool) -> anyhow::Result<()> {
    let catalog = AppFactory::load_catalog(config)?;
    if catalog.is_empty() {
        bail!("catalog {} has no monuments", config.catalog_path().display());
    }
    let embedder = AppFactory::create_embedder(config)?;

    let built = semantic::build_index(
        &catalog,
        embedder.as_ref(),
        config.retrieval.batch_size,
        show_progress,
    )?;

    built.save(
        &IndexStorage::new(config.index_path()),
        &LabelStorage::new(config.labels_path()),
        &embedder.model_id(),
    )?;

    println!("Indexed {} monuments", built.len());
    Ok(())
}

fn read_question(text: Vec<String>) -> anyhow::Result<String> {
    let question = if text.is_empty() {
        eprint!("Enter your travel query: ");
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line
    } else {
        text.join(" ")
    };

    let question = question.trim().to_string();
    if question.is_empty() {
        bail!("empty query");
    }
    Ok(question)
}

fn main() -> anyhow::Result<()> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();
    init_logging();

    let args = cli::Args::parse();
    let base_path = args.base_path.unwrap_or_else(AppFactory::base_path);
    let config = AppFactory::load_config(&base_path)?;

    match args.command {
        cli::Command::Serve {} => {
            let planner = AppFactory::create_planner(&config)?;
            let addr = format!("{}:{}", config.server.host, config.server.port);
            runtime()?.block_on(web::serve(planner, &addr))
        }

        cli::Command::BuildIndex { no_progress } => build_index(&config, !no_progress),

        cli::Command::Query { text } => {
            if config.llm.api_key.is_none() {
                bail!("{} not found! Add it to your environment or .env file.", config::ENV_API_KEY);
            }

            let planner = AppFactory::create_planner(&config)?;
            let question = read_question(text)?;

            let answer = runtime()?.block_on(planner.answer(&question, config.retrieval.query_top_k))?;
            match answer {
                Some(answer) => println!("{answer}"),
                None => println!("No similar monuments found in the index."),
            }
            Ok(())
        }

        cli::Command::Plan {
            city,
            duration,
            budget,
            interests,
            location,
        } => {
            let request = ItineraryRequest {
                trip_duration: duration,
                budget,
                interests,
                location,
                ..ItineraryRequest::new(city)
            };

            let planner = AppFactory::create_planner(&config)?;
            let itinerary = runtime()?.block_on(planner.generate(&request))?;
            println!("{itinerary}");
            Ok(())
        }
    }
}
