#![warn(clippy::all)]

use anyhow::Result;
use clap::Parser;
use longest_life::{Config, JsonFileSink};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();
    config.validate()?;

    if let Some(path) = &config.replay {
        let score = longest_life::replay(path, config.generation_limit())?;
        println!("Score: {score}");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(longest_life::search(&config, Arc::new(JsonFileSink)))?;

    println!("\nSimulation finished in {:?}", summary.elapsed);
    match &summary.best {
        Some(best) => println!("\nBest score: {} (round {})", best.score, best.index),
        None => println!("\nBest score: 0"),
    }
    Ok(())
}
