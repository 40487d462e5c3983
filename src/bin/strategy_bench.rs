// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use clap::{Parser, Subcommand};
use flightfarm::benchmark::report::ReportWriter;
use flightfarm::benchmark::strategies::{
    run_chunk_in_process, BenchPairRunner, ChildProcessRunner, StrategyRunner,
};
use flightfarm::benchmark::BenchmarkHarness;
use flightfarm::config::settings::Settings;
use flightfarm::domain::models::route::Route;
use flightfarm::domain::services::scrape_service::KayakScraper;
use flightfarm::engines::chromium_engine::ChromiumLauncher;
use flightfarm::infrastructure::metrics::describe_metrics;
use flightfarm::utils::telemetry::{self, ConsoleTarget};
use std::sync::Arc;
use tracing::{error, info};

/// 并发策略基准测试
#[derive(Parser, Debug)]
#[command(name = "strategy_bench", version, about = "Compare concurrency strategies for the flight scraper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every strategy over all ordered pairs of the configured origins (default)
    Run {
        /// Override the configured origins, comma separated
        #[arg(long, value_delimiter = ',')]
        origins: Option<Vec<String>>,
    },
    /// Scrape a chunk of pairs and print the results as JSON on stdout
    Worker {
        /// JSON array of {"origin", "destination"} objects
        #[arg(long)]
        pairs: String,
        /// Scrape the pairs of the chunk concurrently
        #[arg(long)]
        concurrent: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration, using defaults: {}", e);
            Settings::default()
        }
    };

    match cli.command {
        // Stdout carries the results, so logs go to stderr
        Some(Command::Worker { pairs, concurrent }) => {
            telemetry::init_telemetry(&settings.logging, ConsoleTarget::Stderr);
            run_worker(&settings, &pairs, concurrent).await
        }
        Some(Command::Run { origins }) => {
            telemetry::init_telemetry(&settings.logging, ConsoleTarget::Stdout);
            let origins = origins.unwrap_or_else(|| settings.bench.origins.clone());
            if let Err(e) = run_benchmark(&settings, &origins).await {
                error!("Benchmark error: {:?}", e);
            }
            Ok(())
        }
        None => {
            telemetry::init_telemetry(&settings.logging, ConsoleTarget::Stdout);
            if let Err(e) = run_benchmark(&settings, &settings.bench.origins).await {
                error!("Benchmark error: {:?}", e);
            }
            Ok(())
        }
    }
}

fn pair_runner(settings: &Settings) -> BenchPairRunner {
    let launcher = Arc::new(ChromiumLauncher::new(settings.browser.clone()));
    let scraper = Arc::new(KayakScraper::new(
        launcher,
        settings.scraper.clone(),
        &settings.output.logs_dir,
    ));
    BenchPairRunner::new(
        scraper,
        &settings.output.bench_dir,
        settings.output.bench_base_name.clone(),
    )
}

async fn run_worker(settings: &Settings, pairs: &str, concurrent: bool) -> anyhow::Result<()> {
    let pairs: Vec<Route> = serde_json::from_str(pairs).context("invalid --pairs JSON")?;
    let runner = pair_runner(settings);

    let results = run_chunk_in_process(&runner, &pairs, concurrent).await;
    println!("{}", serde_json::to_string(&results)?);
    Ok(())
}

async fn run_benchmark(settings: &Settings, origins: &[String]) -> anyhow::Result<()> {
    describe_metrics();
    tokio::fs::create_dir_all(&settings.output.logs_dir).await?;

    let pairs = Route::all_pairs(origins);
    info!("Benchmarking {} pairs from {:?}", pairs.len(), origins);

    let runner = StrategyRunner::new(
        Arc::new(pair_runner(settings)),
        Arc::new(ChildProcessRunner::current_exe()?),
        settings.bench.pool_workers,
    );
    info!("Pool size: {}", runner.pool_workers());

    let harness = BenchmarkHarness::new(
        runner,
        ReportWriter::new(&settings.bench.report_file),
        settings.bench.priority_pairs.clone(),
        settings.bench.plot_dir.join(&settings.bench.plot_file),
    );

    let metrics = harness.run_all(&pairs, &settings.bench.hybrid_workers).await?;
    info!("Benchmark finished, {} strategies measured", metrics.len());
    Ok(())
}
