pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod evaluation;
pub mod filtering;
pub mod services;
pub mod store;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::{Command, DataArgs, NeighborArgs};
use crate::config::settings::AppConfig;
use crate::filtering::types::Mode;
use crate::services::evaluation::EvaluationService;
use crate::services::render::{render_comparison, render_report};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_evaluate(
    mode: Mode,
    neighbors: &NeighborArgs,
    data: &DataArgs,
    top: usize,
    json: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = build_config(neighbors, data);
    config.prediction.mode = mode;
    config.report.top_n = top;
    config.report.json_output = json.map(|p| p.to_path_buf());

    let service = EvaluationService::new(config)?;
    let report = service.run()?;
    render_report(&report);
    Ok(())
}

pub fn handle_compare(neighbors: &NeighborArgs, data: &DataArgs) -> Result<()> {
    let service = EvaluationService::new(build_config(neighbors, data))?;
    let results = service.compare()?;
    render_comparison(&results);
    Ok(())
}

fn build_config(neighbors: &NeighborArgs, data: &DataArgs) -> AppConfig {
    let mut config = AppConfig::new();

    config.prediction.k = neighbors.k;
    config.prediction.min_overlap = neighbors.min_overlap;
    config.prediction.min_ratings_per_user = neighbors.min_ratings;
    config.prediction.parallel = !neighbors.sequential;

    if let Some(path) = &data.training {
        config.data.training_path = path.clone();
    }
    if let Some(path) = &data.test {
        config.data.test_path = path.clone();
    }
    if let Some(path) = &data.items {
        config.data.item_names_path = path.clone();
    }
    config
}
