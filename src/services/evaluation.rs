use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::config::settings::{AppConfig, PredictionSettings};
use crate::errors::export_context;
use crate::evaluation::{mean_absolute_error_per_item, root_mean_square_error, Report, RunParameters};
use crate::filtering::types::{ErrorTable, Mode, PredictionTable, UserKey};
use crate::filtering::{Predictor, UserMeans};
use crate::store::{load_store, RatingStore};

/// Training data with every user's mean removed, ready for neighbor search.
pub struct CenteredDataset {
    store: RatingStore,
    means: UserMeans,
}

impl CenteredDataset {
    pub fn new(mut store: RatingStore) -> Self {
        let means = UserMeans::compute(store.user_to_item());
        means.center(&mut store);
        Self { store, means }
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn means(&self) -> &UserMeans {
        &self.means
    }

    /// Gives back the store on its original rating scale.
    pub fn into_raw_store(mut self) -> RatingStore {
        self.means.decenter_store(&mut self.store);
        self.store
    }
}

/// Outcome of predicting and scoring one mode.
pub struct ModeEvaluation {
    pub predictions: PredictionTable,
    pub errors: ErrorTable,
    pub rmse: f64,
}

impl ModeEvaluation {
    pub fn prediction_count(&self) -> usize {
        self.predictions.values().map(|items| items.len()).sum()
    }
}

pub struct EvaluationService {
    config: AppConfig,
}

impl EvaluationService {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.prediction.validate()?;
        Ok(Self { config })
    }

    /// Runs the configured mode end to end and returns the report.
    pub fn run(&self) -> Result<Report> {
        info!("=== Starting Evaluation ===\n");

        let store = load_store(&self.config.data)?;
        let report = self.evaluate_store(store)?;

        if let Some(path) = &self.config.report.json_output {
            export_report(&report, path)?;
        }

        info!("=== Evaluation Complete ===");
        Ok(report)
    }

    /// Runs both modes on the same centered data and returns each RMSE.
    pub fn compare(&self) -> Result<Vec<(Mode, f64)>> {
        info!("=== Starting Mode Comparison ===\n");

        let dataset = CenteredDataset::new(load_store(&self.config.data)?);
        let mut results = Vec::new();

        for mode in [Mode::User, Mode::Item] {
            let settings = PredictionSettings {
                mode,
                ..self.config.prediction.clone()
            };
            let evaluation = evaluate_mode(&dataset, &settings)?;
            info!("  → {} RMSE: {:.4}", mode.as_str(), evaluation.rmse);
            results.push((mode, evaluation.rmse));
        }

        info!("=== Comparison Complete ===");
        Ok(results)
    }

    /// Everything after loading: center, predict, score, build the report.
    pub fn evaluate_store(&self, store: RatingStore) -> Result<Report> {
        let dataset = CenteredDataset::new(store);
        let evaluation = evaluate_mode(&dataset, &self.config.prediction)?;

        let raw_store = dataset.into_raw_store();
        Ok(Report::build(
            RunParameters::from(&self.config.prediction),
            &evaluation.errors,
            &raw_store,
            evaluation.rmse,
            evaluation.prediction_count(),
            self.config.report.top_n,
        ))
    }
}

/// Predicts every test pair in one mode and scores the de-centered predictions.
pub fn evaluate_mode(dataset: &CenteredDataset, settings: &PredictionSettings) -> Result<ModeEvaluation> {
    let store = dataset.store();
    let mut predictions = Predictor::new(store.view(settings.mode), settings).predict(store.test_ratings());
    dataset.means().decenter(&mut predictions, UserKey::Outer);

    let errors = mean_absolute_error_per_item(&predictions, store.test_ratings(), settings.min_ratings_per_user)?;
    info!("  → Scored {} items", errors.len());

    let rmse = root_mean_square_error(&predictions, store.test_ratings())?;
    info!("  → RMSE: {:.4}", rmse);

    Ok(ModeEvaluation {
        predictions,
        errors,
        rmse,
    })
}

fn export_report(report: &Report, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| export_context(path))?;
    info!("Saved report to {}", path.display());
    Ok(())
}
