pub mod evaluation;
pub mod render;

pub use evaluation::{evaluate_mode, CenteredDataset, EvaluationService, ModeEvaluation};
