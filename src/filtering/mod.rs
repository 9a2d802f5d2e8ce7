pub mod neighbors;
pub mod normalization;
pub mod predictor;
pub mod similarity;
pub mod types;

pub use neighbors::{nearest_neighbors, Candidate};
pub use normalization::UserMeans;
pub use predictor::Predictor;
pub use similarity::cosine_similarity;
pub use types::{Mode, PredictionTable, UserKey};
