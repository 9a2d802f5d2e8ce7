pub mod models;

pub use models::{ItemNameRow, RatingRow};
