pub mod accuracy;
pub mod frequency;
pub mod report;

pub use accuracy::{mean_absolute_error_per_item, root_mean_square_error};
pub use frequency::rating_frequency;
pub use report::{ItemError, Report, RunParameters};
