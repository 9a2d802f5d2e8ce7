pub mod loader;
pub mod table;

pub use loader::load_store;
pub use table::RatingStore;
