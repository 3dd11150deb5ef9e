pub mod catalog;
pub mod providers;
pub mod recommendations;
pub mod scorer;
pub mod storage;
pub mod uploads;

pub use recommendations::RecommendationService;
pub use scorer::{GenreTable, Scorer, Weights};
pub use storage::{PosterStorage, S3PosterStorage};
