pub mod analysis;
pub mod charts;
pub mod prompts;
pub mod providers;
pub mod recommendations;

pub use recommendations::RecommendationService;
